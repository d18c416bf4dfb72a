//! Subcommand implementations.

pub mod extend;
pub mod get;
pub mod login;
pub mod logoff;
pub mod search;
pub mod verify;
pub mod whoami;

use anyhow::{Result, bail};
use serde_json::{Map, Value};

/// Parse repeated `key=value` options into a query object.
///
/// A repeated key becomes an array so it is sent once per value.
pub fn parse_query(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut query = Map::new();

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid query '{}', expected key=value", pair);
        };
        if key.is_empty() {
            bail!("Invalid query '{}', key is empty", pair);
        }

        let value = Value::String(value.to_string());
        match query.get_mut(key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                query.insert(key.to_string(), value);
            }
        }
    }

    Ok(query)
}
