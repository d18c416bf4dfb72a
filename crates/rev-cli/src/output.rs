//! Output formatting helpers.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use revclient::Reply;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a decoded response body.
///
/// Binary bodies are written to stdout unchanged.
pub fn reply(reply: Reply, pretty: bool) -> Result<()> {
    match reply {
        Reply::NoContent => eprintln!("{}", "No content.".dimmed()),
        Reply::Json(value) if pretty => json_pretty(&value)?,
        Reply::Json(value) => json(&value)?,
        Reply::Text(text) => println!("{}", text),
        Reply::Bytes(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        other => anyhow::bail!("Cannot print response: {:?}", other),
    }
    Ok(())
}
