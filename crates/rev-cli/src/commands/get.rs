//! Get command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::CliSession;

use super::parse_query;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// API path, e.g. /api/v2/videos/{id}/details
    pub endpoint: String,

    /// Query parameter as key=value; repeat for more
    #[arg(long = "query", short = 'q')]
    pub query: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(connection: &ConnectionArgs, args: GetArgs) -> Result<()> {
    let query = parse_query(&args.query)?;
    let session = CliSession::open_fresh(connection).await?;

    let query = (!query.is_empty()).then_some(Value::Object(query));
    let reply = session
        .client()
        .get(&args.endpoint, query)
        .await
        .with_context(|| format!("GET {} failed", args.endpoint))?;

    output::reply(reply, args.pretty)?;

    session.finish().await
}
