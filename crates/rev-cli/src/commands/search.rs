//! Search command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures_util::StreamExt;
use serde_json::Value;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::CliSession;

use super::parse_query;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search endpoint, e.g. /api/v2/videos/search
    pub endpoint: String,

    /// Response field holding the total hit count
    #[arg(long, default_value = "totalVideos")]
    pub total_key: String,

    /// Response field holding the page of items
    #[arg(long, default_value = "videos")]
    pub items_key: String,

    /// Stop after this many items
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Query parameter as key=value; repeat for more
    #[arg(long = "query", short = 'q')]
    pub query: Vec<String>,
}

pub async fn run(connection: &ConnectionArgs, args: SearchArgs) -> Result<()> {
    let query = parse_query(&args.query)?;
    let session = CliSession::open_fresh(connection).await?;

    let scroll = session.client().scroll::<Value>(
        &args.endpoint,
        &args.total_key,
        &args.items_key,
        query,
        args.max_results,
    );

    let mut pages = std::pin::pin!(scroll.into_stream());
    let mut count = 0;
    let mut total = 0;
    while let Some(page) = pages.next().await {
        let page = page.with_context(|| format!("Search of {} failed", args.endpoint))?;
        total = page.total;
        for item in &page.items {
            output::json(item)?;
        }
        count += page.items.len();
    }

    if count == 0 {
        eprintln!("{}", "No results found.".dimmed());
    } else {
        eprintln!();
        eprintln!("{}: {} of {}", "Fetched".dimmed(), count, total);
    }

    session.finish().await
}
