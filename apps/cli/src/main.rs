//! threadpull CLI — social-thread collection and enrichment tool.
//!
//! Drives a browser session through incremental content loading to gather
//! post and reply identifiers, then enriches the dataset with full content
//! and sentiment scores.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
