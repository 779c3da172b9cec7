mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::sync::Arc;
use tidings::config::Settings;
use tidings::{runner, ui};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _cli = Cli::parse();

    // Inner failures are logged by the collectors; anything left is reported
    // here and the process still exits cleanly.
    if let Err(e) = run().await {
        eprintln!("An error occurred: {:#}", e);
    }
}

async fn run() -> Result<()> {
    let settings = Arc::new(Settings::load()?);

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let company = tokio::task::spawn_blocking(ui::prompt_company).await??;

    let summary = runner::run(&company, settings).await;
    println!("{}", ui::summary::format_summary(&summary));

    Ok(())
}
