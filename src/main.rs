mod cli;
mod ui;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;
use ui::CrawlProgress;
use votum::output::write_ballots;
use votum::{Ballot, Chronology, VotumConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => VotumConfig::load_from(path)?,
        None => VotumConfig::load()?,
    };
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = usize::from(concurrency);
    }
    let chronology = Chronology::new(&config).context("invalid configuration")?;

    match cli.command {
        Command::List => {
            let urls = chronology
                .list_initiatives()
                .await
                .context("failed to list initiatives")?;
            for url in urls {
                println!("{url}");
            }
        }
        Command::Get { url } => {
            let ballot = chronology
                .get_initiative(&url)
                .await
                .with_context(|| format!("failed to extract {url}"))?;
            println!("{}", serde_json::to_string_pretty(&ballot)?);
        }
        Command::Crawl { limit, output } => {
            let mut urls = chronology
                .list_initiatives()
                .await
                .context("failed to list initiatives")?;
            if let Some(limit) = limit {
                urls.truncate(limit);
            }

            let mut progress = CrawlProgress::start(urls.len());
            let records = chronology.crawl(urls, |record| progress.record(record)).await;
            progress.finish();

            let ballots: Vec<&Ballot> = records
                .iter()
                .filter_map(|record| record.outcome.as_ref().ok())
                .collect();
            write_json(&ballots, output.as_deref())?;

            if progress.failed() > 0 {
                tracing::warn!(failed = progress.failed(), "some initiatives were skipped");
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_json(ballots: &[&Ballot], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_ballots(BufWriter::new(file), ballots)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => write_ballots(std::io::stdout().lock(), ballots)?,
    }
    Ok(())
}
