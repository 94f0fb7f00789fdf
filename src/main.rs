//! Catalog-Crawler main entry point
//!
//! This is the command-line interface for the publisher crawler.

use anyhow::Context;
use catalog_crawler::browser::ChromeSession;
use catalog_crawler::catalog::CatalogClient;
use catalog_crawler::config::{load_config_from_env, load_config_with_hash, Config};
use catalog_crawler::crawler::{retry, TaskContext};
use catalog_crawler::Task;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Crawler: keeps a publication catalog in sync with publisher sites
///
/// Runs one crawl task against ACM, MDPI or Springer and pushes what it
/// finds to the catalog API. Without `--config` the settings are read from
/// the environment (and a `.env` file).
#[derive(Parser, Debug)]
#[command(name = "catalog-crawler")]
#[command(version)]
#[command(about = "Publisher crawler and catalog synchronizer", long_about = None)]
struct Cli {
    /// Task to run, e.g. mdpi_update (see --list)
    #[arg(value_name = "TASK")]
    task: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List the available tasks and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if cli.list {
        print_tasks();
        return Ok(());
    }

    let task = match cli.task.as_deref().map(str::parse::<Task>) {
        Some(Ok(task)) => task,
        Some(Err(e)) => {
            tracing::error!("{}", e);
            print_tasks();
            return Ok(());
        }
        None => {
            print_tasks();
            return Ok(());
        }
    };

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e.into());
        }
    };

    handle_run(task, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_crawler=info,warn"),
            1 => EnvFilter::new("catalog_crawler=debug,info"),
            2 => EnvFilter::new("catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn print_tasks() {
    println!("Available tasks: {}", Task::names());
}

/// Configuration from the given file, or from the environment
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => load_config_from_env().context("reading configuration from the environment"),
    }
}

/// Runs the task inside the retry envelope
async fn handle_run(task: Task, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogClient::new(&config.catalog)?;
    tracing::info!("Running task {} ({} attempts)", task, config.retry.attempts.max(1));

    let result = retry(
        config.retry.attempts,
        config.retry.delay(),
        |attempt, _| tracing::info!("Restarting {} after attempt {}", task, attempt),
        |_| run_attempt(task, &config, &catalog),
    )
    .await;

    match result {
        Ok(()) => {
            tracing::info!("Task {} completed", task);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Task {} failed: {:#}", task, e);
            Err(e.into())
        }
    }
}

/// One attempt: a fresh browser, the task from the top, browser closed on
/// every path
async fn run_attempt(task: Task, config: &Config, catalog: &CatalogClient) -> anyhow::Result<()> {
    let session = ChromeSession::launch(&config.browser)
        .await
        .context("launching browser")?;

    let result = async {
        let page = session.new_page().await.context("opening page")?;
        let ctx = TaskContext::new(&page, catalog, config);
        task.run(&ctx).await?;
        Ok::<_, anyhow::Error>(())
    }
    .await;

    session.close().await;
    result
}
