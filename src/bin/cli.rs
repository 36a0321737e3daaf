//! jobgate CLI
//!
//! One-shot queries against the upstream job board. For the HTTP API, use
//! `jobgate-server`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobgate::{
    error::Result,
    models::Config,
    pipeline::{Gateway, MAX_LIMIT},
};
use serde::Serialize;

/// jobgate - Remote Job Gateway
#[derive(Parser, Debug)]
#[command(name = "jobgate", version, about = "Remote job listing gateway")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of jobs
    Jobs {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Category slug or name
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },

    /// Show a single job by id or provider id
    Job {
        /// Job id
        id: String,
    },

    /// List job categories
    Categories,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command {
        Command::Jobs {
            search,
            category,
            page,
            per_page,
        } => {
            let gateway = Gateway::from_config(&config.upstream)?;
            let result = gateway
                .list_jobs(search.as_deref(), category.as_deref(), page, per_page)
                .await?;
            log::info!(
                "Page {}/{}: {} of {} job(s)",
                result.page,
                result.total_pages,
                result.items.len(),
                result.total
            );
            let start = u64::from(result.page - 1) * u64::from(result.per_page);
            if result.items.is_empty() && start >= u64::from(MAX_LIMIT) {
                log::warn!(
                    "Upstream listings are capped at {} records; later pages are empty",
                    MAX_LIMIT
                );
            }
            print_json(&result)?;
        }

        Command::Job { id } => {
            let gateway = Gateway::from_config(&config.upstream)?;
            let job = gateway.find_job(&id).await?;
            print_json(&job)?;
        }

        Command::Categories => {
            let gateway = Gateway::from_config(&config.upstream)?;
            let categories = gateway.list_categories().await?;
            log::info!("{} categories", categories.len());
            print_json(&categories)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            for (i, endpoint) in config.upstream.job_endpoints().iter().enumerate() {
                log::info!("Mirror {}: {}", i + 1, endpoint);
            }
            log::info!("CORS origins: {}", config.cors_origins().join(", "));

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
