//! # Course Catalog CLI (`catalog`)
//!
//! Parses a graduate catalog document into course and program records and
//! ranks them against free-text queries.
//!
//! ## Usage
//!
//! ```bash
//! catalog --config ./config/catalog.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catalog fetch` | Download the catalog document |
//! | `catalog list <courses\|programs>` | Print parsed records |
//! | `catalog search "<query>"` | Ranked search over courses or programs |
//! | `catalog stats` | Record counts by college and department |
//! | `catalog serve` | Start the JSON HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Phrase search: comma-separated terms may contain spaces
//! catalog search "machine learning, ai" --limit 5
//!
//! # Search programs instead of courses
//! catalog search "data science" --kind programs --json
//! ```
//!
//! Logs go to stderr and honor `RUST_LOG` (default `info`); stdout carries
//! only command output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use course_catalog::models::RecordKind;
use course_catalog::{config, fetch, list, search, server, stats};

/// Course Catalog CLI: text extraction and relevance search over a
/// university graduate catalog.
#[derive(Parser)]
#[command(
    name = "catalog",
    about = "Course Catalog — text extraction and relevance search over a graduate catalog",
    version,
    long_about = "Parses a graduate catalog PDF into course and program records (identifier, \
    name, description, department, college, keywords) and ranks them against free-text queries, \
    from the command line or over a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/catalog.toml`. See
    /// `config/catalog.example.toml` for every setting.
    #[arg(long, global = true, default_value = "./config/catalog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Download the catalog document to `catalog.path`.
    ///
    /// Skips the download when a local copy already exists unless `--force`
    /// is given. Runs with built-in defaults when the config file is absent.
    Fetch {
        /// Download even if a local copy exists.
        #[arg(long)]
        force: bool,
    },

    /// Print parsed records of one kind.
    List {
        /// `courses` or `programs`.
        kind: RecordKind,

        /// Maximum number of records to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rank records against a free-text query.
    ///
    /// Comma-separated queries are treated as phrases
    /// (`"machine learning, ai"`); otherwise each word is a term.
    Search {
        /// The search query string.
        query: String,

        /// Record kind to search: `courses` or `programs`.
        #[arg(long, default_value = "courses")]
        kind: RecordKind,

        /// Maximum number of results (defaults to `search.max_results`).
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show record counts by college and department.
    Stats,

    /// Start the JSON HTTP server on `server.bind`.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = match cli.command {
        Commands::Fetch { .. } if !cli.config.exists() => {
            warn!(
                config = %cli.config.display(),
                "config file not found, using defaults"
            );
            config::Config::minimal()
        }
        _ => config::load_config(&cli.config)?,
    };

    match cli.command {
        Commands::Fetch { force } => {
            fetch::run_fetch(&cfg, force).await?;
        }
        Commands::List { kind, limit, json } => {
            list::run_list(&cfg, kind, limit, json).await?;
        }
        Commands::Search {
            query,
            kind,
            limit,
            json,
        } => {
            search::run_search(&cfg, &query, kind, limit, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
