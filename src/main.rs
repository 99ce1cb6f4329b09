//! # docsite CLI
//!
//! ```bash
//! docsite --config ./config/docsite.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docsite search "<query>"` | Search the site's content |
//! | `docsite files` | List content files picked up by the walker |
//! | `docsite serve` | Start the HTTP server |
//! | `docsite completions <shell>` | Print shell completions |
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to change the
//! level (default `docsite=info`).

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docsite::{config, content, search, server};

/// docsite — search for a content-driven documentation site.
#[derive(Parser)]
#[command(
    name = "docsite",
    about = "docsite — search for a content-driven documentation site",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When the file does not exist, built-in defaults are used
    /// (local search over `./content`).
    #[arg(long, global = true, default_value = "./config/docsite.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the site's content.
    ///
    /// An empty query prints no results without touching any backend.
    Search {
        /// The search query string, used verbatim.
        query: String,

        /// Override `[search].backend` for this run (`local` or `remote`).
        #[arg(long)]
        backend: Option<String>,

        /// Output format: `text`, `json`, or `html`.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the content files found under `[content].root`.
    Files,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docsite=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "docsite", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli.config.exists().then(|| cli.config.clone());
    let cfg = match &config_path {
        Some(path) => config::load_config(path)?,
        None => {
            tracing::info!(
                "config file {} not found, using defaults",
                cli.config.display()
            );
            config::Config::minimal()
        }
    };

    match cli.command {
        Commands::Search {
            query,
            backend,
            format,
        } => {
            search::run_search(&cfg, &query, backend, &format).await?;
        }
        Commands::Files => {
            content::run_list_files(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg, config_path).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
