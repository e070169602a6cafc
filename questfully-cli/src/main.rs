//! Questfully CLI
//!
//! Command-line interface for Questfully - browse the question catalogue,
//! keep favorites in sync and track the daily quota.

mod commands;
mod config;
mod display;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use questfully_core::content::DEFAULT_API_URL;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "questfully")]
#[command(version, about = "Conversation questions, cached and in sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true, env = "QUESTFULLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Content API base URL
    #[arg(
        long,
        global = true,
        env = "QUESTFULLY_API_URL",
        default_value = DEFAULT_API_URL
    )]
    api_url: String,

    /// Proxy for API requests (e.g. socks5h://127.0.0.1:9050)
    #[arg(long, global = true, env = "QUESTFULLY_PROXY")]
    proxy: Option<String>,

    /// Work from local data only, never contact the API
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh categories, questions and stats from the API
    Refresh,

    /// List categories
    Categories {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the questions of a category
    Questions {
        /// Category ID
        category: String,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Show catalogue stats
    Stats,

    /// Ask the API how many questions a category holds
    Count {
        /// Category ID
        category: String,
    },

    /// Show how much of the catalogue is loaded
    Progress {
        /// Focus on one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Manage the content cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Manage favorite questions
    #[command(subcommand)]
    Favorites(FavoriteCommands),

    /// Daily question quota
    #[command(subcommand)]
    Quota(QuotaCommands),

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show where cached content lives
    Path,

    /// Delete cached content
    Clear,
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// List favorites
    List {
        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Favorite a cached question
    Add {
        /// Question ID
        question: String,
    },

    /// Remove a favorite
    Remove {
        /// Question ID
        question: String,
    },

    /// Reconcile favorites with the API
    Sync,
}

#[derive(Subcommand)]
enum QuotaCommands {
    /// Show today's usage
    Status,

    /// Count one question view
    View,

    /// Restart today's count
    Reset,
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("questfully_core=info".parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    // Resolve data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("questfully")
    });

    debug!("Using data directory {}", data_dir.display());

    let config = CliConfig {
        data_dir,
        api_url: cli.api_url,
        proxy_url: cli.proxy,
        offline: cli.offline,
    };

    match cli.command {
        Commands::Refresh => commands::content::refresh(&config).await?,
        Commands::Categories { json } => commands::content::categories(&config, json)?,
        Commands::Questions { category, json } => {
            commands::content::questions(&config, &category, json)?;
        }
        Commands::Stats => commands::content::stats(&config)?,
        Commands::Count { category } => commands::content::count(&config, &category).await?,
        Commands::Progress { category } => {
            commands::content::progress(&config, category.as_deref()).await?;
        }
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Path => commands::content::cache_path(&config)?,
            CacheCommands::Clear => commands::content::clear_cache(&config)?,
        },
        Commands::Favorites(cmd) => match cmd {
            FavoriteCommands::List { json } => commands::favorites::list(&config, json)?,
            FavoriteCommands::Add { question } => {
                commands::favorites::add(&config, &question).await?;
            }
            FavoriteCommands::Remove { question } => {
                commands::favorites::remove(&config, &question).await?;
            }
            FavoriteCommands::Sync => commands::favorites::sync(&config).await?,
        },
        Commands::Quota(cmd) => match cmd {
            QuotaCommands::Status => commands::quota::status(&config)?,
            QuotaCommands::View => commands::quota::view(&config)?,
            QuotaCommands::Reset => commands::quota::reset(&config)?,
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "questfully", &mut io::stdout());
        }
    }

    Ok(())
}
