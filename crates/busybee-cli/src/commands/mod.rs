//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use busybee_core::history::storage::FileStore;
use busybee_core::{AppContext, Config};
use busybee_gemini::GeminiClient;
use clap::{Parser, Subcommand};
use tracing::debug;

pub mod analyze;
pub mod history;

/// Busy Bee - marketplace research assistant
#[derive(Parser)]
#[command(name = "busybee")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to <config dir>/busybee/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a product, shop or keyword
    #[command(subcommand)]
    Analyze(analyze::AnalyzeCommands),

    /// Browse and re-run past searches
    #[command(subcommand)]
    History(history::HistoryCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load(self.config.as_deref()).context("Failed to load configuration")?;
        let ctx = build_context(config);

        match self.command {
            Commands::Analyze(cmd) => analyze::execute(cmd, &ctx).await,
            Commands::History(cmd) => history::execute(cmd, &ctx).await,
        }
    }
}

/// Wire the Gemini provider and file-backed history into an `AppContext`.
fn build_context(config: Config) -> AppContext {
    let data_dir = config.data_dir();
    debug!(data_dir = %data_dir.display(), model = %config.model, "Building context");

    let provider = Arc::new(GeminiClient::from_config(&config));
    let storage = Box::new(FileStore::new(data_dir));
    AppContext::new(config, provider, storage)
}
