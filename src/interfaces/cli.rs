use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::sync_config::SyncConfig;

#[derive(Debug, Parser)]
#[command(
    name = "catalog-sync",
    about = "Import catalog translations from CSV exports",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (default: catalog-sync.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Content store snapshot to read and update
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Resolve and report without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or update destination-language category translations
    Categories {
        /// Category export (default: default_category_csv from config)
        csv: Option<PathBuf>,
    },

    /// Create or update product translations for every language column
    Products {
        /// Product export keyed by product code
        csv: PathBuf,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut SyncConfig) {
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
