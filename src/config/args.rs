use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::app_config::LogLevel;

#[derive(Debug, Parser)]
#[command(
    name = "frames",
    version,
    about = "Browse the FRAMES photo feed with a durable page cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Flickr API key.
    #[arg(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for cached pages.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Keep cached pages in memory only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Photos requested per page.
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Pages shown on each side of the current page.
    #[arg(long, global = true)]
    pub radius: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show one page of a category and its page selector.
    Page {
        category: String,
        #[arg(default_value_t = 1)]
        page: u32,
        /// Warm the cache with the following page too.
        #[arg(long)]
        prefetch: bool,
    },
    /// Refetch one page, replacing the cached copy.
    Refresh {
        category: String,
        #[arg(default_value_t = 1)]
        page: u32,
    },
    /// Print the page selector for a position.
    Window {
        current: u32,
        total: u32,
    },
    /// List the configured categories.
    Categories,
}
