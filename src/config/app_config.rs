//! Application configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_TOTAL_PAGES, RetryPolicy};
use crate::error::{FramesError, Result};
use crate::flickr::DEFAULT_PER_PAGE;
use crate::model::Category;
use crate::state::DEFAULT_RADIUS;

use super::args::CliArgs;

const APP_NAME: &str = "frames";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Retry schedule for transient fetch failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Keep cached pages in memory only.
    #[serde(skip)]
    pub ephemeral: bool,

    /// Flickr API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Cache directory; defaults to the platform cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Photos requested per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Page count assumed before the remote reports one.
    #[serde(default = "default_initial_total_pages")]
    pub initial_total_pages: u32,

    /// Pages shown on each side of the current page.
    #[serde(default = "default_window_radius")]
    pub window_radius: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Categories the remote is queried for.
    #[serde(default = "Category::defaults")]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_initial_total_pages() -> u32 {
    DEFAULT_TOTAL_PAGES
}

fn default_window_radius() -> u32 {
    DEFAULT_RADIUS
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    4000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            ephemeral: false,
            api_key: None,
            cache_dir: None,
            per_page: default_per_page(),
            initial_total_pages: default_initial_total_pages(),
            window_radius: default_window_radius(),
            request_timeout_secs: default_request_timeout_secs(),
            categories: Category::defaults(),
            retry: RetryConfig::default(),
            log_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| FramesError::Config(format!("{}: {}", path.display(), e)))?;
        config.config = Some(path);
        Ok(config)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(api_key) = &args.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(per_page) = args.per_page {
            self.per_page = per_page;
        }
        if let Some(radius) = args.radius {
            self.window_radius = radius;
        }
        if args.ephemeral {
            self.ephemeral = true;
        }
    }

    /// Returns default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Directory the page store lives in.
    pub fn effective_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(crate::cache::cache_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// API key, required for any remote fetch.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(FramesError::MissingApiKey)
    }
}
