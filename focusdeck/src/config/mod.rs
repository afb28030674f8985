//! Configuration system for the Focusdeck client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/focusdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    timer: TimerFileConfig,
    ui: UiFileConfig,
    quote: QuoteFileConfig,
    storage: StorageFileConfig,
}

/// `[timer]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TimerFileConfig {
    default_minutes: Option<u32>,
    resync_threshold_secs: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    theme: Option<String>,
}

/// `[quote]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct QuoteFileConfig {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Timer --
    /// Default session length in minutes.
    pub default_minutes: u32,
    /// Wall-clock gap between loop iterations beyond which the engine is
    /// resynced rather than ticked (callback delivery was suspended).
    pub resync_threshold: Duration,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Theme used when no persisted preference exists.
    pub default_theme: String,

    // -- Quote --
    /// Quote service endpoint; `None` runs with a static quote (offline).
    pub quote_endpoint: Option<String>,
    /// Per-request timeout for quote fetches.
    pub quote_timeout: Duration,
    /// Channel capacity for the quote command/event channels.
    pub quote_channel_capacity: usize,

    // -- Storage --
    /// Data directory override; `None` uses the platform default.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_minutes: 25,
            resync_threshold: Duration::from_secs(5),
            poll_timeout: Duration::from_millis(200),
            default_theme: "dark".to_string(),
            quote_endpoint: None,
            quote_timeout: Duration::from_secs(15),
            quote_channel_capacity: 16,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// CLI args and env vars are parsed via `clap`. If `--config` is given
    /// and the file does not exist, returns an error. If no `--config` is
    /// given, the default path (`~/.config/focusdeck/config.toml`) is tried
    /// and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. This is separated from `load()` to
    /// enable unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            default_minutes: cli
                .minutes
                .or(file.timer.default_minutes)
                .unwrap_or(defaults.default_minutes)
                .max(1),
            resync_threshold: file
                .timer
                .resync_threshold_secs
                .map_or(defaults.resync_threshold, Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            default_theme: cli
                .theme
                .clone()
                .or_else(|| file.ui.theme.clone())
                .unwrap_or(defaults.default_theme),
            quote_endpoint: cli
                .quote_url
                .clone()
                .or_else(|| file.quote.endpoint.clone()),
            quote_timeout: file
                .quote
                .request_timeout_secs
                .map_or(defaults.quote_timeout, Duration::from_secs),
            quote_channel_capacity: file
                .quote
                .channel_capacity
                .unwrap_or(defaults.quote_channel_capacity),
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone()),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal-native focus timer with a persisted task list")]
pub struct CliArgs {
    /// Session length in minutes.
    #[arg(short, long, env = "FOCUSDECK_MINUTES")]
    pub minutes: Option<u32>,

    /// Quote service endpoint (e.g. `http://127.0.0.1:4500/api/quote`).
    #[arg(long, env = "FOCUSDECK_QUOTE_URL")]
    pub quote_url: Option<String>,

    /// Data directory for persisted tasks and theme.
    #[arg(long, env = "FOCUSDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Theme to use when no persisted preference exists (dark, light).
    #[arg(long)]
    pub theme: Option<String>,

    /// Path to config file (default: `~/.config/focusdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "FOCUSDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/focusdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("focusdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
