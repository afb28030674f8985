//! Configuration system for the Focusdeck quote service.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/focusdeck-quoted/config.toml`)
//! 4. Compiled defaults
//!
//! The upstream API key comes from the CLI or the `MODEL_API_KEY`
//! environment variable only, never from the config file.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur when loading service configuration.
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

/// Top-level TOML config file structure for the quote service.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct QuotedConfigFile {
    server: ServerFileConfig,
    upstream: UpstreamFileConfig,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    daily_cap: Option<u32>,
}

/// `[upstream]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UpstreamFileConfig {
    url: Option<String>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the quote service.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Focusdeck quote service")]
pub struct QuotedCliArgs {
    /// Address to bind the service to.
    #[arg(short, long, env = "QUOTED_ADDR")]
    pub bind: Option<String>,

    /// OpenAI-compatible chat-completions endpoint URL.
    #[arg(long, env = "QUOTED_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Model name requested from the upstream.
    #[arg(long)]
    pub model: Option<String>,

    /// API key for the upstream service.
    #[arg(long, env = "MODEL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum quote requests served per day.
    #[arg(long)]
    pub daily_cap: Option<u32>,

    /// Path to config file (default: `~/.config/focusdeck-quoted/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "QUOTED_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved quote service configuration.
#[derive(Debug, Clone)]
pub struct QuotedConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:4500`).
    pub bind_addr: String,
    /// Maximum quote requests served per day.
    pub daily_cap: u32,
    /// OpenAI-compatible chat-completions endpoint URL.
    pub upstream_url: String,
    /// Model name requested from the upstream.
    pub model: String,
    /// API key for the upstream service, if any.
    pub api_key: Option<String>,
    /// Timeout for upstream requests.
    pub request_timeout: Duration,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for QuotedConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4500".to_string(),
            daily_cap: 200,
            upstream_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
                .to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
        }
    }
}

impl QuotedConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and missing file
    /// is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &QuotedCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `QuotedConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &QuotedCliArgs, file: &QuotedConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            daily_cap: cli
                .daily_cap
                .or(file.server.daily_cap)
                .unwrap_or(defaults.daily_cap),
            upstream_url: cli
                .upstream_url
                .clone()
                .or_else(|| file.upstream.url.clone())
                .unwrap_or(defaults.upstream_url),
            model: cli
                .model
                .clone()
                .or_else(|| file.upstream.model.clone())
                .unwrap_or(defaults.model),
            api_key: cli.api_key.clone(),
            request_timeout: file
                .upstream
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the quote service.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<QuotedConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(QuotedConfigFile::default());
        };
        config_dir.join("focusdeck-quoted").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(QuotedConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
