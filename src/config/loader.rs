//! Configuration file loading with precedence handling.

use crate::preview::{BackendChoice, RenderMode};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "THREADVIEW_CONFIG";
/// Environment variable overriding the image backend.
pub const BACKEND_ENV: &str = "THREADVIEW_IMAGE_BACKEND";
/// Environment variable overriding the forum base URL.
pub const BASE_URL_ENV: &str = "THREADVIEW_BASE_URL";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but holds an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/threadview/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Image backend: `auto`, `chafa`, `timg` or `off`.
    #[serde(default)]
    pub image_backend: Option<BackendChoice>,

    /// Preview mode: `color`, `mono` or `high-fidelity`.
    #[serde(default)]
    pub image_mode: Option<RenderMode>,

    /// Reject mostly-flat block previews.
    #[serde(default)]
    pub quality_filter: Option<bool>,

    /// Maximum preview rows.
    #[serde(default)]
    pub preview_max_lines: Option<usize>,

    /// Largest image download in bytes.
    #[serde(default)]
    pub preview_max_bytes: Option<usize>,

    /// HTTP fetch timeout in milliseconds.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Renderer process timeout in milliseconds.
    #[serde(default)]
    pub render_timeout_ms: Option<u64>,

    /// Preview cache bound; 0 keeps every preview.
    #[serde(default)]
    pub preview_cache_capacity: Option<usize>,

    /// Forum origin for resolving relative image references.
    #[serde(default)]
    pub forum_base_url: Option<String>,

    /// Input polling interval in milliseconds.
    #[serde(default)]
    pub tick_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Image backend choice.
    pub image_backend: BackendChoice,
    /// Preview mode.
    pub image_mode: RenderMode,
    /// Quality filter enabled.
    pub quality_filter: bool,
    /// Maximum preview rows.
    pub preview_max_lines: usize,
    /// Largest image download in bytes.
    pub preview_max_bytes: usize,
    /// HTTP fetch timeout.
    pub fetch_timeout_ms: u64,
    /// Renderer process timeout.
    pub render_timeout_ms: u64,
    /// Preview cache bound (0 = unbounded).
    pub preview_cache_capacity: usize,
    /// Forum origin, if known.
    pub forum_base_url: Option<String>,
    /// Input polling interval.
    pub tick_ms: u64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Environment overrides that were rejected. Resolution runs before
    /// logging starts, so these are reported by `log_ignored_env`.
    pub ignored_env: Vec<IgnoredEnv>,
}

/// An environment variable whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredEnv {
    /// Variable name.
    pub var: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            image_backend: BackendChoice::Auto,
            image_mode: RenderMode::Color,
            quality_filter: true,
            preview_max_lines: 16,
            preview_max_bytes: crate::preview::pipeline::DEFAULT_MAX_BYTES,
            fetch_timeout_ms: 10_000,
            render_timeout_ms: 5_000,
            preview_cache_capacity: 0,
            forum_base_url: None,
            tick_ms: 50,
            log_file_path: default_log_path(),
            ignored_env: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// Warn about each rejected environment override.
    ///
    /// Call once the tracing subscriber is installed.
    pub fn log_ignored_env(&self) {
        for ignored in &self.ignored_env {
            warn!(var = ignored.var, reason = %ignored.reason, "Ignoring environment override");
        }
    }

    /// HTTP fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Renderer process timeout.
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// Input polling interval, at least one millisecond.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Parsed forum base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the URL does not parse or is
    /// not http(s).
    pub fn base_url(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.forum_base_url.as_deref() else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            field: "forum_base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "forum_base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(Some(url))
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/threadview/threadview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("threadview").join("threadview.log")
    } else {
        PathBuf::from("threadview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Arguments
///
/// * `path` - Path to config file
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/threadview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("threadview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `THREADVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/threadview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        image_backend: config.image_backend.unwrap_or(defaults.image_backend),
        image_mode: config.image_mode.unwrap_or(defaults.image_mode),
        quality_filter: config.quality_filter.unwrap_or(defaults.quality_filter),
        preview_max_lines: config
            .preview_max_lines
            .unwrap_or(defaults.preview_max_lines),
        preview_max_bytes: config
            .preview_max_bytes
            .unwrap_or(defaults.preview_max_bytes),
        fetch_timeout_ms: config.fetch_timeout_ms.unwrap_or(defaults.fetch_timeout_ms),
        render_timeout_ms: config
            .render_timeout_ms
            .unwrap_or(defaults.render_timeout_ms),
        preview_cache_capacity: config
            .preview_cache_capacity
            .unwrap_or(defaults.preview_cache_capacity),
        forum_base_url: config.forum_base_url.or(defaults.forum_base_url),
        tick_ms: config.tick_ms.unwrap_or(defaults.tick_ms),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        ignored_env: Vec::new(),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `THREADVIEW_IMAGE_BACKEND`: Override image backend (invalid values are
///   recorded in `ignored_env` and otherwise ignored)
/// - `THREADVIEW_BASE_URL`: Override forum base URL
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(BACKEND_ENV) {
        match value.parse::<BackendChoice>() {
            Ok(choice) => config.image_backend = choice,
            Err(reason) => config.ignored_env.push(IgnoredEnv {
                var: BACKEND_ENV,
                reason,
            }),
        }
    }

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        config.forum_base_url = Some(url);
    }

    config
}

/// Overrides taken from command-line flags. `None` leaves a setting alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--image-backend`
    pub image_backend: Option<BackendChoice>,
    /// `--image-mode`
    pub image_mode: Option<RenderMode>,
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--no-quality-filter` (only ever turns the filter off)
    pub no_quality_filter: bool,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(backend) = cli.image_backend {
        config.image_backend = backend;
    }

    if let Some(mode) = cli.image_mode {
        config.image_mode = mode;
    }

    if let Some(url) = cli.base_url {
        config.forum_base_url = Some(url);
    }

    if cli.no_quality_filter {
        config.quality_filter = false;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
