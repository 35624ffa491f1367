//! Layered configuration for the `scoreshift` binary.
//!
//! Files are loaded in order (later wins):
//! 1. `~/.config/scoreshift/config.toml` (user)
//! 2. `./scoreshift.toml`, or the `--config` path in its place
//! 3. Environment variables (`SCORESHIFT_*`)
//!
//! Command-line flags override all of these.
//!
//! ```toml
//! semitones = -2
//! log_level = "debug"
//! pretty = true
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest offset accepted from config or the command line, in semitones.
pub const MAX_SEMITONES: i32 = 1200;

const ENV_SEMITONES: &str = "SCORESHIFT_SEMITONES";
const ENV_LOG_LEVEL: &str = "SCORESHIFT_LOG_LEVEL";
const ENV_PRETTY: &str = "SCORESHIFT_PRETTY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("semitones must be within ±{max}, got {0}", max = MAX_SEMITONES)]
    OutOfRange(i64),
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Default offset when `--semitones` is not given.
    pub semitones: i32,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            semitones: 0,
            log_level: "warn".to_string(),
            pretty: false,
        }
    }
}

/// One config file; absent keys leave earlier layers alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    semitones: Option<i64>,
    log_level: Option<String>,
    pretty: Option<bool>,
}

/// Where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

impl ShiftConfig {
    /// Load from the standard locations and the process environment.
    ///
    /// `config_path` replaces `./scoreshift.toml` and must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<(Self, ConfigSources), ConfigError> {
        let files = discover_config_files(config_path);
        Self::load_layers(&files, |var| env::var(var).ok())
    }

    /// Load from explicit files, then apply overrides from `lookup_env`.
    pub fn load_layers(
        files: &[PathBuf],
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut config = ShiftConfig::default();
        let mut sources = ConfigSources::default();

        for path in files {
            let file = load_file(path)?;
            config.apply(file)?;
            sources.files.push(path.clone());
        }

        config.apply_env(&mut sources, lookup_env)?;

        Ok((config, sources))
    }

    fn apply(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(semitones) = file.semitones {
            self.semitones = check_semitones(semitones)?;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if let Some(pretty) = file.pretty {
            self.pretty = pretty;
        }
        Ok(())
    }

    fn apply_env(
        &mut self,
        sources: &mut ConfigSources,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup_env(ENV_SEMITONES) {
            let parsed = value.trim().parse::<i64>().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_SEMITONES,
                value: value.clone(),
            })?;
            self.semitones = check_semitones(parsed)?;
            sources.env_overrides.push(ENV_SEMITONES.to_string());
        }

        if let Some(value) = lookup_env(ENV_LOG_LEVEL) {
            self.log_level = value;
            sources.env_overrides.push(ENV_LOG_LEVEL.to_string());
        }

        if let Some(value) = lookup_env(ENV_PRETTY) {
            self.pretty = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_PRETTY,
                        value,
                    })
                }
            };
            sources.env_overrides.push(ENV_PRETTY.to_string());
        }

        Ok(())
    }
}

fn check_semitones(value: i64) -> Result<i32, ConfigError> {
    i32::try_from(value)
        .ok()
        .filter(|v| v.abs() <= MAX_SEMITONES)
        .ok_or(ConfigError::OutOfRange(value))
}

/// Discover config files, optionally with a CLI override path.
///
/// The user file is only returned if it exists. An explicit path is always
/// returned so that a missing file surfaces as a read error.
pub fn discover_config_files(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("scoreshift/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("scoreshift.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
