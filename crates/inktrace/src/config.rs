//! Configuration file loading
//!
//! Lookup order:
//! 1. `INKTRACE_CONFIG` environment variable
//! 2. `<config_dir>/inktrace/config.toml`
//! 3. Built-in defaults
//!
//! `INKTRACE_GITHUB_TOKEN`, when set, replaces the token from the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use inktrace_core::{RemoteConfig, DEFAULT_BRANCH};
use inktrace_github::DEFAULT_API_BASE;
use inktrace_submit::NamingPolicy;
use inktrace_vectorize::{
    VectorizeMode, VectorizeOptions, DEFAULT_RESAMPLE_STEP, DEFAULT_WIDTH, MIN_RESAMPLE_STEP,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "INKTRACE_CONFIG";

/// Environment variable overriding the access token
pub const TOKEN_ENV: &str = "INKTRACE_GITHUB_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where uploads go
    pub remote: RemoteSection,
    /// How drawings become files
    pub export: ExportSection,
}

/// `[remote]`: the GitHub destination
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSection {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Folder inside the repository, empty for the root
    pub path_prefix: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Personal access token; prefer the environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            path_prefix: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

impl fmt::Debug for RemoteSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSection")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("path_prefix", &self.path_prefix)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `[export]`: local output and vectorizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Local SVG folder (default: `<data_dir>/inktrace/svg`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(with = "from_str")]
    pub naming: NamingPolicy,
    #[serde(with = "from_str")]
    pub mode: VectorizeMode,
    pub default_width: f64,
    pub resample_step: f64,
    pub serialize_same_label: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: None,
            naming: NamingPolicy::default(),
            mode: VectorizeMode::default(),
            default_width: DEFAULT_WIDTH,
            resample_step: DEFAULT_RESAMPLE_STEP,
            serialize_same_label: false,
        }
    }
}

impl Config {
    /// The file that [`Config::load`] would read, if any
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            debug!("{} points at missing file {}", CONFIG_ENV, path.display());
        }

        let user = dirs::config_dir()?.join("inktrace").join("config.toml");
        user.exists().then_some(user)
    }

    /// Load from the first file found, or defaults, then apply the token override
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::config_path() {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                info!("Loaded config: {}", path.display());
                config
            }
            None => {
                info!("Using built-in default config");
                Self::default()
            }
        };
        config.finish()
    }

    /// Like [`Config::load`], but reads `path` instead of searching for a file
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        info!("Loaded config: {}", path.display());
        config.finish()
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.apply_token_override(std::env::var(TOKEN_ENV).ok());
        self.validate()?;
        Ok(self)
    }

    /// Parse one file; a missing file is an error here
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the file's token with a non-empty override
    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            debug!("Using access token from {}", TOKEN_ENV);
            self.remote.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let export = &self.export;
        if !(export.resample_step.is_finite() && export.resample_step >= MIN_RESAMPLE_STEP) {
            return Err(ConfigError::Invalid(format!(
                "export.resample_step must be at least {}, got {}",
                MIN_RESAMPLE_STEP, export.resample_step
            )));
        }
        if !(export.default_width.is_finite() && export.default_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "export.default_width must be positive, got {}",
                export.default_width
            )));
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "remote.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The destination handed to the submission pipeline
    pub fn remote_config(&self) -> RemoteConfig {
        let remote = &self.remote;
        RemoteConfig::new(
            remote.owner.trim(),
            remote.repo.trim(),
            remote.token.clone().unwrap_or_default(),
        )
        .with_branch(remote.branch.trim())
        .with_path_prefix(remote.path_prefix.trim())
    }

    pub fn vectorize_options(&self) -> VectorizeOptions {
        VectorizeOptions {
            mode: self.export.mode,
            resample_step: self.export.resample_step,
            default_width: self.export.default_width,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    /// Local SVG folder, falling back to the platform data directory
    pub fn output_dir(&self) -> PathBuf {
        self.export.output_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("inktrace")
                .join("svg")
        })
    }

    /// TOML text of the effective settings with the token masked
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.remote.token.is_some() {
            shown.remote.token = Some("<redacted>".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

/// Serde adapter for enums that round-trip through `Display` / `FromStr`
mod from_str {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr<Err = String>,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
