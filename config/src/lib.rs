//! `~/.deepfreeze/config.toml` loading.
//!
//! ```toml
//! [freeze]
//! failure_name_prefix = "Immutable"
//! max_depth = 512
//!
//! [log]
//! filter = "deepfreeze=debug"
//! ```

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct DeepfreezeConfig {
    pub freeze: Option<FreezeSection>,
    pub log: Option<LogSection>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Freezer behaviour.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FreezeSection {
    /// Prefix for the names of frozen failures (`"Immutable"` when unset). Supports `${VAR}`.
    pub failure_name_prefix: Option<String>,
    /// Maximum nesting depth below the root. Unbounded when unset.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let var = &after[..close];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

impl DeepfreezeConfig {
    /// Load the config from its default location.
    ///
    /// A missing file (or no home directory) is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Parse TOML text and expand `${VAR}` references in string settings.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        if let Some(prefix) = config
            .freeze
            .as_mut()
            .and_then(|freeze| freeze.failure_name_prefix.as_mut())
        {
            *prefix = expand_env_vars(prefix);
        }
        if let Some(filter) = config.log.as_mut().and_then(|log| log.filter.as_mut()) {
            *filter = expand_env_vars(filter);
        }
        Ok(config)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn freeze_section(&self) -> FreezeSection {
        self.freeze.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.log.as_ref().and_then(|log| log.filter.as_deref())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".deepfreeze").join("config.toml"))
}
