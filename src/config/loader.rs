//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, RepomanError};

pub const CONFIG_FILENAME: &str = ".repoman.toml";

/// Settings read from the configuration file.
///
/// Every field is optional in the file; CLI flags and environment variables
/// override what is found here. The API token is deliberately not part of
/// the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Organization to audit
    #[serde(default)]
    pub organization: Option<String>,

    /// Domain hosting the CI proxy (`ci-proxy.<domain>`)
    #[serde(default)]
    pub domain: Option<String>,

    /// Branch to audit instead of each repository's default branch
    #[serde(default)]
    pub branch: Option<String>,

    /// GitHub API base URL (GitHub Enterprise)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Maximum number of repositories audited concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Audit at most this many repositories
    #[serde(default)]
    pub limit: Option<usize>,

    /// Also audit archived repositories
    #[serde(default)]
    pub include_archived: bool,

    /// Abort the whole run after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Abort on the first repository that cannot be fetched
    #[serde(default)]
    pub fail_fast: bool,
}

pub(crate) fn default_concurrency() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: None,
            domain: None,
            branch: None,
            api_url: None,
            concurrency: default_concurrency(),
            limit: None,
            include_archived: false,
            timeout_secs: None,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default file if it exists
    pub fn load(path: Option<&Path>) -> Result<Self, RepomanError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(),
        }
    }

    /// Load configuration from file or return default
    pub fn load_or_default() -> Result<Self, RepomanError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, RepomanError> {
        let content = fs::read_to_string(path).map_err(|e| {
            RepomanError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        toml::from_str(&content).map_err(Into::into)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, RepomanError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }
}
