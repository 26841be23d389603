//! Session configuration.
//!
//! Configuration is read from a YAML file. When no path is given, the runner
//! looks for [`CONFIG_FILE_NAME`] in the working directory and falls back to
//! the defaults if it is absent.
//!
//! ```yaml
//! identifier-case: insensitive
//! fail-fast: true
//! ```

use crate::error::{Error, Result};
use crate::scanner::IdentifierCase;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".sqlsnip.yaml";

/// Settings for a snippet session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionConfig {
    /// How unquoted table names are matched against snippet names
    pub identifier_case: IdentifierCase,

    /// Stop running a script at the first failing cell
    pub fail_fast: bool,
}

impl SessionConfig {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is not valid configuration YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    /// Load `.sqlsnip.yaml` from `dir` if present, otherwise use the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) when the file exists.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on invalid YAML or unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }
}
