//! Filter configuration: strategy, rule list, training-log location.
//!
//! Configuration is read once when the filter is built and is immutable
//! afterwards; switching strategy means building a new filter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Default rule set: Apple advertisement subtypes observed only on devices
/// that never host the target protocol service.
pub const DEFAULT_FEATURE_PATTERNS: &[&str] = &["^10....04", "^10....14"];

/// Which verdict strategy the filter consults.
///
/// Chosen once at construction and never switched at runtime, which keeps
/// the matcher stateless and safe for unsynchronized concurrent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Match decoded messages against the configured rule list.
    StaticRules,
    /// Consult the trained per-signature ignore statistics.
    Adaptive,
}

/// Main filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Verdict strategy; the two modes are mutually exclusive per
    /// deployment.
    pub mode: FilterMode,

    /// Rule list in priority order; the first matching rule wins.
    pub feature_patterns: Vec<String>,

    /// Training-log sink path. `None` disables persistence; counters still
    /// update in memory.
    pub training_log: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: FilterMode::StaticRules,
            feature_patterns: DEFAULT_FEATURE_PATTERNS
                .iter()
                .map(|pattern| (*pattern).to_string())
                .collect(),
            training_log: None,
        }
    }
}

impl FilterConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FilterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| FilterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration as pretty-printed TOML, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
