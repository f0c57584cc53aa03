//! Configuration module for Threadscope
//!
//! Loads per-project configuration from a `threadscope.toml` next to the
//! input data. Every field has a default; CLI flags win over file values.
//!
//! # Configuration Format
//!
//! ```toml
//! # threadscope.toml
//!
//! [defaults]
//! format = "csv"
//! workers = 8
//!
//! [analysis]
//! max_traversal_depth = 500
//! excluded_authors = ["[deleted]", "AutoModerator"]
//! ```

use crate::models::DELETED_AUTHOR;
use crate::tree::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Config file name looked up in the data directory.
pub const CONFIG_FILE: &str = "threadscope.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub defaults: CliDefaults,
    pub analysis: AnalysisConfig,
}

/// Fallbacks for CLI flags the user did not pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliDefaults {
    pub format: String,
    pub workers: usize,
}

impl Default for CliDefaults {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            workers: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Hard cap on reply-chain depth during tree construction.
    pub max_traversal_depth: usize,
    /// Authors excluded from participation statistics.
    pub excluded_authors: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: DEFAULT_MAX_DEPTH,
            excluded_authors: vec![DELETED_AUTHOR.to_string()],
        }
    }
}

/// Load `threadscope.toml` from `dir`, falling back to defaults.
///
/// A missing file is normal; a malformed one is reported and ignored so
/// a stray edit can never block a batch run.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let path = dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(config) => {
                debug!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("ignoring invalid {}: {}", path.display(), e);
                ProjectConfig::default()
            }
        },
        Err(_) => {
            debug!("no {} found, using defaults", CONFIG_FILE);
            ProjectConfig::default()
        }
    }
}
