use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BundleError;

/// Bundle configuration loaded from a `jspack.toml` file.
///
/// Unknown keys are ignored. Plugins have no file representation; they are
/// attached programmatically via [`crate::Bundler::with_plugin`].
#[derive(Debug, Clone, Deserialize)]
pub struct BundlerConfig {
    /// Path to the entry source file, resolved relative to the working directory.
    pub entry: PathBuf,

    /// Output bundle path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist/bundle.js")
}

impl BundlerConfig {
    /// Load configuration from `path`.
    ///
    /// A missing or unreadable file, invalid TOML, and a missing `entry`
    /// key are all fatal `ConfigError`s: a bundle call cannot proceed
    /// without knowing its entry.
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BundleError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents)
            .map_err(|e| BundleError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Build a config directly, for library callers that have no file.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            output: default_output(),
        }
    }
}
