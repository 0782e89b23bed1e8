use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a bundle call.
///
/// Unresolvable local specifiers found during discovery do NOT abort the
/// call: the graph builder downgrades them to warnings and the import is
/// rewritten as if the target existed, leaving the failure to the emitted
/// runtime's "Module not found" check.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Missing or unreadable config file, or a config without `entry`.
    #[error("config error: {0}")]
    Config(String),

    /// The entry or a transitively required local file could not be read.
    #[error("cannot read module {}: {source}", .key.display())]
    ModuleRead {
        key: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source at `key` does not parse as JavaScript module syntax.
    #[error("cannot parse module {}: {reason}", .key.display())]
    Parse { key: PathBuf, reason: String },

    /// A local import path could not be joined with its importer.
    #[error("cannot resolve '{specifier}' imported from {}", .importer.display())]
    UnresolvableSpecifier {
        importer: PathBuf,
        specifier: String,
    },

    /// A plugin hook returned an error or rejected.
    #[error("plugin '{plugin}' failed in {phase} hook: {reason}")]
    Plugin {
        plugin: String,
        phase: &'static str,
        reason: String,
    },

    /// The output bundle file could not be written.
    #[error("cannot write bundle to {}: {source}", .path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
