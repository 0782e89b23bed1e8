//! One bundle call, end to end: graph construction, per-module transform
//! with plugin hooks, bundle assembly, and the single output write.

use std::path::PathBuf;

use path_clean::PathClean;

use crate::config::BundlerConfig;
use crate::emit;
use crate::error::BundleError;
use crate::graph::build_graph;
use crate::plugin::{Plugin, PluginHost};
use crate::resolver;
use crate::transform::transform_module;

/// A configured bundler. Owns one call's plugin list; the graph and id
/// counter live inside the call, so nothing survives across calls.
pub struct Bundler {
    config: BundlerConfig,
    plugins: PluginHost,
    root: Option<PathBuf>,
    verbose: bool,
}

/// The result of a successful bundle call.
pub struct BundleOutput {
    /// The final bundle text, after the `bundle` plugin phase.
    pub code: String,
    /// Modules in the emitted table.
    pub module_count: usize,
    /// Import declarations left to the host module system.
    pub external_count: usize,
    /// Non-fatal analyzer warnings across the graph.
    pub warning_count: usize,
}

impl Bundler {
    pub fn new(config: BundlerConfig) -> Self {
        Self {
            config,
            plugins: PluginHost::default(),
            root: None,
            verbose: false,
        }
    }

    /// Append a plugin. Order of attachment is order of invocation.
    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Override the directory module-table keys are computed against.
    /// Defaults to the process working directory.
    pub fn root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root = Some(dir.into());
        self
    }

    /// Print per-module discovery diagnostics to stderr.
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    fn effective_root(&self) -> Result<PathBuf, BundleError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|e| {
                BundleError::Config(format!("cannot determine working directory: {e}"))
            }),
        }
    }

    /// Run the pipeline and return the bundle text without writing it.
    pub async fn bundle(&self) -> Result<BundleOutput, BundleError> {
        let root = self.effective_root()?;
        let entry_key = root.join(&self.config.entry).clean();

        let graph = build_graph(&entry_key, &root, self.verbose)?;

        // Transform in discovery order; the table must follow that order no
        // matter how the transforms are scheduled.
        let mut table: Vec<(String, String)> = Vec::with_capacity(graph.len());
        let mut external_count = 0;
        let mut warning_count = 0;
        for record in graph.records_in_order() {
            external_count += record
                .imports
                .iter()
                .filter(|import| import.resolved.is_none())
                .count();
            warning_count += record.warnings.len();
            let body = transform_module(record, &self.plugins).await?;
            table.push((record.display_key.clone(), body));
        }

        let entry_display = match graph.get(&entry_key) {
            Some(record) => record.display_key.clone(),
            None => resolver::display_key(&entry_key, &root),
        };

        let text = emit::assemble(&table, &entry_display);
        let code = self.plugins.bundle(text).await?;

        Ok(BundleOutput {
            code,
            module_count: graph.len(),
            external_count,
            warning_count,
        })
    }

    /// Run the pipeline and write the bundle to the configured output path.
    /// Nothing is written when any stage fails.
    pub async fn write_bundle(&self) -> Result<BundleOutput, BundleError> {
        let root = self.effective_root()?;
        let output = if self.config.output.is_absolute() {
            self.config.output.clone()
        } else {
            root.join(&self.config.output)
        };
        let result = self.bundle().await?;
        emit::write_output(&output, &result.code)?;
        Ok(result)
    }
}
