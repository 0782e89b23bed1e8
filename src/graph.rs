//! Graph builder: depth-first discovery of the transitive closure of local
//! imports from the entry.
//!
//! The graph is a mapping from canonical key to module record plus the
//! discovery-order key list; cross-references between modules exist only
//! in the emitted output, through the runtime require cache. Cycles are
//! fine: a key already present returns immediately, so each module is read
//! and analyzed at most once and ids stay contiguous in first-seen order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::BundleError;
use crate::module::ModuleRecord;
use crate::parser::{self, analyzer};
use crate::resolver;

/// The set of known modules for one bundle call.
#[derive(Default)]
pub struct ModuleGraph {
    records: HashMap<PathBuf, ModuleRecord>,
    order: Vec<PathBuf>,
}

impl ModuleGraph {
    pub fn get(&self, key: &Path) -> Option<&ModuleRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in discovery order — the order of the emitted module table.
    pub fn records_in_order(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.order.iter().filter_map(|key| self.records.get(key))
    }
}

/// Build the module graph rooted at `entry` (a canonical key).
///
/// Read and parse failures anywhere in the closure are fatal. Local
/// specifiers that fail to resolve have already been downgraded to analyzer
/// warnings and contribute no edge; external specifiers are never followed.
pub fn build_graph(entry: &Path, root: &Path, verbose: bool) -> Result<ModuleGraph, BundleError> {
    let mut graph = ModuleGraph::default();
    discover(entry, root, &mut graph, verbose)?;
    Ok(graph)
}

fn discover(
    key: &Path,
    root: &Path,
    graph: &mut ModuleGraph,
    verbose: bool,
) -> Result<(), BundleError> {
    // Re-discovering a known key is a no-op; this is what terminates cycles.
    if graph.contains(key) {
        return Ok(());
    }

    let parsed = parser::read_and_parse(key)?;
    let analysis = analyzer::analyze(&parsed.tree, &parsed.source, key, root);

    for warning in &analysis.warnings {
        eprintln!("warning: {}: {warning}", key.display());
    }

    let id = graph.order.len();
    let display_key = resolver::display_key(key, root);
    if verbose {
        eprintln!(
            "  [{id}] {display_key} ({} imports, {} exports)",
            analysis.imports.len(),
            analysis.exports.names.len() + usize::from(analysis.exports.has_default),
        );
    }

    let deps: Vec<PathBuf> = analysis
        .imports
        .iter()
        .filter_map(|import| import.resolved.clone())
        .collect();

    graph.records.insert(
        key.to_path_buf(),
        ModuleRecord {
            id,
            key: key.to_path_buf(),
            display_key,
            source: parsed.source,
            edits: analysis.edits,
            imports: analysis.imports,
            exports: analysis.exports,
            appended: analysis.appended,
            satisfied: analysis.satisfied,
            warnings: analysis.warnings,
        },
    );
    graph.order.push(key.to_path_buf());

    for dep in deps {
        discover(&dep, root, graph, verbose)?;
    }
    Ok(())
}
