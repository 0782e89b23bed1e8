//! Shared record shapes for the bundling pipeline.

use std::collections::HashSet;
use std::path::PathBuf;

/// A byte-range replacement over a module's original source text.
///
/// `start` and `end` are byte offsets into the original source with
/// `start <= end`. Edits within one module never overlap; the transformer
/// applies them in descending `start` order so earlier offsets stay valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        debug_assert!(start <= end, "edit span must not be inverted");
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }
}

/// One named item of an import: `import { imported as local }`.
/// For `import { x }` both sides are `"x"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    pub imported: String,
    pub local: String,
}

/// An import (or re-export dependency) extracted from a module.
#[derive(Debug, Clone)]
pub struct ImportInfo {
    /// The specifier string exactly as written in source.
    pub specifier: String,
    /// Canonical key of the target. Set for local specifiers only; external
    /// specifiers are left to the host module system and never followed.
    pub resolved: Option<PathBuf>,
    /// Local name bound to the default export, if any.
    pub default: Option<String>,
    /// Local name bound to the whole exports object (`import * as ns`), if any.
    pub namespace: Option<String>,
    /// Named bindings in source order.
    pub named: Vec<NamedBinding>,
    /// Byte span of the originating declaration in the original source.
    pub span: (usize, usize),
}

impl ImportInfo {
    /// True when the declaration binds nothing (`import './x.js'`, or a
    /// re-export dependency whose bindings live in the replacement text).
    pub fn is_bare(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }
}

/// The exports a module offers to its consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportsInfo {
    /// Named exports in declaration order, as consumers see them.
    pub names: Vec<String>,
    /// True when the module has a default export.
    pub has_default: bool,
}

/// The analyzed-but-not-transformed state of one source file.
///
/// Created the first time its canonical key is discovered, immutable once
/// analysis completes, and dropped at the end of the bundle call. The parsed
/// tree is not retained: the analyzer extracts everything downstream stages
/// need in its single pass.
#[derive(Debug)]
pub struct ModuleRecord {
    /// Discovery-order id, contiguous from 0.
    pub id: usize,
    /// Absolute `.js` path — the module's identity throughout the graph.
    pub key: PathBuf,
    /// Working-directory-relative `./`-prefixed form of `key`, used for the
    /// emitted module table and every rewritten require reference.
    pub display_key: String,
    /// Original source text.
    pub source: String,
    /// Byte-range rewrites in traversal order.
    pub edits: Vec<Edit>,
    /// Imports and re-export dependencies in source order.
    pub imports: Vec<ImportInfo>,
    /// Exports descriptor.
    pub exports: ExportsInfo,
    /// Trailing `exports.x = …;` statements scheduled by the analyzer.
    pub appended: Vec<String>,
    /// Export names already covered by an appended or inline assignment, so
    /// the transformer emits exactly one assignment per name.
    pub satisfied: HashSet<String>,
    /// Non-fatal analyzer diagnostics for this module.
    pub warnings: Vec<String>,
}
