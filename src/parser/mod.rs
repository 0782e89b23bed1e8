//! Module reader/parser: reads source text at a canonical key and hands it
//! to the AST provider.
//!
//! The grammar is modern ECMAScript with module-level syntax permitted and
//! byte-accurate position tracking, which the analyzer's positional edits
//! rely on. The tree is opaque to every other stage.

pub mod analyzer;

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::BundleError;

/// A module read from disk and parsed, prior to analysis.
pub struct ParsedModule {
    pub source: String,
    pub tree: Tree,
}

/// Read the file at `key` as UTF-8 and parse it as JavaScript.
///
/// # Errors
/// - `ModuleRead` when the file cannot be read (carries the key)
/// - `Parse` when the source does not parse (carries the key)
pub fn read_and_parse(key: &Path) -> Result<ParsedModule, BundleError> {
    let source = std::fs::read_to_string(key).map_err(|e| BundleError::ModuleRead {
        key: key.to_path_buf(),
        source: e,
    })?;
    let tree = parse_source(&source).map_err(|reason| BundleError::Parse {
        key: key.to_path_buf(),
        reason,
    })?;
    Ok(ParsedModule { source, tree })
}

/// Parse JavaScript source text into a syntax tree.
///
/// tree-sitter is error-tolerant, so a returned tree is not enough: a root
/// containing error nodes means the source is not valid module syntax and is
/// reported as a parse failure rather than silently corrupted downstream.
pub fn parse_source(source: &str) -> Result<Tree, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| format!("failed to load JavaScript grammar: {e}"))?;

    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| "parser returned no tree".to_owned())?;

    if tree.root_node().has_error() {
        return Err("source contains syntax errors".to_owned());
    }
    Ok(tree)
}

/// Slice of the original source covered by `node`.
pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
