//! Module transformer: applies a record's positional edits to its source
//! text and appends the trailing export assignments, with the per-module
//! plugin hooks wrapped around the whole step.
//!
//! The transformer never re-parses; every byte it touches was located by
//! the analyzer's single pass.

use crate::error::BundleError;
use crate::module::{Edit, ModuleRecord};
use crate::plugin::{ModuleMeta, PluginHost};

/// Produce the emitted body for one module.
///
/// Order of operations: `preTransform` hooks over the original source, the
/// record's edits in descending start order, the scheduled trailing
/// assignments plus one `exports.n = n;` for every exported name not yet
/// satisfied, then `postTransform` hooks over the result.
pub async fn transform_module(
    record: &ModuleRecord,
    plugins: &PluginHost,
) -> Result<String, BundleError> {
    let meta = ModuleMeta {
        key: &record.key,
        display_key: &record.display_key,
        id: record.id,
        exports: &record.exports,
    };

    let mut text = plugins.pre_transform(record.source.clone(), &meta).await?;
    apply_edits(&mut text, &record.edits);

    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    for stmt in &record.appended {
        text.push_str(stmt);
        text.push('\n');
    }
    for name in &record.exports.names {
        if !record.satisfied.contains(name) {
            text.push_str(&format!("exports.{name} = {name};\n"));
        }
    }

    plugins.post_transform(text, &meta).await
}

/// Apply edits in descending start order so earlier offsets stay valid.
///
/// Spans refer to the original source; a `preTransform` hook that shifted
/// bytes under a span breaks that contract, and any edit that no longer
/// lands on a valid range is dropped rather than applied out of bounds.
fn apply_edits(text: &mut String, edits: &[Edit]) {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));
    for edit in ordered {
        if edit.end > text.len()
            || !text.is_char_boundary(edit.start)
            || !text.is_char_boundary(edit.end)
        {
            continue;
        }
        text.replace_range(edit.start..edit.end, &edit.replacement);
    }
}
