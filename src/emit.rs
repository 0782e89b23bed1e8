//! Bundle emitter: assembles the runtime prelude, the module table, and the
//! entry invocation into the final bundle text, and performs the single
//! output write of a bundle call.

use std::path::Path;

use crate::error::BundleError;

/// Serialize `s` as a JavaScript string literal. JSON string syntax is a
/// subset of JS, so the emitted table keys and require arguments share one
/// escaping rule.
pub(crate) fn js_string(s: &str) -> String {
    serde_json::to_string(s).expect("string serialization cannot fail")
}

/// The require runtime emitted ahead of the module table.
///
/// `require` publishes the module's exports object in the cache *before*
/// executing the body, so a cyclic graph resolves the back-edge to the
/// partially populated exports instead of recursing. Keys absent from the
/// table fail with a plain runtime error.
const RUNTIME_PRELUDE: &str = "\
(function (modules, entry) {
  var cache = {};

  function require(key) {
    if (cache[key]) {
      return cache[key].exports;
    }
    var module = { exports: {} };
    cache[key] = module;
    var factory = modules[key];
    if (!factory) {
      throw new Error(\"Module not found: \" + key);
    }
    factory(module, module.exports, require);
    return module.exports;
  }

  require(entry);
})(";

/// Assemble the bundle text from transformed module bodies.
///
/// `modules` pairs each display key with its emitted body, already in
/// discovery order; the table preserves that order so output is
/// deterministic byte-for-byte across runs. `entry_key` is the entry's
/// display key, passed as the second IIFE argument.
pub fn assemble(modules: &[(String, String)], entry_key: &str) -> String {
    let mut out = String::with_capacity(
        RUNTIME_PRELUDE.len() + modules.iter().map(|(k, b)| k.len() + b.len() + 64).sum::<usize>(),
    );

    out.push_str(RUNTIME_PRELUDE);
    out.push_str("{\n");
    for (key, body) in modules {
        out.push_str(&js_string(key));
        out.push_str(": function (module, exports, require) {\n");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("},\n");
    }
    out.push_str("}, ");
    out.push_str(&js_string(entry_key));
    out.push_str(");\n");
    out
}

/// Write the assembled bundle to `path`. This is the only write a bundle
/// call performs; nothing is written when any earlier stage fails.
pub fn write_output(path: &Path, text: &str) -> Result<(), BundleError> {
    std::fs::write(path, text).map_err(|e| BundleError::Emit {
        path: path.to_path_buf(),
        source: e,
    })
}
