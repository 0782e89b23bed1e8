//! Integration test suite: drives the compiled `jspack` binary via
//! subprocess on throwaway fixture projects.
//!
//! `CARGO_BIN_EXE_jspack` is set by Cargo during `cargo test` and points at
//! the binary for the current profile. Each test writes a small module
//! graph into a tempdir, runs the bundler with the tempdir as working
//! directory, and asserts on the emitted bundle text and exit status. The
//! bundles are checked structurally; the suite never executes JavaScript.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_jspack"))
}

/// Write a fixture project into a fresh tempdir.
fn fixture(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(&path, contents).expect("write fixture");
    }
    dir
}

/// Run jspack in `dir` and return the raw output.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to invoke jspack binary")
}

/// Run jspack in `dir` and assert success. Returns stdout.
fn run_success(dir: &Path, args: &[&str]) -> String {
    let out = run_in(dir, args);
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {args:?} failed with status {:?}\nstdout: {stdout}\nstderr: {stderr}",
        out.status
    );
    stdout
}

/// Run jspack in `dir` and assert a non-zero exit. Returns stderr.
fn run_failure(dir: &Path, args: &[&str]) -> String {
    let out = run_in(dir, args);
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {args:?} expected to fail but exited successfully\nstdout: {stdout}\nstderr: {stderr}",
    );
    stderr
}

fn read_bundle(dir: &Path, rel: &str) -> String {
    std::fs::read_to_string(dir.join(rel)).expect("bundle file should exist")
}

const CONFIG: &str = "entry = \"main.js\"\n";

// ---------------------------------------------------------------------------
// End-to-end bundling scenarios
// ---------------------------------------------------------------------------

/// Two-file graph with a default and a named export.
#[test]
fn test_two_file_default_plus_named() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export default 1;\nexport const x = 2;\n"),
        ("main.js", "import d, { x } from './a.js';\nconsole.log(d + x);\n"),
    ]);
    let stdout = run_success(dir.path(), &[]);
    assert!(
        stdout.contains("Bundled 2 modules"),
        "summary should report the module count\nstdout: {stdout}"
    );

    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("\"./main.js\": function (module, exports, require) {"));
    assert!(bundle.contains("\"./a.js\": function (module, exports, require) {"));
    assert!(bundle.contains("const d = require(\"./a.js\").default;"));
    assert!(bundle.contains("const { x } = require(\"./a.js\");"));
    assert!(bundle.contains("exports.default = 1;"));
    assert!(bundle.contains("exports.x = x;"));
    assert!(bundle.ends_with("}, \"./main.js\");\n"));
}

/// Rename on import: the local binding takes the renamed spelling.
#[test]
fn test_rename_on_import() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const x = 7;\n"),
        ("main.js", "import { x as y } from './a.js';\nconsole.log(y);\n"),
    ]);
    run_success(dir.path(), &[]);
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("const y = require(\"./a.js\").x;"));
}

/// Namespace import binds the whole exports object.
#[test]
fn test_namespace_import() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const a = 1;\nexport const b = 2;\n"),
        ("main.js", "import * as ns from './a.js';\nconsole.log(ns.a + ns.b);\n"),
    ]);
    run_success(dir.path(), &[]);
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("const ns = require(\"./a.js\");"));
    assert!(bundle.contains("exports.a = a;"));
    assert!(bundle.contains("exports.b = b;"));
}

/// Re-export with rename: the source module joins the graph and the
/// forwarding assignments go through the fresh alias binding.
#[test]
fn test_reexport_with_rename() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const x = 9;\n"),
        ("b.js", "export { x as y } from './a.js';\n"),
        ("main.js", "import { y } from './b.js';\nconsole.log(y);\n"),
    ]);
    let stdout = run_success(dir.path(), &[]);
    assert!(stdout.contains("Bundled 3 modules"));
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("const ___a_js = require(\"./a.js\");"));
    assert!(bundle.contains("exports.y = ___a_js.x;"));
}

/// A two-module import cycle bundles successfully; the runtime publishes
/// exports before executing bodies, so the back-edge cannot recurse.
#[test]
fn test_cycle_bundles() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        (
            "a.js",
            "import { b } from './b.js';\nexport const a = 1;\nexport const ab = () => b;\n",
        ),
        (
            "b.js",
            "import { a } from './a.js';\nexport const b = 2;\nexport const ba = () => a;\n",
        ),
        ("main.js", "import { ab } from './a.js';\nconsole.log(ab());\n"),
    ]);
    let stdout = run_success(dir.path(), &[]);
    assert!(stdout.contains("Bundled 3 modules"));
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    let publish = bundle.find("cache[key] = module;").unwrap();
    let execute = bundle.find("factory(module, module.exports, require);").unwrap();
    assert!(publish < execute);
}

/// External imports stay as host requires and are reported in the summary.
#[test]
fn test_external_imports_left_to_host() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("main.js", "import fs from 'fs';\nconsole.log(fs);\n"),
    ]);
    let stdout = run_success(dir.path(), &[]);
    assert!(stdout.contains("1 external imports"));
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("const fs = require(\"fs\");"));
}

/// Non-module source lines survive byte-for-byte.
#[test]
fn test_non_module_code_preserved() {
    let source = "import { x } from './a.js';\nconst untouched = 'keep\\tme';\nif (x) {\n  console.log(untouched);\n}\n";
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const x = 1;\n"),
        ("main.js", source),
    ]);
    run_success(dir.path(), &[]);
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(bundle.contains("const untouched = 'keep\\tme';\n"));
    assert!(bundle.contains("if (x) {\n  console.log(untouched);\n}\n"));
}

/// Two runs over identical inputs produce identical bytes.
#[test]
fn test_bundle_output_is_deterministic() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("main.js", "import './a.js';\nimport './b.js';\n"),
        ("a.js", "export const a = 1;\n"),
        ("b.js", "export const b = 2;\n"),
    ]);
    run_success(dir.path(), &[]);
    let first = read_bundle(dir.path(), "dist/bundle.js");
    run_success(dir.path(), &[]);
    let second = read_bundle(dir.path(), "dist/bundle.js");
    assert_eq!(first, second, "bundling must be byte-deterministic");
}

/// The output key in the config is honored.
#[test]
fn test_custom_output_path() {
    let dir = fixture(&[
        ("jspack.toml", "entry = \"main.js\"\noutput = \"build/app.js\"\n"),
        ("main.js", "console.log(1);\n"),
    ]);
    let stdout = run_success(dir.path(), &[]);
    assert!(stdout.contains("build/app.js"));
    assert!(dir.path().join("build/app.js").exists());
}

/// A custom config path as the positional argument.
#[test]
fn test_positional_config_path() {
    let dir = fixture(&[
        ("custom.toml", CONFIG),
        ("main.js", "console.log(1);\n"),
    ]);
    run_success(dir.path(), &["custom.toml"]);
    assert!(dir.path().join("dist/bundle.js").exists());
}

/// --verbose prints one discovery line per module to stderr.
#[test]
fn test_verbose_discovery_diagnostics() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const a = 1;\n"),
        ("main.js", "import { a } from './a.js';\nconsole.log(a);\n"),
    ]);
    let out = run_in(dir.path(), &["--verbose"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[0] ./main.js"), "stderr: {stderr}");
    assert!(stderr.contains("[1] ./a.js"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// `export * from` is surfaced as a warning and left unchanged; the bundle
/// still succeeds.
#[test]
fn test_export_star_warns_but_bundles() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("a.js", "export const x = 1;\n"),
        ("main.js", "export * from './a.js';\nconsole.log('side effect');\n"),
    ]);
    let out = run_in(dir.path(), &[]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("export *"),
        "unsupported construct should be surfaced on stderr\nstderr: {stderr}"
    );
    let bundle = read_bundle(dir.path(), "dist/bundle.js");
    assert!(
        bundle.contains("export * from './a.js';"),
        "the construct must be left unchanged"
    );
}

// ---------------------------------------------------------------------------
// Failure exit codes
// ---------------------------------------------------------------------------

/// Missing config file is fatal.
#[test]
fn test_missing_config_fails() {
    let dir = fixture(&[("main.js", "console.log(1);\n")]);
    let stderr = run_failure(dir.path(), &[]);
    assert!(stderr.contains("config"), "stderr: {stderr}");
}

/// A config without `entry` is fatal.
#[test]
fn test_config_without_entry_fails() {
    let dir = fixture(&[
        ("jspack.toml", "output = \"out.js\"\n"),
        ("main.js", "console.log(1);\n"),
    ]);
    run_failure(dir.path(), &[]);
}

/// A missing entry file is fatal.
#[test]
fn test_missing_entry_file_fails() {
    let dir = fixture(&[("jspack.toml", CONFIG)]);
    let stderr = run_failure(dir.path(), &[]);
    assert!(stderr.contains("main.js"), "stderr: {stderr}");
}

/// A missing transitive dependency is fatal and writes no output.
#[test]
fn test_missing_transitive_dependency_fails_without_output() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("main.js", "import { x } from './gone.js';\nconsole.log(x);\n"),
    ]);
    run_failure(dir.path(), &[]);
    assert!(
        !dir.path().join("dist/bundle.js").exists(),
        "a failed bundle call must not leave partial output"
    );
}

/// Unparseable source is fatal.
#[test]
fn test_parse_error_fails() {
    let dir = fixture(&[
        ("jspack.toml", CONFIG),
        ("main.js", "import { from ./ ;;;\n"),
    ]);
    let stderr = run_failure(dir.path(), &[]);
    assert!(stderr.contains("parse"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn test_help_flag() {
    let dir = fixture(&[]);
    let stdout = run_success(dir.path(), &["--help"]);
    assert!(stdout.contains("jspack"));
    assert!(stdout.contains("configuration file"));
}
