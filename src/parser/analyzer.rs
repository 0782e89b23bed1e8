//! AST analyzer: a single pass over a module's top-level statements that
//! produces the positional edits rewriting static module syntax into the
//! emitted synchronous require format, together with the module's import
//! and export descriptors.
//!
//! Only two node kinds are inspected: `import_statement` and
//! `export_statement` (the latter covers named, re-export, and default
//! forms). Everything else, including code inside function bodies, classes,
//! and expressions, is preserved byte-for-byte. `import.meta`, dynamic
//! `import()` and top-level `await` never surface as either node kind and
//! are left verbatim.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

use crate::emit::js_string;
use crate::module::{Edit, ExportsInfo, ImportInfo, NamedBinding};
use crate::parser::node_text;
use crate::resolver::{self, SpecifierKind};

/// Everything the analyzer learned about one module.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Byte-range rewrites in traversal order.
    pub edits: Vec<Edit>,
    /// Imports and re-export dependencies in source order.
    pub imports: Vec<ImportInfo>,
    /// Exports descriptor.
    pub exports: ExportsInfo,
    /// Trailing `exports.x = …;` statements to append after the body.
    pub appended: Vec<String>,
    /// Export names already covered by an appended or inline assignment.
    pub satisfied: HashSet<String>,
    /// Non-fatal diagnostics (unsupported constructs, unresolvable paths).
    pub warnings: Vec<String>,
}

/// Analyze a parsed module.
///
/// `key` is the module's canonical key (anchors relative specifiers) and
/// `root` is the directory the emitted module table is keyed against.
pub fn analyze(tree: &Tree, source: &str, key: &Path, root: &Path) -> Analysis {
    let mut analyzer = Analyzer {
        source,
        key,
        root,
        used_aliases: HashSet::new(),
        out: Analysis::default(),
    };

    let program = tree.root_node();
    let mut cursor = program.walk();
    for node in program.children(&mut cursor) {
        match node.kind() {
            "import_statement" => analyzer.import_statement(node),
            "export_statement" => analyzer.export_statement(node),
            _ => {}
        }
    }

    analyzer.out
}

struct Analyzer<'a> {
    source: &'a str,
    key: &'a Path,
    root: &'a Path,
    used_aliases: HashSet<String>,
    out: Analysis,
}

impl Analyzer<'_> {
    // -----------------------------------------------------------------------
    // Import declarations
    // -----------------------------------------------------------------------

    fn import_statement(&mut self, node: Node<'_>) {
        let Some(specifier) = self.statement_source(node) else {
            return;
        };

        let mut info = ImportInfo {
            specifier: specifier.clone(),
            resolved: None,
            default: None,
            namespace: None,
            named: Vec::new(),
            span: (node.start_byte(), node.end_byte()),
        };
        self.collect_import_bindings(node, &mut info);

        let is_local = resolver::classify(&specifier) == SpecifierKind::Local;
        let target = self.require_target(&specifier, is_local, &mut info.resolved);
        let req = format!("require({})", js_string(&target));

        // Binding order is fixed: namespace, default, named. Destructuring is
        // only usable when no named binding renames.
        let mut stmts: Vec<String> = Vec::new();
        if let Some(ns) = &info.namespace {
            stmts.push(format!("const {ns} = {req};"));
        }
        if let Some(d) = &info.default {
            if is_local {
                stmts.push(format!("const {d} = {req}.default;"));
            } else {
                // External default interop is the host's concern; bind the
                // whole exports object under the original local name.
                stmts.push(format!("const {d} = {req};"));
            }
        }
        if !info.named.is_empty() {
            if info.named.iter().all(|b| b.imported == b.local) {
                let list = info
                    .named
                    .iter()
                    .map(|b| b.local.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                stmts.push(format!("const {{ {list} }} = {req};"));
            } else {
                for b in &info.named {
                    stmts.push(format!("const {} = {req}.{};", b.local, b.imported));
                }
            }
        }
        if stmts.is_empty() {
            // `import './x.js'` is evaluated for side effects only.
            stmts.push(format!("{req};"));
        }

        self.out.edits.push(Edit::new(
            node.start_byte(),
            node.end_byte(),
            stmts.join(" "),
        ));
        self.out.imports.push(info);
    }

    /// Walk the import clause, filling default/namespace/named bindings.
    fn collect_import_bindings(&mut self, node: Node<'_>, info: &mut ImportInfo) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "import_clause" {
                continue;
            }
            let mut clause_cursor = child.walk();
            for part in child.children(&mut clause_cursor) {
                match part.kind() {
                    "identifier" => {
                        info.default = Some(node_text(part, self.source).to_owned());
                    }
                    "namespace_import" => {
                        // `* as ns`: the identifier carries no field name.
                        let mut ns_cursor = part.walk();
                        for ns_child in part.children(&mut ns_cursor) {
                            if ns_child.kind() == "identifier" {
                                info.namespace = Some(node_text(ns_child, self.source).to_owned());
                            }
                        }
                    }
                    "named_imports" => self.collect_named_imports(part, info),
                    _ => {}
                }
            }
        }
    }

    fn collect_named_imports(&mut self, named: Node<'_>, info: &mut ImportInfo) {
        let mut cursor = named.walk();
        for spec in named.children(&mut cursor) {
            if spec.kind() != "import_specifier" {
                continue;
            }
            // `import { name as alias }`: name is the exporter's spelling,
            // alias the local binding. Without `as`, they coincide.
            let name_node = spec.child_by_field_name("name");
            let alias_node = spec.child_by_field_name("alias");
            match (name_node, alias_node) {
                (Some(n), Some(a)) => info.named.push(NamedBinding {
                    imported: node_text(n, self.source).to_owned(),
                    local: node_text(a, self.source).to_owned(),
                }),
                (Some(n), None) => {
                    let name = node_text(n, self.source).to_owned();
                    info.named.push(NamedBinding {
                        imported: name.clone(),
                        local: name,
                    });
                }
                _ => {}
            }
        }
    }

    // -----------------------------------------------------------------------
    // Export declarations
    // -----------------------------------------------------------------------

    fn export_statement(&mut self, node: Node<'_>) {
        // `export * from S` / `export * as ns from S` are recognized but
        // unsupported; the construct is surfaced and left unchanged.
        if self.has_child_kind(node, "*") || self.has_child_kind(node, "namespace_export") {
            self.warn(node, "unsupported 'export *' re-export left unchanged");
            return;
        }

        let is_default = self.has_child_kind(node, "default");
        if let Some(decl) = node.child_by_field_name("declaration") {
            if is_default {
                self.default_declaration_export(node, decl);
            } else {
                self.named_declaration_export(node, decl);
            }
            return;
        }

        if let Some(value) = node.child_by_field_name("value") {
            // `export default <identifier or expression>`: the payload text
            // is carried over verbatim from its original span.
            let text = node_text(value, self.source);
            self.out.edits.push(Edit::new(
                node.start_byte(),
                node.end_byte(),
                format!("exports.default = {text};"),
            ));
            self.out.exports.has_default = true;
            return;
        }

        if let Some(clause) = self.find_child_kind(node, "export_clause") {
            match self.statement_source(node) {
                Some(specifier) => self.reexport_clause(node, clause, &specifier),
                None => self.local_export_clause(node, clause),
            }
            return;
        }

        self.warn(node, "unrecognized export form left unchanged");
    }

    /// `export const/let/var …`, `export function f`, `export class C`:
    /// strip the `export ` keyword and schedule one trailing assignment per
    /// declared name.
    fn named_declaration_export(&mut self, node: Node<'_>, decl: Node<'_>) {
        self.out
            .edits
            .push(Edit::new(node.start_byte(), decl.start_byte(), ""));

        match decl.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = decl.walk();
                for declarator in decl.children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    match declarator.child_by_field_name("name") {
                        Some(name) if name.kind() == "identifier" => {
                            self.export_name(node_text(name, self.source).to_owned());
                        }
                        _ => self.warn(
                            node,
                            "destructured export declarator records no export names",
                        ),
                    }
                }
            }
            _ => {
                // function / generator function / class declarations all
                // carry their identifier in the `name` field.
                if let Some(name) = decl.child_by_field_name("name") {
                    self.export_name(node_text(name, self.source).to_owned());
                }
            }
        }
    }

    /// `export default function F(){…}` / `export default class C{…}`:
    /// strip `export default `, keep the declaration, assign it trailing.
    /// An anonymous declaration falls back to the expression form.
    fn default_declaration_export(&mut self, node: Node<'_>, decl: Node<'_>) {
        self.out.exports.has_default = true;
        match decl.child_by_field_name("name") {
            Some(name) => {
                self.out
                    .edits
                    .push(Edit::new(node.start_byte(), decl.start_byte(), ""));
                self.out
                    .appended
                    .push(format!("exports.default = {};", node_text(name, self.source)));
            }
            None => {
                let text = node_text(decl, self.source);
                self.out.edits.push(Edit::new(
                    node.start_byte(),
                    node.end_byte(),
                    format!("exports.default = {text};"),
                ));
            }
        }
    }

    /// `export { a, b as c };` is replaced by direct exports assignments.
    fn local_export_clause(&mut self, node: Node<'_>, clause: Node<'_>) {
        let mut parts: Vec<String> = Vec::new();
        for (local, exported) in self.clause_specifiers(clause) {
            if exported == "default" {
                self.out.exports.has_default = true;
                parts.push(format!("exports.default = {local};"));
            } else {
                self.record_satisfied_export(&exported);
                parts.push(format!("exports.{exported} = {local};"));
            }
        }
        self.out
            .edits
            .push(Edit::new(node.start_byte(), node.end_byte(), parts.join(" ")));
    }

    /// `export { a, b as c } from S;`: a fresh alias binding requires the
    /// source module once, then each name is forwarded off the alias. S is
    /// recorded as a dependency so local sources join the graph.
    fn reexport_clause(&mut self, node: Node<'_>, clause: Node<'_>, specifier: &str) {
        let mut info = ImportInfo {
            specifier: specifier.to_owned(),
            resolved: None,
            default: None,
            namespace: None,
            named: Vec::new(),
            span: (node.start_byte(), node.end_byte()),
        };
        let is_local = resolver::classify(specifier) == SpecifierKind::Local;
        let target = self.require_target(specifier, is_local, &mut info.resolved);
        self.out.imports.push(info);

        let alias = self.reexport_alias(specifier);
        let mut parts = vec![format!("const {alias} = require({});", js_string(&target))];
        for (imported, exported) in self.clause_specifiers(clause) {
            if exported == "default" {
                self.out.exports.has_default = true;
                parts.push(format!("exports.default = {alias}.{imported};"));
            } else {
                self.record_satisfied_export(&exported);
                parts.push(format!("exports.{exported} = {alias}.{imported};"));
            }
        }
        self.out
            .edits
            .push(Edit::new(node.start_byte(), node.end_byte(), parts.join(" ")));
    }

    /// Pairs of `(local-or-imported name, exported name)` from an
    /// `export_clause` node, in declaration order.
    fn clause_specifiers(&self, clause: Node<'_>) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut cursor = clause.walk();
        for spec in clause.children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name, self.source).to_owned();
            let exported = spec
                .child_by_field_name("alias")
                .map(|a| node_text(a, self.source).to_owned())
                .unwrap_or_else(|| name.clone());
            pairs.push((name, exported));
        }
        pairs
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// The require argument for a specifier: the display key for resolvable
    /// locals, the raw specifier otherwise. Fills `resolved` for locals and
    /// downgrades resolution failures to a warning (the rewrite proceeds as
    /// if the file existed and fails in the runtime instead).
    fn require_target(
        &mut self,
        specifier: &str,
        is_local: bool,
        resolved: &mut Option<PathBuf>,
    ) -> String {
        if !is_local {
            return specifier.to_owned();
        }
        match resolver::resolve(self.key, specifier) {
            Ok(key) => {
                let display = resolver::display_key(&key, self.root);
                *resolved = Some(key);
                display
            }
            Err(e) => {
                self.out
                    .warnings
                    .push(format!("{e}; leaving the require to fail at runtime"));
                specifier.to_owned()
            }
        }
    }

    /// Record a named export and schedule its trailing assignment exactly once.
    fn export_name(&mut self, name: String) {
        if self.out.satisfied.insert(name.clone()) {
            self.out.appended.push(format!("exports.{name} = {name};"));
        }
        if !self.out.exports.names.contains(&name) {
            self.out.exports.names.push(name);
        }
    }

    /// Record a named export whose assignment already lives inline in a
    /// replacement, so the transformer appends nothing for it.
    fn record_satisfied_export(&mut self, name: &str) {
        self.out.satisfied.insert(name.to_owned());
        if !self.out.exports.names.iter().any(|n| n == name) {
            self.out.exports.names.push(name.to_owned());
        }
    }

    /// Fresh alias for a re-export source: non-identifier characters become
    /// `_`, the whole is `_`-prefixed, and a numeric suffix keeps repeated
    /// sources from colliding within one module.
    fn reexport_alias(&mut self, specifier: &str) -> String {
        let sanitized: String = specifier
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let mut alias = format!("_{sanitized}");
        let mut n = 1;
        while !self.used_aliases.insert(alias.clone()) {
            n += 1;
            alias = format!("_{sanitized}_{n}");
        }
        alias
    }

    /// The specifier string of a statement's `source` field (`from '…'` or a
    /// bare `import '…'`). Empty string literals yield `Some("")`.
    fn statement_source(&self, node: Node<'_>) -> Option<String> {
        let string = node
            .child_by_field_name("source")
            .or_else(|| self.find_child_kind(node, "string"))?;
        let mut cursor = string.walk();
        for part in string.children(&mut cursor) {
            if part.kind() == "string_fragment" {
                return Some(node_text(part, self.source).to_owned());
            }
        }
        Some(String::new())
    }

    fn find_child_kind<'t>(&self, node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        node.children(&mut cursor).find(|c| c.kind() == kind)
    }

    fn has_child_kind(&self, node: Node<'_>, kind: &str) -> bool {
        self.find_child_kind(node, kind).is_some()
    }

    fn warn(&mut self, node: Node<'_>, message: &str) {
        self.out
            .warnings
            .push(format!("line {}: {message}", node.start_position().row + 1));
    }
}
