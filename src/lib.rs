//! jspack bundles a graph of JavaScript modules written with static
//! `import`/`export` syntax into one self-contained script for hosts
//! without a native module loader.
//!
//! Pipeline: the graph builder discovers the transitive closure of local
//! imports from the entry (reader/parser + analyzer per module), the
//! transformer applies each module's positional edits with plugin hooks
//! around it, and the emitter assembles a require-style runtime, the module
//! table, and the entry invocation. Plugins compose sequentially at the
//! `preTransform`, `postTransform`, and `bundle` phases.

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod module;
pub mod parser;
pub mod plugin;
pub mod resolver;
pub mod transform;

mod bundler;

pub use bundler::{BundleOutput, Bundler};
pub use config::BundlerConfig;
pub use error::BundleError;
pub use plugin::{HookFuture, HookResult, ModuleMeta, Plugin};
