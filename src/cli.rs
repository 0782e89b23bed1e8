use std::path::PathBuf;

use clap::Parser;

/// Bundle a JavaScript module graph into a single self-contained script.
///
/// jspack reads the entry named by the configuration file, follows every
/// local static import, rewrites module syntax to a synchronous require
/// format, and writes one script that runs without a module loader.
#[derive(Parser, Debug)]
#[command(name = "jspack", version, about, long_about = None)]
pub struct Cli {
    /// Path to the bundler configuration file.
    #[arg(default_value = "jspack.toml")]
    pub config: PathBuf,

    /// Print each discovered module to stderr during graph construction.
    #[arg(short, long)]
    pub verbose: bool,
}
