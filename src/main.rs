mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use jspack::{Bundler, BundlerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let start = std::time::Instant::now();

    let config = BundlerConfig::load(&cli.config)?;
    let output = config.output.clone();

    // The pipeline itself performs exactly one write; any directory
    // creation happens out here.
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create output directory {}", parent.display()))?;
    }

    let result = Bundler::new(config).verbose(cli.verbose).write_bundle().await?;

    println!(
        "Bundled {} modules into {} in {:.2}s",
        result.module_count,
        output.display(),
        start.elapsed().as_secs_f64()
    );
    if result.external_count > 0 {
        println!(
            "  {} external imports left to the host module system",
            result.external_count
        );
    }
    if result.warning_count > 0 {
        println!("  {} warnings (see stderr)", result.warning_count);
    }

    Ok(())
}
