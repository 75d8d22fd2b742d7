//! tagsweep - interactive batch editor for ID3 tags
//!
//! Walks the given music directories, reviews each file through the
//! configured transformation pipeline, and writes back only files with at
//! least one accepted change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagsweep::actions::default_pipeline;
use tagsweep::prompt::ConsolePrompt;
use tagsweep::{Applier, ErrorPolicy, SweepConfig, TreeWalker};

/// Command-line arguments for tagsweep
#[derive(Parser, Debug)]
#[command(name = "tagsweep")]
#[command(about = "Interactive batch editor for ID3 tags")]
#[command(version)]
struct Args {
    /// Root directory containing music files (repeatable)
    #[arg(short = 'p', long = "path", required = true)]
    paths: Vec<PathBuf>,

    /// TOML file overriding the default sweep policy
    #[arg(short, long, env = "TAGSWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// What a per-file failure does to the run (overrides the config file)
    #[arg(long, value_enum)]
    on_error: Option<ErrorPolicy>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagsweep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = SweepConfig::load(args.config.as_deref())?;
    if let Some(policy) = args.on_error {
        config.on_error = policy;
    }

    let roots: Vec<PathBuf> = args
        .paths
        .iter()
        .map(|path| {
            path.canonicalize()
                .with_context(|| format!("cannot resolve path {}", path.display()))
        })
        .collect::<Result<_>>()?;

    info!("Starting tagsweep {}", env!("CARGO_PKG_VERSION"));
    for root in &roots {
        info!("Root: {}", root.display());
    }

    let pipeline = default_pipeline(&config);
    let walker = TreeWalker::new(&config);
    let mut applier = Applier::new(config, pipeline, Box::new(ConsolePrompt::new()));

    let stats = walker.walk(&roots, &mut applier)?;

    info!(
        "Done: {} reviewed, {} changed, {} skipped, {} failed",
        stats.processed, stats.changed, stats.skipped, stats.failed
    );
    for (pattern, decision) in applier.rules().patterns() {
        info!(
            "Learned rule: {} -> {}",
            pattern,
            if decision { "accept" } else { "reject" }
        );
    }

    Ok(())
}
