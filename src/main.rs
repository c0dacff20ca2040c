use anyhow::{Context, Result};
use clap::Parser;
use gore_globe::{CliArgs, GoreConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // --log-level wins over RUST_LOG; default to info
    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = GoreConfig::default();
    config.apply_cli_overrides(&args);

    gore_globe::run(&config)
        .with_context(|| format!("failed to build globe {}", config.output_path.display()))?;

    Ok(())
}
