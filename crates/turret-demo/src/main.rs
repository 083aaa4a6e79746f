//! Turret demo entry point.
//!
//! Usage: `turret-demo [config.toml]`

use std::path::Path;

use anyhow::Result;
use turret_demo::{DemoConfig, simulate};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => DemoConfig::load(Path::new(&path))?,
        None => DemoConfig::default(),
    };

    let summary = simulate(&config)?;
    println!(
        "{} frames, {} ticks, {} shots",
        summary.frames, summary.ticks, summary.shots
    );
    Ok(())
}
