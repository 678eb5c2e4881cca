use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is unset; a set RUST_LOG replaces it entirely.
const DEFAULT_DIRECTIVES: &str = "propscan=info,chrome_client=info";

/// Initialize tracing: one human-readable layer on stderr, one ANSI-free
/// layer appending to the given log file.
pub fn init(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let file = Arc::new(file);

    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file))
        .init();

    Ok(())
}

fn build_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(spec) if !spec.trim().is_empty() => EnvFilter::new(spec),
        _ => EnvFilter::new(DEFAULT_DIRECTIVES),
    }
}
