use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use propscan_common::AccountPlan;
use tracing::{info, warn};

/// Filename-safe site key: dots and slashes become underscores.
fn sanitize_site(site: &str) -> String {
    site.replace(['.', '/'], "_")
}

fn timestamp(now: &DateTime<Utc>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Per-site output file: `{output_dir}/{site}_{YYYYmmdd_HHMMSS}.csv`.
pub fn site_csv_path(output_dir: &str, site: &str, now: &DateTime<Utc>) -> PathBuf {
    Path::new(output_dir).join(format!("{}_{}.csv", sanitize_site(site), timestamp(now)))
}

/// Combined output file for the whole run.
pub fn combined_csv_path(output_dir: &str, now: &DateTime<Utc>) -> PathBuf {
    Path::new(output_dir).join(format!("combined_results_{}.csv", timestamp(now)))
}

/// Serialize plans to CSV with a header row. An empty plan set is skipped
/// (no empty files for CI to archive). Returns the number of rows written.
pub fn write_csv(path: &Path, plans: &[AccountPlan]) -> Result<usize> {
    if plans.is_empty() {
        warn!(path = %path.display(), "No rows to write, skipping file");
        return Ok(0);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output dir {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for plan in plans {
        writer.serialize(plan).context("Failed to serialize plan row")?;
    }
    writer.flush().context("Failed to flush CSV")?;

    info!(path = %path.display(), rows = plans.len(), "Wrote CSV");
    Ok(plans.len())
}
