use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use propscan_common::{validate_plans, AccountPlan, Config, PropscanError};
use tracing::{error, info, warn};

use crate::fetch::PageFetcher;
use crate::output;
use crate::report::RunReport;
use crate::sites;

/// Run the full scrape: every configured website in turn, per-site CSVs,
/// a combined CSV, then the summary report. Per-site failures are counted
/// and logged but never abort the run.
pub async fn run(config: &Config, fetcher: &dyn PageFetcher) -> Result<RunReport> {
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output dir {}", config.output_dir))?;

    info!(
        sites = config.websites.len(),
        websites = config.websites.join(", ").as_str(),
        "Starting scraping process"
    );

    let mut all_plans: Vec<AccountPlan> = Vec::new();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for site in &config.websites {
        info!(site = site.as_str(), "Scraping site");

        match scrape_site(site, config, fetcher).await {
            Ok(plans) if !plans.is_empty() => {
                let path = output::site_csv_path(&config.output_dir, site, &Utc::now());
                match output::write_csv(&path, &plans) {
                    Ok(rows) => {
                        info!(site = site.as_str(), rows, "Site scraped successfully");
                        all_plans.extend(plans);
                        successful += 1;
                    }
                    Err(e) => {
                        error!(site = site.as_str(), error = %e, "Failed to save site CSV");
                        failed += 1;
                    }
                }
            }
            Ok(_) => {
                warn!(site = site.as_str(), "No data scraped from site");
                failed += 1;
            }
            Err(PropscanError::UnsupportedSite(site)) => {
                error!(
                    site = site.as_str(),
                    available = sites::available_sites().join(", ").as_str(),
                    "No scraper available for site"
                );
                failed += 1;
            }
            Err(e) => {
                error!(site = site.as_str(), error = %e, "Site scrape failed");
                failed += 1;
            }
        }
    }

    if !all_plans.is_empty() {
        write_combined(&config.output_dir, &all_plans);
    }

    let report = RunReport::build(&all_plans, successful, failed);
    report.log();
    Ok(report)
}

/// A combined-file failure is an output problem like any per-site save
/// failure: logged, and the run still ends with a report and exit 0. The
/// per-site CSVs already on disk stay archivable.
fn write_combined(output_dir: &str, plans: &[AccountPlan]) {
    let path = output::combined_csv_path(output_dir, &Utc::now());
    if let Err(e) = output::write_csv(&path, plans) {
        error!(path = %path.display(), error = %e, "Failed to save combined CSV");
    }
}

/// Fetch and parse one site with retry. An attempt fails on fetch error,
/// an empty page, or zero plans surviving validation. Failed attempts back
/// off with the configured delay, doubled each time.
async fn scrape_site(
    site: &str,
    config: &Config,
    fetcher: &dyn PageFetcher,
) -> std::result::Result<Vec<AccountPlan>, PropscanError> {
    let scraper =
        sites::for_site(site).ok_or_else(|| PropscanError::UnsupportedSite(site.to_string()))?;

    let url = scraper.base_url();
    let max_retries = config.max_retries.max(1);
    let mut delay = config.delay_between_requests;

    for attempt in 1..=max_retries {
        info!(url, attempt, max_retries, fetcher = fetcher.name(), "Scrape attempt");

        match fetcher.fetch(url).await {
            Ok(html) if !html.trim().is_empty() => {
                let plans = validate_plans(scraper.parse(&html));
                if !plans.is_empty() {
                    info!(url, plans = plans.len(), "Extracted account plans");
                    return Ok(plans);
                }
                warn!(url, attempt, "Page fetched but no plans extracted");
            }
            Ok(_) => {
                warn!(url, attempt, "Empty page");
            }
            Err(e) => {
                warn!(url, attempt, error = %e, "Fetch failed");
            }
        }

        if attempt < max_retries {
            info!(url, delay_secs = delay, "Retrying after delay");
            tokio::time::sleep(backoff_delay(delay)).await;
            delay *= 2.0;
        }
    }

    Err(PropscanError::Fetch(format!(
        "all {max_retries} attempts failed for {url}"
    )))
}

/// Upper bound on the retry sleep. Doubling an unchecked delay can reach
/// infinity, which Duration::from_secs_f64 rejects with a panic.
const MAX_BACKOFF_SECS: f64 = 300.0;

fn backoff_delay(delay_secs: f64) -> Duration {
    if delay_secs.is_finite() {
        Duration::from_secs_f64(delay_secs.clamp(0.0, MAX_BACKOFF_SECS))
    } else {
        Duration::from_secs_f64(MAX_BACKOFF_SECS)
    }
}
