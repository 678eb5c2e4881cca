use std::path::Path;

use anyhow::Result;
use tracing::{error, info};

use propscan_common::{telemetry, Config};
use propscan_scraper::fetch::{ChromeFetcher, FallbackFetcher, HttpFetcher};
use propscan_scraper::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init(Path::new("scraper.log"))?;

    info!("Propscan starting...");

    let config = Config::load();
    if config.websites.is_empty() {
        error!("No websites configured to scrape");
        info!("Set the WEBSITES environment variable or add websites to config.json");
        std::process::exit(1);
    }

    info!(
        websites = config.websites.join(", ").as_str(),
        output_dir = config.output_dir.as_str(),
        headless = config.headless,
        timeout_secs = config.timeout_secs,
        "Loaded configuration"
    );

    // Browser first; plain HTTP when the browser errors or renders nothing.
    let fetcher = FallbackFetcher::new(
        Box::new(ChromeFetcher::new(
            &config.chrome_bin,
            config.headless,
            config.timeout_secs,
            &config.user_agents,
        )),
        Box::new(HttpFetcher::new(config.timeout_secs, &config.user_agents)),
    );

    // Per-site failures are reported, not fatal: CI archives whatever
    // outputs exist. Only startup problems exit non-zero.
    pipeline::run(&config, &fetcher).await?;

    info!("Scraping completed");
    Ok(())
}
