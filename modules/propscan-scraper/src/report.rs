use std::collections::BTreeMap;

use propscan_common::AccountPlan;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// End-of-run summary, logged for the CI job log and scraper.log.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub total_records: usize,
    pub successful_sites: usize,
    pub failed_sites: usize,
    pub records_per_business: BTreeMap<String, usize>,
    pub price_stats: Option<PriceStats>,
}

impl RunReport {
    pub fn build(plans: &[AccountPlan], successful_sites: usize, failed_sites: usize) -> Self {
        let mut records_per_business = BTreeMap::new();
        for plan in plans {
            *records_per_business
                .entry(plan.business_name.clone())
                .or_insert(0) += 1;
        }

        let prices: Vec<f64> = plans
            .iter()
            .filter_map(|p| parse_price(&p.sale_price))
            .collect();
        let price_stats = if prices.is_empty() {
            None
        } else {
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = prices.iter().sum::<f64>() / prices.len() as f64;
            Some(PriceStats { min, max, mean })
        };

        Self {
            total_records: plans.len(),
            successful_sites,
            failed_sites,
            records_per_business,
            price_stats,
        }
    }

    pub fn log(&self) {
        if self.total_records == 0 {
            warn!("No data was scraped from any website");
        }

        info!(
            total_records = self.total_records,
            successful_sites = self.successful_sites,
            failed_sites = self.failed_sites,
            "Scraping report"
        );
        for (business, count) in &self.records_per_business {
            info!(business = business.as_str(), records = count, "Records per business");
        }
        if let Some(stats) = &self.price_stats {
            info!(
                min = stats.min,
                max = stats.max,
                mean = stats.mean,
                "Sale price statistics (USD)"
            );
        }
    }
}

/// Parse a scraped price string to a number: keep digits and dots, drop
/// currency symbols and thousands separators.
pub fn parse_price(raw: &str) -> Option<f64> {
    let numeric: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if numeric.is_empty() {
        return None;
    }
    numeric.parse().ok()
}
