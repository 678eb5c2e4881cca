//! Per-site scrapers and the registry that maps a requested website to one.

pub mod alpha_capital;
pub mod tradeify;

use propscan_common::AccountPlan;

/// One supported website: knows its landing URL and how to pull account
/// plans out of the rendered HTML.
pub trait SiteScraper: Send + Sync {
    fn business_name(&self) -> &str;
    fn base_url(&self) -> &str;
    fn parse(&self, html: &str) -> Vec<AccountPlan>;
}

type Builder = fn() -> Box<dyn SiteScraper>;

const REGISTRY: &[(&str, Builder)] = &[
    ("alphacapitalgroup.uk", || Box::new(alpha_capital::AlphaCapital)),
    ("alpha-capital", || Box::new(alpha_capital::AlphaCapital)),
    ("alphacapital", || Box::new(alpha_capital::AlphaCapital)),
    ("tradeify.co", || Box::new(tradeify::Tradeify)),
    ("tradeify.com", || Box::new(tradeify::Tradeify)),
    ("tradeify", || Box::new(tradeify::Tradeify)),
];

/// Strip scheme and www., lowercase, drop trailing slash.
fn normalize_site(site: &str) -> String {
    site.trim()
        .to_lowercase()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_end_matches('/')
        .to_string()
}

/// Resolve a scraper for a requested website. Exact key match first, then
/// substring match in either direction.
pub fn for_site(site: &str) -> Option<Box<dyn SiteScraper>> {
    let key = normalize_site(site);
    if key.is_empty() {
        return None;
    }

    for (name, build) in REGISTRY {
        if *name == key {
            return Some(build());
        }
    }
    for (name, build) in REGISTRY {
        if key.contains(name) || name.contains(key.as_str()) {
            return Some(build());
        }
    }
    None
}

/// Supported site keys, for error messages.
pub fn available_sites() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}
