use propscan_common::AccountPlan;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::extract;

use super::SiteScraper;

const CANDIDATE_SELECTORS: &[&str] = &[
    "div[class*='plan']",
    "div[class*='card']",
    "div[class*='account']",
    ".pricing-card",
    "div[class*='pricing']",
];

/// Tradeify shows 3-4 plan tiers; a selector yielding fewer matched
/// something else (a nav card, a testimonial).
const MIN_PLAN_ELEMENTS: usize = 3;
const MAX_PLANS: usize = 4;

pub struct Tradeify;

impl SiteScraper for Tradeify {
    fn business_name(&self) -> &str {
        "Tradeify"
    }

    fn base_url(&self) -> &str {
        "https://tradeify.co/"
    }

    fn parse(&self, html: &str) -> Vec<AccountPlan> {
        let document = Html::parse_document(html);

        let mut candidates: Vec<String> = Vec::new();
        for raw in CANDIDATE_SELECTORS {
            let Ok(selector) = Selector::parse(raw) else {
                continue;
            };
            let elements: Vec<ElementRef> = document.select(&selector).collect();
            if elements.len() >= MIN_PLAN_ELEMENTS {
                debug!(selector = raw, count = elements.len(), "Found plan elements");
                candidates = elements.iter().map(element_text).collect();
                break;
            }
        }

        if candidates.is_empty() {
            info!("No plan selector matched, scanning divs for size keywords");
            candidates = self.keyword_divs(&document);
        }

        let plans: Vec<AccountPlan> = candidates
            .iter()
            .take(MAX_PLANS)
            .filter_map(|text| self.extract_plan(text))
            .collect();

        info!(plans = plans.len(), "Tradeify parse complete");
        plans
    }
}

impl Tradeify {
    /// A plan without an account size is noise; discard it.
    fn extract_plan(&self, text: &str) -> Option<AccountPlan> {
        let size_re = Regex::new(r"(?i)\$?(\d+)k\s*account").expect("valid regex");
        let size = size_re.captures(text).map(|cap| format!("{}k", &cap[1]))?;

        let mut plan = AccountPlan::empty(self.business_name());
        plan.account_size = size;
        plan.sale_price = self.sale_price(text);
        plan.trial_type = self.trial_type(text);
        plan.profit_goal = self.profit_goal(text);
        plan.trustpilot_score = extract::trustpilot_score(text);
        Some(plan)
    }

    fn sale_price(&self, text: &str) -> String {
        let one_time = Regex::new(r"(?i)\$(\d{3,4})\s*one time fee").expect("valid regex");
        if let Some(cap) = one_time.captures(text) {
            return format!("${}", &cap[1]);
        }
        let any = Regex::new(r"\$(\d{3,4})").expect("valid regex");
        if let Some(cap) = any.captures(text) {
            return format!("${}", &cap[1]);
        }
        String::new()
    }

    fn trial_type(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        if lower.contains("straight to sim funded") {
            "Straight to Sim Funded".to_string()
        } else if lower.contains("advanced") {
            "Advanced".to_string()
        } else if lower.contains("growth") {
            "Growth".to_string()
        } else {
            String::new()
        }
    }

    fn profit_goal(&self, text: &str) -> String {
        let re = Regex::new(r"(?i)(\d+)%.*profit").expect("valid regex");
        re.captures(text)
            .map(|cap| format!("{}%", &cap[1]))
            .unwrap_or_default()
    }

    /// Fallback: any div whose text mentions a plan size and a dollar sign.
    fn keyword_divs(&self, document: &Html) -> Vec<String> {
        let selector = Selector::parse("div").expect("valid selector");
        let size_re = Regex::new(r"(?i)\b(25k|50k|100k|150k)\b").expect("valid regex");

        document
            .select(&selector)
            .map(|el| element_text(&el))
            .filter(|text| size_re.is_match(text) && text.contains('$'))
            .collect()
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}
