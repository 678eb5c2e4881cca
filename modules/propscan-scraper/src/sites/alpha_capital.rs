use propscan_common::AccountPlan;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::extract;

use super::SiteScraper;

/// Selector tiers, most specific first. A tier that yields plans with data
/// wins; later tiers are not consulted.
const PRIMARY_SELECTORS: &[&str] = &[
    ".account-card",
    ".trading-account",
    ".plan-card",
    ".evaluation-card",
    "[data-testid*='account']",
    ".pricing-tier",
    ".plan-wrapper",
];

const SECONDARY_SELECTORS: &[&str] = &[
    ".card",
    ".package",
    ".tier",
    ".pricing-card",
    ".plan-item",
    ".product-card",
];

const GENERIC_SELECTORS: &[&str] = &[
    ".container .row > div",
    ".section .col-md-4",
    ".plans-section > div",
    ".pricing-section > div",
];

/// Fallback sections shorter than this are noise (nav items, buttons).
const MIN_SECTION_TEXT: usize = 50;
/// Cap fallback results; class-regex matching over-selects nested wrappers.
const MAX_FALLBACK_PLANS: usize = 10;

pub struct AlphaCapital;

impl SiteScraper for AlphaCapital {
    fn business_name(&self) -> &str {
        "Alpha Capital Group"
    }

    fn base_url(&self) -> &str {
        "https://alphacapitalgroup.uk/"
    }

    fn parse(&self, html: &str) -> Vec<AccountPlan> {
        let document = Html::parse_document(html);

        for (tier, selectors) in [
            ("primary", PRIMARY_SELECTORS),
            ("secondary", SECONDARY_SELECTORS),
            ("generic", GENERIC_SELECTORS),
        ] {
            debug!(tier, "Trying selector tier");
            for raw in selectors {
                let Ok(selector) = Selector::parse(raw) else {
                    continue;
                };
                let elements: Vec<ElementRef> = document.select(&selector).collect();
                if elements.is_empty() {
                    continue;
                }
                debug!(selector = raw, count = elements.len(), "Found candidate elements");

                let plans: Vec<AccountPlan> = elements
                    .iter()
                    .map(|el| self.extract_plan(el))
                    .filter(|p| p.has_data())
                    .collect();

                if !plans.is_empty() {
                    info!(
                        selector = raw,
                        plans = plans.len(),
                        "Extracted plans via selector"
                    );
                    return plans;
                }
            }
        }

        info!("No selector tier matched, falling back to section scan");
        self.parse_sections(&document)
    }
}

impl AlphaCapital {
    fn extract_plan(&self, element: &ElementRef) -> AccountPlan {
        let text = element.text().collect::<Vec<_>>().join(" ");
        // Regexes also see the markup: codes and scores often live in
        // attributes rather than visible text.
        let combined = format!("{}\n{}", text, element.html());
        self.plan_from_text(&combined)
    }

    fn plan_from_text(&self, content: &str) -> AccountPlan {
        let mut plan = AccountPlan::empty(self.business_name());
        plan.account_size = extract::account_size(content);
        plan.sale_price = extract::sale_price(content);
        plan.funded_full_price = extract::funded_price(content);
        plan.discount_coupon_code = extract::discount_code(content);
        plan.trial_type = extract::trial_type(content);
        plan.trustpilot_score = extract::trustpilot_score(content);
        plan.profit_goal = extract::profit_goal(content);
        plan
    }

    /// Last resort: any div/section whose class smells like a pricing block.
    fn parse_sections(&self, document: &Html) -> Vec<AccountPlan> {
        let class_re = Regex::new(r"(?i)plan|price|account|tier").expect("valid regex");
        let selector = Selector::parse("div, section").expect("valid selector");

        let mut plans = Vec::new();
        for element in document.select(&selector) {
            let Some(class) = element.value().attr("class") else {
                continue;
            };
            if !class_re.is_match(class) {
                continue;
            }
            let text = element.text().collect::<Vec<_>>().join(" ");
            if text.trim().len() < MIN_SECTION_TEXT {
                continue;
            }

            let plan = self.plan_from_text(&text);
            if plan.has_data() {
                plans.push(plan);
                if plans.len() >= MAX_FALLBACK_PLANS {
                    break;
                }
            }
        }
        plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD_HTML: &str = r#"
        <html><body>
          <div class="plan-card">
            <h3>$100K Evaluation</h3>
            <p>Two-Step Challenge</p>
            <p>Sale price $497 <s>funded full price $998</s></p>
            <p>Use code: ALPHA20</p>
            <p>Profit target 10%</p>
            <span>Trustpilot 4.6</span>
          </div>
          <div class="plan-card">
            <h3>$50K Evaluation</h3>
            <p>price $297</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_plans_from_plan_cards() {
        let plans = AlphaCapital.parse(CARD_HTML);
        assert_eq!(plans.len(), 2);

        let first = &plans[0];
        assert_eq!(first.business_name, "Alpha Capital Group");
        assert_eq!(first.account_size, "100K");
        assert_eq!(first.sale_price, "497");
        assert_eq!(first.funded_full_price, "998");
        assert_eq!(first.discount_coupon_code, "ALPHA20");
        assert_eq!(first.trial_type, "two-step");
        assert_eq!(first.trustpilot_score, "4.6");
        assert_eq!(first.profit_goal, "10%");

        assert_eq!(plans[1].account_size, "50K");
        assert_eq!(plans[1].sale_price, "297");
    }

    #[test]
    fn falls_back_to_class_scan_when_no_known_selectors() {
        let html = r#"
            <html><body>
              <section class="hero-pricing-block">
                Get your $25K account today for a one time fee of $149.
                Pass the two-step evaluation with an 8% profit target.
              </section>
            </body></html>
        "#;
        let plans = AlphaCapital.parse(html);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].account_size, "25K");
        assert_eq!(plans[0].sale_price, "149");
        assert_eq!(plans[0].profit_goal, "8%");
    }

    #[test]
    fn empty_page_yields_no_plans() {
        assert!(AlphaCapital.parse("<html><body></body></html>").is_empty());
    }

    #[test]
    fn text_only_sections_are_skipped_when_too_short() {
        let html = r#"<div class="plan">tiny</div>"#;
        assert!(AlphaCapital.parse(html).is_empty());
    }
}
