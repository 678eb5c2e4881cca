use std::collections::HashSet;

use crate::types::AccountPlan;

/// Clean and filter scraped plans before output:
/// - trim every field
/// - drop rows with no extracted data
/// - deduplicate on the data fields (timestamp excluded)
///
/// Input order is preserved for surviving rows.
pub fn validate_plans(plans: Vec<AccountPlan>) -> Vec<AccountPlan> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for mut plan in plans {
        trim_fields(&mut plan);
        if !plan.has_data() {
            continue;
        }
        if seen.insert(plan.dedup_key()) {
            out.push(plan);
        }
    }

    out
}

fn trim_fields(plan: &mut AccountPlan) {
    for field in [
        &mut plan.business_name,
        &mut plan.account_size,
        &mut plan.sale_price,
        &mut plan.funded_full_price,
        &mut plan.discount_coupon_code,
        &mut plan.trial_type,
        &mut plan.trustpilot_score,
        &mut plan.profit_goal,
    ] {
        let trimmed = field.trim();
        if trimmed.len() != field.len() {
            *field = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(size: &str, price: &str) -> AccountPlan {
        let mut p = AccountPlan::empty("Alpha Capital Group");
        p.account_size = size.to_string();
        p.sale_price = price.to_string();
        p
    }

    #[test]
    fn drops_rows_with_no_data() {
        let plans = vec![plan("", ""), plan("100K", "497")];
        let out = validate_plans(plans);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].account_size, "100K");
    }

    #[test]
    fn trims_whitespace() {
        let plans = vec![plan("  50K  ", " 297 ")];
        let out = validate_plans(plans);
        assert_eq!(out[0].account_size, "50K");
        assert_eq!(out[0].sale_price, "297");
    }

    #[test]
    fn whitespace_only_rows_are_dropped() {
        let plans = vec![plan("   ", "  ")];
        assert!(validate_plans(plans).is_empty());
    }

    #[test]
    fn deduplicates_identical_rows_across_timestamps() {
        let mut a = plan("100K", "497");
        let mut b = plan("100K", "497");
        a.scraped_at = chrono::Utc::now();
        b.scraped_at = a.scraped_at + chrono::Duration::seconds(30);
        let out = validate_plans(vec![a, b]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn distinct_rows_survive_in_order() {
        let out = validate_plans(vec![plan("25K", "149"), plan("50K", "297")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].account_size, "25K");
        assert_eq!(out[1].account_size, "50K");
    }
}
