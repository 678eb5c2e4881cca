use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted trading-account plan. All data fields are strings, empty
/// when the page didn't yield the value. Column order here is the CSV
/// column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountPlan {
    pub business_name: String,
    pub account_size: String,
    pub sale_price: String,
    pub funded_full_price: String,
    pub discount_coupon_code: String,
    pub trial_type: String,
    pub trustpilot_score: String,
    pub profit_goal: String,
    pub scraped_at: DateTime<Utc>,
}

impl AccountPlan {
    /// A plan row with only identity fields set. Extraction fills the rest.
    pub fn empty(business_name: &str) -> Self {
        Self {
            business_name: business_name.to_string(),
            account_size: String::new(),
            sale_price: String::new(),
            funded_full_price: String::new(),
            discount_coupon_code: String::new(),
            trial_type: String::new(),
            trustpilot_score: String::new(),
            profit_goal: String::new(),
            scraped_at: Utc::now(),
        }
    }

    /// True when at least one extracted field (not business_name or
    /// scraped_at) carries data.
    pub fn has_data(&self) -> bool {
        [
            &self.account_size,
            &self.sale_price,
            &self.funded_full_price,
            &self.discount_coupon_code,
            &self.trial_type,
            &self.trustpilot_score,
            &self.profit_goal,
        ]
        .iter()
        .any(|f| !f.trim().is_empty())
    }

    /// Key used for deduplication. scraped_at is excluded so re-parsed
    /// duplicates within a run collapse.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.business_name,
            self.account_size,
            self.sale_price,
            self.funded_full_price,
            self.discount_coupon_code,
            self.trial_type,
            self.trustpilot_score,
            self.profit_goal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_has_no_data() {
        let plan = AccountPlan::empty("Alpha Capital Group");
        assert!(!plan.has_data());
    }

    #[test]
    fn plan_with_one_field_has_data() {
        let mut plan = AccountPlan::empty("Tradeify");
        plan.account_size = "50K".to_string();
        assert!(plan.has_data());
    }

    #[test]
    fn dedup_key_ignores_timestamp() {
        let mut a = AccountPlan::empty("Tradeify");
        a.sale_price = "349".to_string();
        let mut b = a.clone();
        b.scraped_at = b.scraped_at + chrono::Duration::seconds(5);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }
}
