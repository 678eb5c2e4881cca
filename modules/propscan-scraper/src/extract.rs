//! Field extraction over plan-card text. Prop-firm pricing pages share a
//! vocabulary ($100K accounts, one-time fees, profit targets, Trustpilot
//! badges), so the patterns here are shared across site scrapers.

use regex::Regex;

/// Account size: `$100K`, `50K account`, `100,000 challenge`, `100K funded`.
/// Normalized to uppercase. Comma forms are rejected, matching the uppercase
/// `NK` convention in the output.
pub fn account_size(text: &str) -> String {
    let patterns = [
        r"(?i)\$(\d+[,.]?\d*[kK])",
        r"(?i)(\d+[kK])\s*(?:account|challenge|evaluation)",
        r"(?i)(\d+,\d{3})\s*(?:account|challenge)",
        r"(?i)Account.*?(\d+[kK])",
        r"(?i)(\d{2,3}[kK])\s*funded",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            let size = cap[1].to_uppercase();
            if size.contains('K') && !size.contains(',') {
                return size;
            }
        }
    }
    String::new()
}

/// Sale price: labelled price first, then any dollar amount, then other
/// currencies. Only amounts in 50..=5000 are plausible evaluation fees.
pub fn sale_price(text: &str) -> String {
    let patterns = [
        r"(?i)(?:sale|price|cost|fee).*?\$(\d+(?:,\d{3})*(?:\.\d{2})?)",
        r"(?i)\$(\d+(?:,\d{3})*(?:\.\d{2})?)",
        r"(?i)(?:£|USD|EUR)\s*(\d+(?:,\d{3})*(?:\.\d{2})?)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        for cap in re.captures_iter(text) {
            let price = &cap[1];
            if let Ok(value) = price.replace(',', "").parse::<f64>() {
                if (50.0..=5000.0).contains(&value) {
                    return price.to_string();
                }
            }
        }
    }
    String::new()
}

/// Full (undiscounted) price for the funded account.
pub fn funded_price(text: &str) -> String {
    let patterns = [
        r"(?i)funded.*?\$(\d+(?:,\d{3})*(?:\.\d{2})?)",
        r"(?i)full.*?price.*?\$(\d+(?:,\d{3})*(?:\.\d{2})?)",
        r"(?i)regular.*?\$(\d+(?:,\d{3})*(?:\.\d{2})?)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            return cap[1].to_string();
        }
    }
    String::new()
}

/// Discount code or percentage: `code: SAVE20`, `20% off`.
pub fn discount_code(text: &str) -> String {
    let patterns = [
        r"(?i)(?:code|coupon)[:\s]+([A-Z0-9]{3,})",
        r"(?i)(?:discount|save)[:\s]+(\d+%)",
        r"(?i)use\s+code[:\s]+([A-Z0-9]+)",
        r"(?i)(\d+%)\s*(?:off|discount)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            return cap[1].to_string();
        }
    }
    String::new()
}

/// Evaluation/trial type: step counts, instant funding, leverage ratios,
/// phases. Lowercased.
pub fn trial_type(text: &str) -> String {
    let patterns = [
        r"(?i)(one[- ]?step|two[- ]?step|three[- ]?step)",
        r"(?i)(instant|direct|immediate)",
        r"(?i)(evaluation|challenge|assessment)",
        r"(?i)leverage[:\s]+(\d+:\d+)",
        r"(?i)(phase\s+\d+)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            return cap[1].to_lowercase();
        }
    }
    String::new()
}

/// Trustpilot score. Only values in 1.0..=5.0 are valid star ratings.
pub fn trustpilot_score(text: &str) -> String {
    let patterns = [
        r"(?i)trustpilot.*?(\d+\.?\d*)",
        r"(?i)rating.*?(\d+\.?\d*)",
        r"(?i)score.*?(\d+\.?\d*)",
        r"(?i)(\d+\.?\d*)\s*(?:stars?|rating)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            if let Ok(score) = cap[1].parse::<f64>() {
                if (1.0..=5.0).contains(&score) {
                    return score.to_string();
                }
            }
        }
    }
    String::new()
}

/// Profit target percentage. Only 1..=50 is a plausible goal.
pub fn profit_goal(text: &str) -> String {
    let patterns = [
        r"(?i)(?:profit|target|goal).*?(\d+%)",
        r"(?i)(\d+%)\s*(?:profit|target)",
        r"(?i)reach.*?(\d+%)",
        r"(?i)achieve.*?(\d+%)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            let raw = cap[1].to_string();
            if let Ok(pct) = raw.trim_end_matches('%').parse::<u32>() {
                if (1..=50).contains(&pct) {
                    return raw;
                }
            }
        }
    }
    String::new()
}
