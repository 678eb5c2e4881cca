use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Default desktop user agents, one picked at random per fetch.
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
];

/// Application configuration. Built-in defaults, overridden by an optional
/// JSON config file, overridden by environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub websites: Vec<String>,
    pub output_dir: String,
    pub headless: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub delay_between_requests: f64,
    pub user_agents: Vec<String>,
    pub chrome_bin: String,
}

/// Partial config as it appears in config.json. Every field optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    websites: Option<Vec<String>>,
    output_dir: Option<String>,
    headless: Option<bool>,
    timeout: Option<u64>,
    max_retries: Option<u32>,
    delay_between_requests: Option<f64>,
    user_agents: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            websites: Vec::new(),
            output_dir: "output".to_string(),
            headless: true,
            timeout_secs: 30,
            max_retries: 3,
            delay_between_requests: 2.0,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            chrome_bin: "chromium".to_string(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file named by
    /// CONFIG_FILE (default config.json) if it exists, then env vars.
    pub fn load() -> Self {
        let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());
        let mut config = Self::default();
        config.apply_file(&config_file);
        config.apply_env();
        config
    }

    fn apply_file(&mut self, path: &str) {
        if !Path::new(path).exists() {
            return;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path, error = %e, "Failed to read config file, ignoring");
                return;
            }
        };
        let file: FileConfig = match serde_json::from_str(&contents) {
            Ok(f) => f,
            Err(e) => {
                warn!(path, error = %e, "Malformed config file, ignoring");
                return;
            }
        };
        if let Some(websites) = file.websites {
            self.websites = websites;
        }
        if let Some(output_dir) = file.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(headless) = file.headless {
            self.headless = headless;
        }
        if let Some(timeout) = file.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(max_retries) = file.max_retries {
            self.max_retries = max_retries;
        }
        if let Some(delay) = file.delay_between_requests {
            if delay.is_finite() && delay >= 0.0 {
                self.delay_between_requests = delay;
            } else {
                warn!(path, delay, "Invalid delay_between_requests in config file, ignoring");
            }
        }
        if let Some(user_agents) = file.user_agents {
            if !user_agents.is_empty() {
                self.user_agents = user_agents;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(raw) = env::var("WEBSITES") {
            let sites = parse_websites(&raw);
            if !sites.is_empty() {
                self.websites = sites;
            }
        }
        if let Ok(raw) = env::var("HEADLESS") {
            match parse_bool(&raw) {
                Some(headless) => self.headless = headless,
                None => warn!(value = raw.as_str(), "Invalid HEADLESS value, keeping previous"),
            }
        }
        if let Ok(raw) = env::var("OUTPUT_DIR") {
            if !raw.trim().is_empty() {
                self.output_dir = raw;
            }
        }
        if let Ok(raw) = env::var("TIMEOUT") {
            match raw.parse::<u64>() {
                Ok(t) => self.timeout_secs = t,
                Err(e) => warn!(value = raw.as_str(), error = %e, "Invalid TIMEOUT, keeping previous"),
            }
        }
        if let Ok(raw) = env::var("MAX_RETRIES") {
            match raw.parse::<u32>() {
                Ok(r) => self.max_retries = r,
                Err(e) => warn!(value = raw.as_str(), error = %e, "Invalid MAX_RETRIES, keeping previous"),
            }
        }
        if let Ok(raw) = env::var("DELAY_BETWEEN_REQUESTS") {
            match parse_delay(&raw) {
                Some(d) => self.delay_between_requests = d,
                None => warn!(value = raw.as_str(), "Invalid DELAY_BETWEEN_REQUESTS, keeping previous"),
            }
        }
        if let Ok(raw) = env::var("CHROME_BIN") {
            if !raw.trim().is_empty() {
                self.chrome_bin = raw;
            }
        }
    }
}

/// Split a comma-separated site list, trimming whitespace and dropping empties.
pub fn parse_websites(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Delay must be a finite, non-negative number of seconds: the retry loop
/// doubles it and turns it into a Duration, neither of which tolerates
/// infinity or NaN.
pub fn parse_delay(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Case-insensitive true/false. Anything else is None.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn websites_split_and_trimmed() {
        assert_eq!(
            parse_websites(" alphacapitalgroup.uk, tradeify.co ,,"),
            vec!["alphacapitalgroup.uk", "tradeify.co"]
        );
        assert!(parse_websites("  ,  ").is_empty());
        assert!(parse_websites("").is_empty());
    }

    #[test]
    fn bool_parsing_is_case_insensitive() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool(" True "), Some(true));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn delay_parsing_rejects_non_finite_and_negative() {
        assert_eq!(parse_delay("2"), Some(2.0));
        assert_eq!(parse_delay(" 0.5 "), Some(0.5));
        assert_eq!(parse_delay("0"), Some(0.0));
        assert_eq!(parse_delay("inf"), None);
        assert_eq!(parse_delay("infinity"), None);
        assert_eq!(parse_delay("NaN"), None);
        assert_eq!(parse_delay("-2"), None);
        assert_eq!(parse_delay("soon"), None);
    }

    #[test]
    fn file_delay_must_be_finite_and_non_negative() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delay_between_requests": -3.0}}"#).unwrap();

        let mut config = Config::default();
        config.apply_file(file.path().to_str().unwrap());

        assert_eq!(config.delay_between_requests, 2.0);
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.websites.is_empty());
        assert_eq!(config.output_dir, "output");
        assert!(config.headless);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay_between_requests, 2.0);
        assert_eq!(config.user_agents.len(), 3);
        assert_eq!(config.chrome_bin, "chromium");
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"websites": ["tradeify.co"], "timeout": 10, "headless": false}}"#
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file.path().to_str().unwrap());

        assert_eq!(config.websites, vec!["tradeify.co"]);
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.headless);
        // Untouched fields keep defaults
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let mut config = Config::default();
        config.apply_file(file.path().to_str().unwrap());

        assert_eq!(config.timeout_secs, 30);
        assert!(config.websites.is_empty());
    }

    #[test]
    fn missing_file_is_ignored() {
        let mut config = Config::default();
        config.apply_file("/nonexistent/config.json");
        assert_eq!(config.output_dir, "output");
    }
}
