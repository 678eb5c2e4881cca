use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use propscan_common::Config;
use propscan_scraper::fetch::PageFetcher;
use propscan_scraper::pipeline;

const ALPHA_HTML: &str = r#"
    <html><body>
      <div class="plan-card">
        <h3>$100K Evaluation</h3>
        <p>Two-Step Challenge, price $497</p>
        <p>Profit target 10%</p>
      </div>
      <div class="plan-card">
        <h3>$50K Evaluation</h3>
        <p>price $297</p>
      </div>
    </body></html>
"#;

const TRADEIFY_HTML: &str = r#"
    <html><body>
      <div class="plan-tier"><h3>$50K Account</h3><p>Growth</p><p>$349 one time fee</p></div>
      <div class="plan-tier"><h3>$100K Account</h3><p>Advanced</p><p>$599 one time fee</p></div>
      <div class="plan-tier"><h3>$150K Account</h3><p>Straight to Sim Funded</p><p>$799 one time fee</p></div>
    </body></html>
"#;

/// Serves canned HTML per site; no browser involved.
struct StaticFetcher;

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        if url.contains("alphacapitalgroup") {
            Ok(ALPHA_HTML.to_string())
        } else if url.contains("tradeify") {
            Ok(TRADEIFY_HTML.to_string())
        } else {
            Ok(String::new())
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Fails the first N calls, then serves HTML. Exercises the retry path.
struct FlakyFetcher {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for FlakyFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            anyhow::bail!("connection reset");
        }
        Ok(ALPHA_HTML.to_string())
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Always renders an empty shell.
struct EmptyFetcher;

#[async_trait]
impl PageFetcher for EmptyFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "empty"
    }
}

fn test_config(output_dir: &std::path::Path, websites: &[&str]) -> Config {
    let mut config = Config::default();
    config.websites = websites.iter().map(|s| s.to_string()).collect();
    config.output_dir = output_dir.to_str().unwrap().to_string();
    config.delay_between_requests = 0.0;
    config
}

fn csv_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".csv"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn full_run_writes_site_and_combined_csvs() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), &["alphacapitalgroup.uk", "tradeify.co"]);

    let report = pipeline::run(&config, &StaticFetcher).await.unwrap();

    assert_eq!(report.successful_sites, 2);
    assert_eq!(report.failed_sites, 0);
    assert_eq!(report.total_records, 5);
    assert_eq!(report.records_per_business["Alpha Capital Group"], 2);
    assert_eq!(report.records_per_business["Tradeify"], 3);

    let files = csv_files(dir.path());
    assert_eq!(files.len(), 3);
    assert!(files.iter().any(|f| f.starts_with("alphacapitalgroup_uk_")));
    assert!(files.iter().any(|f| f.starts_with("tradeify_co_")));
    assert!(files.iter().any(|f| f.starts_with("combined_results_")));

    // Combined CSV has header + 5 rows
    let combined = files.iter().find(|f| f.starts_with("combined_results_")).unwrap();
    let contents = std::fs::read_to_string(dir.path().join(combined)).unwrap();
    assert_eq!(contents.lines().count(), 6);
}

#[tokio::test]
async fn unsupported_site_is_counted_failed_but_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), &["example.com", "tradeify.co"]);

    let report = pipeline::run(&config, &StaticFetcher).await.unwrap();

    assert_eq!(report.successful_sites, 1);
    assert_eq!(report.failed_sites, 1);
    assert_eq!(report.total_records, 3);
}

#[tokio::test]
async fn transient_fetch_failure_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), &["alphacapitalgroup.uk"]);

    let fetcher = FlakyFetcher {
        failures: 1,
        calls: AtomicUsize::new(0),
    };
    let report = pipeline::run(&config, &fetcher).await.unwrap();

    assert_eq!(report.successful_sites, 1);
    assert_eq!(report.failed_sites, 0);
    assert!(fetcher.calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn exhausted_retries_count_as_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), &["alphacapitalgroup.uk"]);
    config.max_retries = 2;

    let fetcher = FlakyFetcher {
        failures: 10,
        calls: AtomicUsize::new(0),
    };
    let report = pipeline::run(&config, &fetcher).await.unwrap();

    assert_eq!(report.successful_sites, 0);
    assert_eq!(report.failed_sites, 1);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_pages_produce_no_output_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), &["alphacapitalgroup.uk", "tradeify.co"]);

    let report = pipeline::run(&config, &EmptyFetcher).await.unwrap();

    assert_eq!(report.successful_sites, 0);
    assert_eq!(report.failed_sites, 2);
    assert_eq!(report.total_records, 0);
    assert!(csv_files(dir.path()).is_empty());
}
