pub mod error;

pub use error::{ChromeError, Result};

use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Max concurrent browser processes. Each instance is heavy (~100MB+ RSS,
/// multiple child processes), and CI runners hit PID/memory limits fast.
const MAX_CONCURRENT_CHROME: usize = 2;

/// Max attempts for transient failures (empty DOM, "Cannot fork", timeout).
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff for retries. Actual delay is base * 3^attempt + jitter.
const RETRY_BASE: Duration = Duration::from_secs(3);

/// Client for a local Chromium in `--dump-dom` mode: navigates, waits for
/// the page to render, and returns the serialized DOM as HTML.
pub struct ChromeClient {
    chrome_bin: String,
    headless: bool,
    timeout: Duration,
    semaphore: Semaphore,
}

impl ChromeClient {
    pub fn new(chrome_bin: &str) -> Self {
        info!(chrome_bin, "Using ChromeClient (dump-dom rendering, max_concurrent={MAX_CONCURRENT_CHROME})");
        Self {
            chrome_bin: chrome_bin.to_string(),
            headless: true,
            timeout: Duration::from_secs(30),
            semaphore: Semaphore::new(MAX_CONCURRENT_CHROME),
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the rendered DOM for a URL. Only http/https URLs are accepted.
    /// Transient failures are retried with exponential backoff plus 0-1s of
    /// random jitter.
    pub async fn dump_dom(&self, url: &str, user_agent: Option<&str>) -> Result<String> {
        let parsed = url::Url::parse(url).map_err(|e| ChromeError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ChromeError::InvalidUrl(format!(
                "only http/https URLs are allowed, got: {}",
                parsed.scheme()
            )));
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ChromeError::Launch("semaphore closed".to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            let tmp_dir = tempfile::tempdir()
                .map_err(|e| ChromeError::Launch(format!("temp profile dir: {e}")))?;

            let mut args: Vec<String> = Vec::new();
            if self.headless {
                args.push("--headless".to_string());
            }
            args.extend(
                [
                    "--no-sandbox",
                    "--disable-gpu",
                    "--disable-dev-shm-usage",
                    "--window-size=1920,1080",
                ]
                .map(String::from),
            );
            args.push(format!("--user-data-dir={}", tmp_dir.path().display()));
            if let Some(ua) = user_agent {
                args.push(format!("--user-agent={ua}"));
            }
            args.push("--dump-dom".to_string());
            args.push(url.to_string());

            let result = tokio::time::timeout(
                self.timeout,
                tokio::process::Command::new(&self.chrome_bin)
                    .args(&args)
                    .output(),
            )
            .await;

            match result {
                Ok(Ok(output)) => {
                    if output.status.success() {
                        if output.stdout.is_empty() && attempt + 1 < MAX_ATTEMPTS {
                            self.backoff(url, attempt, "empty DOM").await;
                            continue;
                        }
                        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
                    }
                    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                    if is_transient(&stderr) && attempt + 1 < MAX_ATTEMPTS {
                        self.backoff(url, attempt, "transient browser error").await;
                        continue;
                    }
                    return Err(ChromeError::Exit(stderr));
                }
                Ok(Err(e)) => {
                    let msg = e.to_string();
                    if is_transient(&msg) && attempt + 1 < MAX_ATTEMPTS {
                        self.backoff(url, attempt, "launch failed").await;
                        continue;
                    }
                    return Err(ChromeError::Launch(msg));
                }
                Err(_) => {
                    if attempt + 1 < MAX_ATTEMPTS {
                        self.backoff(url, attempt, "timed out").await;
                        continue;
                    }
                    return Err(ChromeError::Timeout(self.timeout.as_secs()));
                }
            }
        }

        Err(ChromeError::Timeout(self.timeout.as_secs()))
    }

    async fn backoff(&self, url: &str, attempt: u32, reason: &str) {
        use rand::Rng;
        let backoff = RETRY_BASE * 3u32.pow(attempt);
        let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
        warn!(
            url,
            attempt = attempt + 1,
            backoff_secs = backoff.as_secs(),
            reason,
            "Browser attempt failed, retrying after backoff"
        );
        tokio::time::sleep(backoff + jitter).await;
    }
}

fn is_transient(message: &str) -> bool {
    message.contains("Cannot fork") || message.contains("Resource temporarily unavailable")
}
