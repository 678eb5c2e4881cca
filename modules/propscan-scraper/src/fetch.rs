use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrome_client::ChromeClient;
use rand::prelude::IndexedRandom;
use tracing::{info, warn};

/// Seam between the pipeline and the page-rendering backend. Empty strings
/// are valid results and mean "nothing rendered this attempt".
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

/// Headless Chromium fetcher. The default path: pricing pages on these sites
/// are JS-rendered, so a plain GET sees an empty shell.
pub struct ChromeFetcher {
    client: ChromeClient,
    user_agents: Vec<String>,
}

impl ChromeFetcher {
    pub fn new(chrome_bin: &str, headless: bool, timeout_secs: u64, user_agents: &[String]) -> Self {
        Self {
            client: ChromeClient::new(chrome_bin)
                .with_headless(headless)
                .with_timeout(Duration::from_secs(timeout_secs)),
            user_agents: user_agents.to_vec(),
        }
    }

    fn pick_user_agent(&self) -> Option<&str> {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!(url, fetcher = "chrome", "Fetching URL");

        let html = self
            .client
            .dump_dom(url, self.pick_user_agent())
            .await
            .context("Chromium dump-dom failed")?;

        if html.trim().is_empty() {
            warn!(url, fetcher = "chrome", "Empty DOM output");
            return Ok(String::new());
        }

        info!(url, fetcher = "chrome", bytes = html.len(), "Fetched successfully");
        Ok(html)
    }

    fn name(&self) -> &str {
        "chrome"
    }
}

/// Tries the primary fetcher first; when it errors or renders nothing,
/// tries the fallback. Lets a run degrade to plain HTTP when the browser
/// is missing or crashing on the runner.
pub struct FallbackFetcher {
    primary: Box<dyn PageFetcher>,
    fallback: Box<dyn PageFetcher>,
}

impl FallbackFetcher {
    pub fn new(primary: Box<dyn PageFetcher>, fallback: Box<dyn PageFetcher>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PageFetcher for FallbackFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        match self.primary.fetch(url).await {
            Ok(html) if !html.trim().is_empty() => Ok(html),
            Ok(_) => {
                warn!(
                    url,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "Primary fetcher rendered nothing, trying fallback"
                );
                self.fallback.fetch(url).await
            }
            Err(e) => {
                warn!(
                    url,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Primary fetcher failed, trying fallback"
                );
                self.fallback.fetch(url).await
            }
        }
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Plain HTTP fetcher. No JS rendering; useful for static pages and as the
/// degraded path behind FallbackFetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64, user_agents: &[String]) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            user_agents: user_agents.to_vec(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!(url, fetcher = "http", "Fetching URL");

        let mut request = self.client.get(url);
        if let Some(ua) = self.user_agents.choose(&mut rand::rng()) {
            request = request.header(reqwest::header::USER_AGENT, ua.as_str());
        }

        let resp = request.send().await.context("HTTP request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("HTTP status {status} for {url}");
        }

        let html = resp.text().await.context("Failed to read response body")?;
        info!(url, fetcher = "http", bytes = html.len(), "Fetched successfully");
        Ok(html)
    }

    fn name(&self) -> &str {
        "http"
    }
}
