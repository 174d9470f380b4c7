use crate::config::ScraperConfig;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Body of a GET, with 404 kept apart from other failures.
#[derive(Debug)]
pub enum Page {
    Body(String),
    Missing,
}

#[derive(Debug)]
enum Attempt {
    /// Worth another try: 429, 5xx, connection errors, timeouts.
    Retry(anyhow::Error),
    Fatal(anyhow::Error),
}

impl Attempt {
    fn into_inner(self) -> anyhow::Error {
        match self {
            Attempt::Retry(e) | Attempt::Fatal(e) => e,
        }
    }
}

pub struct HttpClient {
    inner: reqwest::Client,
    config: ScraperConfig,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Accept cookies so session-based pages work
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner,
            config: config.clone(),
        })
    }

    /// Fetch a URL as text after the polite delay, retrying transient errors.
    pub async fn get_page(&self, url: &str) -> Result<Page> {
        sleep(Duration::from_millis(self.config.request_delay_ms)).await;

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.config.request_delay_ms.max(1) / 2 + 1)
            .map(jitter)
            .take(self.config.max_retries as usize);

        let mut attempt = 0u32;
        RetryIf::spawn(
            strategy,
            move || {
                attempt += 1;
                debug!("GET {} (attempt {})", url, attempt);
                self.try_get(url)
            },
            move |e: &Attempt| {
                if let Attempt::Retry(err) = e {
                    warn!("GET {} failed, retrying: {:#}", url, err);
                    true
                } else {
                    false
                }
            },
        )
        .await
        .map_err(Attempt::into_inner)
        .with_context(|| format!("GET {} failed", url))
    }

    async fn try_get(&self, url: &str) -> Result<Page, Attempt> {
        let resp = match self.inner.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return Err(Attempt::Retry(anyhow::Error::new(e).context("request error"))),
        };

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Page::Missing);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(Attempt::Retry(anyhow::anyhow!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(Attempt::Fatal(anyhow::anyhow!("HTTP error {}", status)));
        }

        resp.text()
            .await
            .map(Page::Body)
            .map_err(|e| Attempt::Retry(anyhow::Error::new(e).context("Failed to read response body")))
    }
}
