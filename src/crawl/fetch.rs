use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::warn;

use crate::config::FetchConfig;
use crate::error::FetchError;

#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: Bytes,
}

impl FetchedPage {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher with browser identification and a small retry budget
/// for timeouts, 429 and 5xx.
#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
    cfg: FetchConfig,
}

impl HttpFetcher {
    pub fn new(cfg: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&cfg.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(crate::config::DEFAULT_USER_AGENT));
        headers.insert(USER_AGENT, ua);
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.7,fr;q=0.5"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| FetchError::from_reqwest("<client>", e))?;
        Ok(Self { http, cfg })
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.http.get(url).send().await.map_err(|e| FetchError::from_reqwest(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        let final_url = response.url().to_string();
        let body = response.bytes().await.map_err(|source| FetchError::Body { url: url.to_string(), source })?;
        Ok(FetchedPage { url: final_url, status: status.as_u16(), body })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.cfg.max_retries => {
                    let backoff = backoff_for(self.cfg.backoff, attempt);
                    warn!(
                        "fetch failed for {} (attempt {}/{}): {}; retrying in {:.1}s",
                        url,
                        attempt + 1,
                        self.cfg.max_retries + 1,
                        e,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn backoff_for(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

#[cfg(test)]
pub use mock::MockFetcher;
