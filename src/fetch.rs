use std::time::Instant;

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::{MigrateError, Result};

/// Source of rendered page markup, keyed by legacy slug.
#[allow(async_fn_in_trait)]
pub trait HtmlSource {
    async fn fetch(&self, slug: &str) -> Result<String>;
}

/// Live site over HTTP. Anything but 200 is a failure; no retries.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, slug.trim_start_matches('/'))
    }
}

impl HtmlSource for HttpSource {
    async fn fetch(&self, slug: &str) -> Result<String> {
        let url = self.page_url(slug);
        info!("Fetching {}", url);
        let start = Instant::now();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(MigrateError::Fetch {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            bytes = body.len(),
            "fetched {}",
            url
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_joins_base_and_slug() {
        let source = HttpSource::new("https://bizee.com/");
        assert_eq!(
            source.page_url("maine-corporation/maine-taxes"),
            "https://bizee.com/maine-corporation/maine-taxes"
        );
        assert_eq!(source.page_url("/maine-llc"), "https://bizee.com/maine-llc");
    }
}
