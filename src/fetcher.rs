use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::traits::PageFetcher;

/// Plain HTTP GET fetcher for the legislature site.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Single GET; non-2xx statuses and non-UTF-8 bodies are errors.
    pub async fn try_fetch(&self, url: &str) -> Result<String, TrackerError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| TrackerError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!("Fetched {} ({} bytes)", url, body.len());
                Some(body)
            }
            Err(e) => {
                warn!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}
