use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw workbook bytes. The production implementation talks HTTP;
/// tests substitute canned payloads.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a bounded per-request timeout. The publisher's
    /// endpoint is third-party; a hung download must not wedge a request.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ListFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading positive list from {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!("download complete, {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
