use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use url::Url;

use super::{ContentStore, StoreError};
use crate::linked_data::Link;

/// Content store client over an HTTP blob gateway
///
/// Talks to a gateway exposing `POST /blocks` (body: raw bytes, response:
/// the derived link as text) and `GET /blocks/{link}`. Both calls are
/// idempotent; the gateway derives identifiers from content exactly like
/// the in-memory store.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    base_url: Url,
    client: Client,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpContentStoreError {
    #[error("gateway request failed: {0}")]
    Request(String),
    #[error("gateway returned status {0}")]
    Status(u16),
    #[error("gateway returned an unparseable link: {0}")]
    BadLink(String),
}

impl HttpContentStore {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    fn blocks_url(&self, link: Option<&Link>) -> Result<Url, HttpContentStoreError> {
        let path = match link {
            Some(link) => format!("blocks/{}", link),
            None => "blocks".to_string(),
        };
        self.base_url
            .join(&path)
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    type Error = HttpContentStoreError;

    async fn put(&self, data: Bytes) -> Result<Link, StoreError<Self::Error>> {
        // Derive the link locally so the gateway's answer can be checked
        let expected = Link::raw(&data);

        let url = self.blocks_url(None)?;
        let response = self
            .client
            .post(url)
            .body(data)
            .send()
            .await
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HttpContentStoreError::Status(response.status().as_u16()).into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))?;
        let link: Link = text
            .trim()
            .parse()
            .map_err(|_| HttpContentStoreError::BadLink(text.clone()))?;

        if link != expected {
            tracing::warn!(
                returned = %link,
                expected = %expected,
                "gateway returned a different link than locally derived"
            );
            return Err(StoreError::Corrupt(expected));
        }
        Ok(link)
    }

    async fn get(&self, link: &Link) -> Result<Bytes, StoreError<Self::Error>> {
        let url = self.blocks_url(Some(link))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(*link));
        }
        if !response.status().is_success() {
            return Err(HttpContentStoreError::Status(response.status().as_u16()).into());
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))?;

        if !link.matches(&data) {
            return Err(StoreError::Corrupt(*link));
        }
        Ok(data)
    }

    async fn has(&self, link: &Link) -> Result<bool, StoreError<Self::Error>> {
        let url = self.blocks_url(Some(link))?;
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| HttpContentStoreError::Request(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
