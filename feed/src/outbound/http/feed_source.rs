//! Reqwest-backed feed fetch adapter.
//!
//! Issues `GET {api_base}/posts` and unwraps the `{success, posts}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::FeedResponseDto;
use super::error_mapping::{map_status_error, map_transport_error};
use super::{build_client, endpoint};
use crate::domain::Post;
use crate::domain::ports::{FeedSource, FeedSourceError};

/// Feed source that loads posts from the REST API.
pub struct HttpFeedSource {
    client: Client,
    posts_url: Url,
}

impl HttpFeedSource {
    /// Build an adapter for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(api_base: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            posts_url: endpoint(api_base, "posts"),
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>, FeedSourceError> {
        let response = self
            .client
            .get(self.posts_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let posts = parse_posts(body.as_ref())?;
        debug!(posts = posts.len(), url = %self.posts_url, "fetched feed");
        Ok(posts)
    }
}

fn parse_posts(body: &[u8]) -> Result<Vec<Post>, FeedSourceError> {
    let decoded: FeedResponseDto = serde_json::from_slice(body).map_err(|error| {
        FeedSourceError::decode(format!("invalid feed JSON payload: {error}"))
    })?;
    if decoded.success {
        Ok(decoded.posts)
    } else {
        Err(FeedSourceError::unsuccessful())
    }
}
