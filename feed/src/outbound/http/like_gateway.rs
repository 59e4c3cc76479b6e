//! Reqwest-backed like toggle adapter.
//!
//! `POST {api_base}/likes` records a like and `DELETE {api_base}/likes`
//! withdraws it; both send the same JSON body. Only the status is consumed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use tracing::debug;

use super::dto::LikeRequestDto;
use super::error_mapping::{map_status_error, map_transport_error};
use super::{TRACE_ID_HEADER, build_client, endpoint};
use crate::domain::ports::{LikeGateway, LikeGatewayError};
use crate::domain::{LikeTarget, TraceId, UserId};

/// Like gateway that calls the REST API.
pub struct HttpLikeGateway {
    client: Client,
    likes_url: Url,
}

impl HttpLikeGateway {
    /// Build an adapter for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(api_base: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            likes_url: endpoint(api_base, "likes"),
        })
    }

    async fn send(
        &self,
        method: Method,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> Result<(), LikeGatewayError> {
        let mut request = self
            .client
            .request(method.clone(), self.likes_url.clone())
            .json(&LikeRequestDto::new(user_id, target));
        if let Some(trace_id) = TraceId::current() {
            request = request.header(TRACE_ID_HEADER, trace_id.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;
        let status = response.status();
        if status.is_success() {
            debug!(%method, target_id = target.id(), "like call accepted");
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[async_trait]
impl LikeGateway for HttpLikeGateway {
    async fn add_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> Result<(), LikeGatewayError> {
        self.send(Method::POST, user_id, target).await
    }

    async fn remove_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> Result<(), LikeGatewayError> {
        self.send(Method::DELETE, user_id, target).await
    }
}
