// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the notification endpoints of the platform REST API.
//!
//! The store talks to the API through the [`NotificationsApi`] trait so it can
//! be tested without a server. [`HttpNotificationsApi`] is the reqwest-backed
//! implementation.

use std::future::Future;
use std::pin::Pin;

use andaria_core::{ApiResponse, NotificationPage, UnreadCount};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Error type for API requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No bearer credential is available.
    #[error("not signed in\n  hint: log in first or pass --token")]
    MissingCredential,

    /// The request never produced a response.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The server refused the credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The notification does not exist (or belongs to another user).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("server error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx but reported `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The response body did not match the expected shape.
    #[error("response parsing failed: {0}")]
    ResponseParseFailed(String),
}

/// Result type for API requests.
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`NotificationsApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'a>>;

/// Remote notification endpoints, authenticated with a bearer token.
pub trait NotificationsApi: Send + Sync {
    /// `GET /notificaciones?page=&limit=`
    fn list<'a>(&'a self, token: &'a str, page: u32, limit: u32)
        -> ApiFuture<'a, NotificationPage>;

    /// `GET /notificaciones/no-leidas/count`
    fn unread_count<'a>(&'a self, token: &'a str) -> ApiFuture<'a, u64>;

    /// `PUT /notificaciones/{id}/marcar-leida`
    fn mark_read<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()>;

    /// `PUT /notificaciones/marcar-todas-leidas`
    fn mark_all_read<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()>;

    /// `DELETE /notificaciones/{id}`
    fn delete<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()>;
}

/// HTTP implementation of [`NotificationsApi`].
#[derive(Debug, Clone)]
pub struct HttpNotificationsApi {
    client: Client,
    base: String,
}

impl HttpNotificationsApi {
    /// Create a client for the API rooted at `base` (e.g. `https://host/api/v1`).
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base)
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_client(client: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        HttpNotificationsApi { client, base }
    }

    /// The API base URL without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Send a request and unwrap the response envelope.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Option<T>> {
        let body = send(request).await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;

        if !envelope.success {
            let reason = envelope.failure_message().unwrap_or("success = false");
            return Err(ApiError::Rejected(reason.to_string()));
        }
        Ok(envelope.data)
    }

    /// Send a request whose response carries no data we need.
    async fn acknowledge(&self, request: RequestBuilder) -> ApiResult<()> {
        let body = send(request).await?;
        if body.trim().is_empty() {
            return Ok(());
        }

        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;
        if envelope.success {
            Ok(())
        } else {
            let reason = envelope.failure_message().unwrap_or("success = false");
            Err(ApiError::Rejected(reason.to_string()))
        }
    }
}

/// Send the request, mapping non-2xx statuses to typed errors.
async fn send(request: RequestBuilder) -> ApiResult<String> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
    debug!("api response status {}", status);

    if status.is_success() {
        return Ok(body);
    }

    // Prefer the server's own message from the error envelope
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        .ok()
        .and_then(|r| r.failure_message().map(str::to_string))
        .unwrap_or(body);

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        status => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

impl NotificationsApi for HttpNotificationsApi {
    fn list<'a>(
        &'a self,
        token: &'a str,
        page: u32,
        limit: u32,
    ) -> ApiFuture<'a, NotificationPage> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.url("/notificaciones"))
                .query(&[("page", page), ("limit", limit)])
                .bearer_auth(token);
            self.fetch::<NotificationPage>(request)
                .await?
                .ok_or_else(|| ApiError::ResponseParseFailed("missing data".to_string()))
        })
    }

    fn unread_count<'a>(&'a self, token: &'a str) -> ApiFuture<'a, u64> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.url("/notificaciones/no-leidas/count"))
                .bearer_auth(token);
            self.fetch::<UnreadCount>(request)
                .await?
                .map(|count| count.unread)
                .ok_or_else(|| ApiError::ResponseParseFailed("missing data".to_string()))
        })
    }

    fn mark_read<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url(&format!("/notificaciones/{}/marcar-leida", id)))
                .bearer_auth(token);
            self.acknowledge(request).await
        })
    }

    fn mark_all_read<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url("/notificaciones/marcar-todas-leidas"))
                .bearer_auth(token);
            self.acknowledge(request).await
        })
    }

    fn delete<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let request = self
                .client
                .delete(self.url(&format!("/notificaciones/{}", id)))
                .bearer_auth(token);
            self.acknowledge(request).await
        })
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
