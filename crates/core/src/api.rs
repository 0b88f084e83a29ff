// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON envelopes returned by the platform REST API.
//!
//! Every response is wrapped as `{ success, data, message, error, timestamp }`.
//! Only the notification endpoints are modelled here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notification::NotificationRecord;

/// Standard response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    // A missing `data` already decodes as `None`; `default` here would
    // require `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// Error details attached to a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` in a successful response.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Builds a failed response with an error code and message.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(ApiErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Best available description of why the request failed.
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|e| e.message.as_str())
            .or(self.message.as_deref())
    }
}

/// One page of notifications plus the server's unread total.
///
/// Records are decoded one at a time. A record that fails to decode is
/// dropped and counted in `skipped`; the rest of the page is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePage")]
pub struct NotificationPage {
    #[serde(rename = "notificaciones")]
    pub notifications: Vec<NotificationRecord>,
    /// Unread notifications held by the server, across all pages.
    #[serde(rename = "no_leidas")]
    pub unread: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Records in the response that could not be decoded.
    #[serde(skip)]
    pub skipped: usize,
}

#[derive(Deserialize)]
struct WirePage {
    #[serde(default)]
    notificaciones: Vec<Value>,
    no_leidas: u64,
    #[serde(default)]
    pagination: Option<Pagination>,
}

impl From<WirePage> for NotificationPage {
    fn from(wire: WirePage) -> Self {
        let total = wire.notificaciones.len();
        let notifications: Vec<NotificationRecord> = wire
            .notificaciones
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        NotificationPage {
            skipped: total - notifications.len(),
            notifications,
            unread: wire.no_leidas,
            pagination: wire.pagination,
        }
    }
}

/// Pagination metadata for a page of notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Response body of the unread-count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(rename = "no_leidas")]
    pub unread: u64,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
