// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! andaria-core: Shared data model for the Andaria notification feed.
//!
//! This crate provides the notification record, its payload, and the JSON
//! envelopes returned by the remote API. It has no network or runtime
//! dependencies so it can be shared by any client of the platform.

pub mod api;
pub mod error;
pub mod notification;

pub use api::{ApiErrorBody, ApiResponse, NotificationPage, Pagination, UnreadCount};
pub use error::{Error, Result};
pub use notification::{NotificationKind, NotificationRecord, Payload};
