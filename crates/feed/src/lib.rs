// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! andaria-feed - notification feed client for the Andaria tourism platform.
//!
//! # Main Components
//!
//! - [`FeedStore`] - in-memory feed with an unread counter and optimistic
//!   mutations against the remote API
//! - [`ChannelManager`] - live WebSocket channel that pushes new
//!   notifications into the store and reconnects with a linear backoff
//! - [`NotificationsApi`] - the five REST endpoints, with an HTTP
//!   implementation in [`HttpNotificationsApi`]
//! - [`AlertSink`] - permission-gated local alerts
//! - [`Config`] - TOML client configuration
//!
//! ```rust,ignore
//! let session = Session::with_token(token);
//! let api = HttpNotificationsApi::new("https://api.example.com/api/v1");
//! let store = FeedStore::new(Arc::new(api), Arc::new(session.clone()));
//! store.fetch_page(1, 20).await?;
//!
//! let channel = ChannelManager::new(
//!     ChannelConfig::default(),
//!     store.clone(),
//!     Arc::new(session),
//!     Arc::new(NoAlerts),
//! );
//! channel.connect();
//! ```

mod cli;
mod commands;
mod display;

pub mod alert;
pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use alert::{request_alert_permission, AlertPermission, AlertSink, NoAlerts, TerminalAlerts};
pub use api::{ApiError, ApiResult, HttpNotificationsApi, NotificationsApi};
pub use channel::{ChannelConfig, ChannelEvent, ChannelManager, ChannelStatus};
pub use cli::{Cli, Command, OutputFormat};
pub use commands::{execute, run, Context};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Session, SessionSource};
pub use store::{FeedState, FeedStore};
pub use transport::{Transport, TransportError, WebSocketTransport};
