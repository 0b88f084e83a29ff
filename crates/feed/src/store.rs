// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification feed store.
//!
//! Holds what the user sees: the loaded notifications (newest first), the
//! unread counter, and the loading/error flags of the last page fetch.
//!
//! Mutations that have a server counterpart are optimistic: local state
//! changes first, then the request is sent. A failed request is logged and
//! returned to the caller but never rolled back.
//!
//! All state lives behind one mutex that is only held in synchronous blocks,
//! so every mutation is observed whole.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use andaria_core::NotificationRecord;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::{ApiError, ApiResult, NotificationsApi};
use crate::session::SessionSource;

/// Maximum notifications kept in memory after a push.
pub const MAX_RECORDS: usize = 50;

/// Number of notifications returned by [`FeedState::recent`].
pub const RECENT_COUNT: usize = 5;

/// Snapshot of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    records: Vec<NotificationRecord>,
    unread_count: u64,
    loading: bool,
    error: Option<String>,
}

impl FeedState {
    /// Loaded notifications, newest first.
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    /// Unread notifications as last reported by the server or tracked locally.
    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// True while a page fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed page fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loaded notifications that are still unread.
    pub fn unread(&self) -> Vec<&NotificationRecord> {
        self.records.iter().filter(|r| !r.is_read()).collect()
    }

    /// The newest few notifications.
    pub fn recent(&self) -> &[NotificationRecord] {
        &self.records[..self.records.len().min(RECENT_COUNT)]
    }

    /// Find a loaded notification by id.
    pub fn get(&self, id: u64) -> Option<&NotificationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Prepend a pushed notification and trim to [`MAX_RECORDS`].
    pub(crate) fn push(&mut self, record: NotificationRecord) {
        if !record.is_read() {
            self.unread_count += 1;
        }
        self.records.insert(0, record);
        self.records.truncate(MAX_RECORDS);
    }

    /// Mark one notification read. Returns true if it changed.
    pub(crate) fn mark_read(&mut self, id: u64, at: DateTime<Utc>) -> bool {
        let changed = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .is_some_and(|r| r.mark_read(at));
        if changed {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        changed
    }

    /// Mark every loaded notification read and zero the counter.
    ///
    /// Returns how many loaded notifications changed.
    pub(crate) fn mark_all_read(&mut self, at: DateTime<Utc>) -> usize {
        let changed = self
            .records
            .iter_mut()
            .map(|r| r.mark_read(at))
            .filter(|changed| *changed)
            .count();
        self.unread_count = 0;
        changed
    }

    /// Remove a notification. Returns it if it was loaded.
    pub(crate) fn remove(&mut self, id: u64) -> Option<NotificationRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        if !record.is_read() {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        Some(record)
    }
}

/// Shared handle to the feed.
///
/// Clones share the same state, API client and session.
#[derive(Clone)]
pub struct FeedStore {
    state: Arc<Mutex<FeedState>>,
    api: Arc<dyn NotificationsApi>,
    session: Arc<dyn SessionSource>,
}

impl FeedStore {
    /// Create an empty feed backed by `api`, authenticated through `session`.
    pub fn new(api: Arc<dyn NotificationsApi>, session: Arc<dyn SessionSource>) -> Self {
        FeedStore {
            state: Arc::new(Mutex::new(FeedState::default())),
            api,
            session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn credential(&self) -> ApiResult<String> {
        self.session
            .current_credential()
            .ok_or(ApiError::MissingCredential)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> FeedState {
        self.lock().clone()
    }

    /// Loaded notifications, newest first.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.lock().records.clone()
    }

    /// Current unread counter.
    pub fn unread_count(&self) -> u64 {
        self.lock().unread_count
    }

    /// Replace the feed with one page from the server.
    ///
    /// On failure the error is recorded in the state and the previous records
    /// and counter are kept. Overlapping calls are not fenced: whichever
    /// response arrives last wins.
    pub async fn fetch_page(&self, page: u32, limit: u32) -> ApiResult<()> {
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let result = match self.credential() {
            Ok(token) => self.api.list(&token, page, limit).await,
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(fetched) => {
                debug!(
                    "loaded page {} ({} notifications, {} unread on server)",
                    page,
                    fetched.notifications.len(),
                    fetched.unread
                );
                if fetched.skipped > 0 {
                    warn!("skipped {} undecodable notifications", fetched.skipped);
                }
                state.records = fetched.notifications;
                state.unread_count = fetched.unread;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load notifications: {}", e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Refresh the unread counter from the server.
    ///
    /// Failures are logged and leave the counter and error flag alone.
    pub async fn refresh_unread_count(&self) -> ApiResult<()> {
        let token = self.credential()?;
        match self.api.unread_count(&token).await {
            Ok(unread) => {
                self.lock().unread_count = unread;
                Ok(())
            }
            Err(e) => {
                warn!("failed to refresh unread count: {}", e);
                Err(e)
            }
        }
    }

    /// Mark a notification read, locally first, then on the server.
    pub async fn mark_read(&self, id: u64) -> ApiResult<()> {
        let changed = self.lock().mark_read(id, Utc::now());
        debug!("mark_read {} (local change: {})", id, changed);

        let result = match self.credential() {
            Ok(token) => self.api.mark_read(&token, id).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            warn!("failed to mark notification {} read: {}", id, e);
        }
        result
    }

    /// Mark everything read, locally first, then on the server.
    ///
    /// The counter drops to zero even if the server holds unread
    /// notifications that were never loaded.
    pub async fn mark_all_read(&self) -> ApiResult<()> {
        let changed = self.lock().mark_all_read(Utc::now());
        debug!("mark_all_read ({} local changes)", changed);

        let result = match self.credential() {
            Ok(token) => self.api.mark_all_read(&token).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            warn!("failed to mark all notifications read: {}", e);
        }
        result
    }

    /// Delete a notification, locally first, then on the server.
    pub async fn remove(&self, id: u64) -> ApiResult<()> {
        let removed = self.lock().remove(id);
        debug!("remove {} (was loaded: {})", id, removed.is_some());

        let result = match self.credential() {
            Ok(token) => self.api.delete(&token, id).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            warn!("failed to delete notification {}: {}", id, e);
        }
        result
    }

    /// Add a notification pushed by the live channel.
    pub fn receive_pushed(&self, record: NotificationRecord) {
        self.lock().push(record);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
