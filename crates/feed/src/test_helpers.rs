// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for feed module tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use andaria_core::{NotificationKind, NotificationPage, NotificationRecord, Payload};
use chrono::{TimeZone, Utc};

use crate::api::{ApiError, ApiFuture, NotificationsApi};
use crate::session::Session;
use crate::store::FeedStore;

/// Create an unread test notification.
pub fn make_record(id: u64) -> NotificationRecord {
    let created =
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(id as i64);
    NotificationRecord::new(
        id,
        NotificationKind::PaymentPending,
        format!("Nuevo pago #{}", id),
        format!("Un turista subió el comprobante {}", id),
        created,
    )
    .with_payload(
        Payload::default()
            .with("pago_id", id)
            .with("paquete_nombre", "Lago Titicaca 2D"),
    )
}

/// Create a test notification that is already read.
pub fn make_read_record(id: u64) -> NotificationRecord {
    let mut record = make_record(id);
    record.mark_read(Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap());
    record
}

/// JSON frame for a pushed notification, as the server sends it.
pub fn record_frame(id: u64) -> String {
    make_record(id).to_json().unwrap()
}

/// A request observed by [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List { page: u32, limit: u32 },
    UnreadCount,
    MarkRead(u64),
    MarkAllRead,
    Delete(u64),
}

#[derive(Default)]
struct MockApiInner {
    pages: VecDeque<(Duration, NotificationPage)>,
    unread: u64,
    fail: bool,
    calls: Vec<ApiCall>,
    tokens: Vec<String>,
}

/// In-memory [`NotificationsApi`] that records every call.
#[derive(Default, Clone)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response to the next `list` call.
    pub fn queue_page(&self, records: Vec<NotificationRecord>, unread: u64) {
        self.queue_page_after(Duration::ZERO, records, unread);
    }

    /// Queue the response to a `list` call, delivered after `delay`.
    pub fn queue_page_after(&self, delay: Duration, records: Vec<NotificationRecord>, unread: u64) {
        self.inner.lock().unwrap().pages.push_back((
            delay,
            NotificationPage {
                notifications: records,
                unread,
                pagination: None,
                skipped: 0,
            },
        ));
    }

    /// Set the server-side unread total.
    pub fn set_unread(&self, unread: u64) {
        self.inner.lock().unwrap().unread = unread;
    }

    /// Make every following call fail.
    pub fn set_failing(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Tokens the calls were made with.
    pub fn tokens(&self) -> Vec<String> {
        self.inner.lock().unwrap().tokens.clone()
    }

    fn record(&self, token: &str, call: ApiCall) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        inner.tokens.push(token.to_string());
        if inner.fail {
            Err(ApiError::Status {
                status: 503,
                message: "servicio no disponible".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl NotificationsApi for MockApi {
    fn list<'a>(
        &'a self,
        token: &'a str,
        page: u32,
        limit: u32,
    ) -> ApiFuture<'a, NotificationPage> {
        Box::pin(async move {
            self.record(token, ApiCall::List { page, limit })?;
            let next = self.inner.lock().unwrap().pages.pop_front();
            let (delay, page) =
                next.ok_or_else(|| ApiError::NotFound("no page queued".to_string()))?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(page)
        })
    }

    fn unread_count<'a>(&'a self, token: &'a str) -> ApiFuture<'a, u64> {
        Box::pin(async move {
            self.record(token, ApiCall::UnreadCount)?;
            Ok(self.inner.lock().unwrap().unread)
        })
    }

    fn mark_read<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()> {
        Box::pin(async move { self.record(token, ApiCall::MarkRead(id)) })
    }

    fn mark_all_read<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move { self.record(token, ApiCall::MarkAllRead) })
    }

    fn delete<'a>(&'a self, token: &'a str, id: u64) -> ApiFuture<'a, ()> {
        Box::pin(async move { self.record(token, ApiCall::Delete(id)) })
    }
}

/// A feed store over a [`MockApi`] with a signed-in session.
pub fn make_store() -> (FeedStore, MockApi, Session) {
    let api = MockApi::new();
    let session = Session::with_token("jwt-test");
    let store = FeedStore::new(Arc::new(api.clone()), Arc::new(session.clone()));
    (store, api, session)
}
