// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live notification channel.
//!
//! The [`ChannelManager`] keeps at most one WebSocket open to the backend and
//! feeds every pushed notification into the [`FeedStore`]. Each `connect()`
//! spawns one background task that owns the transport and the only reconnect
//! timer, so the caller never blocks on the network.
//!
//! After an unexpected close or a failed connect the task retries with a
//! linear backoff (`base_delay * attempt`) until `max_reconnect_attempts`
//! retries have failed, then gives up until the next explicit `connect()`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use andaria_core::NotificationRecord;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::alert::{alert_if_permitted, AlertSink};
use crate::session::SessionSource;
use crate::store::FeedStore;
use crate::transport::{Transport, TransportError, TransportResult, WebSocketTransport};

/// Path of the notification channel on the backend.
pub const CHANNEL_PATH: &str = "/api/v1/ws";

/// Capacity of the lifecycle event stream.
const EVENT_CAPACITY: usize = 64;

/// Configuration for the channel manager.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Base WebSocket URL of the backend (`ws://` or `wss://`).
    pub ws_base: String,
    /// Retries after a failure before giving up.
    pub max_reconnect_attempts: u32,
    /// Delay unit of the linear backoff.
    pub base_delay: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            ws_base: "ws://localhost:5750".to_string(),
            max_reconnect_attempts: 5,
            base_delay: Duration::from_millis(3000),
        }
    }
}

/// Connection state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// No connection. A reconnect may still be pending.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// The channel is open and delivering notifications.
    Open,
}

impl ChannelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelStatus::Idle => "idle",
            ChannelStatus::Connecting => "connecting",
            ChannelStatus::Open => "open",
        }
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle events published by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A connect attempt started.
    Connecting,
    /// The connection is open.
    Opened,
    /// An open connection was closed or broke.
    Closed,
    /// A reconnect will be attempted after `delay`.
    ReconnectScheduled { attempt: u32, delay: Duration },
    /// Every retry failed. Nothing more happens until `connect()`.
    GaveUp { attempts: u32 },
    /// The session ended, so the channel stopped.
    SessionEnded,
    /// A pushed notification was added to the feed.
    Delivered { id: u64 },
    /// A frame could not be decoded and was dropped.
    Malformed,
    /// `disconnect()` was called.
    Disconnected,
}

struct ChannelInner {
    status: ChannelStatus,
    reconnect_attempts: u32,
    reconnect_pending: bool,
    gave_up: bool,
    /// Cancellation token of the running task, if any.
    run: Option<CancellationToken>,
}

type TransportFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

struct Shared<T> {
    config: ChannelConfig,
    store: FeedStore,
    session: Arc<dyn SessionSource>,
    alerts: Arc<dyn AlertSink>,
    new_transport: TransportFactory<T>,
    inner: Mutex<ChannelInner>,
    events: broadcast::Sender<ChannelEvent>,
}

/// Handle to the live notification channel.
///
/// Clones control the same channel.
pub struct ChannelManager<T: Transport + 'static = WebSocketTransport> {
    shared: Arc<Shared<T>>,
}

impl<T: Transport + 'static> Clone for ChannelManager<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl ChannelManager {
    /// Create a channel over real WebSockets.
    pub fn new(
        config: ChannelConfig,
        store: FeedStore,
        session: Arc<dyn SessionSource>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self::with_transport(config, store, session, alerts, WebSocketTransport::new)
    }
}

impl<T: Transport + 'static> ChannelManager<T> {
    /// Create a channel whose connections come from `new_transport`.
    ///
    /// A fresh transport is created for every connect attempt.
    pub fn with_transport<F>(
        config: ChannelConfig,
        store: FeedStore,
        session: Arc<dyn SessionSource>,
        alerts: Arc<dyn AlertSink>,
        new_transport: F,
    ) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Shared {
            config,
            store,
            session,
            alerts,
            new_transport: Arc::new(new_transport),
            inner: Mutex::new(ChannelInner {
                status: ChannelStatus::Idle,
                reconnect_attempts: 0,
                reconnect_pending: false,
                gave_up: false,
                run: None,
            }),
            events,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Open the channel if it is not already running.
    ///
    /// No-op while connecting, open, or waiting to reconnect, and when the
    /// session holds no credential. Must be called inside a tokio runtime.
    pub fn connect(&self) {
        if self.shared.session.current_credential().is_none() {
            warn!("not connecting notification channel: no credential");
            return;
        }
        let base = match channel_base(&self.shared.config.ws_base) {
            Ok(base) => base,
            Err(e) => {
                error!("not connecting notification channel: {}", e);
                return;
            }
        };

        let cancel = {
            let mut inner = self.shared.lock();
            if inner.run.is_some() {
                debug!("notification channel already {}", inner.status);
                return;
            }
            let cancel = CancellationToken::new();
            inner.run = Some(cancel.clone());
            inner.status = ChannelStatus::Connecting;
            inner.gave_up = false;
            cancel
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            run_channel(shared, base, cancel).await;
        });
    }

    /// Close the channel and cancel any pending reconnect.
    pub fn disconnect(&self) {
        let mut inner = self.shared.lock();
        if let Some(cancel) = inner.run.take() {
            cancel.cancel();
        }
        inner.status = ChannelStatus::Idle;
        inner.reconnect_attempts = 0;
        inner.reconnect_pending = false;
        info!("notification channel disconnected");
        self.shared.emit(ChannelEvent::Disconnected);
    }

    /// True while the channel is open.
    pub fn is_connected(&self) -> bool {
        self.status() == ChannelStatus::Open
    }

    pub fn status(&self) -> ChannelStatus {
        self.shared.lock().status
    }

    /// Retries spent since the channel was last open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.lock().reconnect_attempts
    }

    /// True while waiting out a backoff delay.
    pub fn reconnect_pending(&self) -> bool {
        self.shared.lock().reconnect_pending
    }

    /// True if the last run ended by exhausting its retries.
    pub fn has_given_up(&self) -> bool {
        self.shared.lock().gave_up
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.shared.events.subscribe()
    }
}

/// What the task should do after a connection ended.
enum Next {
    Retry(Duration),
    Stop,
}

impl<T: Transport + 'static> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, ChannelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChannelEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn session_active(&self) -> bool {
        self.session.current_credential().is_some() && self.session.is_session_active()
    }

    /// Apply `f` unless the run was cancelled. Returns false if cancelled.
    fn update(&self, cancel: &CancellationToken, f: impl FnOnce(&mut ChannelInner)) -> bool {
        let mut inner = self.lock();
        if cancel.is_cancelled() {
            return false;
        }
        f(&mut inner);
        true
    }

    /// End the run without a retry.
    fn stop(&self, cancel: &CancellationToken, event: ChannelEvent) {
        let mut inner = self.lock();
        if cancel.is_cancelled() {
            return;
        }
        inner.status = ChannelStatus::Idle;
        inner.reconnect_attempts = 0;
        inner.reconnect_pending = false;
        inner.run = None;
        self.emit(event);
    }

    /// Decide whether to retry after a connection ended.
    fn next_step(&self, cancel: &CancellationToken) -> Next {
        if !self.session_active() {
            info!("session ended, notification channel stopped");
            self.stop(cancel, ChannelEvent::SessionEnded);
            return Next::Stop;
        }

        let mut inner = self.lock();
        if cancel.is_cancelled() {
            return Next::Stop;
        }
        inner.status = ChannelStatus::Idle;

        if inner.reconnect_attempts >= self.config.max_reconnect_attempts {
            let attempts = inner.reconnect_attempts;
            error!(
                "notification channel gave up after {} reconnect attempts",
                attempts
            );
            inner.reconnect_attempts = 0;
            inner.reconnect_pending = false;
            inner.gave_up = true;
            inner.run = None;
            self.emit(ChannelEvent::GaveUp { attempts });
            return Next::Stop;
        }

        inner.reconnect_attempts += 1;
        inner.reconnect_pending = true;
        let attempt = inner.reconnect_attempts;
        let delay = self.config.base_delay.saturating_mul(attempt);
        info!(
            "reconnecting notification channel in {:?} (attempt {}/{})",
            delay, attempt, self.config.max_reconnect_attempts
        );
        self.emit(ChannelEvent::ReconnectScheduled { attempt, delay });
        Next::Retry(delay)
    }

    /// Decode one text frame and hand it to the feed.
    fn deliver(&self, text: &str, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }
        match NotificationRecord::from_json(text) {
            Ok(record) => {
                let id = record.id;
                let (title, body) = (record.title.clone(), record.body.clone());
                debug!("pushed notification {} ({})", id, record.kind);
                self.store.receive_pushed(record);
                alert_if_permitted(self.alerts.as_ref(), &title, &body);
                self.emit(ChannelEvent::Delivered { id });
            }
            Err(e) => {
                warn!("dropping malformed notification frame: {}", e);
                self.emit(ChannelEvent::Malformed);
            }
        }
    }

    /// Read frames until the connection ends. Returns false if cancelled.
    async fn pump(&self, transport: &mut T, cancel: &CancellationToken) -> bool {
        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => return false,
                frame = transport.recv() => frame,
            };
            match frame {
                Ok(Some(text)) => self.deliver(&text, cancel),
                Ok(None) => {
                    info!("notification channel closed by server");
                    return true;
                }
                Err(e) => {
                    warn!("notification channel broke: {}", e);
                    return true;
                }
            }
        }
    }
}

/// Parse and check the WebSocket base URL.
fn channel_base(ws_base: &str) -> TransportResult<Url> {
    let url = Url::parse(ws_base)
        .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", ws_base, e)))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(TransportError::InvalidUrl(format!(
            "{}: expected ws:// or wss://",
            ws_base
        )));
    }
    Ok(url)
}

fn with_credential(base: &Url, credential: &str) -> Url {
    let mut url = base.clone();
    let path = format!("{}{}", base.path().trim_end_matches('/'), CHANNEL_PATH);
    url.set_path(&path);
    url.query_pairs_mut().clear().append_pair("token", credential);
    url
}

/// Build the channel URL: `{ws_base}/api/v1/ws?token={credential}`.
pub fn channel_url(ws_base: &str, credential: &str) -> TransportResult<Url> {
    Ok(with_credential(&channel_base(ws_base)?, credential))
}

/// Background task: connect, pump frames, retry with linear backoff.
async fn run_channel<T: Transport + 'static>(
    shared: Arc<Shared<T>>,
    base: Url,
    cancel: CancellationToken,
) {
    loop {
        let credential = match shared.session.current_credential() {
            Some(credential) if shared.session.is_session_active() => credential,
            _ => {
                info!("session ended, notification channel stopped");
                shared.stop(&cancel, ChannelEvent::SessionEnded);
                return;
            }
        };

        // Rebuilt every attempt so a refreshed credential is picked up
        let url = with_credential(&base, &credential);

        let started = shared.update(&cancel, |inner| {
            inner.status = ChannelStatus::Connecting;
            inner.reconnect_pending = false;
        });
        if !started {
            return;
        }
        shared.emit(ChannelEvent::Connecting);

        let mut transport = (shared.new_transport)();
        let connected = tokio::select! {
            _ = cancel.cancelled() => return,
            result = transport.connect(url.as_str()) => result,
        };

        match connected {
            Ok(()) => {
                let opened = shared.update(&cancel, |inner| {
                    inner.status = ChannelStatus::Open;
                    inner.reconnect_attempts = 0;
                });
                if !opened {
                    let _ = transport.disconnect().await;
                    return;
                }
                info!("notification channel open");
                shared.emit(ChannelEvent::Opened);

                let ended = shared.pump(&mut transport, &cancel).await;
                let _ = transport.disconnect().await;
                if !ended {
                    return;
                }
                if !shared.update(&cancel, |inner| inner.status = ChannelStatus::Idle) {
                    return;
                }
                shared.emit(ChannelEvent::Closed);
            }
            Err(e) => {
                warn!("notification channel connect failed: {}", e);
            }
        }

        match shared.next_step(&cancel) {
            Next::Stop => return,
            Next::Retry(delay) => {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
