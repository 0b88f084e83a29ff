// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local desktop-style alerts for pushed notifications.
//!
//! Alerts are permission-gated. The channel only reads the current
//! permission; asking for it is an explicit user action
//! ([`request_alert_permission`]).

use std::fmt;
use std::io::IsTerminal;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

/// Permission state of the platform alert surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPermission {
    /// The user has not been asked yet.
    Default,
    /// Alerts may be shown.
    Granted,
    /// The user refused alerts.
    Denied,
}

impl AlertPermission {
    /// Returns the string representation used in logs and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPermission::Default => "default",
            AlertPermission::Granted => "granted",
            AlertPermission::Denied => "denied",
        }
    }
}

impl fmt::Display for AlertPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A surface that can show local alerts.
pub trait AlertSink: Send + Sync {
    /// Current permission, or `None` if the platform has no alert surface.
    fn permission(&self) -> Option<AlertPermission>;

    /// Ask the user for permission and return the outcome.
    fn request_permission(&self) -> AlertPermission {
        self.permission().unwrap_or(AlertPermission::Denied)
    }

    /// Show an alert. Only called when permission is granted.
    fn show(&self, title: &str, body: &str);
}

/// Show an alert if, and only if, permission was already granted.
///
/// Returns true if the alert was shown.
pub fn alert_if_permitted(alerts: &dyn AlertSink, title: &str, body: &str) -> bool {
    match alerts.permission() {
        Some(AlertPermission::Granted) => {
            alerts.show(title, body);
            true
        }
        other => {
            debug!("alert suppressed (permission: {:?})", other);
            false
        }
    }
}

/// Ask for alert permission if the user has not decided yet.
///
/// Returns the permission after the call, or `None` without an alert surface.
pub fn request_alert_permission(alerts: &dyn AlertSink) -> Option<AlertPermission> {
    match alerts.permission()? {
        AlertPermission::Default => {
            let permission = alerts.request_permission();
            info!("alert permission: {}", permission);
            Some(permission)
        }
        decided => Some(decided),
    }
}

/// Platform without an alert surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlerts;

impl AlertSink for NoAlerts {
    fn permission(&self) -> Option<AlertPermission> {
        None
    }

    fn show(&self, _title: &str, _body: &str) {}
}

/// Alerts printed to stderr with a terminal bell.
///
/// Starts undecided. Asking for permission grants it when stderr is a
/// terminal, since there is no one to see the alert otherwise.
#[derive(Debug)]
pub struct TerminalAlerts {
    permission: Mutex<AlertPermission>,
}

impl TerminalAlerts {
    pub fn new() -> Self {
        TerminalAlerts {
            permission: Mutex::new(AlertPermission::Default),
        }
    }
}

impl Default for TerminalAlerts {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for TerminalAlerts {
    fn permission(&self) -> Option<AlertPermission> {
        Some(*self.permission.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn request_permission(&self) -> AlertPermission {
        let decided = if std::io::stderr().is_terminal() {
            AlertPermission::Granted
        } else {
            AlertPermission::Denied
        };
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = decided;
        decided
    }

    fn show(&self, title: &str, body: &str) {
        eprintln!("\x07[alert] {}: {}", title, body);
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
pub(crate) mod tests;
