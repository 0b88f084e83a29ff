// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session holder for the bearer credential.
//!
//! The feed store and channel only read the session through
//! [`SessionSource`]; login and logout belong to whoever owns the session.

use std::sync::{Arc, RwLock};

/// Read access to the current authentication session.
pub trait SessionSource: Send + Sync {
    /// The bearer token for API and channel requests, if signed in.
    fn current_credential(&self) -> Option<String>;

    /// Returns true while the user is signed in.
    fn is_session_active(&self) -> bool;
}

/// In-memory session shared between the store, the channel and the caller.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Create a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that is already signed in with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.login(token);
        session
    }

    /// Store a new credential.
    pub fn login(&self, token: impl Into<String>) {
        let token = token.into();
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
    }

    /// Drop the credential.
    pub fn logout(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl SessionSource for Session {
    fn current_credential(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn is_session_active(&self) -> bool {
        self.current_credential().is_some()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
