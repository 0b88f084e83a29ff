// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for andaria-core operations.

use thiserror::Error;

/// All possible errors that can occur when handling notification data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid notification kind: '{0}'\n  hint: valid kinds are: nuevo_pago_pendiente, pago_confirmado, pago_rechazado, compra_expirada")]
    InvalidKind(String),

    #[error("invalid notification {id}: {reason}")]
    InvalidRecord { id: u64, reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for andaria-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
