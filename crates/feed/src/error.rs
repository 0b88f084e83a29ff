// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::api::ApiError;
use crate::transport::TransportError;

/// Errors surfaced by the `andaria-feed` commands.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not signed in\n  hint: pass --token, set ANDARIA_TOKEN, or add `token` to the config file")]
    MissingToken,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for `andaria-feed` commands.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
