// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for document validation
//!
//! Recoverable problems (dangling references, geometry violations) are
//! reported as findings, never as errors. An [`Error`] aborts a whole run.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors of a validation run
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog could not answer a lookup
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    /// Input is not JSON, or a structurally valid document failed to decode
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pipeline stage was invoked out of order
    #[error("Invalid pipeline state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Create an invalid state error
    pub fn invalid_state(expected: &'static str, found: &'static str) -> Self {
        Error::InvalidState { expected, found }
    }
}

/// Failure reported by a catalog implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The service could not be reached
    #[error("catalog service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with an error
    #[error("catalog lookup failed for {kind} '{id}': {message}")]
    Lookup {
        kind: &'static str,
        id: String,
        message: String,
    },
}

impl CatalogError {
    /// Create an unreachable error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        CatalogError::Unreachable(msg.into())
    }

    /// Create a lookup error
    pub fn lookup(kind: &'static str, id: impl Into<String>, msg: impl Into<String>) -> Self {
        CatalogError::Lookup {
            kind,
            id: id.into(),
            message: msg.into(),
        }
    }
}
