// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry computations

use thiserror::Error;

/// Geometry result type
pub type Result<T> = std::result::Result<T, Error>;

/// Geometry computation errors
///
/// These never leave the crate as failures of a validation run: rules turn
/// them into findings on the entity that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Segment or polygon without extent
    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    /// Polygon with too few vertices
    #[error("Polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// Zero-length vector where a direction is required
    #[error("Zero vector: {0}")]
    ZeroVector(&'static str),

    /// Coordinate that is NaN or infinite
    #[error("Non-finite coordinate at index {index}: {message}")]
    NonFinite { index: usize, message: String },
}

impl Error {
    /// Create a degenerate geometry error
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::Degenerate(msg.into())
    }

    /// Create a non-finite coordinate error
    pub fn non_finite(index: usize, msg: impl Into<String>) -> Self {
        Error::NonFinite {
            index,
            message: msg.into(),
        }
    }
}
