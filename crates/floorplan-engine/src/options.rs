// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation options

use floorplan_geometry::GeometryOptions;
use serde::{Deserialize, Serialize};

/// Options of a validation run
///
/// Deserializes from a partial JSON object; missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Coordinate tolerance in cm
    pub epsilon: f64,
    /// Minimum camera up/direction angle in degrees
    pub parallel_tolerance_deg: f64,
    /// Wall endpoint gap threshold in cm (0 disables gap detection)
    pub endpoint_snap: f64,
    /// Maximum number of catalog lookups in flight
    pub max_concurrent_lookups: usize,
    /// Treat any error finding as a failed validation
    pub strict: bool,
    /// Write registry defaults for absent fields into the normalized document
    pub fill_defaults: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            parallel_tolerance_deg: 1e-3,
            endpoint_snap: 1.0,
            max_concurrent_lookups: 16,
            strict: false,
            fill_defaults: false,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-error policy with tight tolerances
    pub fn strict() -> Self {
        Self::from_geometry(GeometryOptions::strict()).with_strict(true)
    }

    /// Loose tolerances, no gap detection
    pub fn lenient() -> Self {
        Self::from_geometry(GeometryOptions::lenient())
    }

    fn from_geometry(geometry: GeometryOptions) -> Self {
        Self {
            epsilon: geometry.epsilon,
            parallel_tolerance_deg: geometry.parallel_tolerance_deg,
            endpoint_snap: geometry.endpoint_snap,
            ..Self::default()
        }
    }

    /// Set coordinate tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set camera parallel tolerance
    pub fn with_parallel_tolerance(mut self, degrees: f64) -> Self {
        self.parallel_tolerance_deg = degrees;
        self
    }

    /// Set wall endpoint snap distance
    pub fn with_endpoint_snap(mut self, snap: f64) -> Self {
        self.endpoint_snap = snap;
        self
    }

    /// Set catalog fan-out
    pub fn with_max_concurrent_lookups(mut self, max: usize) -> Self {
        self.max_concurrent_lookups = max;
        self
    }

    /// Enable or disable the zero-error policy
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Materialize defaults in the normalized document
    pub fn with_fill_defaults(mut self, fill: bool) -> Self {
        self.fill_defaults = fill;
        self
    }

    /// Tolerances for the geometry validator
    pub fn geometry(&self) -> GeometryOptions {
        GeometryOptions {
            epsilon: self.epsilon,
            parallel_tolerance_deg: self.parallel_tolerance_deg,
            endpoint_snap: self.endpoint_snap,
        }
    }

    /// Effective fan-out, at least one
    pub fn lookup_concurrency(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }
}
