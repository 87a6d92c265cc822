// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Geometric tolerances
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryOptions {
    /// Coordinate tolerance in cm
    pub epsilon: f64,
    /// Minimum angle in degrees between a camera up vector and its direction
    pub parallel_tolerance_deg: f64,
    /// Wall endpoints closer than this (but not coincident) are reported as gaps, in cm
    pub endpoint_snap: f64,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            parallel_tolerance_deg: 1e-3,
            endpoint_snap: 1.0,
        }
    }
}

impl GeometryOptions {
    /// Tight tolerances, wider gap detection
    pub fn strict() -> Self {
        Self {
            epsilon: 1e-9,
            parallel_tolerance_deg: 1e-2,
            endpoint_snap: 5.0,
        }
    }

    /// Loose tolerances for hand-edited documents, no gap detection
    pub fn lenient() -> Self {
        Self {
            epsilon: 1e-3,
            parallel_tolerance_deg: 1e-3,
            endpoint_snap: 0.0,
        }
    }
}
