// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera direction and up vector checks

use crate::{Error, Result};
use floorplan_model::Camera;
use nalgebra::Vector3;

/// Up vector written by the editor for "not set yet"; replaced by `+Z` on load
pub const SENTINEL_UP: [f64; 3] = [0.0, 0.0, -1.0];

/// Default up vector
pub const DEFAULT_UP: [f64; 3] = [0.0, 0.0, 1.0];

pub fn direction(camera: &Camera) -> Vector3<f64> {
    Vector3::from(camera.direction())
}

pub fn up(camera: &Camera) -> Vector3<f64> {
    Vector3::from(camera.up())
}

/// Whether the up vector is the editor sentinel
pub fn is_sentinel_up(camera: &Camera) -> bool {
    camera.up() == SENTINEL_UP
}

/// Angle between two vectors in degrees
///
/// Computed with `atan2(|u × v|, u · v)`, which stays accurate close to
/// 0° and 180° where `acos` loses precision.
pub fn angle_deg(u: &Vector3<f64>, v: &Vector3<f64>, epsilon: f64) -> Result<f64> {
    if u.norm() <= epsilon {
        return Err(Error::ZeroVector("first vector"));
    }
    if v.norm() <= epsilon {
        return Err(Error::ZeroVector("second vector"));
    }
    Ok(u.cross(v).norm().atan2(u.dot(v)).to_degrees())
}

/// Whether two vectors are within `tolerance_deg` of parallel or anti-parallel
pub fn is_parallel(u: &Vector3<f64>, v: &Vector3<f64>, tolerance_deg: f64, epsilon: f64) -> Result<bool> {
    let angle = angle_deg(u, v, epsilon)?;
    Ok(angle < tolerance_deg || angle > 180.0 - tolerance_deg)
}

/// Whether the up vector has unit length within `epsilon`
pub fn is_unit(v: &Vector3<f64>, epsilon: f64) -> bool {
    (v.norm() - 1.0).abs() <= epsilon
}

/// Canonical up vector of a camera
///
/// The sentinel becomes [`DEFAULT_UP`]; other non-zero vectors are scaled
/// to unit length. A zero vector has no canonical form.
pub fn canonical_up(camera: &Camera, epsilon: f64) -> Option<[f64; 3]> {
    if is_sentinel_up(camera) {
        return Some(DEFAULT_UP);
    }
    let up = up(camera);
    let norm = up.norm();
    if norm <= epsilon {
        return None;
    }
    if is_unit(&up, epsilon) {
        return Some(camera.up());
    }
    let unit = up / norm;
    Some([unit.x, unit.y, unit.z])
}
