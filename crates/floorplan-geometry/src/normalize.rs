// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric canonicalization
//!
//! In-place fixes applied by the document normalizer to its own copy of a
//! document. Each function returns whether it changed anything and leaves
//! already-canonical input bit-identical.

use crate::camera;
use crate::polygon;
use crate::wall;
use floorplan_model::{Camera, Vertex, Wall};

/// Recompute stale face lines; degenerate walls are left alone
pub fn normalize_wall(wall: &mut Wall, epsilon: f64) -> bool {
    match wall::offsets_match(wall, epsilon) {
        Ok(false) => match wall::offset_lines(wall, epsilon) {
            Ok((left, right)) => {
                wall.left = left;
                wall.right = right;
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

/// Drop closing and duplicate vertices, then reorient clockwise rings
///
/// Rings that would fall below three vertices, and self-intersecting or
/// zero-area rings, are not reoriented.
pub fn normalize_polygon(poly: &mut Vec<Vertex>, epsilon: f64) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut changed = false;

    let ring = polygon::simplified(poly, epsilon);
    if ring.len() >= 3 && ring.len() != poly.len() {
        *poly = ring;
        changed = true;
    }

    let points = polygon::positions(poly);
    let area = polygon::signed_area(&points);
    if area < -epsilon && polygon::self_intersections(&points, epsilon).is_empty() {
        *poly = polygon::reversed(poly);
        changed = true;
    }
    changed
}

/// Replace the sentinel up vector and scale the up vector to unit length
pub fn normalize_camera(cam: &mut Camera, epsilon: f64) -> bool {
    match camera::canonical_up(cam, epsilon) {
        Some(up) if up != cam.up() => {
            cam.set_up(up);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan_model::{Endpoint, OffsetLine, Point};

    #[test]
    fn test_wall_offsets_recomputed_once() {
        let mut w = Wall {
            a: Point::new(0.0, 0.0),
            b: Point::new(0.0, 300.0),
            c: None,
            az: Endpoint { z: 0.0, h: 250.0 },
            bz: Endpoint { z: 0.0, h: 250.0 },
            left: OffsetLine::default(),
            right: OffsetLine::default(),
            openings: Vec::new(),
            decor: None,
            group_marker: None,
            thickness: 20.0,
            balance: 0.5,
        };
        assert!(normalize_wall(&mut w, 1e-6));
        assert_relative_eq!(w.left.a.distance(&w.right.a), 20.0, epsilon = 1e-9);
        let snapshot = w.clone();
        assert!(!normalize_wall(&mut w, 1e-6));
        assert_eq!(w, snapshot);
    }

    #[test]
    fn test_polygon_canonical_form() {
        let mut poly = vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(0.0, 100.0),
            Vertex::new(0.0, 100.0),
            Vertex::new(100.0, 100.0),
            Vertex::new(100.0, 0.0),
            Vertex::new(0.0, 0.0),
        ];
        assert!(normalize_polygon(&mut poly, 1e-6));
        assert_eq!(poly.len(), 4);
        assert!(polygon::signed_area(&polygon::positions(&poly)) > 0.0);

        let snapshot = poly.clone();
        assert!(!normalize_polygon(&mut poly, 1e-6));
        assert_eq!(poly, snapshot);
    }

    #[test]
    fn test_short_polygon_untouched() {
        let mut poly = vec![Vertex::new(0.0, 0.0), Vertex::new(0.0, 0.0), Vertex::new(0.0, 0.0)];
        assert!(!normalize_polygon(&mut poly, 1e-6));
        assert_eq!(poly.len(), 3);
    }
}
