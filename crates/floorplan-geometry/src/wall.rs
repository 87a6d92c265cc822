// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall frame math: offset lines, opening spans and endpoint continuity
//!
//! A wall is the centerline segment `a → b` with unit direction `d`. Its face
//! lines are the centerline shifted along the two normals:
//!
//! ```text
//! left  = centerline + thickness * balance       * ( d.y, -d.x)
//! right = centerline + thickness * (1 - balance) * (-d.y,  d.x)
//! ```
//!
//! so the distance between the face lines is always `thickness`.

use crate::{Error, Result};
use floorplan_model::{OffsetLine, Point, Wall};
use nalgebra::{Point2, Vector2};

/// Local frame of a wall centerline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallFrame {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    /// Unit direction from `a` to `b`
    pub direction: Vector2<f64>,
    pub length: f64,
}

impl WallFrame {
    /// Build the frame of segment `a → b`
    pub fn new(a: &Point, b: &Point, epsilon: f64) -> Result<Self> {
        let a = to_point2(a);
        let b = to_point2(b);
        if !a.coords.iter().chain(b.coords.iter()).all(|c| c.is_finite()) {
            return Err(Error::non_finite(0, "wall endpoint"));
        }
        let delta = b - a;
        let length = delta.norm();
        if length <= epsilon {
            return Err(Error::degenerate(format!(
                "wall endpoints coincide at ({}, {})",
                a.x, a.y
            )));
        }
        Ok(Self {
            a,
            b,
            direction: delta / length,
            length,
        })
    }

    /// Frame of a wall's centerline
    pub fn of(wall: &Wall, epsilon: f64) -> Result<Self> {
        Self::new(&wall.a, &wall.b, epsilon)
    }

    /// Unit normal towards the left face
    pub fn left_normal(&self) -> Vector2<f64> {
        Vector2::new(self.direction.y, -self.direction.x)
    }

    /// Unit normal towards the right face
    pub fn right_normal(&self) -> Vector2<f64> {
        -self.left_normal()
    }

    /// Face lines for the given thickness and balance
    pub fn offsets(&self, thickness: f64, balance: f64) -> (OffsetLine, OffsetLine) {
        let left = self.left_normal() * (thickness * balance);
        let right = self.right_normal() * (thickness * (1.0 - balance));
        (
            OffsetLine::new(to_point(&(self.a + left)), to_point(&(self.b + left))),
            OffsetLine::new(to_point(&(self.a + right)), to_point(&(self.b + right))),
        )
    }

    /// Point on the centerline at parameter `t`
    pub fn at(&self, t: f64) -> Point2<f64> {
        self.a + self.direction * (self.length * t)
    }
}

/// Recompute both face lines of a wall
pub fn offset_lines(wall: &Wall, epsilon: f64) -> Result<(OffsetLine, OffsetLine)> {
    Ok(WallFrame::of(wall, epsilon)?.offsets(wall.thickness, wall.balance))
}

/// Largest coordinate deviation between the stored and recomputed face lines
pub fn offset_deviation(wall: &Wall, epsilon: f64) -> Result<f64> {
    let (left, right) = offset_lines(wall, epsilon)?;
    let pairs = [
        (&wall.left.a, &left.a),
        (&wall.left.b, &left.b),
        (&wall.right.a, &right.a),
        (&wall.right.b, &right.b),
    ];
    Ok(pairs
        .iter()
        .map(|(stored, expected)| stored.distance(expected))
        .fold(0.0, f64::max))
}

/// Whether the stored face lines match the recomputed ones within `epsilon`
pub fn offsets_match(wall: &Wall, epsilon: f64) -> Result<bool> {
    offset_deviation(wall, epsilon).map(|deviation| deviation <= epsilon)
}

/// Whether two parameter spans overlap by more than `epsilon` (touching is allowed)
pub fn spans_overlap(a: (f64, f64), b: (f64, f64), epsilon: f64) -> bool {
    a.0 < b.1 - epsilon && b.0 < a.1 - epsilon
}

/// Whether a parameter span lies inside `[0, 1]`
pub fn span_within_wall(span: (f64, f64), epsilon: f64) -> bool {
    span.0 >= -epsilon && span.1 <= 1.0 + epsilon
}

/// A near-miss between endpoints of two different walls
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndpointGap {
    /// Wall index and endpoint (`false` = `a`, `true` = `b`)
    pub first: (usize, bool),
    pub second: (usize, bool),
    pub distance: f64,
}

/// Find endpoints of different walls that are closer than `snap` but further apart than `epsilon`
///
/// Endpoints are sorted by x and swept, so only candidates within `snap`
/// along x are compared. Pairs are reported once, in wall order.
pub fn endpoint_gaps(walls: &[Wall], snap: f64, epsilon: f64) -> Vec<EndpointGap> {
    if snap <= epsilon {
        return Vec::new();
    }

    let mut endpoints: Vec<(usize, bool, Point)> = walls
        .iter()
        .enumerate()
        .flat_map(|(i, w)| [(i, false, w.a), (i, true, w.b)])
        .filter(|(_, _, p)| p.is_finite())
        .collect();
    endpoints.sort_by(|l, r| l.2.x.total_cmp(&r.2.x));

    let mut gaps = Vec::new();
    for (i, &(wall, end, p)) in endpoints.iter().enumerate() {
        for &(other_wall, other_end, q) in &endpoints[i + 1..] {
            if q.x - p.x >= snap {
                break;
            }
            if other_wall == wall {
                continue;
            }
            let distance = p.distance(&q);
            if distance > epsilon && distance < snap {
                let (first, second) = if (wall, end) < (other_wall, other_end) {
                    ((wall, end), (other_wall, other_end))
                } else {
                    ((other_wall, other_end), (wall, end))
                };
                gaps.push(EndpointGap {
                    first,
                    second,
                    distance,
                });
            }
        }
    }
    gaps.sort_by(|l, r| (l.first, l.second).cmp(&(r.first, r.second)));
    gaps
}

fn to_point2(p: &Point) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

fn to_point(p: &Point2<f64>) -> Point {
    Point::new(p.x, p.y)
}
