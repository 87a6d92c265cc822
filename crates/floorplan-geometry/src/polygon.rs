// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon analysis: winding, closure, duplicates, self-intersection and curve controls
//!
//! Polygons are implicitly closed rings of [`Vertex`]. A curve control on a
//! vertex shapes the edge *ending* at that vertex; intersection tests use the
//! straight chord of curved edges.

use crate::{Error, Result};
use floorplan_model::Vertex;
use nalgebra::Point2;

/// Check if two vertices share a position within `epsilon`
pub fn same_position(a: &Vertex, b: &Vertex, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

/// Positions of a vertex ring
pub fn positions(poly: &[Vertex]) -> Vec<Point2<f64>> {
    poly.iter().map(|v| Point2::new(v.x, v.y)).collect()
}

/// Signed area of a ring (shoelace), positive for counter-clockwise
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice / 2.0
}

/// Whether the ring winds clockwise
pub fn is_clockwise(points: &[Point2<f64>]) -> bool {
    signed_area(points) < 0.0
}

/// Whether the last vertex repeats the first
pub fn has_explicit_closure(poly: &[Vertex], epsilon: f64) -> bool {
    match (poly.first(), poly.last()) {
        (Some(first), Some(last)) if poly.len() > 1 => same_position(first, last, epsilon),
        _ => false,
    }
}

/// Indices of vertices that repeat their predecessor
///
/// The closing vertex of an explicitly closed ring is not counted.
pub fn consecutive_duplicates(poly: &[Vertex], epsilon: f64) -> Vec<usize> {
    let end = if has_explicit_closure(poly, epsilon) {
        poly.len() - 1
    } else {
        poly.len()
    };
    (1..end)
        .filter(|&i| same_position(&poly[i - 1], &poly[i], epsilon))
        .collect()
}

/// Ring with explicit closure and consecutive duplicates removed
///
/// Curve controls of a dropped vertex move to the vertex that now ends its edge.
pub fn simplified(poly: &[Vertex], epsilon: f64) -> Vec<Vertex> {
    let mut ring: Vec<Vertex> = Vec::with_capacity(poly.len());
    for vertex in poly {
        match ring.last_mut() {
            Some(last) if same_position(last, vertex, epsilon) => {
                if vertex.is_curved() && !last.is_curved() {
                    last.take_controls_from(vertex);
                }
            }
            _ => ring.push(*vertex),
        }
    }
    if ring.len() > 1 && same_position(&ring[0], &ring[ring.len() - 1], epsilon) {
        if let Some(closing) = ring.pop() {
            if closing.is_curved() {
                ring[0].take_controls_from(&closing);
            }
        }
    }
    ring
}

/// Reverse the winding of a ring, keeping curve controls on their edges
///
/// Vertex `k` of the result is original vertex `n-1-k`; the control it ends
/// up carrying is the one of original vertex `(n-k) % n`, which belonged to
/// the same edge before reversal.
pub fn reversed(poly: &[Vertex]) -> Vec<Vertex> {
    let n = poly.len();
    (0..n)
        .map(|k| {
            let mut vertex = poly[n - 1 - k];
            vertex.take_controls_from(&poly[(n - k) % n]);
            vertex
        })
        .collect()
}

/// Orientation of the triple `(p, q, r)`: positive for a left turn
fn orient(p: &Point2<f64>, q: &Point2<f64>, r: &Point2<f64>) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

fn on_segment(p: &Point2<f64>, q: &Point2<f64>, r: &Point2<f64>, epsilon: f64) -> bool {
    r.x >= p.x.min(q.x) - epsilon
        && r.x <= p.x.max(q.x) + epsilon
        && r.y >= p.y.min(q.y) - epsilon
        && r.y <= p.y.max(q.y) + epsilon
}

/// Whether segments `p1-p2` and `q1-q2` touch or cross
pub fn segments_intersect(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
    epsilon: f64,
) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    let eps = epsilon * epsilon;
    if ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
    {
        return true;
    }

    (d1.abs() <= eps && on_segment(q1, q2, p1, epsilon))
        || (d2.abs() <= eps && on_segment(q1, q2, p2, epsilon))
        || (d3.abs() <= eps && on_segment(p1, p2, q1, epsilon))
        || (d4.abs() <= eps && on_segment(p1, p2, q2, epsilon))
}

/// Pairs of non-adjacent edges that intersect
///
/// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping). Edges are
/// sorted by their minimum x and swept left to right; a pair is only tested
/// while the x extents overlap. Results are sorted by `(i, j)` with `i < j`.
pub fn self_intersections(points: &[Point2<f64>], epsilon: f64) -> Vec<(usize, usize)> {
    let n = points.len();
    if n < 4 {
        return Vec::new();
    }

    let edge = |i: usize| (points[i], points[(i + 1) % n]);
    let mut order: Vec<(usize, f64, f64)> = (0..n)
        .map(|i| {
            let (p, q) = edge(i);
            (i, p.x.min(q.x), p.x.max(q.x))
        })
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1));

    let adjacent = |i: usize, j: usize| (i + 1) % n == j || (j + 1) % n == i;

    let mut hits = Vec::new();
    for (k, &(i, _, max_x)) in order.iter().enumerate() {
        for &(j, min_x, _) in &order[k + 1..] {
            if min_x > max_x + epsilon {
                break;
            }
            if adjacent(i, j) {
                continue;
            }
            let (p1, p2) = edge(i);
            let (q1, q2) = edge(j);
            if segments_intersect(&p1, &p2, &q1, &q2, epsilon) {
                hits.push((i.min(j), i.max(j)));
            }
        }
    }
    hits.sort_unstable();
    hits
}

/// Problem with the curve control of a vertex
#[derive(Clone, Debug, PartialEq)]
pub struct CurveIssue {
    pub index: usize,
    pub message: String,
}

/// Check curve controls: complete, finite, and not collapsed onto the edge endpoints
pub fn curve_issues(poly: &[Vertex], epsilon: f64) -> Vec<CurveIssue> {
    let n = poly.len();
    let mut issues = Vec::new();
    for (index, vertex) in poly.iter().enumerate() {
        if !vertex.is_curved() {
            continue;
        }
        let control = match vertex.control() {
            Some(control) => control,
            None => {
                issues.push(CurveIssue {
                    index,
                    message: "curve control needs both cx and cy".to_string(),
                });
                continue;
            }
        };
        if !control.is_finite() || vertex.cz.map(|z| !z.is_finite()).unwrap_or(false) {
            issues.push(CurveIssue {
                index,
                message: "curve control is not finite".to_string(),
            });
            continue;
        }
        let start = poly[(index + n - 1) % n].point();
        let end = vertex.point();
        if control.distance(&start) <= epsilon && control.distance(&end) <= epsilon {
            issues.push(CurveIssue {
                index,
                message: "curve control coincides with both edge endpoints".to_string(),
            });
        }
    }
    issues
}

/// Validate the minimum vertex count
pub fn check_vertex_count(poly: &[Vertex]) -> Result<()> {
    if poly.len() < 3 {
        return Err(Error::TooFewVertices(poly.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(100.0, 0.0),
            Vertex::new(100.0, 100.0),
            Vertex::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_signed_area() {
        let ccw = positions(&square());
        assert_relative_eq!(signed_area(&ccw), 10000.0);
        assert!(!is_clockwise(&ccw));

        let cw: Vec<_> = ccw.iter().rev().cloned().collect();
        assert_relative_eq!(signed_area(&cw), -10000.0);
        assert!(is_clockwise(&cw));
    }

    #[test]
    fn test_explicit_closure() {
        let mut poly = square();
        assert!(!has_explicit_closure(&poly, 1e-6));
        poly.push(Vertex::new(0.0, 0.0));
        assert!(has_explicit_closure(&poly, 1e-6));
        assert_eq!(simplified(&poly, 1e-6), square());
    }

    #[test]
    fn test_duplicates() {
        let mut poly = square();
        poly.insert(2, Vertex::new(100.0, 0.0));
        assert_eq!(consecutive_duplicates(&poly, 1e-6), vec![2]);
        assert_eq!(simplified(&poly, 1e-6), square());
    }

    #[test]
    fn test_bowtie_intersects() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
            Point2::new(0.0, 100.0),
        ];
        assert_eq!(self_intersections(&bowtie, 1e-6), vec![(0, 2)]);
        assert!(self_intersections(&positions(&square()), 1e-6).is_empty());
    }

    #[test]
    fn test_concave_polygon_is_simple() {
        let l_shape = vec![
            Point2::new(0.0, 0.0),
            Point2::new(200.0, 0.0),
            Point2::new(200.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 200.0),
            Point2::new(0.0, 200.0),
        ];
        assert!(self_intersections(&l_shape, 1e-6).is_empty());
    }

    #[test]
    fn test_reverse_moves_controls_with_edges() {
        // control on vertex 2 bends edge 1 -> 2
        let poly = vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(100.0, 0.0),
            Vertex::curved(100.0, 100.0, 150.0, 50.0),
        ];
        let rev = reversed(&poly);
        assert_eq!(rev[0].point(), poly[2].point());
        assert_eq!(rev[1].point(), poly[1].point());
        // edge 2 -> 1 of the original now ends at rev[1]
        assert_eq!(rev[1].cx, Some(150.0));
        assert!(!rev[0].is_curved());
        assert!(!rev[2].is_curved());

        assert_eq!(reversed(&rev), poly);
    }

    #[test]
    fn test_curve_issues() {
        let mut poly = square();
        poly[1].cx = Some(50.0);
        poly[2] = Vertex::curved(100.0, 100.0, 100.0, 100.0);
        poly[3] = Vertex::curved(0.0, 100.0, 50.0, 150.0);
        let issues = curve_issues(&poly, 1e-6);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 1);

        let pinched = vec![
            Vertex::new(0.0, 0.0),
            Vertex::curved(0.0, 0.0, 0.0, 0.0),
            Vertex::new(10.0, 10.0),
        ];
        assert_eq!(curve_issues(&pinched, 1e-6)[0].index, 1);
    }

    #[test]
    fn test_vertex_count() {
        assert!(matches!(
            check_vertex_count(&square()[..2]),
            Err(Error::TooFewVertices(2))
        ));
        assert!(check_vertex_count(&square()).is_ok());
    }
}
