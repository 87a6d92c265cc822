// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in geometry rules
//!
//! Each rule is a unit struct implementing [`GeometryRule`]; they are
//! registered by [`GeometryValidator::with_default_rules`](crate::GeometryValidator::with_default_rules).

use crate::camera;
use crate::polygon;
use crate::router::{Entity, EntityRef, GeometryRule, Scope};
use crate::wall::{self, WallFrame};
use crate::Error;
use floorplan_model::{rule, Design, EntityKind, EntityPath, Finding, Vertex, Wall};

// ============================================================================
// Walls
// ============================================================================

/// Wall rule - degenerate segments, heights and stale face lines
pub struct WallRule;

impl WallRule {
    pub fn new() -> Self {
        Self
    }

    fn check_wall(&self, path: EntityPath, wall: &Wall, scope: &Scope<'_>) -> Vec<Finding> {
        let eps = scope.options.epsilon;
        let mut findings = Vec::new();

        for (field, endpoint) in [("az.h", &wall.az), ("bz.h", &wall.bz)] {
            if endpoint.h <= 0.0 {
                findings.push(
                    Finding::geometry_error(
                        path,
                        rule::WALL_HEIGHT_NONPOSITIVE,
                        format!("wall height must be positive, got {}", endpoint.h),
                    )
                    .with_field(field),
                );
            }
        }

        match wall::offset_deviation(wall, eps) {
            Ok(deviation) if deviation > eps => findings.push(
                Finding::geometry_warning(
                    path,
                    rule::WALL_OFFSET_MISMATCH,
                    format!(
                        "face lines deviate {:.6} cm from thickness {} and balance {}",
                        deviation, wall.thickness, wall.balance
                    ),
                )
                .with_field("left")
                .with_fix("recompute left/right from a, b, thickness and balance"),
            ),
            Ok(_) => {}
            Err(e) => findings.push(
                Finding::geometry_error(path, rule::WALL_DEGENERATE, e.to_string())
                    .with_fix("remove the wall or move one of its endpoints"),
            ),
        }

        findings
    }
}

impl Default for WallRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryRule for WallRule {
    fn check(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding> {
        match entity.entity {
            Entity::Wall(wall) => self.check_wall(entity.path, wall, scope),
            _ => Vec::new(),
        }
    }

    fn check_design(&self, design: &Design, scope: &Scope<'_>) -> Vec<Finding> {
        let Some((design_index, _)) = scope.design else {
            return Vec::new();
        };
        let options = scope.options;
        wall::endpoint_gaps(&design.walls, options.endpoint_snap, options.epsilon)
            .into_iter()
            .map(|gap| {
                let at = |wall| EntityPath::entity(scope.floor_index, design_index, EntityKind::Wall, wall);
                let end = |b: bool| if b { "b" } else { "a" };
                Finding::geometry_warning(
                    at(gap.first.0),
                    rule::WALL_ENDPOINT_GAP,
                    format!(
                        "endpoint {} is {:.3} cm from endpoint {} of wall {}",
                        end(gap.first.1),
                        gap.distance,
                        end(gap.second.1),
                        gap.second.0
                    ),
                )
                .with_field(end(gap.first.1))
                .with_related(at(gap.second.0))
                .with_fix("snap the endpoints together")
            })
            .collect()
    }

    fn supported_kinds(&self) -> Vec<EntityKind> {
        vec![EntityKind::Wall]
    }

    fn name(&self) -> &'static str {
        "wall"
    }
}

// ============================================================================
// Openings
// ============================================================================

/// Opening rule - placement of doors and windows along their wall
pub struct OpeningRule;

impl OpeningRule {
    pub fn new() -> Self {
        Self
    }

    fn check_openings(&self, wall_path: EntityPath, wall: &Wall, scope: &Scope<'_>) -> Vec<Finding> {
        let eps = scope.options.epsilon;
        let at = |index: usize| EntityPath {
            kind: EntityKind::Opening,
            child: Some(index),
            ..wall_path
        };

        let mut findings = Vec::new();
        for (i, opening) in wall.openings.iter().enumerate() {
            let height = wall.height_at(opening.t);
            let top = opening.z + opening.z_height;
            if opening.z < -eps || top > height + eps {
                findings.push(
                    Finding::geometry_error(
                        at(i),
                        rule::OPENING_EXCEEDS_WALL_HEIGHT,
                        format!(
                            "opening spans [{}, {}] cm but the wall is {} cm high at t={}",
                            opening.z, top, height, opening.t
                        ),
                    )
                    .with_field("z_height"),
                );
            }
        }

        // Spans need a wall length; degenerate walls are reported by WallRule
        let Ok(frame) = WallFrame::of(wall, eps) else {
            return findings;
        };
        let spans: Vec<(f64, f64)> = wall.openings.iter().map(|o| o.span(frame.length)).collect();

        for (i, span) in spans.iter().enumerate() {
            if !wall::span_within_wall(*span, eps) {
                findings.push(
                    Finding::geometry_error(
                        at(i),
                        rule::OPENING_OUT_OF_BOUNDS,
                        format!(
                            "opening spans [{:.4}, {:.4}] of a {:.1} cm wall",
                            span.0, span.1, frame.length
                        ),
                    )
                    .with_field("t"),
                );
            }
        }

        for i in 0..spans.len() {
            for j in i + 1..spans.len() {
                if wall::spans_overlap(spans[i], spans[j], eps) {
                    findings.push(
                        Finding::geometry_error(
                            at(i),
                            rule::OPENING_OVERLAP,
                            format!("opening {} overlaps opening {} on the same wall", i, j),
                        )
                        .with_field("t")
                        .with_related(at(j)),
                    );
                }
            }
        }

        findings
    }
}

impl Default for OpeningRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryRule for OpeningRule {
    fn check(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding> {
        match entity.entity {
            Entity::Wall(wall) => self.check_openings(entity.path, wall, scope),
            _ => Vec::new(),
        }
    }

    fn supported_kinds(&self) -> Vec<EntityKind> {
        vec![EntityKind::Wall]
    }

    fn name(&self) -> &'static str {
        "opening"
    }
}

// ============================================================================
// Polygons
// ============================================================================

/// Polygon rule - area and surface outlines
pub struct PolygonRule;

impl PolygonRule {
    pub fn new() -> Self {
        Self
    }

    fn check_polygon(
        &self,
        path: EntityPath,
        poly: &[Vertex],
        curves_allowed: bool,
        scope: &Scope<'_>,
    ) -> Vec<Finding> {
        let eps = scope.options.epsilon;

        // Nothing else is meaningful below three vertices
        if let Err(Error::TooFewVertices(count)) = polygon::check_vertex_count(poly) {
            return vec![Finding::geometry_error(
                path,
                rule::POLYGON_TOO_FEW_VERTICES,
                format!("polygon has {} vertices, at least 3 are required", count),
            )
            .with_field("poly")];
        }

        let mut findings = Vec::new();

        if curves_allowed {
            for issue in polygon::curve_issues(poly, eps) {
                findings.push(
                    Finding::geometry_error(path, rule::BEZIER_DEGENERATE, issue.message)
                        .with_field(format!("poly[{}]", issue.index)),
                );
            }
        } else if let Some(index) = poly.iter().position(|v| v.is_curved()) {
            findings.push(
                Finding::geometry_error(
                    path,
                    rule::POLYGON_CURVE_NOT_ALLOWED,
                    "area outlines must have straight edges",
                )
                .with_field(format!("poly[{}]", index))
                .with_fix("remove cx/cy/cz"),
            );
        }

        if polygon::has_explicit_closure(poly, eps) {
            findings.push(
                Finding::geometry_warning(
                    path,
                    rule::POLYGON_EXPLICIT_CLOSURE,
                    "last vertex repeats the first; polygons are closed implicitly",
                )
                .with_field(format!("poly[{}]", poly.len() - 1))
                .with_fix("drop the closing vertex"),
            );
        }

        for index in polygon::consecutive_duplicates(poly, eps) {
            findings.push(
                Finding::geometry_warning(
                    path,
                    rule::POLYGON_DUPLICATE_VERTEX,
                    format!("vertex {} repeats vertex {}", index, index - 1),
                )
                .with_field(format!("poly[{}]", index))
                .with_fix("drop the duplicate vertex"),
            );
        }

        let degenerate = || {
            Finding::geometry_error(path, rule::POLYGON_DEGENERATE, "polygon has zero area")
                .with_field("poly")
        };
        let ring = polygon::simplified(poly, eps);
        if ring.len() < 3 {
            findings.push(degenerate());
            return findings;
        }

        let points = polygon::positions(&ring);
        let crossings = polygon::self_intersections(&points, eps);
        if !crossings.is_empty() {
            // Area and winding are meaningless for a self-intersecting ring
            for (i, j) in crossings {
                findings.push(
                    Finding::geometry_error(
                        path,
                        rule::POLYGON_SELF_INTERSECTION,
                        format!("edge {} intersects edge {}", i, j),
                    )
                    .with_field("poly"),
                );
            }
            return findings;
        }

        let area = polygon::signed_area(&points);
        if area.abs() <= eps {
            findings.push(degenerate());
        } else if area < 0.0 {
            findings.push(
                Finding::geometry_warning(
                    path,
                    rule::POLYGON_CLOCKWISE,
                    "polygon winds clockwise",
                )
                .with_field("poly")
                .with_fix("reverse the vertex order"),
            );
        }

        findings
    }
}

impl Default for PolygonRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryRule for PolygonRule {
    fn check(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding> {
        match entity.entity {
            Entity::Area(area) => self.check_polygon(entity.path, &area.poly, false, scope),
            Entity::Surface(surface) => self.check_polygon(entity.path, &surface.poly, true, scope),
            _ => Vec::new(),
        }
    }

    fn supported_kinds(&self) -> Vec<EntityKind> {
        vec![EntityKind::Area, EntityKind::Surface]
    }

    fn name(&self) -> &'static str {
        "polygon"
    }
}

// ============================================================================
// Cameras
// ============================================================================

/// Camera rule - direction and up vectors
pub struct CameraRule;

impl CameraRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CameraRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryRule for CameraRule {
    fn check(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding> {
        let Entity::Camera(cam) = entity.entity else {
            return Vec::new();
        };
        let path = entity.path;
        let options = scope.options;
        let eps = options.epsilon;
        let direction = camera::direction(cam);
        let up = camera::up(cam);
        let mut findings = Vec::new();

        let up_zero = up.norm() <= eps;
        if up_zero {
            findings.push(
                Finding::geometry_error(path, rule::CAMERA_UP_ZERO, "up vector is zero")
                    .with_field("ux"),
            );
        }
        if direction.norm() <= eps {
            findings.push(
                Finding::geometry_error(
                    path,
                    rule::CAMERA_DIRECTION_ZERO,
                    "view direction is zero",
                )
                .with_field("dx"),
            );
        }

        if let Ok(true) = camera::is_parallel(&up, &direction, options.parallel_tolerance_deg, eps) {
            findings.push(
                Finding::geometry_error(
                    path,
                    rule::CAMERA_UP_PARALLEL,
                    format!(
                        "up vector is within {}° of the view direction",
                        options.parallel_tolerance_deg
                    ),
                )
                .with_field("ux"),
            );
        }

        if camera::is_sentinel_up(cam) {
            findings.push(
                Finding::geometry_warning(
                    path,
                    rule::CAMERA_UP_SENTINEL,
                    "up vector (0, 0, -1) is the unset marker",
                )
                .with_field("uz")
                .with_fix("set the up vector to (0, 0, 1)"),
            );
        } else if !up_zero && !camera::is_unit(&up, eps) {
            findings.push(
                Finding::geometry_warning(
                    path,
                    rule::CAMERA_UP_NOT_UNIT,
                    format!("up vector has length {:.6}", up.norm()),
                )
                .with_field("ux")
                .with_fix("normalize the up vector"),
            );
        }

        findings
    }

    fn supported_kinds(&self) -> Vec<EntityKind> {
        vec![EntityKind::Camera, EntityKind::FloorCamera]
    }

    fn name(&self) -> &'static str {
        "camera"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryOptions, GeometryValidator};
    use floorplan_model::{Project, Report};
    use serde_json::{json, Value};

    fn wall(a: [f64; 2], b: [f64; 2], openings: Value) -> Value {
        json!({
            "a": {"x": a[0], "y": a[1]}, "b": {"x": b[0], "y": b[1]},
            "az": {"z": 0, "h": 250}, "bz": {"z": 0, "h": 250},
            "left": {"a": {"x": 0, "y": 0}, "b": {"x": 0, "y": 0}},
            "right": {"a": {"x": 0, "y": 0}, "b": {"x": 0, "y": 0}},
            "openings": openings, "thickness": 10, "balance": 0.5
        })
    }

    fn door(t: f64, width: f64) -> Value {
        json!({"type": "door", "refid": "door", "t": t, "z": 0, "z_height": 210,
               "width": width, "openState": 0})
    }

    fn camera(dir: [f64; 3], up: [f64; 3]) -> Value {
        json!({
            "x": 0, "y": 0, "z": 160, "name": "c", "type_name": "orbital",
            "lightSettings": {"day": true, "dayTime": "Midday", "scene": "SKY", "profile": false,
                              "clouds": 1, "altitude": 45, "azimuth": 0, "intensity": 80},
            "fov": 60, "dx": dir[0], "dy": dir[1], "dz": dir[2],
            "ux": up[0], "uy": up[1], "uz": up[2]
        })
    }

    fn project(design: Value) -> Project {
        let mut design_value = json!({
            "id": 1, "name": "d", "items": [], "lines": [], "walls": [], "areas": [],
            "labels": [], "cameras": [], "surfaces": []
        });
        if let (Some(base), Value::Object(extra)) = (design_value.as_object_mut(), design) {
            base.extend(extra);
        }
        serde_json::from_value(json!({
            "id": 1, "name": "p", "public": false,
            "floors": [{"id": 1, "name": "f", "level": 0, "height": 250, "designs": [design_value]}]
        }))
        .unwrap()
    }

    fn validate(design: Value) -> Report {
        GeometryValidator::with_default_rules().validate_project(&project(design))
    }

    fn rules(report: &Report) -> Vec<&'static str> {
        report.findings().iter().map(|f| f.rule).collect()
    }

    #[test]
    fn test_stale_offsets_warn() {
        let report = validate(json!({"walls": [wall([0.0, 0.0], [400.0, 0.0], json!([]))]}));
        assert_eq!(rules(&report), vec![rule::WALL_OFFSET_MISMATCH]);
    }

    #[test]
    fn test_degenerate_wall() {
        let report = validate(json!({"walls": [wall([5.0, 5.0], [5.0, 5.0], json!([door(0.5, 10.0)]))]}));
        assert_eq!(rules(&report), vec![rule::WALL_DEGENERATE]);
    }

    #[test]
    fn test_degenerate_wall_still_checks_opening_height() {
        let mut tall = door(0.5, 10.0);
        tall["z_height"] = json!(300);
        let report = validate(json!({"walls": [wall([5.0, 5.0], [5.0, 5.0], json!([tall]))]}));

        assert_eq!(report.len(), 2);
        assert_eq!(report.by_rule(rule::WALL_DEGENERATE).count(), 1);
        let height: Vec<_> = report.by_rule(rule::OPENING_EXCEEDS_WALL_HEIGHT).collect();
        assert_eq!(height.len(), 1);
        assert_eq!(height[0].path.kind, EntityKind::Opening);
        assert_eq!(report.by_rule(rule::OPENING_OUT_OF_BOUNDS).count(), 0);
    }

    #[test]
    fn test_overlapping_doors() {
        let report = validate(json!({"walls": [
            wall([0.0, 0.0], [400.0, 0.0], json!([door(0.5, 120.0), door(0.6, 120.0)]))
        ]}));
        let overlaps: Vec<_> = report.by_rule(rule::OPENING_OVERLAP).collect();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].path.child, Some(0));
        assert_eq!(overlaps[0].related[0].child, Some(1));
    }

    #[test]
    fn test_adjacent_doors_do_not_overlap() {
        let report = validate(json!({"walls": [
            wall([0.0, 0.0], [200.0, 0.0], json!([door(0.25, 100.0), door(0.75, 100.0)]))
        ]}));
        assert_eq!(report.by_rule(rule::OPENING_OVERLAP).count(), 0);
        assert_eq!(report.by_rule(rule::OPENING_OUT_OF_BOUNDS).count(), 0);
    }

    #[test]
    fn test_opening_bounds_and_height() {
        let mut tall = door(0.5, 100.0);
        tall["z_height"] = json!(300);
        let report = validate(json!({"walls": [
            wall([0.0, 0.0], [200.0, 0.0], json!([door(0.1, 100.0), tall]))
        ]}));
        assert_eq!(report.by_rule(rule::OPENING_OUT_OF_BOUNDS).count(), 1);
        let height: Vec<_> = report.by_rule(rule::OPENING_EXCEEDS_WALL_HEIGHT).collect();
        assert_eq!(height.len(), 1);
        assert_eq!(height[0].path.child, Some(1));
    }

    #[test]
    fn test_too_few_vertices_is_exclusive() {
        let report = validate(json!({"areas": [{"poly": [{"x": 0, "y": 0}, {"x": 0, "y": 0}]}]}));
        assert_eq!(rules(&report), vec![rule::POLYGON_TOO_FEW_VERTICES]);
    }

    #[test]
    fn test_clockwise_and_closed_area() {
        let report = validate(json!({"areas": [{"poly": [
            {"x": 0, "y": 0}, {"x": 0, "y": 100}, {"x": 100, "y": 100}, {"x": 100, "y": 0},
            {"x": 0, "y": 0}
        ]}]}));
        assert_eq!(
            rules(&report),
            vec![rule::POLYGON_CLOCKWISE, rule::POLYGON_EXPLICIT_CLOSURE]
        );
    }

    #[test]
    fn test_self_intersecting_surface() {
        let report = validate(json!({"surfaces": [{"poly": [
            {"x": 0, "y": 0}, {"x": 100, "y": 100}, {"x": 100, "y": 0}, {"x": 0, "y": 100}
        ]}]}));
        assert_eq!(report.by_rule(rule::POLYGON_SELF_INTERSECTION).count(), 1);
    }

    #[test]
    fn test_collinear_area_is_degenerate() {
        let report = validate(json!({"areas": [{"poly": [
            {"x": 0, "y": 0}, {"x": 50, "y": 0}, {"x": 100, "y": 0}
        ]}]}));
        assert_eq!(rules(&report), vec![rule::POLYGON_DEGENERATE]);
    }

    #[test]
    fn test_curves_only_on_surfaces() {
        let poly = json!([
            {"x": 0, "y": 0}, {"x": 100, "y": 0, "cx": 50, "cy": -20}, {"x": 100, "y": 100}
        ]);
        let report = validate(json!({"areas": [{"poly": poly.clone()}], "surfaces": [{"poly": poly}]}));
        assert_eq!(rules(&report), vec![rule::POLYGON_CURVE_NOT_ALLOWED]);
    }

    #[test]
    fn test_camera_vectors() {
        let report = validate(json!({"cameras": [
            camera([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            camera([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
            camera([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            camera([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            camera([1.0, 0.0, 0.0], [0.0, 0.0, 0.5]),
            camera([0.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        ]}));
        let by_camera = |i: usize| -> Vec<&'static str> {
            report
                .findings()
                .iter()
                .filter(|f| f.path.index == Some(i))
                .map(|f| f.rule)
                .collect()
        };
        assert!(by_camera(0).is_empty());
        assert_eq!(by_camera(1), vec![rule::CAMERA_UP_PARALLEL]);
        assert_eq!(by_camera(2), vec![rule::CAMERA_UP_ZERO]);
        assert_eq!(by_camera(3), vec![rule::CAMERA_UP_SENTINEL]);
        assert_eq!(by_camera(4), vec![rule::CAMERA_UP_NOT_UNIT]);
        assert_eq!(by_camera(5), vec![rule::CAMERA_DIRECTION_ZERO]);
    }

    #[test]
    fn test_endpoint_gap_between_walls() {
        let options = GeometryOptions::default();
        let mut first = wall([0.0, 0.0], [100.0, 0.0], json!([]));
        let mut second = wall([100.4, 0.0], [100.4, 100.0], json!([]));
        for w in [&mut first, &mut second] {
            let parsed: Wall = serde_json::from_value(w.clone()).unwrap();
            let (left, right) = crate::wall::offset_lines(&parsed, options.epsilon).unwrap();
            w["left"] = serde_json::to_value(left).unwrap();
            w["right"] = serde_json::to_value(right).unwrap();
        }
        let report = validate(json!({"walls": [first, second]}));
        let gaps: Vec<_> = report.by_rule(rule::WALL_ENDPOINT_GAP).collect();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].path.index, Some(0));
        assert_eq!(gaps[0].related[0].index, Some(1));
        assert_eq!(report.len(), 1);
    }
}
