// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document Normalizer - produces the canonical form of a document
//!
//! Two passes over a copy of the input:
//!
//! 1. A schema-driven pass over the JSON tree clamps or wraps out-of-range
//!    values, following the field policies of the registry. Values with the
//!    `Reject` policy are left untouched. With
//!    [`Normalizer::with_fill_defaults`] the same pass also writes the default
//!    of every absent defaultable field into the output.
//! 2. A geometry pass on the typed document recomputes stale wall offsets,
//!    cleans up polygon rings and canonicalizes camera up vectors.
//!
//! An absent defaultable field is canonical: it means the registry default.
//! A document without Reference or Geometry findings therefore comes back
//! unchanged, and normalizing twice gives the same result as normalizing once.

use floorplan_geometry::{normalize_camera, normalize_polygon, normalize_wall};
use floorplan_model::{
    DefaultValue, Derivation, FieldSpec, FieldType, Project, RangePolicy, Result, Shape,
};
use log::debug;
use serde_json::{json, Map, Value};

/// Counts of what a normalization run changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub defaults_applied: usize,
    pub values_corrected: usize,
    pub walls_recomputed: usize,
    pub polygons_fixed: usize,
    pub cameras_fixed: usize,
}

impl NormalizeSummary {
    pub fn total(&self) -> usize {
        self.defaults_applied
            + self.values_corrected
            + self.walls_recomputed
            + self.polygons_fixed
            + self.cameras_fixed
    }

    pub fn is_unchanged(&self) -> bool {
        self.total() == 0
    }
}

/// Normalizes documents to canonical form
#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    epsilon: f64,
    fill_defaults: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl Normalizer {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            fill_defaults: false,
        }
    }

    /// Write registry defaults for absent fields into the output
    pub fn with_fill_defaults(mut self, fill: bool) -> Self {
        self.fill_defaults = fill;
        self
    }

    /// Normalize a copy of `project`
    pub fn normalize(&self, project: &Project) -> Result<Project> {
        self.normalize_with_summary(project).map(|(project, _)| project)
    }

    /// Normalize a copy of `project` and report what changed
    pub fn normalize_with_summary(&self, project: &Project) -> Result<(Project, NormalizeSummary)> {
        let mut summary = NormalizeSummary::default();

        let mut tree = serde_json::to_value(project)?;
        if let Some(root) = tree.as_object_mut() {
            let mut pass = FieldPass {
                fill_defaults: self.fill_defaults,
                floor_height: None,
                summary: &mut summary,
            };
            pass.object(root, Shape::Project);
        }
        let mut normalized: Project = serde_json::from_value(tree)?;

        for floor in &mut normalized.floors {
            for camera in floor.cameras.iter_mut().flatten() {
                if normalize_camera(&mut camera.camera, self.epsilon) {
                    summary.cameras_fixed += 1;
                }
            }
            for design in &mut floor.designs {
                for wall in &mut design.walls {
                    if normalize_wall(wall, self.epsilon) {
                        summary.walls_recomputed += 1;
                    }
                }
                for area in &mut design.areas {
                    if normalize_polygon(&mut area.poly, self.epsilon) {
                        summary.polygons_fixed += 1;
                    }
                }
                for surface in &mut design.surfaces {
                    if normalize_polygon(&mut surface.poly, self.epsilon) {
                        summary.polygons_fixed += 1;
                    }
                }
                for camera in &mut design.cameras {
                    if normalize_camera(camera, self.epsilon) {
                        summary.cameras_fixed += 1;
                    }
                }
            }
        }

        debug!("Normalized document: {:?}", summary);
        Ok((normalized, summary))
    }
}

/// Schema-driven defaults and range corrections
struct FieldPass<'s> {
    fill_defaults: bool,
    /// Height of the floor being walked, for derived item heights
    floor_height: Option<f64>,
    summary: &'s mut NormalizeSummary,
}

impl FieldPass<'_> {
    fn object(&mut self, map: &mut Map<String, Value>, shape: Shape) {
        if shape == Shape::Floor {
            self.floor_height = map.get("height").and_then(Value::as_f64);
        }
        for spec in shape.fields() {
            if map.get(spec.name).map(Value::is_null).unwrap_or(true) {
                if !self.fill_defaults {
                    continue;
                }
                if let Some(value) = self.default_for(spec, map) {
                    map.insert(spec.name.to_string(), value);
                    self.summary.defaults_applied += 1;
                }
                continue;
            }
            if let Some(value) = map.get_mut(spec.name) {
                self.value(value, spec, &spec.ty);
            }
        }
    }

    fn value(&mut self, value: &mut Value, spec: &FieldSpec, ty: &FieldType) {
        match ty {
            FieldType::Number => {
                if let Some(corrected) = value.as_f64().and_then(|n| corrected(n, spec)) {
                    *value = json!(corrected);
                    self.summary.values_corrected += 1;
                }
            }
            FieldType::Object(shape) => {
                if let Some(map) = value.as_object_mut() {
                    self.object(map, *shape);
                }
            }
            FieldType::List(shape) => {
                for item in value.as_array_mut().into_iter().flatten() {
                    if let Some(map) = item.as_object_mut() {
                        self.object(map, *shape);
                    }
                }
            }
            FieldType::Map(inner) | FieldType::MapOrEmptyList(inner) => {
                for entry in value.as_object_mut().into_iter().flat_map(|m| m.values_mut()) {
                    self.value(entry, spec, inner);
                }
            }
            FieldType::OneOf(candidates) => {
                if let Some(map) = value.as_object_mut() {
                    if let Some(shape) = Shape::first_match(candidates, map) {
                        self.object(map, shape);
                    }
                }
            }
            FieldType::Tagged { tag, variants } => {
                if let Some(map) = value.as_object_mut() {
                    let shape = map
                        .get(*tag)
                        .and_then(Value::as_str)
                        .and_then(|name| Shape::tagged_variant(variants, name));
                    if let Some(shape) = shape {
                        self.object(map, shape);
                    }
                }
            }
            _ => {}
        }
    }

    fn default_for(&self, spec: &FieldSpec, map: &Map<String, Value>) -> Option<Value> {
        let is_door = map.get("type").and_then(Value::as_str) == Some("door");
        match spec.default? {
            DefaultValue::Number(n) => Some(json!(n)),
            DefaultValue::Bool(b) => Some(json!(b)),
            DefaultValue::Text(s) => Some(json!(s)),
            DefaultValue::FlagPair(pair) => Some(json!(pair)),
            DefaultValue::Derived(Derivation::HeightBelowFloorCeiling) => {
                let z = map.get("z").and_then(Value::as_f64)?;
                Some(json!((self.floor_height? - z).max(0.0)))
            }
            DefaultValue::Derived(Derivation::DoorUnmirrored) => is_door.then(|| json!([0, 0])),
            DefaultValue::Derived(Derivation::DoorThresholdFromFrame) => {
                let frame = map.get("frameColor").filter(|c| !c.is_null())?;
                is_door.then(|| json!({ "color": frame.clone() }))
            }
        }
    }
}

/// Corrected value for a correctable out-of-range number
fn corrected(n: f64, spec: &FieldSpec) -> Option<f64> {
    let range = spec.range?;
    if range.contains(n) {
        return None;
    }
    match spec.policy {
        RangePolicy::Clamp => Some(range.clamp(n)),
        RangePolicy::Wrap => Some(range.wrap(n)),
        RangePolicy::Reject | RangePolicy::Derived => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan_model::{Threshold, Vertex};

    fn project(design: Value) -> Project {
        let mut base = json!({
            "id": 1, "name": "d", "items": [], "lines": [], "walls": [], "areas": [],
            "labels": [], "cameras": [], "surfaces": []
        });
        if let (Some(map), Value::Object(extra)) = (base.as_object_mut(), design) {
            map.extend(extra);
        }
        serde_json::from_value(json!({
            "id": 7, "name": "home", "public": true,
            "floors": [{"id": 1, "name": "ground", "level": 0, "height": 250, "designs": [base]}]
        }))
        .unwrap()
    }

    fn wall(openings: Value) -> Value {
        json!({
            "a": {"x": 0, "y": 0}, "b": {"x": 200, "y": 0},
            "az": {"z": 0, "h": 250}, "bz": {"z": 0, "h": 250},
            "left": {"a": {"x": 0, "y": 0}, "b": {"x": 200, "y": 0}},
            "right": {"a": {"x": 0, "y": 0}, "b": {"x": 200, "y": 0}},
            "openings": openings, "thickness": 20, "balance": 1.5
        })
    }

    #[test]
    fn test_defaults_applied() {
        let input = project(json!({
            "items": [{"x": 0, "y": 0, "z": 40, "refid": "lamp", "width": 20, "height": 20,
                       "rotation": 0, "snapDist": 0}],
            "walls": [wall(json!([
                {"type": "door", "refid": "d", "t": 0.5, "z": 0, "z_height": 200, "width": 80,
                 "openState": 0, "frameColor": "#8b4513"},
                {"type": "window", "refid": "w", "t": 0.2, "z": 90, "z_height": 100,
                 "width": 30, "openState": 0}
            ]))],
        }));
        let (out, summary) = Normalizer::default()
            .with_fill_defaults(true)
            .normalize_with_summary(&input)
            .unwrap();
        let design = &out.floors[0].designs[0];

        let item = &design.items[0];
        assert_eq!(item.mirrored, Some([0, 0]));
        assert_eq!(item.rotation_x, Some(0.0));
        assert_eq!(item.z_height, Some(210.0));

        let door = &design.walls[0].openings[0];
        assert_eq!(door.mirrored, Some([0, 0]));
        assert!(matches!(door.threshold, Some(Threshold::Color { .. })));
        let window = &design.walls[0].openings[1];
        assert_eq!(window.mirrored, None);
        assert_eq!(window.threshold, None);

        assert!(summary.defaults_applied >= 5);
        // the input is a separate value
        assert_eq!(input.floors[0].designs[0].items[0].mirrored, None);

        let again = Normalizer::default().with_fill_defaults(true).normalize(&out).unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn test_absent_defaults_stay_absent() {
        let input = project(json!({
            "items": [{"x": 0, "y": 0, "z": 40, "refid": "lamp", "width": 20, "height": 20,
                       "rotation": 0, "snapDist": 0}],
            "areas": [{"poly": [{"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 100, "y": 100}]}]
        }));
        let (out, summary) = Normalizer::default().normalize_with_summary(&input).unwrap();

        assert_eq!(out, input);
        assert!(summary.is_unchanged());
        let design = &out.floors[0].designs[0];
        assert_eq!(design.items[0].mirrored, None);
        assert_eq!(design.items[0].z_height, None);
        assert_eq!(design.areas[0].style.pattern_scale, None);
    }

    #[test]
    fn test_clamp_wrap_and_offsets() {
        let input = project(json!({
            "walls": [wall(json!([]))],
            "labels": [{"x": 0, "y": 0, "text": "hi", "fontFamily": "Arial",
                        "fontColor": "#000", "backgroundColor": "#fff", "align": "left",
                        "fontSize": 12, "letterSpacing": 0, "rotation": 540,
                        "fontAlpha": 140}]
        }));
        let (out, summary) = Normalizer::default().normalize_with_summary(&input).unwrap();
        let design = &out.floors[0].designs[0];

        let label = &design.labels[0];
        assert_relative_eq!(label.rotation, -180.0);
        assert_eq!(label.font_alpha, Some(100.0));

        // balance clamped to 1 before the face lines are recomputed
        let w = &design.walls[0];
        assert_eq!(w.balance, 1.0);
        assert_relative_eq!(w.left.a.y, -20.0);
        assert_relative_eq!(w.right.a.y, 0.0);
        assert_eq!(summary.walls_recomputed, 1);
        assert_eq!(summary.values_corrected, 3);
    }

    #[test]
    fn test_rejected_values_untouched() {
        let input = project(json!({
            "items": [{"x": 0, "y": 0, "z": 0, "refid": "r", "width": -3, "height": 1,
                       "rotation": 0, "snapDist": 0, "z_height": 10,
                       "mirrored": [0, 0], "rotation_x": 0, "rotation_y": 0}]
        }));
        let out = Normalizer::default().normalize(&input).unwrap();
        assert_eq!(out.floors[0].designs[0].items[0].width, -3.0);
    }

    #[test]
    fn test_polygons_and_idempotence() {
        let input = project(json!({
            "areas": [{"poly": [
                {"x": 0, "y": 0}, {"x": 0, "y": 100}, {"x": 100, "y": 100},
                {"x": 100, "y": 100}, {"x": 100, "y": 0}, {"x": 0, "y": 0}
            ]}]
        }));
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(&input).unwrap();
        let poly = &once.floors[0].designs[0].areas[0].poly;
        assert_eq!(
            poly,
            &vec![
                Vertex::new(100.0, 0.0),
                Vertex::new(100.0, 100.0),
                Vertex::new(0.0, 100.0),
                Vertex::new(0.0, 0.0),
            ]
        );
        let area = &once.floors[0].designs[0].areas[0].style;
        assert_eq!(area.pattern_scale, None);

        let (twice, summary) = normalizer.normalize_with_summary(&once).unwrap();
        assert_eq!(twice, once);
        assert!(summary.is_unchanged());
    }
}
