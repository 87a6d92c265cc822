// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation report model
//!
//! A [`Report`] is an ordered list of [`Finding`]s. Ordering is stable and
//! independent of the order in which checks or catalog lookups completed:
//! findings are sorted by `(floor, design, entity kind, entity index, child,
//! rule)` before a report is handed out.

use serde::Serialize;
use std::fmt;

/// Kinds of entities that findings can point at, in report order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    ProjectSettings,
    Floor,
    Drawing,
    FloorCamera,
    Design,
    DesignSettings,
    Item,
    Line,
    Wall,
    Opening,
    Area,
    Label,
    Camera,
    Surface,
}

impl EntityKind {
    /// Name of the collection holding this kind, used in path rendering
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::ProjectSettings => "settings",
            EntityKind::Floor => "floors",
            EntityKind::Drawing => "drawing",
            EntityKind::FloorCamera => "cameras",
            EntityKind::Design => "designs",
            EntityKind::DesignSettings => "settings",
            EntityKind::Item => "items",
            EntityKind::Line => "lines",
            EntityKind::Wall => "walls",
            EntityKind::Opening => "openings",
            EntityKind::Area => "areas",
            EntityKind::Label => "labels",
            EntityKind::Camera => "cameras",
            EntityKind::Surface => "surfaces",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "Project",
            EntityKind::ProjectSettings => "ProjectSettings",
            EntityKind::Floor => "Floor",
            EntityKind::Drawing => "Drawing",
            EntityKind::FloorCamera => "FloorCamera",
            EntityKind::Design => "Design",
            EntityKind::DesignSettings => "DesignSettings",
            EntityKind::Item => "Item",
            EntityKind::Line => "Line",
            EntityKind::Wall => "Wall",
            EntityKind::Opening => "Opening",
            EntityKind::Area => "Area",
            EntityKind::Label => "Label",
            EntityKind::Camera => "Camera",
            EntityKind::Surface => "Surface",
        };
        f.write_str(name)
    }
}

/// Location of an entity in the document tree
///
/// Field order is the report sort order. `index` is the position of the
/// entity in its collection; `child` is used for openings (index within the
/// wall whose position is `index`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityPath {
    pub floor: Option<usize>,
    pub design: Option<usize>,
    pub kind: EntityKind,
    pub index: Option<usize>,
    pub child: Option<usize>,
}

impl EntityPath {
    /// The project root
    pub const fn project() -> Self {
        Self {
            floor: None,
            design: None,
            kind: EntityKind::Project,
            index: None,
            child: None,
        }
    }

    /// Project-level singleton (settings)
    pub const fn project_settings() -> Self {
        Self {
            kind: EntityKind::ProjectSettings,
            ..Self::project()
        }
    }

    /// A floor
    pub const fn floor(floor: usize) -> Self {
        Self {
            floor: Some(floor),
            kind: EntityKind::Floor,
            ..Self::project()
        }
    }

    /// Entity owned directly by a floor (drawing, legacy cameras)
    pub const fn in_floor(floor: usize, kind: EntityKind, index: Option<usize>) -> Self {
        Self {
            floor: Some(floor),
            kind,
            index,
            ..Self::project()
        }
    }

    /// A design
    pub const fn design(floor: usize, design: usize) -> Self {
        Self {
            floor: Some(floor),
            design: Some(design),
            kind: EntityKind::Design,
            index: None,
            child: None,
        }
    }

    /// Entity owned by a design
    pub const fn entity(floor: usize, design: usize, kind: EntityKind, index: usize) -> Self {
        Self {
            floor: Some(floor),
            design: Some(design),
            kind,
            index: Some(index),
            child: None,
        }
    }

    /// Opening `opening` of wall `wall`
    pub const fn opening(floor: usize, design: usize, wall: usize, opening: usize) -> Self {
        Self {
            floor: Some(floor),
            design: Some(design),
            kind: EntityKind::Opening,
            index: Some(wall),
            child: Some(opening),
        }
    }

    /// Same location with a different kind (design settings)
    pub const fn with_kind(self, kind: EntityKind) -> Self {
        Self { kind, ..self }
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == EntityKind::Project {
            return f.write_str("project");
        }
        if self.kind == EntityKind::ProjectSettings {
            return f.write_str("settings");
        }
        let mut first = true;
        let mut segment = |f: &mut fmt::Formatter<'_>, s: String| -> fmt::Result {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            f.write_str(&s)
        };
        if let Some(floor) = self.floor {
            segment(f, format!("floors[{}]", floor))?;
        }
        if let Some(design) = self.design {
            segment(f, format!("designs[{}]", design))?;
        }
        match (self.kind, self.index, self.child) {
            (EntityKind::Floor | EntityKind::Design, _, _) => Ok(()),
            (EntityKind::Opening, Some(wall), Some(opening)) => {
                segment(f, format!("walls[{}]", wall))?;
                segment(f, format!("openings[{}]", opening))
            }
            (kind, Some(index), _) => segment(f, format!("{}[{}]", kind.collection(), index)),
            (kind, None, _) => segment(f, kind.collection().to_string()),
        }
    }
}

/// Severity of a finding
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Error taxonomy of a finding
///
/// Only `Structural` findings stop the pipeline; everything else is attached
/// to the report and the document still gets normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Missing required field or wrong shape
    Structural,
    /// Field value outside its range, enumeration or format
    Range,
    /// Dangling catalog reference
    Reference,
    /// Geometric invariant violation
    Geometry,
}

/// Rule identifiers
pub mod rule {
    // Schema
    pub const MISSING_REQUIRED_FIELD: &str = "missing-required-field";
    pub const WRONG_TYPE: &str = "wrong-type";
    pub const INVALID_ENUM_VALUE: &str = "invalid-enum-value";
    pub const UNRECOGNIZED_VARIANT: &str = "unrecognized-variant";
    pub const FIELD_OUT_OF_RANGE: &str = "field-out-of-range";
    pub const ANGLE_OUT_OF_RANGE: &str = "angle-out-of-range";
    pub const INVALID_COLOR: &str = "invalid-color";
    pub const INVALID_UUID: &str = "invalid-uuid";
    pub const INVALID_MATERIAL_ID: &str = "invalid-material-id";
    pub const FLOOR_CAMERAS_DEPRECATED: &str = "floor-cameras-deprecated";

    // References
    pub const UNRESOLVED_REFERENCE: &str = "unresolved-reference";

    // Walls
    pub const WALL_DEGENERATE: &str = "wall-degenerate";
    pub const WALL_HEIGHT_NONPOSITIVE: &str = "wall-height-nonpositive";
    pub const WALL_OFFSET_MISMATCH: &str = "wall-offset-mismatch";
    pub const WALL_ENDPOINT_GAP: &str = "wall-endpoint-gap";

    // Openings
    pub const OPENING_OUT_OF_BOUNDS: &str = "opening-out-of-bounds";
    pub const OPENING_OVERLAP: &str = "opening-overlap";
    pub const OPENING_EXCEEDS_WALL_HEIGHT: &str = "opening-exceeds-wall-height";

    // Polygons
    pub const POLYGON_TOO_FEW_VERTICES: &str = "polygon-too-few-vertices";
    pub const POLYGON_EXPLICIT_CLOSURE: &str = "polygon-explicit-closure";
    pub const POLYGON_DUPLICATE_VERTEX: &str = "polygon-duplicate-vertex";
    pub const POLYGON_DEGENERATE: &str = "polygon-degenerate";
    pub const POLYGON_SELF_INTERSECTION: &str = "polygon-self-intersection";
    pub const POLYGON_CLOCKWISE: &str = "polygon-clockwise";
    pub const POLYGON_CURVE_NOT_ALLOWED: &str = "polygon-curve-not-allowed";
    pub const BEZIER_DEGENERATE: &str = "bezier-degenerate";

    // Cameras
    pub const CAMERA_UP_ZERO: &str = "camera-up-zero";
    pub const CAMERA_DIRECTION_ZERO: &str = "camera-direction-zero";
    pub const CAMERA_UP_PARALLEL: &str = "camera-up-parallel";
    pub const CAMERA_UP_NOT_UNIT: &str = "camera-up-not-unit";
    pub const CAMERA_UP_SENTINEL: &str = "camera-up-sentinel";
}

/// One reported validation issue
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Finding {
    pub path: EntityPath,
    /// Dotted field path inside the entity, when the finding is about one field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub rule: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    /// Other entities involved (e.g. the second of two overlapping openings)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<EntityPath>,
}

impl Finding {
    /// Create a finding
    pub fn new(
        path: EntityPath,
        rule: &'static str,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            field: None,
            rule,
            severity,
            category,
            message: message.into(),
            suggested_fix: None,
            related: Vec::new(),
        }
    }

    /// Geometry error
    pub fn geometry_error(path: EntityPath, rule: &'static str, message: impl Into<String>) -> Self {
        Self::new(path, rule, Severity::Error, Category::Geometry, message)
    }

    /// Geometry warning (auto-correctable by the normalizer)
    pub fn geometry_warning(
        path: EntityPath,
        rule: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(path, rule, Severity::Warning, Category::Geometry, message)
    }

    /// Structural schema error
    pub fn structural(path: EntityPath, rule: &'static str, message: impl Into<String>) -> Self {
        Self::new(path, rule, Severity::Error, Category::Structural, message)
    }

    /// Attach the field the finding is about
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a suggested fix
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    /// Attach a related entity
    pub fn with_related(mut self, path: EntityPath) -> Self {
        self.related.push(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Structural error; structural warnings (deprecations) do not reject a document
    pub fn is_structural(&self) -> bool {
        self.category == Category::Structural && self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity, self.path)?;
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        write!(f, " [{}] {}", self.rule, self.message)?;
        if let Some(fix) = &self.suggested_fix {
            write!(f, " (fix: {})", fix)?;
        }
        Ok(())
    }
}

/// Ordered collection of findings
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from findings gathered in any order
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = Self { findings };
        report.sort();
        report
    }

    /// Append findings; call [`Report::sort`] before handing the report out
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Stable sort by entity location then rule id
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| (a.path, a.rule).cmp(&(b.path, b.rule)));
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_structural(&self) -> bool {
        self.findings.iter().any(|f| f.is_structural())
    }

    /// Findings with a given rule id
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        assert_eq!(EntityPath::opening(0, 1, 2, 3).to_string(), "floors[0].designs[1].walls[2].openings[3]");
        assert_eq!(
            EntityPath::entity(1, 0, EntityKind::Surface, 4).to_string(),
            "floors[1].designs[0].surfaces[4]"
        );
        assert_eq!(EntityPath::floor(2).to_string(), "floors[2]");
        assert_eq!(
            EntityPath::in_floor(0, EntityKind::Drawing, None).to_string(),
            "floors[0].drawing"
        );
        assert_eq!(EntityPath::project().to_string(), "project");
    }

    #[test]
    fn test_report_order() {
        let later = Finding::geometry_error(
            EntityPath::entity(0, 0, EntityKind::Area, 0),
            rule::POLYGON_DEGENERATE,
            "a",
        );
        let earlier = Finding::geometry_error(
            EntityPath::entity(0, 0, EntityKind::Wall, 5),
            rule::WALL_DEGENERATE,
            "w",
        );
        let root = Finding::structural(EntityPath::project(), rule::MISSING_REQUIRED_FIELD, "p");
        let report = Report::from_findings(vec![later.clone(), earlier.clone(), root.clone()]);
        assert_eq!(report.findings(), &[root, earlier, later]);
    }

    #[test]
    fn test_report_sort_is_stable_within_rule() {
        let path = EntityPath::entity(0, 0, EntityKind::Label, 0);
        let first = Finding::new(path, rule::FIELD_OUT_OF_RANGE, Severity::Warning, Category::Range, "1");
        let second = Finding::new(path, rule::FIELD_OUT_OF_RANGE, Severity::Warning, Category::Range, "2");
        let report = Report::from_findings(vec![first.clone(), second.clone()]);
        assert_eq!(report.findings(), &[first, second]);
    }
}
