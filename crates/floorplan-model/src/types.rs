// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive value types shared by all document entities
//!
//! Coordinates are centimeters in the design plane unless stated otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color as authored: a CSS-like string (`#rrggbb`, named color) or a packed number
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Text(String),
    Packed(i64),
    Float(f64),
}

impl Color {
    /// Create a color from a string
    pub fn text(value: impl Into<String>) -> Self {
        Color::Text(value.into())
    }

    /// Check `#`-prefixed strings for 3, 4, 6 or 8 hex digits
    ///
    /// Named colors and numbers are always accepted.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Color::Text(s) => match s.strip_prefix('#') {
                Some(hex) => {
                    matches!(hex.len(), 3 | 4 | 6 | 8)
                        && hex.chars().all(|c| c.is_ascii_hexdigit())
                }
                None => !s.is_empty(),
            },
            Color::Packed(_) => true,
            Color::Float(f) => f.is_finite(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Text(s) => write!(f, "{}", s),
            Color::Packed(n) => write!(f, "{}", n),
            Color::Float(n) => write!(f, "{}", n),
        }
    }
}

/// Point in the design plane
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Per-endpoint elevation of a wall: base `z` and height `h`
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub z: f64,
    pub h: f64,
}

/// A derived offset line of a wall face
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetLine {
    pub a: Point,
    pub b: Point,
}

impl OffsetLine {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
}

/// Canonical polygon vertex
///
/// Area polygons use plain points; surface polygons carry either an elevation
/// (`z`) or curve controls (`cx`, `cy`, optional `cz`). A single vertex type
/// keeps every polygon in one representation: the control point, when present,
/// shapes the edge that ends at this vertex.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cz: Option<f64>,
}

impl Vertex {
    /// Create a plain vertex
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            cx: None,
            cy: None,
            cz: None,
        }
    }

    /// Create a vertex whose incoming edge is a quadratic bezier
    pub const fn curved(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            cx: Some(cx),
            cy: Some(cy),
            cz: None,
        }
    }

    /// Set the elevation
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Position in the design plane
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether any curve control coordinate is present
    pub fn is_curved(&self) -> bool {
        self.cx.is_some() || self.cy.is_some() || self.cz.is_some()
    }

    /// Complete planar control point, if both `cx` and `cy` are present
    pub fn control(&self) -> Option<Point> {
        match (self.cx, self.cy) {
            (Some(cx), Some(cy)) => Some(Point::new(cx, cy)),
            _ => None,
        }
    }

    /// Move the curve controls of `other` onto this vertex
    pub fn take_controls_from(&mut self, other: &Vertex) {
        self.cx = other.cx;
        self.cy = other.cy;
        self.cz = other.cz;
    }
}

/// Item / door mirroring flags, each 0 or 1
pub type Mirrored = [i64; 2];

/// Thumbnails of a catalog material
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumb {
    #[serde(rename = "thumb2D")]
    pub thumb_2d: String,
    #[serde(rename = "thumb3D")]
    pub thumb_3d: String,
}

/// Material metadata embedded in a document, every field optional
///
/// Only the fields that are present are validated and resolved.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url2d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Thumb>,
}

/// Check a material asset id of the form `rs-<digits>`
pub fn is_material_asset_id(id: &str) -> bool {
    id.strip_prefix("rs-")
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Check a hyphenated UUID (`8-4-4-4-12` hex digits)
pub fn is_uuid(id: &str) -> bool {
    id.len() == 36 && uuid::Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_well_formed() {
        assert!(Color::text("#fff").is_well_formed());
        assert!(Color::text("#A0B1C2").is_well_formed());
        assert!(Color::text("white").is_well_formed());
        assert!(Color::Packed(16777215).is_well_formed());
        assert!(!Color::text("#12").is_well_formed());
        assert!(!Color::text("#zzzzzz").is_well_formed());
    }

    #[test]
    fn test_vertex_shapes() {
        let v: Vertex = serde_json::from_str(r#"{"x":1,"y":2,"cx":3,"cy":4}"#).unwrap();
        assert!(v.is_curved());
        assert_eq!(v.control(), Some(Point::new(3.0, 4.0)));

        let v: Vertex = serde_json::from_str(r#"{"x":1,"y":2,"z":5}"#).unwrap();
        assert!(!v.is_curved());
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"x":1.0,"y":2.0,"z":5.0}"#);
    }

    #[test]
    fn test_material_asset_id() {
        assert!(is_material_asset_id("rs-42"));
        assert!(!is_material_asset_id("rs-"));
        assert!(!is_material_asset_id("42"));
        assert!(!is_material_asset_id("rs-4a"));
    }

    #[test]
    fn test_uuid() {
        assert!(is_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!is_uuid("67e5504410b1426f9247bb680e5fe0c8"));
        assert!(!is_uuid("not-a-uuid"));
    }

    #[test]
    fn test_color_untagged() {
        let c: Color = serde_json::from_str("255").unwrap();
        assert_eq!(c, Color::Packed(255));
        let c: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(c, Color::text("#00ff00"));
    }
}
