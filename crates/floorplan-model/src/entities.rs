// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Design-level entities: walls, openings, items, areas, surfaces, labels,
//! lines and cameras
//!
//! Field names follow the interchange format exactly (mixed camelCase and
//! snake_case), so every renamed field carries an explicit serde attribute.

use crate::{Color, Endpoint, MaterialMetadata, Mirrored, OffsetLine, Point, Vertex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Walls
// ============================================================================

/// A wall segment with derived face offset lines and placed openings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub a: Point,
    pub b: Point,
    /// Control point of a curved wall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<Point>,
    pub az: Endpoint,
    pub bz: Endpoint,
    pub left: OffsetLine,
    pub right: OffsetLine,
    pub openings: Vec<Opening>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decor: Option<WallDecorPair>,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    pub thickness: f64,
    /// Position of the centerline between the face lines, 0..1
    pub balance: f64,
}

impl Wall {
    /// Length of the centerline segment
    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }

    /// Wall height interpolated at parameter `t` along the segment
    pub fn height_at(&self, t: f64) -> f64 {
        self.az.h + (self.bz.h - self.az.h) * t
    }
}

/// Decoration of the two wall faces
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WallDecorPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<WallDecor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<WallDecor>,
}

/// Decoration of one wall face
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WallDecor {
    Texture { texture: Texture },
    Component { refid: String },
    Color { color: Color },
}

/// Image texture stretched over a wall face
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub src: String,
    pub tlx: f64,
    pub tly: f64,
    pub brx: f64,
    pub bry: f64,
    pub fit: TextureFit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextureFit {
    Free,
    NoStretch,
    Fill,
    Contain,
    TileHorizontally,
    TileVertically,
    TileBoth,
}

// ============================================================================
// Openings
// ============================================================================

/// Door or window discriminator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// An opening placed on a wall at parameter `t`
///
/// Doors and windows share one representation; the door-only fields
/// (`doorColor`, `mirrored`, `threshold`) stay empty on windows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    pub refid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "showLabel", default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(rename = "frontDoor", default, skip_serializing_if = "Option::is_none")]
    pub front_door: Option<bool>,
    #[serde(
        rename = "internalDoor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_door: Option<bool>,
    #[serde(rename = "frameColor", default, skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<BTreeMap<String, OpeningMaterial>>,
    /// Fractional position of the opening center along the wall, 0..1
    pub t: f64,
    /// Elevation above the wall base
    pub z: f64,
    pub z_height: f64,
    pub width: f64,
    #[serde(rename = "openState")]
    pub open_state: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_y: Option<f64>,
    #[serde(rename = "doorColor", default, skip_serializing_if = "Option::is_none")]
    pub door_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<Mirrored>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

impl Opening {
    pub fn is_door(&self) -> bool {
        self.kind == OpeningKind::Door
    }

    /// Span of the opening projected onto the wall parameter, `[t - w/2L, t + w/2L]`
    pub fn span(&self, wall_length: f64) -> (f64, f64) {
        let half = self.width / (2.0 * wall_length);
        (self.t - half, self.t + half)
    }
}

/// Material assignment of an opening part
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum OpeningMaterial {
    Color(Color),
    /// Component id of a catalog asset
    Asset(String),
    /// Variant id of the named material
    Variant(i64),
}

/// Door threshold: plain color or (partial) catalog material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    /// Material fields written next to the color are kept
    Color {
        color: Color,
        #[serde(flatten)]
        material: MaterialMetadata,
    },
    Material(MaterialMetadata),
}

impl Threshold {
    pub fn color(color: Color) -> Self {
        Threshold::Color {
            color,
            material: MaterialMetadata::default(),
        }
    }

    /// Material metadata of either form
    pub fn material(&self) -> &MaterialMetadata {
        match self {
            Threshold::Color { material, .. } => material,
            Threshold::Material(material) => material,
        }
    }
}

// ============================================================================
// Items
// ============================================================================

/// A placed catalog component
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub refid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<ItemLight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<ItemMaterials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<Mirrored>,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_height: Option<f64>,
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_y: Option<f64>,
    #[serde(rename = "snapDist")]
    pub snap_dist: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemLight {
    pub on: bool,
    pub color: Color,
    pub watt: f64,
}

/// Material-role to variant assignment of an item
///
/// Authoring tools write an empty list instead of an empty map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemMaterials {
    Assigned(BTreeMap<String, i64>),
    Unassigned(Vec<serde_json::Value>),
}

impl ItemMaterials {
    /// Iterate `(material name, variant id)` pairs
    pub fn assignments(&self) -> impl Iterator<Item = (&str, i64)> {
        let map = match self {
            ItemMaterials::Assigned(map) => Some(map),
            ItemMaterials::Unassigned(_) => None,
        };
        map.into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

/// External product configurator reference
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "type")]
    pub kind: ConfiguratorKind,
    pub id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfiguratorKind {
    Intiaro,
}

// ============================================================================
// Areas and surfaces
// ============================================================================

/// Ceiling settings of an area or surface
///
/// Areas use either `color` or `refid`; surfaces use `color` and/or `asset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<MaterialMetadata>,
}

/// Presentation and catalog fields shared by areas and surfaces
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(rename = "customName", default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(rename = "hideIn3D", default, skip_serializing_if = "Option::is_none")]
    pub hide_in_3d: Option<bool>,
    #[serde(
        rename = "showAreaLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub show_area_label: Option<bool>,
    #[serde(
        rename = "showSurfaceArea",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub show_surface_area: Option<bool>,
    #[serde(
        rename = "dottedOutline",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dotted_outline: Option<bool>,
    #[serde(
        rename = "dottedOutlineColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dotted_outline_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Ceiling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roomstyle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styleboard_id: Option<i64>,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    /// Floor pattern index, 1..=22
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_y: Option<f64>,
    #[serde(
        rename = "patternRotation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern_rotation: Option<f64>,
    #[serde(
        rename = "patternAlpha",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern_alpha: Option<f64>,
    #[serde(
        rename = "patternScale",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern_scale: Option<f64>,
}

/// A floor region bounded by a straight-edged polygon
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub poly: Vec<Vertex>,
    #[serde(flatten)]
    pub style: AreaStyle,
}

/// A free polygon surface (roofs, cutouts, slabs) that may have curved edges
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub poly: Vec<Vertex>,
    #[serde(rename = "isRoof", default, skip_serializing_if = "Option::is_none")]
    pub is_roof: Option<bool>,
    #[serde(rename = "isCutout", default, skip_serializing_if = "Option::is_none")]
    pub is_cutout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    #[serde(flatten)]
    pub style: AreaStyle,
}

// ============================================================================
// Annotations
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text annotation placed in the plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    #[serde(rename = "fontColor")]
    pub font_color: Color,
    #[serde(rename = "backgroundColor")]
    pub background_color: Color,
    pub align: Align,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "letterSpacing")]
    pub letter_spacing: f64,
    pub rotation: f64,
    #[serde(
        rename = "backgroundAlpha",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_alpha: Option<f64>,
    #[serde(rename = "fontAlpha", default, skip_serializing_if = "Option::is_none")]
    pub font_alpha: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    SolidLine,
    DashedLine,
    DottedLine,
    DashdottedLine,
}

/// Free drawing line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
    #[serde(rename = "type")]
    pub kind: LineType,
    pub color: Color,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    /// Stroke width in pixels
    pub thickness: f64,
}

// ============================================================================
// Cameras
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    Orbital,
    Walkthrough,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayTime {
    Sunrise,
    Morning,
    Midday,
    Afternoon,
    Sunset,
    Evening,
    Night,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    #[serde(rename = "SKY")]
    Sky,
    Golfclub,
    #[serde(rename = "USK")]
    Usk,
    #[serde(rename = "FP")]
    Fp,
    Mountns,
    Studio,
}

/// Rendering light settings of a camera
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightSettings {
    pub day: bool,
    #[serde(rename = "dayTime")]
    pub day_time: DayTime,
    pub scene: Scene,
    pub profile: bool,
    /// Cloud density, 1..=3
    pub clouds: i64,
    pub altitude: f64,
    pub azimuth: f64,
    pub intensity: f64,
}

/// Camera backdrop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type_name", rename_all = "lowercase")]
pub enum BackgroundImage {
    Plane { url: String },
    Sphere { url: String, sky_id: i64 },
}

/// A viewpoint with direction and up vectors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub name: String,
    pub type_name: CameraKind,
    #[serde(rename = "lightSettings")]
    pub light_settings: LightSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
    #[serde(
        rename = "groupMarker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_marker: Option<i64>,
    pub fov: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub ux: f64,
    pub uy: f64,
    pub uz: f64,
}

impl Camera {
    pub fn direction(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dz]
    }

    pub fn up(&self) -> [f64; 3] {
        [self.ux, self.uy, self.uz]
    }

    pub fn set_up(&mut self, up: [f64; 3]) {
        self.ux = up[0];
        self.uy = up[1];
        self.uz = up[2];
    }
}

/// Camera stored on a floor (legacy location)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorCamera {
    pub id: i64,
    #[serde(flatten)]
    pub camera: Camera,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opening_kind_tag() {
        let opening: Opening = serde_json::from_value(json!({
            "type": "door", "refid": "door-1", "t": 0.5, "z": 0, "z_height": 210,
            "width": 90, "openState": 0,
            "materials": {"frame": {"type": "variant", "value": 3}},
            "threshold": {"color": "#ccc"}
        }))
        .unwrap();
        assert!(opening.is_door());
        assert_eq!(
            opening.materials.as_ref().unwrap()["frame"],
            OpeningMaterial::Variant(3)
        );
        assert_eq!(
            opening.threshold,
            Some(Threshold::color(Color::text("#ccc")))
        );
    }

    #[test]
    fn test_threshold_color_keeps_material_fields() {
        let value = json!({"color": "#ccc", "id": "rs-12", "name": "oak"});
        let threshold: Threshold = serde_json::from_value(value.clone()).unwrap();

        assert!(matches!(threshold, Threshold::Color { .. }));
        assert_eq!(threshold.material().id.as_deref(), Some("rs-12"));
        assert_eq!(serde_json::to_value(&threshold).unwrap(), value);

        let partial: Threshold = serde_json::from_value(json!({"name": "oak"})).unwrap();
        assert!(matches!(partial, Threshold::Material(_)));
        assert_eq!(partial.material().id, None);
    }

    #[test]
    fn test_opening_span() {
        let opening: Opening = serde_json::from_value(json!({
            "type": "window", "refid": "w", "t": 0.5, "z": 90, "z_height": 120,
            "width": 100, "openState": 0
        }))
        .unwrap();
        assert_eq!(opening.span(200.0), (0.25, 0.75));
    }

    #[test]
    fn test_item_materials_empty_list() {
        let materials: ItemMaterials = serde_json::from_value(json!([])).unwrap();
        assert_eq!(materials.assignments().count(), 0);

        let materials: ItemMaterials = serde_json::from_value(json!({"seat": 4})).unwrap();
        assert_eq!(materials.assignments().collect::<Vec<_>>(), vec![("seat", 4)]);
    }

    #[test]
    fn test_wall_decor_variants() {
        let decor: WallDecor = serde_json::from_value(json!({"refid": "tile-7"})).unwrap();
        assert_eq!(
            decor,
            WallDecor::Component {
                refid: "tile-7".into()
            }
        );
        let decor: WallDecor = serde_json::from_value(json!({"texture": {
            "src": "a.png", "tlx": 0, "tly": 0, "brx": 10, "bry": 10, "fit": "tile-both"
        }}))
        .unwrap();
        assert!(matches!(decor, WallDecor::Texture { .. }));
    }

    #[test]
    fn test_background_image_tag() {
        let image: BackgroundImage =
            serde_json::from_value(json!({"type_name": "sphere", "url": "sky.jpg", "sky_id": 2}))
                .unwrap();
        assert_eq!(
            image,
            BackgroundImage::Sphere {
                url: "sky.jpg".into(),
                sky_id: 2
            }
        );
    }
}
