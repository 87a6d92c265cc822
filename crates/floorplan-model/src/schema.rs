// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema Registry - static field constraints of every document shape
//!
//! Each [`Shape`] (entity or nested object) maps to an ordered list of
//! [`FieldSpec`]s: name, required flag, value type, range and range policy,
//! unit and default. The registry is pure data; the schema checker and the
//! normalizer both walk it generically instead of hard-coding per-entity
//! rules.
//!
//! Shapes form a closed enum, so asking for an unknown entity kind is a
//! compile-time error rather than a runtime failure.

use crate::{fields, EntityKind};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// Every object shape that appears in a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    // Hierarchy
    Project,
    ProjectSettings,
    Floor,
    Drawing,
    Design,
    DesignSettings,

    // Entities
    Item,
    Line,
    Wall,
    Opening,
    Area,
    Surface,
    Label,
    Camera,
    FloorCamera,

    // Shared bases
    GenericArea,

    // Nested objects
    Point,
    Vertex,
    Endpoint,
    OffsetLine,
    ItemLight,
    ItemConfiguration,
    WallDecorPair,
    DecorTexture,
    DecorComponent,
    DecorColor,
    Texture,
    OpeningMaterialColor,
    OpeningMaterialAsset,
    OpeningMaterialVariant,
    ThresholdColor,
    MaterialMetadata,
    Thumb,
    AreaCeilingColor,
    AreaCeilingComponent,
    SurfaceCeiling,
    LightSettings,
    BackgroundPlane,
    BackgroundSphere,
}

impl Shape {
    /// Entity kind reported for findings on this shape, if it is an entity
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Shape::Project => Some(EntityKind::Project),
            Shape::ProjectSettings => Some(EntityKind::ProjectSettings),
            Shape::Floor => Some(EntityKind::Floor),
            Shape::Drawing => Some(EntityKind::Drawing),
            Shape::Design => Some(EntityKind::Design),
            Shape::DesignSettings => Some(EntityKind::DesignSettings),
            Shape::Item => Some(EntityKind::Item),
            Shape::Line => Some(EntityKind::Line),
            Shape::Wall => Some(EntityKind::Wall),
            Shape::Opening => Some(EntityKind::Opening),
            Shape::Area => Some(EntityKind::Area),
            Shape::Surface => Some(EntityKind::Surface),
            Shape::Label => Some(EntityKind::Label),
            Shape::Camera => Some(EntityKind::Camera),
            Shape::FloorCamera => Some(EntityKind::FloorCamera),
            _ => None,
        }
    }

    /// Shape whose fields this shape inherits
    pub fn parent(&self) -> Option<Shape> {
        match self {
            Shape::Area | Shape::Surface => Some(Shape::GenericArea),
            Shape::FloorCamera => Some(Shape::Camera),
            _ => None,
        }
    }

    /// Own fields, without inherited ones
    pub fn own_fields(&self) -> &'static [FieldSpec] {
        fields::own_fields(*self)
    }

    /// All fields, inherited ones first
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let parent: &'static [FieldSpec] = self.parent().map(|p| p.own_fields()).unwrap_or(&[]);
        parent.iter().chain(self.own_fields().iter())
    }

    /// Look up a single field by name (including inherited ones)
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        SchemaRegistry::global().field(*self, name)
    }

    /// Check whether a field name belongs to this shape
    pub fn has_field(&self, name: &str) -> bool {
        SchemaRegistry::global().has_field(*self, name)
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields().filter(|f| f.required).map(|f| f.name)
    }

    /// Whether every required field is present (and not null) in a raw object
    pub fn matches(&self, object: &Map<String, Value>) -> bool {
        self.required_fields()
            .all(|name| object.get(name).map(|v| !v.is_null()).unwrap_or(false))
    }

    /// First candidate whose required fields are all present
    pub fn first_match(candidates: &[Shape], object: &Map<String, Value>) -> Option<Shape> {
        candidates.iter().copied().find(|shape| shape.matches(object))
    }

    /// Variant of a tagged union selected by the tag value
    pub fn tagged_variant(
        variants: &[(&'static str, Shape)],
        tag_value: &str,
    ) -> Option<Shape> {
        variants
            .iter()
            .find(|(name, _)| *name == tag_value)
            .map(|(_, shape)| *shape)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Physical unit of a numeric field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Centimeter,
    Degree,
    Percentage,
    Pixel,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Centimeter => "cm",
            Unit::Degree => "°",
            Unit::Percentage => "%",
            Unit::Pixel => "px",
        }
    }
}

/// Value type of a field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldType {
    Number,
    Integer,
    Boolean,
    Text,
    /// String or number
    Color,
    /// Text holding a UUID
    Uuid,
    /// Text holding a material asset id (`rs-<n>`)
    MaterialId,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// One of a fixed set of integers
    IntEnum(&'static [i64]),
    /// `[0|1, 0|1]`
    FlagPair,
    /// Nested object
    Object(Shape),
    /// Array of objects
    List(Shape),
    /// Object with arbitrary keys and uniformly typed values
    Map(&'static FieldType),
    /// Like `Map`, but an empty array is accepted in place of an empty object
    MapOrEmptyList(&'static FieldType),
    /// Union resolved to the first shape whose required fields are all present
    OneOf(&'static [Shape]),
    /// Union discriminated by a string field
    Tagged {
        tag: &'static str,
        variants: &'static [(&'static str, Shape)],
    },
}

impl FieldType {
    /// Human-readable type name for messages
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Integer | FieldType::IntEnum(_) => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Text | FieldType::Uuid | FieldType::MaterialId | FieldType::Enum(_) => {
                "string"
            }
            FieldType::Color => "string or number",
            FieldType::FlagPair => "pair of 0/1",
            FieldType::Object(_)
            | FieldType::Map(_)
            | FieldType::OneOf(_)
            | FieldType::Tagged { .. } => "object",
            FieldType::MapOrEmptyList(_) => "object or empty array",
            FieldType::List(_) => "array",
        }
    }
}

/// Inclusive numeric range (optionally exclusive at the lower bound)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub min_exclusive: bool,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    /// `[min, ∞)`
    pub const fn at_least(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    /// `(0, ∞)`
    pub const fn positive() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
            min_exclusive: true,
        }
    }

    /// `[-180, 180]`
    pub const fn degrees() -> Self {
        Self::new(-180.0, 180.0)
    }

    /// `[0, 100]`
    pub const fn percent() -> Self {
        Self::new(0.0, 100.0)
    }

    /// `[0, 1]`
    pub const fn unit_interval() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        above && value <= self.max
    }

    /// Nearest value inside the range (the lower bound for exclusive ranges)
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Wrap a periodic value (angles) into the range
    pub fn wrap(&self, value: f64) -> f64 {
        if self.contains(value) {
            return value;
        }
        let span = self.max - self.min;
        (value - self.min).rem_euclid(span) + self.min
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_exclusive { '(' } else { '[' };
        if self.max.is_infinite() {
            write!(f, "{}{}, ∞)", open, self.min)
        } else {
            write!(f, "{}{}, {}]", open, self.min, self.max)
        }
    }
}

/// What to do with a value outside its range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangePolicy {
    /// Snap to the nearest bound (warning)
    Clamp,
    /// Wrap periodic values such as angles (warning)
    Wrap,
    /// Leave untouched and report an error
    Reject,
    /// Range is restored by geometry normalization; no schema finding
    Derived,
}

/// Defaults that depend on context rather than a constant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// Item `z_height`: owning floor height minus item elevation, at least 0
    HeightBelowFloorCeiling,
    /// `[0, 0]` on doors, absent on windows
    DoorUnmirrored,
    /// Door `threshold`: `{color: frameColor}` when the door has a frame color
    DoorThresholdFromFrame,
}

/// Default value of an optional field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Number(f64),
    Bool(bool),
    Text(&'static str),
    FlagPair([i64; 2]),
    Derived(Derivation),
}

/// Constraint record of one field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub ty: FieldType,
    pub range: Option<Range>,
    pub policy: RangePolicy,
    pub unit: Option<Unit>,
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            required: true,
            ty,
            range: None,
            policy: RangePolicy::Reject,
            unit: None,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    pub const fn unit(self, unit: Unit) -> Self {
        Self {
            unit: Some(unit),
            ..self
        }
    }

    pub const fn range(self, range: Range, policy: RangePolicy) -> Self {
        Self {
            range: Some(range),
            policy,
            ..self
        }
    }

    pub const fn default_value(self, default: DefaultValue) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }
}

/// Name index over the static tables
pub struct SchemaRegistry {
    index: FxHashMap<(Shape, &'static str), &'static FieldSpec>,
    names: FxHashSet<(Shape, &'static str)>,
}

impl SchemaRegistry {
    /// Process-wide registry, built on first use
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(SchemaRegistry::build)
    }

    fn build() -> Self {
        let mut index = FxHashMap::default();
        let mut names = FxHashSet::default();
        for &shape in fields::ALL_SHAPES {
            for spec in shape.fields() {
                index.insert((shape, spec.name), spec);
                names.insert((shape, spec.name));
            }
        }
        Self { index, names }
    }

    /// Ordered field constraints of a shape (inherited fields first)
    pub fn field_spec(&self, shape: Shape) -> Vec<&'static FieldSpec> {
        shape.fields().collect()
    }

    pub fn field(&self, shape: Shape, name: &str) -> Option<&'static FieldSpec> {
        self.index.get(&(shape, name)).copied()
    }

    pub fn has_field(&self, shape: Shape, name: &str) -> bool {
        self.names.contains(&(shape, name))
    }

    /// Number of indexed `(shape, field)` pairs
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Ordered field constraints of a shape
pub fn field_spec(shape: Shape) -> Vec<&'static FieldSpec> {
    SchemaRegistry::global().field_spec(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_and_clamp() {
        let scale = Range::new(10.0, 400.0);
        assert!(scale.contains(10.0));
        assert!(!scale.contains(401.0));
        assert_eq!(scale.clamp(500.0), 400.0);
        assert_eq!(scale.clamp(2.0), 10.0);

        let positive = Range::positive();
        assert!(!positive.contains(0.0));
        assert!(positive.contains(0.1));
    }

    #[test]
    fn test_range_wrap_degrees() {
        let deg = Range::degrees();
        assert_eq!(deg.wrap(90.0), 90.0);
        assert_eq!(deg.wrap(180.0), 180.0);
        assert_eq!(deg.wrap(270.0), -90.0);
        assert_eq!(deg.wrap(-190.0), 170.0);
        assert!(deg.contains(deg.wrap(900.0)));
    }

    #[test]
    fn test_inherited_fields() {
        let names: Vec<_> = Shape::Area.fields().map(|f| f.name).collect();
        assert!(names.contains(&"patternScale"));
        assert!(names.contains(&"poly"));
        assert!(Shape::FloorCamera.has_field("id"));
        assert!(Shape::FloorCamera.has_field("lightSettings"));
        assert!(!Shape::Camera.has_field("id"));
    }

    #[test]
    fn test_field_lookup() {
        let spec = Shape::Area.field("patternScale").unwrap();
        assert_eq!(spec.range, Some(Range::new(10.0, 400.0)));
        assert_eq!(spec.policy, RangePolicy::Clamp);

        let spec = Shape::Item.field("width").unwrap();
        assert_eq!(spec.policy, RangePolicy::Reject);
        assert_eq!(spec.unit, Some(Unit::Centimeter));

        let spec = Shape::Label.field("backgroundAlpha").unwrap();
        assert_eq!(spec.default, Some(DefaultValue::Number(100.0)));
    }

    #[test]
    fn test_every_shape_has_fields() {
        for &shape in fields::ALL_SHAPES {
            assert!(shape.fields().next().is_some(), "{} has no fields", shape);
        }
        assert!(!SchemaRegistry::global().is_empty());
    }

    #[test]
    fn test_first_match() {
        let decor = serde_json::json!({"refid": "tile-3"});
        let decor = decor.as_object().unwrap();
        assert_eq!(
            Shape::first_match(&[Shape::DecorTexture, Shape::DecorComponent], decor),
            Some(Shape::DecorComponent)
        );
        assert_eq!(Shape::first_match(&[Shape::DecorTexture], decor), None);
        assert_eq!(
            Shape::tagged_variant(&[("plane", Shape::BackgroundPlane)], "plane"),
            Some(Shape::BackgroundPlane)
        );
    }

    #[test]
    fn test_required_fields_of_wall() {
        let required: Vec<_> = Shape::Wall.required_fields().collect();
        assert_eq!(
            required,
            vec!["a", "b", "az", "bz", "left", "right", "openings", "thickness", "balance"]
        );
    }
}
