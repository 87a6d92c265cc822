// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static field tables of the Schema Registry

use crate::schema::{
    DefaultValue, Derivation, FieldSpec, FieldType, Range, RangePolicy, Shape, Unit,
};

use FieldType::*;

/// Every shape known to the registry
pub const ALL_SHAPES: &[Shape] = &[
    Shape::Project,
    Shape::ProjectSettings,
    Shape::Floor,
    Shape::Drawing,
    Shape::Design,
    Shape::DesignSettings,
    Shape::Item,
    Shape::Line,
    Shape::Wall,
    Shape::Opening,
    Shape::Area,
    Shape::Surface,
    Shape::Label,
    Shape::Camera,
    Shape::FloorCamera,
    Shape::GenericArea,
    Shape::Point,
    Shape::Vertex,
    Shape::Endpoint,
    Shape::OffsetLine,
    Shape::ItemLight,
    Shape::ItemConfiguration,
    Shape::WallDecorPair,
    Shape::DecorTexture,
    Shape::DecorComponent,
    Shape::DecorColor,
    Shape::Texture,
    Shape::OpeningMaterialColor,
    Shape::OpeningMaterialAsset,
    Shape::OpeningMaterialVariant,
    Shape::ThresholdColor,
    Shape::MaterialMetadata,
    Shape::Thumb,
    Shape::AreaCeilingColor,
    Shape::AreaCeilingComponent,
    Shape::SurfaceCeiling,
    Shape::LightSettings,
    Shape::BackgroundPlane,
    Shape::BackgroundSphere,
];

pub(crate) fn own_fields(shape: Shape) -> &'static [FieldSpec] {
    match shape {
        Shape::Project => PROJECT,
        Shape::ProjectSettings => PROJECT_SETTINGS,
        Shape::Floor => FLOOR,
        Shape::Drawing => DRAWING,
        Shape::Design => DESIGN,
        Shape::DesignSettings => DESIGN_SETTINGS,
        Shape::Item => ITEM,
        Shape::Line => LINE,
        Shape::Wall => WALL,
        Shape::Opening => OPENING,
        Shape::Area => AREA,
        Shape::Surface => SURFACE,
        Shape::Label => LABEL,
        Shape::Camera => CAMERA,
        Shape::FloorCamera => FLOOR_CAMERA,
        Shape::GenericArea => GENERIC_AREA,
        Shape::Point => POINT,
        Shape::Vertex => VERTEX,
        Shape::Endpoint => ENDPOINT,
        Shape::OffsetLine => OFFSET_LINE,
        Shape::ItemLight => ITEM_LIGHT,
        Shape::ItemConfiguration => ITEM_CONFIGURATION,
        Shape::WallDecorPair => WALL_DECOR_PAIR,
        Shape::DecorTexture => DECOR_TEXTURE,
        Shape::DecorComponent => DECOR_COMPONENT,
        Shape::DecorColor => DECOR_COLOR,
        Shape::Texture => TEXTURE,
        Shape::OpeningMaterialColor => OPENING_MATERIAL_COLOR,
        Shape::OpeningMaterialAsset => OPENING_MATERIAL_ASSET,
        Shape::OpeningMaterialVariant => OPENING_MATERIAL_VARIANT,
        Shape::ThresholdColor => THRESHOLD_COLOR,
        Shape::MaterialMetadata => MATERIAL_METADATA,
        Shape::Thumb => THUMB,
        Shape::AreaCeilingColor => AREA_CEILING_COLOR,
        Shape::AreaCeilingComponent => AREA_CEILING_COMPONENT,
        Shape::SurfaceCeiling => SURFACE_CEILING,
        Shape::LightSettings => LIGHT_SETTINGS,
        Shape::BackgroundPlane => BACKGROUND_PLANE,
        Shape::BackgroundSphere => BACKGROUND_SPHERE,
    }
}

// ============================================================================
// Field builders
// ============================================================================

const fn req(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec::required(name, ty)
}

const fn opt(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec::optional(name, ty)
}

/// Length in centimeters, unconstrained (coordinates)
const fn cm(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Centimeter)
}

/// Length in centimeters that must not be negative
const fn size(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Centimeter)
        .range(Range::at_least(0.0), RangePolicy::Reject)
}

/// Length in centimeters that must be strictly positive
const fn extent(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Centimeter)
        .range(Range::positive(), RangePolicy::Reject)
}

/// Angle in degrees, wrapped into [-180, 180]
const fn angle(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Degree)
        .range(Range::degrees(), RangePolicy::Wrap)
}

/// Percentage, clamped into [0, 100]
const fn percent(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Percentage)
        .range(Range::percent(), RangePolicy::Clamp)
}

/// Fraction, clamped into [0, 1]
const fn fraction(spec: FieldSpec) -> FieldSpec {
    spec.range(Range::unit_interval(), RangePolicy::Clamp)
}

const fn px(spec: FieldSpec) -> FieldSpec {
    spec.unit(Unit::Pixel)
}

const fn group_marker() -> FieldSpec {
    opt("groupMarker", Integer)
}

// ============================================================================
// Enumerations
// ============================================================================

const ARROW_HEAD_TYPES: &[&str] = &["arrow-stop", "stop", "reverse-arrow-stop", "arrow"];
const VISUALS: &[&str] = &["ALL", "BW", "BWC"];
const DRAWING_DEPTHS: &[&str] = &["LOW", "HIGH"];
const LINE_TYPES: &[&str] = &["solid_line", "dashed_line", "dotted_line", "dashdotted_line"];
const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const OPENING_TYPES: &[&str] = &["door", "window"];
const CONFIGURATORS: &[&str] = &["intiaro"];
const TEXTURE_FITS: &[&str] = &[
    "free",
    "no-stretch",
    "fill",
    "contain",
    "tile-horizontally",
    "tile-vertically",
    "tile-both",
];
const CAMERA_TYPES: &[&str] = &["orbital", "walkthrough"];
const DAY_TIMES: &[&str] = &[
    "Sunrise",
    "Morning",
    "Midday",
    "Afternoon",
    "Sunset",
    "Evening",
    "Night",
];
const SCENES: &[&str] = &["SKY", "Golfclub", "USK", "FP", "Mountns", "Studio"];
const CLOUDS: &[i64] = &[1, 2, 3];
const PATTERNS: &[i64] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22,
];

const WALL_DECORS: &[Shape] = &[Shape::DecorTexture, Shape::DecorComponent, Shape::DecorColor];
const THRESHOLDS: &[Shape] = &[Shape::ThresholdColor, Shape::MaterialMetadata];
const AREA_CEILINGS: &[Shape] = &[Shape::AreaCeilingColor, Shape::AreaCeilingComponent];
const OPENING_MATERIALS: &[(&str, Shape)] = &[
    ("color", Shape::OpeningMaterialColor),
    ("asset", Shape::OpeningMaterialAsset),
    ("variant", Shape::OpeningMaterialVariant),
];
const BACKGROUND_IMAGES: &[(&str, Shape)] = &[
    ("plane", Shape::BackgroundPlane),
    ("sphere", Shape::BackgroundSphere),
];
const OPENING_MATERIAL: FieldType = Tagged {
    tag: "type",
    variants: OPENING_MATERIALS,
};

// ============================================================================
// Hierarchy
// ============================================================================

static PROJECT: &[FieldSpec] = &[
    req("id", Integer),
    req("name", Text),
    req("public", Boolean),
    req("floors", List(Shape::Floor)),
    opt("settings", Object(Shape::ProjectSettings)),
];

static PROJECT_SETTINGS: &[FieldSpec] = &[
    req("useMetric", Boolean),
    req("showGrid", Boolean),
    req("showDims", Boolean),
    req("showShortDims", Boolean),
    req("showAreaDims", Boolean),
    req("generateOuterDimension", Boolean),
    req("showDropShadows", Boolean),
    req("showObjects", Boolean),
    req("showFixtures", Boolean),
    req("showFixtures3D", Boolean),
    req("showItemOutline", Boolean),
    req("showObjectColour", Boolean),
    req("showStructuralColour", Boolean),
    req("showFloorsBelow", Boolean),
    req("showNorthArrow", Boolean),
    req("showObjects3D", Boolean),
    req("showObjectMono", Boolean),
    req("showSymbols", Boolean),
    req("showLights", Boolean),
    req("hideLightsOnPan", Boolean),
    req("useSection3D", Boolean),
    req("showLabels", Boolean),
    req("areaLabelOutline", Boolean),
    req("automaticAreaLabelColor", Boolean),
    req("blueprintMode", Boolean),
    req("dimLineFont", Text),
    req("dimLineLabelHorizontal", Boolean),
    req("exportLabels3D", Boolean),
    req("showShadows3D", Boolean),
    req("exportOrtho3D", Boolean),
    req("showTexts", Boolean),
    req("hideItemsAbove", Boolean),
    req("xRayWalls", Boolean),
    req("arrowHeadType", Enum(ARROW_HEAD_TYPES)),
    req("visuals", Enum(VISUALS)),
    extent(req("wallHeight", Number)),
    size(req("wallSectionHeight", Number)),
    extent(req("wallThickness", Number)),
    size(req("wallOuterThickness", Number)),
    px(req("areaLabelLetterSpacing", Number)),
    angle(req("northArrowRotation", Number)),
    req("northArrowKind", Integer),
    size(req("hideItemsAboveHeight", Number)),
];

static FLOOR: &[FieldSpec] = &[
    req("id", Integer),
    req("name", Text),
    req("level", Integer),
    req("designs", List(Shape::Design)),
    opt("drawing", Object(Shape::Drawing)),
    opt("cameras", List(Shape::FloorCamera)),
    extent(req("height", Number)),
];

static DRAWING: &[FieldSpec] = &[
    req("url", Text),
    req("visible", Boolean),
    opt("depth", Enum(DRAWING_DEPTHS)).default_value(DefaultValue::Text("HIGH")),
    cm(req("x", Number)),
    cm(req("y", Number)),
    size(req("width", Number)),
    size(req("height", Number)),
    angle(req("rotation", Number)),
    percent(req("alpha", Number)),
];

static DESIGN: &[FieldSpec] = &[
    req("id", Integer),
    req("name", Text),
    req("items", List(Shape::Item)),
    req("lines", List(Shape::Line)),
    req("walls", List(Shape::Wall)),
    req("areas", List(Shape::Area)),
    req("labels", List(Shape::Label)),
    req("cameras", List(Shape::Camera)),
    req("surfaces", List(Shape::Surface)),
    opt("settings", Object(Shape::DesignSettings)),
];

static DESIGN_SETTINGS: &[FieldSpec] = &[
    req("showCeilings3D", Boolean),
    req("engineAutoDims", Boolean),
    req("engineAutoThickness", Boolean),
    req("scaleMultiplierDimensions", Number).range(Range::new(0.1, 5.0), RangePolicy::Clamp),
    req("scaleMultiplierComments", Number).range(Range::new(0.1, 5.0), RangePolicy::Clamp),
    req("areaLabelMultiplier", Number).range(Range::new(0.5, 3.0), RangePolicy::Clamp),
    size(opt("minWallLength", Number)),
];

// ============================================================================
// Entities
// ============================================================================

static ITEM: &[FieldSpec] = &[
    cm(req("x", Number)),
    cm(req("y", Number)),
    cm(req("z", Number)),
    req("refid", Text),
    opt("light", Object(Shape::ItemLight)),
    opt("materials", MapOrEmptyList(&Integer)),
    opt("features", Map(&Text)),
    opt("configuration", Object(Shape::ItemConfiguration)),
    opt("mirrored", FlagPair).default_value(DefaultValue::FlagPair([0, 0])),
    group_marker(),
    size(req("width", Number)),
    size(req("height", Number)),
    size(opt("z_height", Number))
        .default_value(DefaultValue::Derived(Derivation::HeightBelowFloorCeiling)),
    angle(req("rotation", Number)),
    angle(opt("rotation_x", Number)).default_value(DefaultValue::Number(0.0)),
    angle(opt("rotation_y", Number)).default_value(DefaultValue::Number(0.0)),
    size(req("snapDist", Number)),
];

static LINE: &[FieldSpec] = &[
    req("a", Object(Shape::Point)),
    req("b", Object(Shape::Point)),
    req("type", Enum(LINE_TYPES)),
    req("color", Color),
    group_marker(),
    px(req("thickness", Number)).range(Range::at_least(0.0), RangePolicy::Reject),
];

static WALL: &[FieldSpec] = &[
    req("a", Object(Shape::Point)),
    req("b", Object(Shape::Point)),
    opt("c", Object(Shape::Point)),
    req("az", Object(Shape::Endpoint)),
    req("bz", Object(Shape::Endpoint)),
    req("left", Object(Shape::OffsetLine)),
    req("right", Object(Shape::OffsetLine)),
    req("openings", List(Shape::Opening)),
    opt("decor", Object(Shape::WallDecorPair)),
    group_marker(),
    extent(req("thickness", Number)),
    fraction(req("balance", Number)),
];

static OPENING: &[FieldSpec] = &[
    req("type", Enum(OPENING_TYPES)),
    req("refid", Text),
    opt("name", Text),
    opt("showLabel", Boolean),
    opt("frontDoor", Boolean),
    opt("internalDoor", Boolean),
    opt("frameColor", Color),
    opt("materials", Map(&OPENING_MATERIAL)),
    fraction(req("t", Number)),
    cm(req("z", Number)),
    extent(req("z_height", Number)),
    extent(req("width", Number)),
    fraction(req("openState", Number)),
    px(opt("name_x", Number)),
    px(opt("name_y", Number)),
    opt("doorColor", Color),
    opt("mirrored", FlagPair).default_value(DefaultValue::Derived(Derivation::DoorUnmirrored)),
    opt("threshold", OneOf(THRESHOLDS))
        .default_value(DefaultValue::Derived(Derivation::DoorThresholdFromFrame)),
];

static GENERIC_AREA: &[FieldSpec] = &[
    angle(opt("rotation", Number)),
    px(opt("tx", Number)),
    px(opt("ty", Number)),
    px(opt("sx", Number)),
    px(opt("sy", Number)),
    opt("name", Text),
    opt("role", Integer),
    opt("refid", Text),
    opt("color", Color),
    opt("customName", Text),
    opt("hideIn3D", Boolean),
    opt("showAreaLabel", Boolean),
    opt("showSurfaceArea", Boolean),
    opt("dottedOutline", Boolean),
    opt("dottedOutlineColor", Color),
    opt("room_type_id", Integer),
    opt("roomstyle_id", Uuid),
    opt("styleboard_id", Integer),
    group_marker(),
    opt("pattern", IntEnum(PATTERNS)),
    cm(opt("name_x", Number)),
    cm(opt("name_y", Number)),
    angle(opt("patternRotation", Number)).default_value(DefaultValue::Number(0.0)),
    percent(opt("patternAlpha", Number)).default_value(DefaultValue::Number(100.0)),
    opt("patternScale", Number)
        .unit(Unit::Percentage)
        .range(Range::new(10.0, 400.0), RangePolicy::Clamp)
        .default_value(DefaultValue::Number(100.0)),
];

static AREA: &[FieldSpec] = &[
    req("poly", List(Shape::Vertex)),
    opt("ceiling", OneOf(AREA_CEILINGS)),
];

static SURFACE: &[FieldSpec] = &[
    req("poly", List(Shape::Vertex)),
    opt("ceiling", Object(Shape::SurfaceCeiling)),
    opt("isRoof", Boolean),
    opt("isCutout", Boolean),
    size(opt("thickness", Number)),
    percent(opt("transparency", Number)).default_value(DefaultValue::Number(0.0)),
];

static LABEL: &[FieldSpec] = &[
    cm(req("x", Number)),
    cm(req("y", Number)),
    req("text", Text),
    req("fontFamily", Text),
    req("fontColor", Color),
    req("backgroundColor", Color),
    req("align", Enum(ALIGNMENTS)),
    opt("bold", Boolean).default_value(DefaultValue::Bool(false)),
    opt("italic", Boolean).default_value(DefaultValue::Bool(false)),
    opt("outline", Boolean).default_value(DefaultValue::Bool(false)),
    opt("underline", Boolean).default_value(DefaultValue::Bool(false)),
    group_marker(),
    px(req("fontSize", Number)).range(Range::at_least(0.0), RangePolicy::Reject),
    px(req("letterSpacing", Number)),
    angle(req("rotation", Number)),
    percent(opt("backgroundAlpha", Number)).default_value(DefaultValue::Number(100.0)),
    percent(opt("fontAlpha", Number)).default_value(DefaultValue::Number(100.0)),
];

static CAMERA: &[FieldSpec] = &[
    cm(req("x", Number)),
    cm(req("y", Number)),
    cm(req("z", Number)),
    req("name", Text),
    req("type_name", Enum(CAMERA_TYPES)),
    req("lightSettings", Object(Shape::LightSettings)),
    opt(
        "background_image",
        Tagged {
            tag: "type_name",
            variants: BACKGROUND_IMAGES,
        },
    ),
    group_marker(),
    req("fov", Number).unit(Unit::Degree),
    req("dx", Number),
    req("dy", Number),
    req("dz", Number),
    req("ux", Number).range(Range::new(-1.0, 1.0), RangePolicy::Derived),
    req("uy", Number).range(Range::new(-1.0, 1.0), RangePolicy::Derived),
    req("uz", Number).range(Range::new(-1.0, 1.0), RangePolicy::Derived),
];

static FLOOR_CAMERA: &[FieldSpec] = &[req("id", Integer)];

// ============================================================================
// Nested objects
// ============================================================================

static POINT: &[FieldSpec] = &[cm(req("x", Number)), cm(req("y", Number))];

static VERTEX: &[FieldSpec] = &[
    cm(req("x", Number)),
    cm(req("y", Number)),
    cm(opt("z", Number)),
    cm(opt("cx", Number)),
    cm(opt("cy", Number)),
    cm(opt("cz", Number)),
];

static ENDPOINT: &[FieldSpec] = &[cm(req("z", Number)), cm(req("h", Number))];

static OFFSET_LINE: &[FieldSpec] = &[req("a", Object(Shape::Point)), req("b", Object(Shape::Point))];

static ITEM_LIGHT: &[FieldSpec] = &[
    req("on", Boolean),
    req("color", Color),
    req("watt", Number).range(Range::at_least(0.0), RangePolicy::Reject),
];

static ITEM_CONFIGURATION: &[FieldSpec] = &[req("type", Enum(CONFIGURATORS)), req("id", Uuid)];

static WALL_DECOR_PAIR: &[FieldSpec] = &[
    opt("left", OneOf(WALL_DECORS)),
    opt("right", OneOf(WALL_DECORS)),
];

static DECOR_TEXTURE: &[FieldSpec] = &[req("texture", Object(Shape::Texture))];

static DECOR_COMPONENT: &[FieldSpec] = &[req("refid", Text)];

static DECOR_COLOR: &[FieldSpec] = &[req("color", Color)];

static TEXTURE: &[FieldSpec] = &[
    req("src", Text),
    cm(req("tlx", Number)),
    cm(req("tly", Number)),
    cm(req("brx", Number)),
    cm(req("bry", Number)),
    req("fit", Enum(TEXTURE_FITS)),
];

static OPENING_MATERIAL_COLOR: &[FieldSpec] = &[req("type", Text), req("value", Color)];

static OPENING_MATERIAL_ASSET: &[FieldSpec] = &[req("type", Text), req("value", Text)];

static OPENING_MATERIAL_VARIANT: &[FieldSpec] = &[req("type", Text), req("value", Integer)];

static THRESHOLD_COLOR: &[FieldSpec] = &[
    req("color", Color),
    opt("id", MaterialId),
    opt("name", Text),
    opt("url2d", Text),
    opt("thumb", Object(Shape::Thumb)),
];

/// Always partial where it appears (thresholds, ceiling assets)
static MATERIAL_METADATA: &[FieldSpec] = &[
    opt("id", MaterialId),
    opt("name", Text),
    opt("url2d", Text),
    opt("thumb", Object(Shape::Thumb)),
];

static THUMB: &[FieldSpec] = &[req("thumb2D", Text), req("thumb3D", Text)];

static AREA_CEILING_COLOR: &[FieldSpec] = &[req("enabled", Boolean), req("color", Color)];

static AREA_CEILING_COMPONENT: &[FieldSpec] = &[req("enabled", Boolean), req("refid", Text)];

static SURFACE_CEILING: &[FieldSpec] = &[
    req("enabled", Boolean),
    opt("color", Color),
    opt("asset", Object(Shape::MaterialMetadata)),
];

static LIGHT_SETTINGS: &[FieldSpec] = &[
    req("day", Boolean),
    req("dayTime", Enum(DAY_TIMES)),
    req("scene", Enum(SCENES)),
    req("profile", Boolean),
    req("clouds", IntEnum(CLOUDS)),
    req("altitude", Number).unit(Unit::Degree),
    req("azimuth", Number).unit(Unit::Degree),
    percent(req("intensity", Number)),
];

static BACKGROUND_PLANE: &[FieldSpec] = &[req("type_name", Text), req("url", Text)];

static BACKGROUND_SPHERE: &[FieldSpec] = &[
    req("type_name", Text),
    req("url", Text),
    req("sky_id", Integer),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_field_names() {
        for &shape in ALL_SHAPES {
            let names: Vec<_> = shape.fields().map(|f| f.name).collect();
            let mut sorted = names.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len(), "duplicate field in {}", shape);
        }
    }

    #[test]
    fn test_defaults_only_on_optional_fields() {
        for &shape in ALL_SHAPES {
            for spec in shape.fields() {
                if spec.default.is_some() {
                    assert!(!spec.required, "{}.{} has a default", shape, spec.name);
                }
            }
        }
    }

    #[test]
    fn test_default_table() {
        let default = |shape: Shape, name: &str| shape.field(name).and_then(|f| f.default);
        assert_eq!(default(Shape::Item, "mirrored"), Some(DefaultValue::FlagPair([0, 0])));
        assert_eq!(default(Shape::Item, "rotation_x"), Some(DefaultValue::Number(0.0)));
        assert_eq!(default(Shape::Surface, "transparency"), Some(DefaultValue::Number(0.0)));
        assert_eq!(default(Shape::Area, "patternScale"), Some(DefaultValue::Number(100.0)));
        assert_eq!(default(Shape::Drawing, "depth"), Some(DefaultValue::Text("HIGH")));
        assert_eq!(
            default(Shape::Opening, "threshold"),
            Some(DefaultValue::Derived(Derivation::DoorThresholdFromFrame))
        );
        assert_eq!(default(Shape::Wall, "balance"), None);
    }

    #[test]
    fn test_angles_wrap() {
        for (shape, name) in [
            (Shape::Item, "rotation"),
            (Shape::Label, "rotation"),
            (Shape::Drawing, "rotation"),
            (Shape::Area, "patternRotation"),
            (Shape::ProjectSettings, "northArrowRotation"),
        ] {
            let spec = shape.field(name).unwrap();
            assert_eq!(spec.policy, RangePolicy::Wrap, "{}.{}", shape, name);
            assert_eq!(spec.unit, Some(Unit::Degree));
        }
    }
}
