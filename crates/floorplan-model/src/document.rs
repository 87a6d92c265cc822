// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document hierarchy: Project → Floor → Design
//!
//! A project exclusively owns its floors, a floor its designs and a design its
//! entity collections. Nothing is shared across designs.

use crate::{Area, Camera, FloorCamera, Item, Label, Line, Surface, Wall};
use serde::{Deserialize, Serialize};

/// Root of a floor-plan document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub public: bool,
    pub floors: Vec<Floor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
}

impl Project {
    /// Iterate `(floor index, design index, design)` in document order
    pub fn designs(&self) -> impl Iterator<Item = (usize, usize, &Design)> {
        self.floors.iter().enumerate().flat_map(|(fi, floor)| {
            floor
                .designs
                .iter()
                .enumerate()
                .map(move |(di, design)| (fi, di, design))
        })
    }

    /// Total number of walls over all designs
    pub fn wall_count(&self) -> usize {
        self.designs().map(|(_, _, d)| d.walls.len()).sum()
    }
}

/// One storey of the project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub designs: Vec<Design>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing: Option<Drawing>,
    /// Legacy camera location, cameras now live on designs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cameras: Option<Vec<FloorCamera>>,
    /// Default wall height for new walls
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawingDepth {
    #[serde(rename = "LOW")]
    Low,
    #[default]
    #[serde(rename = "HIGH")]
    High,
}

/// Background drawing (scanned plan) of a floor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub url: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<DrawingDepth>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub alpha: f64,
}

/// The editable scene of a floor
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Design {
    pub id: i64,
    pub name: String,
    pub items: Vec<Item>,
    pub lines: Vec<Line>,
    pub walls: Vec<Wall>,
    pub areas: Vec<Area>,
    pub labels: Vec<Label>,
    pub cameras: Vec<Camera>,
    pub surfaces: Vec<Surface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DesignSettings>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignSettings {
    #[serde(rename = "showCeilings3D")]
    pub show_ceilings_3d: bool,
    #[serde(rename = "engineAutoDims")]
    pub engine_auto_dims: bool,
    #[serde(rename = "engineAutoThickness")]
    pub engine_auto_thickness: bool,
    #[serde(rename = "scaleMultiplierDimensions")]
    pub scale_multiplier_dimensions: f64,
    #[serde(rename = "scaleMultiplierComments")]
    pub scale_multiplier_comments: f64,
    #[serde(rename = "areaLabelMultiplier")]
    pub area_label_multiplier: f64,
    #[serde(
        rename = "minWallLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_wall_length: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowHeadType {
    ArrowStop,
    Stop,
    ReverseArrowStop,
    Arrow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visuals {
    All,
    Bw,
    Bwc,
}

/// Project-wide display and drawing defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub use_metric: bool,
    pub show_grid: bool,
    pub show_dims: bool,
    pub show_short_dims: bool,
    pub show_area_dims: bool,
    pub generate_outer_dimension: bool,
    pub show_drop_shadows: bool,
    pub show_objects: bool,
    pub show_fixtures: bool,
    #[serde(rename = "showFixtures3D")]
    pub show_fixtures_3d: bool,
    pub show_item_outline: bool,
    pub show_object_colour: bool,
    pub show_structural_colour: bool,
    pub show_floors_below: bool,
    pub show_north_arrow: bool,
    #[serde(rename = "showObjects3D")]
    pub show_objects_3d: bool,
    pub show_object_mono: bool,
    pub show_symbols: bool,
    pub show_lights: bool,
    pub hide_lights_on_pan: bool,
    #[serde(rename = "useSection3D")]
    pub use_section_3d: bool,
    pub show_labels: bool,
    pub area_label_outline: bool,
    pub automatic_area_label_color: bool,
    pub blueprint_mode: bool,
    pub dim_line_font: String,
    pub dim_line_label_horizontal: bool,
    #[serde(rename = "exportLabels3D")]
    pub export_labels_3d: bool,
    #[serde(rename = "showShadows3D")]
    pub show_shadows_3d: bool,
    #[serde(rename = "exportOrtho3D")]
    pub export_ortho_3d: bool,
    pub show_texts: bool,
    pub hide_items_above: bool,
    pub x_ray_walls: bool,
    pub arrow_head_type: ArrowHeadType,
    pub visuals: Visuals,
    pub wall_height: f64,
    pub wall_section_height: f64,
    pub wall_thickness: f64,
    pub wall_outer_thickness: f64,
    pub area_label_letter_spacing: f64,
    pub north_arrow_rotation: f64,
    pub north_arrow_kind: i64,
    pub hide_items_above_height: f64,
}
