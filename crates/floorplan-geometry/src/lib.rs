// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Geometry Validation (Rule-Based)
//!
//! Geometric invariants of floor-plan documents: wall face lines, opening
//! placement, polygon validity and camera vectors.
//!
//! ## Overview
//!
//! - **Wall frames**: offset lines derived from centerline, thickness and balance
//! - **Openings**: spans along the wall parameter, overlap and height checks
//! - **Polygons**: winding, closure, duplicates, self-intersection sweep, curve controls
//! - **Cameras**: up/direction angle, unit length, editor sentinel
//! - **Normalization**: in-place canonicalization of walls, polygons and cameras
//!
//! ## Architecture
//!
//! - `GeometryRule`: trait for individual rules, registered per entity kind
//! - `GeometryValidator`: routes entities to rules and walks a project in
//!   document order; `validate_projects` checks many projects in parallel
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use floorplan_geometry::GeometryValidator;
//!
//! let validator = GeometryValidator::with_default_rules();
//! let report = validator.validate_project(&project);
//!
//! for finding in report.findings() {
//!     println!("{}", finding);
//! }
//! ```

pub mod camera;
pub mod error;
pub mod normalize;
pub mod options;
pub mod polygon;
pub mod router;
pub mod rules;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2, Vector3};

// Re-export main types
pub use error::{Error, Result};
pub use normalize::{normalize_camera, normalize_polygon, normalize_wall};
pub use options::GeometryOptions;
pub use router::{Entity, EntityRef, GeometryRule, GeometryValidator, Scope};
pub use wall::{offset_lines, EndpointGap, WallFrame};

// Re-export rules
pub use rules::{CameraRule, OpeningRule, PolygonRule, WallRule};
