// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan Model - Document types and shared contracts for floor-plan validation
//!
//! This crate defines the typed document tree of a floor-plan / interior-design
//! project together with everything the validation stages share: the Schema
//! Registry, the report model and the catalog capability.
//!
//! # Architecture
//!
//! - [`Project`], [`Floor`], [`Design`] - the ownership hierarchy
//! - [`Wall`], [`Opening`], [`Item`], [`Area`], [`Surface`], [`Label`], [`Line`],
//!   [`Camera`] - design entities, with exact interchange field names
//! - [`Shape`] / [`FieldSpec`] - static field constraints (Schema Registry)
//! - [`Finding`] / [`Report`] - structured, ordered validation results
//! - [`Catalog`] - injected capability for resolving component, material and
//!   room style ids
//!
//! # Example
//!
//! ```ignore
//! use floorplan_model::{Project, Shape};
//!
//! let project: Project = serde_json::from_str(json)?;
//! for (floor, design, d) in project.designs() {
//!     println!("{}/{}: {} walls", floor, design, d.walls.len());
//! }
//!
//! let required: Vec<_> = Shape::Wall.required_fields().collect();
//! ```

pub mod catalog;
pub mod document;
pub mod entities;
pub mod error;
mod fields;
pub mod report;
pub mod schema;
pub mod types;

// Re-export all public types
pub use catalog::*;
pub use document::*;
pub use entities::*;
pub use error::*;
pub use fields::ALL_SHAPES;
pub use report::*;
pub use schema::*;
pub use types::*;
