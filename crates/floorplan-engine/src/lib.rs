// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Consistency Engine
//!
//! Validates floor-plan documents and produces their canonical form.
//!
//! ## Pipeline
//!
//! 1. **Schema check**: the raw JSON tree is walked against the Schema
//!    Registry. Structural errors reject the document.
//! 2. **Reference resolution**: every catalog id is looked up through an
//!    injected [`Catalog`](floorplan_model::Catalog) with bounded fan-out.
//! 3. **Geometry validation**: walls, openings, polygons and cameras.
//! 4. **Normalization**: defaults, range corrections and geometric fixes on
//!    a copy of the document.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use floorplan_engine::{ConsistencyChecker, InMemoryCatalog};
//!
//! let catalog = InMemoryCatalog::new().with_component("sofa-3");
//! let checker = ConsistencyChecker::new(&catalog);
//! let outcome = checker.check_str(&json).await?;
//!
//! for finding in outcome.report.findings() {
//!     println!("{}", finding);
//! }
//! ```

#![recursion_limit = "256"]

pub mod catalog;
pub mod checker;
pub mod normalizer;
pub mod options;
pub mod resolver;
pub mod schema_check;

pub use catalog::InMemoryCatalog;
pub use checker::{ConsistencyChecker, Outcome, Stage};
pub use normalizer::{NormalizeSummary, Normalizer};
pub use options::ValidationOptions;
pub use resolver::{collect_references, PendingReference, ReferenceResolver, Resolution};
pub use schema_check::check_document;
