// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog capability and resolved reference handles
//!
//! Components, materials, variants and room styles are owned by an external
//! catalog service. Documents reference them by id; the engine only asks the
//! catalog whether an id exists.

use crate::{CatalogError, EntityPath};
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::fmt;

/// Result of a catalog call
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Opaque key returned by the catalog for a resolved id
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CatalogHandle(pub String);

impl CatalogHandle {
    pub fn new(key: impl Into<String>) -> Self {
        CatalogHandle(key.into())
    }
}

impl fmt::Display for CatalogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer of a single lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Found(CatalogHandle),
    Missing,
}

/// External catalog of components, material variants and room styles
///
/// Every method is a potentially remote call. A `CatalogError` means the
/// catalog itself failed and aborts the whole validation run; a missing id is
/// `Ok(Lookup::Missing)`.
///
/// # Example
///
/// ```ignore
/// use floorplan_model::{Catalog, Lookup};
///
/// async fn has_sofa(catalog: &dyn Catalog) -> bool {
///     matches!(catalog.lookup_component("sofa-3").await, Ok(Lookup::Found(_)))
/// }
/// ```
pub trait Catalog: Send + Sync {
    /// Look up a component (item, opening, decor asset) by id
    fn lookup_component<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>>;

    /// Look up a variant of a named material
    fn lookup_material_variant<'a>(
        &'a self,
        material: &'a str,
        variant: i64,
    ) -> BoxFuture<'a, CatalogResult<Lookup>>;

    /// Look up a room style by UUID
    fn lookup_room_style<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>>;

    /// Look up a room type by numeric id
    fn lookup_room_type(&self, id: i64) -> BoxFuture<'_, CatalogResult<Lookup>>;

    /// Look up a material asset (`rs-<n>` id of embedded material metadata)
    fn lookup_material_asset<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>>;
}

/// Something a document points at in the catalog
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefTarget {
    Component { id: String },
    MaterialVariant { material: String, variant: i64 },
    RoomStyle { id: String },
    RoomType { id: i64 },
    MaterialAsset { id: String },
}

impl RefTarget {
    pub fn component(id: impl Into<String>) -> Self {
        RefTarget::Component { id: id.into() }
    }

    pub fn material_variant(material: impl Into<String>, variant: i64) -> Self {
        RefTarget::MaterialVariant {
            material: material.into(),
            variant,
        }
    }

    /// Short name of the target kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            RefTarget::Component { .. } => "component",
            RefTarget::MaterialVariant { .. } => "material variant",
            RefTarget::RoomStyle { .. } => "room style",
            RefTarget::RoomType { .. } => "room type",
            RefTarget::MaterialAsset { .. } => "material asset",
        }
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Component { id }
            | RefTarget::RoomStyle { id }
            | RefTarget::MaterialAsset { id } => write!(f, "{} '{}'", self.kind_name(), id),
            RefTarget::MaterialVariant { material, variant } => {
                write!(f, "material '{}' variant {}", material, variant)
            }
            RefTarget::RoomType { id } => write!(f, "room type {}", id),
        }
    }
}

/// Extension methods for Catalog
pub trait CatalogExt: Catalog {
    /// Dispatch a lookup by target kind
    fn lookup<'a>(&'a self, target: &'a RefTarget) -> BoxFuture<'a, CatalogResult<Lookup>> {
        match target {
            RefTarget::Component { id } => self.lookup_component(id),
            RefTarget::MaterialVariant { material, variant } => {
                self.lookup_material_variant(material, *variant)
            }
            RefTarget::RoomStyle { id } => self.lookup_room_style(id),
            RefTarget::RoomType { id } => self.lookup_room_type(*id),
            RefTarget::MaterialAsset { id } => self.lookup_material_asset(id),
        }
    }
}

// Blanket implementation for all Catalog types
impl<T: Catalog + ?Sized> CatalogExt for T {}

/// A weak reference after resolution
///
/// Downstream stages only ever see this type, never a raw id, so an
/// unresolved id cannot be used by accident.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reference {
    Resolved {
        target: RefTarget,
        handle: CatalogHandle,
    },
    Unresolved {
        target: RefTarget,
    },
}

impl Reference {
    pub fn target(&self) -> &RefTarget {
        match self {
            Reference::Resolved { target, .. } | Reference::Unresolved { target } => target,
        }
    }

    pub fn handle(&self) -> Option<&CatalogHandle> {
        match self {
            Reference::Resolved { handle, .. } => Some(handle),
            Reference::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved { .. })
    }
}

/// A reference together with where it was found
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    pub path: EntityPath,
    /// Field holding the id, e.g. `refid` or `materials.seat`
    pub field: String,
    pub reference: Reference,
}
