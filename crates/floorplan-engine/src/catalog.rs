// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory catalog
//!
//! Answers lookups from id sets loaded up front, e.g. from a JSON export of
//! the catalog service:
//!
//! ```json
//! {
//!   "components": ["sofa-3", "door-90"],
//!   "material_variants": {"fabric": [12, 14]},
//!   "room_styles": ["67e55044-10b1-426f-9247-bb680e5fe0c8"],
//!   "room_types": [4],
//!   "material_assets": ["rs-9"]
//! }
//! ```

use floorplan_model::{Catalog, CatalogHandle, CatalogResult, Lookup};
use futures_util::future::BoxFuture;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InMemoryCatalog {
    components: FxHashSet<String>,
    material_variants: FxHashMap<String, FxHashSet<i64>>,
    room_styles: FxHashSet<String>,
    room_types: FxHashSet<i64>,
    material_assets: FxHashSet<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog export
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_component(mut self, id: impl Into<String>) -> Self {
        self.components.insert(id.into());
        self
    }

    pub fn with_material_variant(mut self, material: impl Into<String>, variant: i64) -> Self {
        self.material_variants
            .entry(material.into())
            .or_default()
            .insert(variant);
        self
    }

    pub fn with_room_style(mut self, id: impl Into<String>) -> Self {
        self.room_styles.insert(id.into());
        self
    }

    pub fn with_room_type(mut self, id: i64) -> Self {
        self.room_types.insert(id);
        self
    }

    pub fn with_material_asset(mut self, id: impl Into<String>) -> Self {
        self.material_assets.insert(id.into());
        self
    }

    /// Total number of known ids
    pub fn len(&self) -> usize {
        self.components.len()
            + self.material_variants.values().map(|v| v.len()).sum::<usize>()
            + self.room_styles.len()
            + self.room_types.len()
            + self.material_assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn answer(found: bool, handle: impl FnOnce() -> String) -> CatalogResult<Lookup> {
    Ok(if found {
        Lookup::Found(CatalogHandle(handle()))
    } else {
        Lookup::Missing
    })
}

impl Catalog for InMemoryCatalog {
    fn lookup_component<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async move { answer(self.components.contains(id), || format!("component:{}", id)) })
    }

    fn lookup_material_variant<'a>(
        &'a self,
        material: &'a str,
        variant: i64,
    ) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async move {
            let found = self
                .material_variants
                .get(material)
                .map(|variants| variants.contains(&variant))
                .unwrap_or(false);
            answer(found, || format!("material:{}/{}", material, variant))
        })
    }

    fn lookup_room_style<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async move { answer(self.room_styles.contains(id), || format!("roomstyle:{}", id)) })
    }

    fn lookup_room_type(&self, id: i64) -> BoxFuture<'_, CatalogResult<Lookup>> {
        Box::pin(async move { answer(self.room_types.contains(&id), || format!("roomtype:{}", id)) })
    }

    fn lookup_material_asset<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async move {
            answer(self.material_assets.contains(id), || format!("asset:{}", id))
        })
    }
}
