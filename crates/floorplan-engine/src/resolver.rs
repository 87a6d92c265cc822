// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference Resolver - catalog lookups for every id a document mentions
//!
//! References are collected in document order, looked up through the
//! injected [`Catalog`] with bounded fan-out, and returned as an explicit
//! handle table. Answers keep the collection order regardless of which
//! lookup finished first.

use floorplan_model::{
    is_material_asset_id, is_uuid, rule, AreaStyle, Catalog, CatalogExt, Category, Design,
    EntityKind, EntityPath, Finding, Lookup, OpeningMaterial, Project, RefTarget, Reference,
    ResolvedReference, Result, Severity, WallDecor,
};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, trace};

/// A reference found in the document, not yet looked up
#[derive(Clone, Debug, PartialEq)]
pub struct PendingReference {
    pub path: EntityPath,
    pub field: String,
    pub target: RefTarget,
}

impl PendingReference {
    fn new(path: EntityPath, field: impl Into<String>, target: RefTarget) -> Self {
        Self {
            path,
            field: field.into(),
            target,
        }
    }
}

/// Handle table plus the findings for dangling ids
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub references: Vec<ResolvedReference>,
    pub findings: Vec<Finding>,
}

impl Resolution {
    pub fn unresolved(&self) -> impl Iterator<Item = &ResolvedReference> {
        self.references.iter().filter(|r| !r.reference.is_resolved())
    }
}

/// Resolves document references against a catalog
pub struct ReferenceResolver<'c> {
    catalog: &'c dyn Catalog,
    concurrency: usize,
}

impl<'c> ReferenceResolver<'c> {
    pub fn new(catalog: &'c dyn Catalog) -> Self {
        Self {
            catalog,
            concurrency: 16,
        }
    }

    /// Limit the number of lookups in flight (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Resolve a single target
    pub async fn resolve(&self, target: &RefTarget) -> Result<Reference> {
        let lookup = self.catalog.lookup(target).await?;
        Ok(reference(target.clone(), lookup))
    }

    /// Resolve every reference of a project
    ///
    /// A missing id becomes an `unresolved-reference` finding; a catalog
    /// failure aborts with `Error::CatalogUnavailable`.
    pub async fn resolve_project(&self, project: &Project) -> Result<Resolution> {
        let pending = collect_references(project);
        debug!(
            "Resolving {} references with {} lookups in flight",
            pending.len(),
            self.concurrency
        );

        let catalog = self.catalog;
        let answers: Vec<Lookup> = stream::iter(pending.iter())
            .map(|p| async move {
                trace!("lookup {} at {}", p.target, p.path);
                catalog.lookup(&p.target).await
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut resolution = Resolution::default();
        for (p, answer) in pending.into_iter().zip(answers) {
            if answer == Lookup::Missing {
                resolution.findings.push(
                    Finding::new(
                        p.path,
                        rule::UNRESOLVED_REFERENCE,
                        Severity::Error,
                        Category::Reference,
                        format!("{} not found in catalog", p.target),
                    )
                    .with_field(p.field.clone()),
                );
            }
            resolution.references.push(ResolvedReference {
                path: p.path,
                field: p.field,
                reference: reference(p.target, answer),
            });
        }
        debug!(
            "Resolved references: {} unresolved",
            resolution.findings.len()
        );
        Ok(resolution)
    }
}

fn reference(target: RefTarget, lookup: Lookup) -> Reference {
    match lookup {
        Lookup::Found(handle) => Reference::Resolved { target, handle },
        Lookup::Missing => Reference::Unresolved { target },
    }
}

/// Every catalog reference of a project, in document order
pub fn collect_references(project: &Project) -> Vec<PendingReference> {
    let mut out = Vec::new();
    for (fi, di, design) in project.designs() {
        collect_design(fi, di, design, &mut out);
    }
    out
}

fn collect_design(fi: usize, di: usize, design: &Design, out: &mut Vec<PendingReference>) {
    for (i, item) in design.items.iter().enumerate() {
        let path = EntityPath::entity(fi, di, EntityKind::Item, i);
        out.push(PendingReference::new(path, "refid", RefTarget::component(&item.refid)));
        if let Some(materials) = &item.materials {
            for (name, variant) in materials.assignments() {
                out.push(PendingReference::new(
                    path,
                    format!("materials.{}", name),
                    RefTarget::material_variant(name, variant),
                ));
            }
        }
    }

    for (wi, wall) in design.walls.iter().enumerate() {
        for (oi, opening) in wall.openings.iter().enumerate() {
            let path = EntityPath::opening(fi, di, wi, oi);
            out.push(PendingReference::new(path, "refid", RefTarget::component(&opening.refid)));
            for (name, material) in opening.materials.iter().flatten() {
                let field = format!("materials.{}", name);
                match material {
                    OpeningMaterial::Asset(id) => {
                        out.push(PendingReference::new(path, field, RefTarget::component(id)))
                    }
                    OpeningMaterial::Variant(variant) => out.push(PendingReference::new(
                        path,
                        field,
                        RefTarget::material_variant(name, *variant),
                    )),
                    OpeningMaterial::Color(_) => {}
                }
            }
            if let Some(threshold) = &opening.threshold {
                let id = threshold.material().id.as_deref();
                if let Some(id) = id.filter(|id| is_material_asset_id(id)) {
                    out.push(PendingReference::new(
                        path,
                        "threshold.id",
                        RefTarget::MaterialAsset { id: id.to_string() },
                    ));
                }
            }
        }

        let path = EntityPath::entity(fi, di, EntityKind::Wall, wi);
        if let Some(decor) = &wall.decor {
            for (side, face) in [("left", &decor.left), ("right", &decor.right)] {
                if let Some(WallDecor::Component { refid }) = face {
                    out.push(PendingReference::new(
                        path,
                        format!("decor.{}.refid", side),
                        RefTarget::component(refid),
                    ));
                }
            }
        }
    }

    for (i, area) in design.areas.iter().enumerate() {
        let path = EntityPath::entity(fi, di, EntityKind::Area, i);
        collect_style(path, &area.style, out);
    }
    for (i, surface) in design.surfaces.iter().enumerate() {
        let path = EntityPath::entity(fi, di, EntityKind::Surface, i);
        collect_style(path, &surface.style, out);
    }
}

fn collect_style(path: EntityPath, style: &AreaStyle, out: &mut Vec<PendingReference>) {
    if let Some(refid) = &style.refid {
        out.push(PendingReference::new(path, "refid", RefTarget::component(refid)));
    }
    if let Some(ceiling) = &style.ceiling {
        if let Some(refid) = &ceiling.refid {
            out.push(PendingReference::new(path, "ceiling.refid", RefTarget::component(refid)));
        }
        let asset_id = ceiling.asset.as_ref().and_then(|a| a.id.as_deref());
        if let Some(id) = asset_id.filter(|id| is_material_asset_id(id)) {
            out.push(PendingReference::new(
                path,
                "ceiling.asset.id",
                RefTarget::MaterialAsset { id: id.to_string() },
            ));
        }
    }
    // malformed UUIDs are already reported by the schema check
    if let Some(id) = style.roomstyle_id.as_deref().filter(|id| is_uuid(id)) {
        out.push(PendingReference::new(
            path,
            "roomstyle_id",
            RefTarget::RoomStyle { id: id.to_string() },
        ));
    }
    if let Some(id) = style.room_type_id {
        out.push(PendingReference::new(path, "room_type_id", RefTarget::RoomType { id }));
    }
}
