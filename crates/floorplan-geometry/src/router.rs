// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Validator - Dynamic dispatch to geometry rules
//!
//! Routes design entities to the rules registered for their kind and walks
//! the document in order, so findings come out deterministic.

use crate::GeometryOptions;
use floorplan_model::{
    Area, Camera, Design, EntityKind, EntityPath, Finding, Floor, Project, Report, Surface, Wall,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Entity handed to a rule
#[derive(Clone, Copy, Debug)]
pub enum Entity<'a> {
    Wall(&'a Wall),
    Area(&'a Area),
    Surface(&'a Surface),
    /// Design camera or legacy floor camera, see [`EntityRef::kind`]
    Camera(&'a Camera),
}

/// An entity together with its location
#[derive(Clone, Copy, Debug)]
pub struct EntityRef<'a> {
    pub path: EntityPath,
    pub entity: Entity<'a>,
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        self.path.kind
    }
}

/// Where a rule is being applied
#[derive(Clone, Copy, Debug)]
pub struct Scope<'a> {
    pub floor_index: usize,
    pub floor: &'a Floor,
    /// Design index and design; `None` for entities owned by the floor
    pub design: Option<(usize, &'a Design)>,
    pub options: &'a GeometryOptions,
}

/// Geometry rule trait
///
/// Each rule checks one or more entity kinds. Rules are pure: they read the
/// entity and its scope and return findings.
pub trait GeometryRule: Send + Sync {
    /// Check a single entity
    fn check(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding>;

    /// Check relations between entities of one design (runs once per design)
    fn check_design(&self, _design: &Design, _scope: &Scope<'_>) -> Vec<Finding> {
        Vec::new()
    }

    /// Entity kinds this rule applies to
    fn supported_kinds(&self) -> Vec<EntityKind>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Geometry validator - routes entities to rules
pub struct GeometryValidator {
    /// Registered rules by entity kind, in registration order
    rules: FxHashMap<EntityKind, Vec<Arc<dyn GeometryRule>>>,
    /// Every registered rule once, for design-level checks
    registered: Vec<Arc<dyn GeometryRule>>,
    options: GeometryOptions,
}

impl GeometryValidator {
    /// Create a validator without any rules registered
    pub fn new() -> Self {
        Self {
            rules: FxHashMap::default(),
            registered: Vec::new(),
            options: GeometryOptions::default(),
        }
    }

    /// Create a validator with the default rules registered
    ///
    /// Registers the following rules:
    /// - `WallRule` (Wall)
    /// - `OpeningRule` (Wall, checks the wall's openings)
    /// - `PolygonRule` (Area, Surface)
    /// - `CameraRule` (Camera, FloorCamera)
    pub fn with_default_rules() -> Self {
        use crate::rules::{CameraRule, OpeningRule, PolygonRule, WallRule};

        let mut validator = Self::new();
        validator.register(Arc::new(WallRule::new()));
        validator.register(Arc::new(OpeningRule::new()));
        validator.register(Arc::new(PolygonRule::new()));
        validator.register(Arc::new(CameraRule::new()));
        validator
    }

    /// Create a validator with default rules and specific tolerances
    pub fn with_options(options: GeometryOptions) -> Self {
        let mut validator = Self::with_default_rules();
        validator.options = options;
        validator
    }

    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GeometryOptions) {
        self.options = options;
    }

    /// Register a geometry rule
    pub fn register(&mut self, rule: Arc<dyn GeometryRule>) {
        for kind in rule.supported_kinds() {
            self.rules.entry(kind).or_default().push(Arc::clone(&rule));
        }
        self.registered.push(rule);
    }

    /// Check if a kind has at least one registered rule
    pub fn has_rule(&self, kind: EntityKind) -> bool {
        self.rules.get(&kind).map(|r| !r.is_empty()).unwrap_or(false)
    }

    /// Apply the rules of the entity's kind
    pub fn check_entity(&self, entity: EntityRef<'_>, scope: &Scope<'_>) -> Vec<Finding> {
        match self.rules.get(&entity.kind()) {
            Some(rules) => rules
                .iter()
                .flat_map(|rule| rule.check(entity, scope))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Validate one design: entity rules in document order, then design-level rules
    pub fn validate_design(&self, floor_index: usize, floor: &Floor, design_index: usize, design: &Design) -> Vec<Finding> {
        let scope = Scope {
            floor_index,
            floor,
            design: Some((design_index, design)),
            options: &self.options,
        };
        let at = |kind, index| EntityPath::entity(floor_index, design_index, kind, index);

        let mut findings = Vec::new();
        for (i, wall) in design.walls.iter().enumerate() {
            let entity = EntityRef {
                path: at(EntityKind::Wall, i),
                entity: Entity::Wall(wall),
            };
            findings.extend(self.check_entity(entity, &scope));
        }
        for (i, area) in design.areas.iter().enumerate() {
            let entity = EntityRef {
                path: at(EntityKind::Area, i),
                entity: Entity::Area(area),
            };
            findings.extend(self.check_entity(entity, &scope));
        }
        for (i, camera) in design.cameras.iter().enumerate() {
            let entity = EntityRef {
                path: at(EntityKind::Camera, i),
                entity: Entity::Camera(camera),
            };
            findings.extend(self.check_entity(entity, &scope));
        }
        for (i, surface) in design.surfaces.iter().enumerate() {
            let entity = EntityRef {
                path: at(EntityKind::Surface, i),
                entity: Entity::Surface(surface),
            };
            findings.extend(self.check_entity(entity, &scope));
        }
        for rule in &self.registered {
            findings.extend(rule.check_design(design, &scope));
        }
        findings
    }

    /// Validate a whole project
    pub fn validate_project(&self, project: &Project) -> Report {
        let mut findings = Vec::new();
        for (fi, floor) in project.floors.iter().enumerate() {
            if let Some(cameras) = &floor.cameras {
                let scope = Scope {
                    floor_index: fi,
                    floor,
                    design: None,
                    options: &self.options,
                };
                for (i, camera) in cameras.iter().enumerate() {
                    let entity = EntityRef {
                        path: EntityPath::in_floor(fi, EntityKind::FloorCamera, Some(i)),
                        entity: Entity::Camera(&camera.camera),
                    };
                    findings.extend(self.check_entity(entity, &scope));
                }
            }
            for (di, design) in floor.designs.iter().enumerate() {
                findings.extend(self.validate_design(fi, floor, di, design));
            }
        }
        Report::from_findings(findings)
    }

    /// Validate many projects in parallel, keeping input order
    pub fn validate_projects(&self, projects: &[Project]) -> Vec<Report> {
        projects
            .par_iter()
            .map(|project| self.validate_project(project))
            .collect()
    }
}

impl Default for GeometryValidator {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
