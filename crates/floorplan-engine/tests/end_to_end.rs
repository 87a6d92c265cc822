// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full pipeline scenarios

#![recursion_limit = "256"]

use approx::assert_relative_eq;
use floorplan_engine::{ConsistencyChecker, InMemoryCatalog, Normalizer, Stage, ValidationOptions};
use floorplan_model::{
    rule, Catalog, CatalogError, CatalogResult, EntityKind, EntityPath, Error, Lookup, Project,
};
use futures_util::future::BoxFuture;
use serde_json::{json, Value};

fn project(design: Value) -> Value {
    let mut base = json!({
        "id": 1, "name": "main", "items": [], "lines": [], "walls": [], "areas": [],
        "labels": [], "cameras": [], "surfaces": []
    });
    if let (Some(map), Value::Object(extra)) = (base.as_object_mut(), design) {
        map.extend(extra);
    }
    json!({
        "id": 42, "name": "apartment", "public": false,
        "floors": [{"id": 1, "name": "ground", "level": 0, "height": 250, "designs": [base]}]
    })
}

fn straight_wall(openings: Value) -> Value {
    json!({
        "a": {"x": 0, "y": 0}, "b": {"x": 400, "y": 0},
        "az": {"z": 0, "h": 250}, "bz": {"z": 0, "h": 250},
        "left": {"a": {"x": 0, "y": -5}, "b": {"x": 400, "y": -5}},
        "right": {"a": {"x": 0, "y": 5}, "b": {"x": 400, "y": 5}},
        "openings": openings,
        "thickness": 10, "balance": 0.5
    })
}

fn door(t: f64) -> Value {
    json!({"type": "door", "refid": "door-90", "t": t, "width": 120, "z": 0, "z_height": 210,
           "openState": 0})
}

fn camera(up: [f64; 3]) -> Value {
    json!({
        "x": 100, "y": 100, "z": 160, "name": "entry", "type_name": "walkthrough",
        "lightSettings": {"day": true, "dayTime": "Midday", "scene": "SKY", "profile": false,
                          "clouds": 1, "altitude": 45, "azimuth": 0, "intensity": 80},
        "fov": 60, "dx": 1, "dy": 0, "dz": 0, "ux": up[0], "uy": up[1], "uz": up[2]
    })
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new().with_component("door-90")
}

#[tokio::test]
async fn test_door_in_wall_is_accepted_clean() {
    let catalog = catalog();
    let checker = ConsistencyChecker::new(&catalog);
    let outcome = checker
        .check(&project(json!({"walls": [straight_wall(json!([door(0.5)]))]})))
        .await
        .unwrap();

    assert_eq!(outcome.stage, Stage::Accepted);
    assert!(outcome.report.is_empty(), "{:?}", outcome.report);

    let doc = outcome.document.unwrap();
    let wall = &doc.floors[0].designs[0].walls[0];
    assert_relative_eq!(wall.left.a.x, 0.0);
    assert_relative_eq!(wall.left.a.y, -5.0);
    assert_relative_eq!(wall.right.a.x, 0.0);
    assert_relative_eq!(wall.right.a.y, 5.0);
    assert_eq!(wall.openings[0].mirrored, None);
}

#[tokio::test]
async fn test_zero_finding_document_is_fixed_point() {
    let value = project(json!({"walls": [straight_wall(json!([door(0.5)]))]}));
    let input: Project = serde_json::from_value(value.clone()).unwrap();

    let catalog = catalog();
    let outcome = ConsistencyChecker::new(&catalog).check(&value).await.unwrap();
    assert!(outcome.report.is_empty(), "{:?}", outcome.report);
    assert_eq!(outcome.document.as_ref(), Some(&input));
    assert_eq!(Normalizer::default().normalize(&input).unwrap(), input);
}

#[tokio::test]
async fn test_fill_defaults_spells_out_door_defaults() {
    let value = project(json!({"walls": [straight_wall(json!([door(0.5)]))]}));
    let catalog = catalog();
    let options = ValidationOptions::default().with_fill_defaults(true);
    let outcome = ConsistencyChecker::with_options(&catalog, options)
        .check(&value)
        .await
        .unwrap();

    assert!(outcome.report.is_empty());
    let doc = outcome.document.unwrap();
    assert_eq!(doc.floors[0].designs[0].walls[0].openings[0].mirrored, Some([0, 0]));
    assert_eq!(Normalizer::default().with_fill_defaults(true).normalize(&doc).unwrap(), doc);
}

#[tokio::test]
async fn test_overlapping_doors() {
    let catalog = catalog();
    let checker = ConsistencyChecker::new(&catalog);
    let outcome = checker
        .check(&project(json!({"walls": [straight_wall(json!([door(0.5), door(0.6)]))]})))
        .await
        .unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(outcome.report.error_count(), 1);
    let overlaps: Vec<_> = outcome.report.by_rule(rule::OPENING_OVERLAP).collect();
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].path, EntityPath::opening(0, 0, 0, 0));
    assert_eq!(overlaps[0].related, vec![EntityPath::opening(0, 0, 0, 1)]);
}

#[tokio::test]
async fn test_canonical_document_is_fixed_point() {
    let mut canonical_door = door(0.5);
    canonical_door["mirrored"] = json!([0, 0]);
    let value = project(json!({
        "walls": [straight_wall(json!([canonical_door]))],
        "areas": [{"poly": [{"x": 0, "y": 0}, {"x": 400, "y": 0}, {"x": 400, "y": 300}],
                   "patternRotation": 0, "patternAlpha": 100, "patternScale": 100}],
        "cameras": [camera([0.0, 0.0, 1.0])]
    }));
    let input: Project = serde_json::from_value(value).unwrap();

    let normalized = Normalizer::default().normalize(&input).unwrap();
    assert_eq!(normalized, input);

    let catalog = catalog();
    let outcome = ConsistencyChecker::new(&catalog)
        .check_project(&input)
        .await
        .unwrap();
    assert!(outcome.is_clean());
    assert_eq!(outcome.document, Some(input));
}

#[tokio::test]
async fn test_normalization_is_idempotent() {
    let messy = project(json!({
        "walls": [{
            "a": {"x": 0, "y": 0}, "b": {"x": 300, "y": 400},
            "az": {"z": 0, "h": 250}, "bz": {"z": 0, "h": 250},
            "left": {"a": {"x": 0, "y": 0}, "b": {"x": 300, "y": 400}},
            "right": {"a": {"x": 0, "y": 0}, "b": {"x": 300, "y": 400}},
            "openings": [], "thickness": 10, "balance": 0.3
        }],
        "areas": [{"poly": [
            {"x": 0, "y": 0}, {"x": 0, "y": 100}, {"x": 100, "y": 100}, {"x": 100, "y": 0},
            {"x": 0, "y": 0}
        ], "patternScale": 900}],
        "labels": [{"x": 0, "y": 0, "text": "Kitchen", "fontFamily": "Arial",
                    "fontColor": "#333", "backgroundColor": "#fff", "align": "center",
                    "fontSize": 14, "letterSpacing": 0, "rotation": -270}],
        "cameras": [camera([0.0, 0.0, -1.0])]
    }));
    let input: Project = serde_json::from_value(messy).unwrap();
    let normalizer = Normalizer::default();

    let once = normalizer.normalize(&input).unwrap();
    assert_ne!(once, input);
    let twice = normalizer.normalize(&once).unwrap();
    assert_eq!(twice, once);

    let design = &once.floors[0].designs[0];
    let wall = &design.walls[0];
    assert_relative_eq!(wall.left.a.distance(&wall.right.a), 10.0, epsilon = 1e-6);
    assert_relative_eq!(wall.left.b.distance(&wall.right.b), 10.0, epsilon = 1e-6);
    assert_eq!(design.areas[0].poly.len(), 4);
    assert_eq!(design.areas[0].style.pattern_scale, Some(400.0));
    assert_relative_eq!(design.labels[0].rotation, 90.0);
    assert_eq!(design.cameras[0].up(), [0.0, 0.0, 1.0]);
}

#[tokio::test]
async fn test_opening_span_overlap() {
    let wall = json!({
        "a": {"x": 0, "y": 0}, "b": {"x": 200, "y": 0},
        "az": {"z": 0, "h": 250}, "bz": {"z": 0, "h": 250},
        "left": {"a": {"x": 0, "y": -5}, "b": {"x": 200, "y": -5}},
        "right": {"a": {"x": 0, "y": 5}, "b": {"x": 200, "y": 5}},
        "openings": [
            {"type": "window", "refid": "win", "t": 0.5, "width": 100, "z": 90,
             "z_height": 100, "openState": 0},
            {"type": "window", "refid": "win", "t": 0.5, "width": 100, "z": 90,
             "z_height": 100, "openState": 0}
        ],
        "thickness": 10, "balance": 0.5
    });
    let value = project(json!({"walls": [wall]}));
    let input: Project = serde_json::from_value(value.clone()).unwrap();

    let opening = &input.floors[0].designs[0].walls[0].openings[0];
    let (start, end) = opening.span(200.0);
    assert_relative_eq!(start, 0.25);
    assert_relative_eq!(end, 0.75);

    let catalog = InMemoryCatalog::new().with_component("win");
    let outcome = ConsistencyChecker::new(&catalog).check(&value).await.unwrap();
    assert_eq!(outcome.report.by_rule(rule::OPENING_OVERLAP).count(), 1);
}

#[tokio::test]
async fn test_small_polygon_has_single_finding() {
    let catalog = catalog();
    let outcome = ConsistencyChecker::new(&catalog)
        .check(&project(json!({"areas": [{"poly": [{"x": 0, "y": 0}, {"x": 0, "y": 0}]}]})))
        .await
        .unwrap();

    assert!(outcome.is_accepted());
    let findings = outcome.report.findings();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, rule::POLYGON_TOO_FEW_VERTICES);
    assert_eq!(findings[0].path, EntityPath::entity(0, 0, EntityKind::Area, 0));
}

#[tokio::test]
async fn test_structural_error_rejects() {
    let mut wall = straight_wall(json!([]));
    wall["thickness"] = json!("thick");
    let catalog = catalog();
    let outcome = ConsistencyChecker::new(&catalog)
        .check(&project(json!({"walls": [wall]})))
        .await
        .unwrap();

    assert_eq!(outcome.stage, Stage::Rejected);
    assert!(outcome.document.is_none());
    assert!(outcome.report.has_structural());
    assert!(!outcome.passes(false));
}

#[tokio::test]
async fn test_strict_policy() {
    let catalog = InMemoryCatalog::new();
    let checker = ConsistencyChecker::with_options(&catalog, ValidationOptions::strict());
    let outcome = checker
        .check(&project(json!({"walls": [straight_wall(json!([door(0.5)]))]})))
        .await
        .unwrap();

    // the door refid is unknown to an empty catalog
    assert!(outcome.is_accepted());
    assert_eq!(outcome.report.by_rule(rule::UNRESOLVED_REFERENCE).count(), 1);
    assert!(!outcome.passes(checker.options().strict));
}

struct Unreachable;

impl Catalog for Unreachable {
    fn lookup_component<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async { Err(CatalogError::unreachable("timeout after 30s")) })
    }

    fn lookup_material_variant<'a>(
        &'a self,
        material: &'a str,
        _variant: i64,
    ) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async move { Err(CatalogError::lookup("material", material, "503")) })
    }

    fn lookup_room_style<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async { Err(CatalogError::unreachable("timeout after 30s")) })
    }

    fn lookup_room_type(&self, _id: i64) -> BoxFuture<'_, CatalogResult<Lookup>> {
        Box::pin(async { Err(CatalogError::unreachable("timeout after 30s")) })
    }

    fn lookup_material_asset<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, CatalogResult<Lookup>> {
        Box::pin(async { Err(CatalogError::unreachable("timeout after 30s")) })
    }
}

#[tokio::test]
async fn test_catalog_failure_is_fatal() {
    let checker = ConsistencyChecker::new(&Unreachable);
    let result = checker
        .check(&project(json!({"walls": [straight_wall(json!([door(0.5)]))]})))
        .await;
    assert!(matches!(result, Err(Error::CatalogUnavailable(_))));
}
