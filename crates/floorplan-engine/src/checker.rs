// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consistency Checker - orchestrates the validation pipeline
//!
//! `Parsed → SchemaChecked → ReferencesResolved → GeometryChecked →
//! Normalized → Accepted | Rejected`
//!
//! Only structural schema errors reject a document. Every other finding is
//! attached to the report and the document is still normalized.

use crate::normalizer::Normalizer;
use crate::resolver::ReferenceResolver;
use crate::schema_check::check_document;
use crate::ValidationOptions;
use floorplan_geometry::GeometryValidator;
use floorplan_model::{Catalog, Error, Project, Report, ResolvedReference, Result};
use futures_util::future::join_all;
use log::{debug, warn};
use serde_json::Value;
use std::fmt;

/// Pipeline stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Parsed,
    SchemaChecked,
    ReferencesResolved,
    GeometryChecked,
    Normalized,
    Accepted,
    Rejected,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Parsed => "Parsed",
            Stage::SchemaChecked => "SchemaChecked",
            Stage::ReferencesResolved => "ReferencesResolved",
            Stage::GeometryChecked => "GeometryChecked",
            Stage::Normalized => "Normalized",
            Stage::Accepted => "Accepted",
            Stage::Rejected => "Rejected",
        }
    }

    /// Stage that must precede this one
    fn predecessor(&self) -> Option<Stage> {
        match self {
            Stage::Parsed => None,
            Stage::SchemaChecked => Some(Stage::Parsed),
            Stage::ReferencesResolved => Some(Stage::SchemaChecked),
            Stage::GeometryChecked => Some(Stage::ReferencesResolved),
            Stage::Normalized => Some(Stage::GeometryChecked),
            Stage::Accepted => Some(Stage::Normalized),
            Stage::Rejected => Some(Stage::SchemaChecked),
        }
    }

    /// Move to `next`, failing on an out-of-order transition
    pub fn advance(self, next: Stage) -> Result<Stage> {
        match next.predecessor() {
            Some(expected) if expected == self => Ok(next),
            Some(expected) => Err(Error::invalid_state(expected.name(), self.name())),
            None => Err(Error::invalid_state("none", self.name())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Accepted | Stage::Rejected)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of checking one document
#[derive(Clone, Debug)]
pub struct Outcome {
    pub stage: Stage,
    pub report: Report,
    /// Canonical document; `None` when rejected
    pub document: Option<Project>,
    /// Handle table of every catalog reference
    pub references: Vec<ResolvedReference>,
}

impl Outcome {
    fn rejected(report: Report) -> Self {
        Self {
            stage: Stage::Rejected,
            report,
            document: None,
            references: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.stage == Stage::Accepted
    }

    /// Accepted without a single error finding
    pub fn is_clean(&self) -> bool {
        self.is_accepted() && self.report.error_count() == 0
    }

    /// Acceptance under the given policy
    pub fn passes(&self, strict: bool) -> bool {
        if strict {
            self.is_clean()
        } else {
            self.is_accepted()
        }
    }
}

/// Runs the full pipeline against an injected catalog
pub struct ConsistencyChecker<'c> {
    catalog: &'c dyn Catalog,
    options: ValidationOptions,
    validator: GeometryValidator,
}

impl<'c> ConsistencyChecker<'c> {
    pub fn new(catalog: &'c dyn Catalog) -> Self {
        Self::with_options(catalog, ValidationOptions::default())
    }

    pub fn with_options(catalog: &'c dyn Catalog, options: ValidationOptions) -> Self {
        Self {
            catalog,
            validator: GeometryValidator::with_options(options.geometry()),
            options,
        }
    }

    /// Replace the geometry validator (custom rule sets)
    pub fn with_validator(mut self, mut validator: GeometryValidator) -> Self {
        validator.set_options(self.options.geometry());
        self.validator = validator;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Check a JSON document given as text
    pub async fn check_str(&self, json: &str) -> Result<Outcome> {
        let document: Value = serde_json::from_str(json)?;
        self.check(&document).await
    }

    /// Check an already deserialized document
    pub async fn check_project(&self, project: &Project) -> Result<Outcome> {
        let document = serde_json::to_value(project)?;
        self.check(&document).await
    }

    /// Check a parsed JSON document
    ///
    /// Returns `Err` only when the catalog fails; every document problem is
    /// reported in the outcome.
    pub async fn check(&self, document: &Value) -> Result<Outcome> {
        let mut stage = Stage::Parsed;

        let mut report = Report::from_findings(check_document(document));
        stage = stage.advance(Stage::SchemaChecked)?;
        debug!("Schema check: {} findings", report.len());

        if report.has_structural() {
            stage.advance(Stage::Rejected)?;
            warn!(
                "Document rejected: {} structural errors",
                report.findings().iter().filter(|f| f.is_structural()).count()
            );
            return Ok(Outcome::rejected(report));
        }
        let project: Project = serde_json::from_value(document.clone())?;

        let resolver = ReferenceResolver::new(self.catalog)
            .with_concurrency(self.options.lookup_concurrency());
        let resolution = match resolver.resolve_project(&project).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("Catalog lookup failed: {}", e);
                return Err(e);
            }
        };
        report.extend(resolution.findings);
        stage = stage.advance(Stage::ReferencesResolved)?;
        debug!("References: {} resolved", resolution.references.len());

        let geometry = self.validator.validate_project(&project);
        debug!("Geometry check: {} findings", geometry.len());
        report.extend(geometry.into_findings());
        stage = stage.advance(Stage::GeometryChecked)?;

        let normalized = Normalizer::new(self.options.epsilon)
            .with_fill_defaults(self.options.fill_defaults)
            .normalize(&project)?;
        stage = stage.advance(Stage::Normalized)?;

        report.sort();
        stage = stage.advance(Stage::Accepted)?;
        debug!(
            "Document accepted: {} errors, {} warnings",
            report.error_count(),
            report.warnings().count()
        );

        Ok(Outcome {
            stage,
            report,
            document: Some(normalized),
            references: resolution.references,
        })
    }

    /// Check several documents concurrently, keeping input order
    pub async fn check_many(&self, documents: &[Value]) -> Vec<Result<Outcome>> {
        join_all(documents.iter().map(|document| self.check(document))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCatalog;
    use floorplan_model::{rule, Category};
    use serde_json::json;

    fn document(items: Value) -> Value {
        json!({
            "id": 7, "name": "home", "public": true,
            "floors": [{"id": 1, "name": "ground", "level": 0, "height": 250, "designs": [{
                "id": 1, "name": "d", "items": items, "lines": [], "walls": [], "areas": [],
                "labels": [], "cameras": [], "surfaces": []
            }]}]
        })
    }

    fn item(refid: &str) -> Value {
        json!({"x": 0, "y": 0, "z": 0, "refid": refid, "width": 50, "height": 50,
               "rotation": 0, "snapDist": 5})
    }

    #[test]
    fn test_stage_transitions() {
        let stage = Stage::Parsed.advance(Stage::SchemaChecked).unwrap();
        assert!(stage.advance(Stage::Rejected).unwrap().is_terminal());
        assert!(matches!(
            Stage::Parsed.advance(Stage::Normalized),
            Err(Error::InvalidState { expected: "GeometryChecked", found: "Parsed" })
        ));
        assert!(Stage::Accepted.advance(Stage::Parsed).is_err());
    }

    #[tokio::test]
    async fn test_structural_rejection() {
        let catalog = InMemoryCatalog::new();
        let checker = ConsistencyChecker::new(&catalog);
        let mut broken = item("sofa");
        broken.as_object_mut().unwrap().remove("width");

        let outcome = checker.check(&document(json!([broken]))).await.unwrap();
        assert_eq!(outcome.stage, Stage::Rejected);
        assert!(outcome.document.is_none());
        assert_eq!(outcome.report.len(), 1);
        assert_eq!(outcome.report.findings()[0].rule, rule::MISSING_REQUIRED_FIELD);
    }

    #[tokio::test]
    async fn test_non_structural_findings_still_normalize() {
        let catalog = InMemoryCatalog::new().with_component("sofa");
        let checker = ConsistencyChecker::new(&catalog);
        let mut odd = item("sofa");
        odd["rotation"] = json!(200);

        let outcome = checker
            .check(&document(json!([odd, item("ghost")])))
            .await
            .unwrap();
        assert!(outcome.is_accepted());
        assert!(!outcome.is_clean());
        assert!(outcome.passes(false));
        assert!(!outcome.passes(true));

        let categories: Vec<_> = outcome.report.findings().iter().map(|f| f.category).collect();
        assert_eq!(categories, vec![Category::Range, Category::Reference]);

        let doc = outcome.document.unwrap();
        assert_eq!(doc.floors[0].designs[0].items[0].rotation, -160.0);
        assert_eq!(outcome.references.len(), 2);
    }

    #[tokio::test]
    async fn test_check_str_and_many() {
        let catalog = InMemoryCatalog::new().with_component("sofa");
        let checker = ConsistencyChecker::with_options(&catalog, ValidationOptions::strict());

        assert!(matches!(checker.check_str("{ not json").await, Err(Error::Json(_))));

        let docs = vec![document(json!([item("sofa")])), json!({"id": 1})];
        let outcomes = checker.check_many(&docs).await;
        assert!(outcomes[0].as_ref().unwrap().is_clean());
        assert_eq!(outcomes[1].as_ref().unwrap().stage, Stage::Rejected);
    }
}
