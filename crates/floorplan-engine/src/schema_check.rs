// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema checks over the raw JSON tree
//!
//! Walks a parsed document against the Schema Registry. Structural findings
//! (missing field, wrong JSON type, unknown string enum, unrecognized union
//! shape) are exactly the conditions under which the typed model would fail
//! to deserialize; everything else is a range or format finding.

use floorplan_model::{
    is_material_asset_id, is_uuid, rule, Category, Color, EntityKind, EntityPath, FieldSpec,
    FieldType, Finding, RangePolicy, Severity, Shape,
};
use serde_json::Value;

/// Check a raw document rooted at a Project
pub fn check_document(document: &Value) -> Vec<Finding> {
    let mut walker = SchemaWalker::default();
    if document.is_object() {
        walker.object(document, Shape::Project, EntityPath::project(), "");
    } else {
        walker.findings.push(Finding::structural(
            EntityPath::project(),
            rule::WRONG_TYPE,
            format!("document must be an object, found {}", json_type(document)),
        ));
    }
    walker.findings
}

/// Path of an entity nested under `parent`
pub(crate) fn child_path(parent: EntityPath, kind: EntityKind, index: Option<usize>) -> EntityPath {
    match kind {
        EntityKind::Project => EntityPath::project(),
        EntityKind::ProjectSettings => EntityPath::project_settings(),
        EntityKind::Floor => EntityPath {
            floor: index,
            kind,
            ..EntityPath::project()
        },
        EntityKind::Design => EntityPath {
            floor: parent.floor,
            design: index,
            kind,
            index: None,
            child: None,
        },
        EntityKind::Drawing | EntityKind::FloorCamera => EntityPath {
            floor: parent.floor,
            kind,
            index,
            ..EntityPath::project()
        },
        EntityKind::DesignSettings => parent.with_kind(kind),
        EntityKind::Opening => EntityPath {
            kind,
            child: index,
            ..parent
        },
        _ => EntityPath {
            floor: parent.floor,
            design: parent.design,
            kind,
            index,
            child: None,
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[derive(Default)]
struct SchemaWalker {
    findings: Vec<Finding>,
}

impl SchemaWalker {
    fn object(&mut self, value: &Value, shape: Shape, path: EntityPath, prefix: &str) {
        let Some(map) = value.as_object() else {
            self.wrong_type(path, prefix, "object", value);
            return;
        };

        for spec in shape.fields() {
            let label = join(prefix, spec.name);
            match map.get(spec.name) {
                None => {
                    if spec.required {
                        self.findings.push(
                            Finding::structural(
                                path,
                                rule::MISSING_REQUIRED_FIELD,
                                format!("missing required field '{}'", spec.name),
                            )
                            .with_field(label),
                        );
                    }
                }
                Some(Value::Null) if !spec.required => {}
                Some(field) => self.value(field, spec, &spec.ty, path, &label),
            }
        }

        if shape == Shape::Floor {
            if let Some(Value::Array(cameras)) = map.get("cameras") {
                if !cameras.is_empty() {
                    self.findings.push(
                        Finding::new(
                            path,
                            rule::FLOOR_CAMERAS_DEPRECATED,
                            Severity::Warning,
                            Category::Structural,
                            format!("{} camera(s) stored on the floor", cameras.len()),
                        )
                        .with_field("cameras")
                        .with_fix("move the cameras to a design"),
                    );
                }
            }
        }
    }

    fn value(&mut self, value: &Value, spec: &FieldSpec, ty: &FieldType, path: EntityPath, label: &str) {
        match ty {
            FieldType::Number => match value.as_f64() {
                Some(number) => self.range(number, spec, path, label),
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::Integer => match value.as_i64() {
                Some(number) => self.range(number as f64, spec, path, label),
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::Boolean => {
                if !value.is_boolean() {
                    self.wrong_type(path, label, ty.describe(), value);
                }
            }
            FieldType::Text => {
                if !value.is_string() {
                    self.wrong_type(path, label, ty.describe(), value);
                }
            }
            FieldType::Color => self.color(value, path, label),
            FieldType::Uuid => match value.as_str() {
                Some(id) if !is_uuid(id) => self.findings.push(
                    Finding::new(
                        path,
                        rule::INVALID_UUID,
                        Severity::Error,
                        Category::Range,
                        format!("'{}' is not a UUID", id),
                    )
                    .with_field(label),
                ),
                Some(_) => {}
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::MaterialId => match value.as_str() {
                Some(id) if !is_material_asset_id(id) => self.findings.push(
                    Finding::new(
                        path,
                        rule::INVALID_MATERIAL_ID,
                        Severity::Error,
                        Category::Range,
                        format!("'{}' is not a material asset id (rs-<number>)", id),
                    )
                    .with_field(label),
                ),
                Some(_) => {}
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::Enum(allowed) => match value.as_str() {
                Some(s) if !allowed.contains(&s) => self.findings.push(
                    Finding::structural(
                        path,
                        rule::INVALID_ENUM_VALUE,
                        format!("'{}' is not one of {}", s, allowed.join(", ")),
                    )
                    .with_field(label),
                ),
                Some(_) => {}
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::IntEnum(allowed) => match value.as_i64() {
                Some(n) if !allowed.contains(&n) => self.findings.push(
                    Finding::new(
                        path,
                        rule::INVALID_ENUM_VALUE,
                        Severity::Error,
                        Category::Range,
                        format!(
                            "{} is not one of {}",
                            n,
                            allowed.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
                        ),
                    )
                    .with_field(label),
                ),
                Some(_) => {}
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::FlagPair => self.flag_pair(value, path, label),
            FieldType::Object(shape) => {
                let (path, prefix) = match shape.entity_kind() {
                    Some(kind) => (child_path(path, kind, None), String::new()),
                    None => (path, label.to_string()),
                };
                self.object(value, *shape, path, &prefix);
            }
            FieldType::List(shape) => {
                let Some(items) = value.as_array() else {
                    self.wrong_type(path, label, ty.describe(), value);
                    return;
                };
                for (i, item) in items.iter().enumerate() {
                    match shape.entity_kind() {
                        Some(kind) => self.object(item, *shape, child_path(path, kind, Some(i)), ""),
                        None => self.object(item, *shape, path, &format!("{}[{}]", label, i)),
                    }
                }
            }
            FieldType::Map(inner) => match value.as_object() {
                Some(map) => {
                    for (key, entry) in map {
                        self.value(entry, spec, inner, path, &join(label, key));
                    }
                }
                None => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::MapOrEmptyList(inner) => match value {
                Value::Object(map) => {
                    for (key, entry) in map {
                        self.value(entry, spec, inner, path, &join(label, key));
                    }
                }
                Value::Array(items) if items.is_empty() => {}
                _ => self.wrong_type(path, label, ty.describe(), value),
            },
            FieldType::OneOf(candidates) => {
                let Some(map) = value.as_object() else {
                    self.wrong_type(path, label, ty.describe(), value);
                    return;
                };
                match Shape::first_match(candidates, map) {
                    Some(shape) => self.object(value, shape, path, label),
                    None => self.findings.push(
                        Finding::structural(
                            path,
                            rule::UNRECOGNIZED_VARIANT,
                            format!(
                                "object matches none of {}",
                                candidates.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
                            ),
                        )
                        .with_field(label),
                    ),
                }
            }
            FieldType::Tagged { tag, variants } => {
                let Some(map) = value.as_object() else {
                    self.wrong_type(path, label, ty.describe(), value);
                    return;
                };
                let tag_label = join(label, tag);
                match map.get(*tag) {
                    None => self.findings.push(
                        Finding::structural(
                            path,
                            rule::MISSING_REQUIRED_FIELD,
                            format!("missing discriminator '{}'", tag),
                        )
                        .with_field(tag_label),
                    ),
                    Some(Value::String(name)) => match Shape::tagged_variant(variants, name) {
                        Some(shape) => self.object(value, shape, path, label),
                        None => self.findings.push(
                            Finding::structural(
                                path,
                                rule::INVALID_ENUM_VALUE,
                                format!(
                                    "'{}' is not one of {}",
                                    name,
                                    variants.iter().map(|(n, _)| *n).collect::<Vec<_>>().join(", ")
                                ),
                            )
                            .with_field(tag_label),
                        ),
                    },
                    Some(other) => self.wrong_type(path, &tag_label, "string", other),
                }
            }
        }
    }

    fn range(&mut self, number: f64, spec: &FieldSpec, path: EntityPath, label: &str) {
        let Some(range) = spec.range else {
            return;
        };
        if range.contains(number) {
            return;
        }
        let unit = spec.unit.map(|u| u.symbol()).unwrap_or("");
        let message = format!("{}{} is outside {}", number, unit, range);
        let finding = match spec.policy {
            RangePolicy::Clamp => Finding::new(
                path,
                rule::FIELD_OUT_OF_RANGE,
                Severity::Warning,
                Category::Range,
                message,
            )
            .with_fix(format!("clamp to {}", range.clamp(number))),
            RangePolicy::Wrap => Finding::new(
                path,
                rule::ANGLE_OUT_OF_RANGE,
                Severity::Warning,
                Category::Range,
                message,
            )
            .with_fix(format!("wrap to {}", range.wrap(number))),
            RangePolicy::Reject => Finding::new(
                path,
                rule::FIELD_OUT_OF_RANGE,
                Severity::Error,
                Category::Range,
                message,
            ),
            RangePolicy::Derived => return,
        };
        self.findings.push(finding.with_field(label));
    }

    fn color(&mut self, value: &Value, path: EntityPath, label: &str) {
        let color = match value {
            Value::String(s) => Color::text(s.as_str()),
            Value::Number(n) => match n.as_i64() {
                Some(packed) => Color::Packed(packed),
                None => Color::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            _ => {
                self.wrong_type(path, label, FieldType::Color.describe(), value);
                return;
            }
        };
        if !color.is_well_formed() {
            self.findings.push(
                Finding::new(
                    path,
                    rule::INVALID_COLOR,
                    Severity::Warning,
                    Category::Range,
                    format!("'{}' is not a valid color", color),
                )
                .with_field(label),
            );
        }
    }

    fn flag_pair(&mut self, value: &Value, path: EntityPath, label: &str) {
        let flags = value
            .as_array()
            .filter(|items| items.len() == 2)
            .map(|items| items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>());
        match flags {
            Some(Some(flags)) => {
                if flags.iter().any(|f| *f != 0 && *f != 1) {
                    self.findings.push(
                        Finding::new(
                            path,
                            rule::FIELD_OUT_OF_RANGE,
                            Severity::Error,
                            Category::Range,
                            format!("flags {:?} must each be 0 or 1", flags),
                        )
                        .with_field(label),
                    );
                }
            }
            _ => self.wrong_type(path, label, FieldType::FlagPair.describe(), value),
        }
    }

    fn wrong_type(&mut self, path: EntityPath, label: &str, expected: &str, found: &Value) {
        let finding = Finding::structural(
            path,
            rule::WRONG_TYPE,
            format!("expected {}, found {}", expected, json_type(found)),
        );
        self.findings.push(if label.is_empty() {
            finding
        } else {
            finding.with_field(label)
        });
    }
}
