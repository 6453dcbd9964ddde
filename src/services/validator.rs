use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::models::fear_greed::{
    CompositeIndicator, IndexSnapshot, IndicatorRecord, NormalizedPayload, Rating, Slot,
};

/// One schema violation, located by `slot` or `slot.field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub reason: String,
}

impl Issue {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .issues.iter().join("; "))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Number,
    Rating,
}

const RECORD_FIELDS: [(&str, FieldKind); 3] = [
    ("timestamp", FieldKind::Text),
    ("score", FieldKind::Number),
    ("rating", FieldKind::Rating),
];

const COMPOSITE_FIELDS: [(&str, FieldKind); 4] = [
    ("previous_close", FieldKind::Number),
    ("previous_1_week", FieldKind::Number),
    ("previous_1_month", FieldKind::Number),
    ("previous_1_year", FieldKind::Number),
];

/// Checks a normalized payload against the snapshot schema.
///
/// All eleven slots are checked and every issue is reported, not just the
/// first. Type and rating membership are enforced; score ranges are not.
pub fn validate(payload: &NormalizedPayload) -> Result<IndexSnapshot, ValidationError> {
    let issues: Vec<Issue> = Slot::ALL
        .iter()
        .flat_map(|slot| check_slot(*slot, payload.get(slot.name())))
        .collect();

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    let mut typed = Map::new();
    for slot in Slot::ALL {
        if let Some(value) = payload.get(slot.name()) {
            typed.insert(slot.name().to_string(), value.clone());
        }
    }
    serde_json::from_value(Value::Object(typed)).map_err(|e| ValidationError {
        issues: vec![Issue::new("snapshot", e.to_string())],
    })
}

fn check_slot(slot: Slot, value: Option<&Value>) -> Vec<Issue> {
    let fields = match value {
        None => return vec![Issue::new(slot.name(), "Required")],
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return vec![Issue::new(
                slot.name(),
                format!("Expected object, received {}", type_name(other)),
            )]
        }
    };

    let extra: &[(&str, FieldKind)] = if slot.is_composite() {
        &COMPOSITE_FIELDS
    } else {
        &[]
    };

    let issues: Vec<Issue> = RECORD_FIELDS
        .iter()
        .chain(extra)
        .filter_map(|(field, kind)| {
            check_field(fields.get(*field), *kind)
                .map(|reason| Issue::new(format!("{}.{}", slot.name(), field), reason))
        })
        .collect();

    if issues.is_empty() {
        // Field rules above mirror the typed records
        let parsed = if slot.is_composite() {
            parse::<CompositeIndicator>(fields)
        } else {
            parse::<IndicatorRecord>(fields)
        };
        if let Err(reason) = parsed {
            return vec![Issue::new(slot.name(), reason)];
        }
    }
    issues
}

fn check_field(value: Option<&Value>, kind: FieldKind) -> Option<String> {
    let value = match value {
        None => return Some("Required".to_string()),
        Some(value) => value,
    };
    match (kind, value) {
        (FieldKind::Text, Value::String(_)) => None,
        (FieldKind::Number, Value::Number(_)) => None,
        (FieldKind::Rating, Value::String(s)) => {
            if Rating::ALL.iter().any(|r| r.as_str() == s) {
                None
            } else {
                Some(format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    Rating::ALL.iter().map(|r| format!("'{}'", r)).join(" | "),
                    s
                ))
            }
        }
        (FieldKind::Text | FieldKind::Rating, other) => Some(format!(
            "Expected string, received {}",
            type_name(other)
        )),
        (FieldKind::Number, other) => Some(format!(
            "Expected number, received {}",
            type_name(other)
        )),
    }
}

fn parse<T: DeserializeOwned>(fields: &Map<String, Value>) -> Result<(), String> {
    serde_json::from_value::<T>(Value::Object(fields.clone()))
        .map(drop)
        .map_err(|e| e.to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
