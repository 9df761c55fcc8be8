//! Model-card metadata (JSON-LD style) to feature schema.
//!
//! Model cards describe each input under `"Input data"`; every field is a
//! small object carrying its payload in `"@value"` (literals) or `"@id"`
//! (IRIs). Only the fields the validator needs are read:
//!
//! - `Description.@value`: feature name as it appears in requests
//! - `Type of input.@value`: `numerical` or `categorical`
//! - `Minimum - for numerical.@value` / `Maximum - for numerical.@value`
//! - `Categories[]."Identification for category used in model".@value`
//! - `Input feature`: concept IRI and label
//!
//! Cards exported from the template editor carry placeholder `{}` entries in
//! `Categories` for numeric inputs; those are skipped.

use serde_json::Value;

use crate::domain::{Category, FeatureSpec, ModelMetadata, NumericRange};
use crate::error::ValidationError;

const INPUT_DATA: &str = "Input data";
const DESCRIPTION: &str = "Description";
const TYPE_OF_INPUT: &str = "Type of input";
const MINIMUM: &str = "Minimum - for numerical";
const MAXIMUM: &str = "Maximum - for numerical";
const CATEGORIES: &str = "Categories";
const CATEGORY_ID: &str = "Identification for category used in model";
const INPUT_FEATURE: &str = "Input feature";
const GENERAL_INFO: &str = "General Model Information";

/// Parse every `"Input data"` entry into a `FeatureSpec`, in card order.
pub fn parse_input_features(card: &Value) -> Result<Vec<FeatureSpec>, ValidationError> {
    let entries = card
        .get(INPUT_DATA)
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::schema(INPUT_DATA, "model card has no input data list"))?;

    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &Value) -> Result<FeatureSpec, ValidationError> {
    let name = literal(entry.get(DESCRIPTION))
        .ok_or_else(|| ValidationError::schema(INPUT_DATA, "input entry without a description"))?;

    let codes = category_codes(entry);
    let declared = literal(entry.get(TYPE_OF_INPUT)).map(|s| s.to_ascii_lowercase());
    let is_categorical = match declared.as_deref() {
        Some("categorical") => true,
        Some("numerical") | Some("numeric") => false,
        Some(other) => {
            return Err(ValidationError::schema(&name, format!("unknown input type '{other}'")));
        }
        None => !codes.is_empty(),
    };

    let mut spec = if is_categorical {
        if codes.is_empty() {
            return Err(ValidationError::schema(&name, "categorical input without categories"));
        }
        let categories = codes
            .into_iter()
            .map(|code| Category {
                value: code.parse::<f64>().unwrap_or(f64::NAN),
                code,
            })
            .collect();
        FeatureSpec::categorical(name, categories)
    } else {
        let min = bound(entry, MINIMUM, &name)?;
        let max = bound(entry, MAXIMUM, &name)?;
        if min > max {
            return Err(ValidationError::schema(&name, format!("minimum {min} exceeds maximum {max}")));
        }
        FeatureSpec::numeric(name, NumericRange::inclusive(min, max))
    };

    if let Some(feature) = entry.get(INPUT_FEATURE) {
        spec.concept = feature.get("@id").and_then(Value::as_str).map(str::to_string);
        spec.label = feature.get("rdfs:label").and_then(Value::as_str).map(str::to_string);
    }

    Ok(spec)
}

/// Missing bounds read as `0`, matching how cards with blank fields have been scored.
fn bound(entry: &Value, key: &str, feature: &str) -> Result<f64, ValidationError> {
    let Some(raw) = entry.get(key).and_then(|v| v.get("@value")) else {
        return Ok(0.0);
    };
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::schema(feature, format!("invalid {key} value {raw}")))
}

fn category_codes(entry: &Value) -> Vec<String> {
    entry
        .get(CATEGORIES)
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter()
                .filter_map(|cat| cat.get(CATEGORY_ID).and_then(|id| id.get("@value")))
                .filter_map(normalize_code)
                .collect()
        })
        .unwrap_or_default()
}

/// Canonical string form of a category code.
///
/// Integral numbers (and numeric strings) collapse to their integer form so
/// that `2`, `2.0` and `"2"` all denote the same code.
pub fn normalize_code(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(format_code),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(format_code(v)),
                _ => Some(s.to_string()),
            }
        }
        _ => None,
    }
}

fn format_code(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Summary fields from `"General Model Information"` and `"Outcome"`.
///
/// `model_uri`, `model_name` and `model_type` come from the model file itself
/// and are left for the caller to fill.
pub fn parse_general_info(card: &Value) -> ModelMetadata {
    let info = card.get(GENERAL_INFO);
    let field = |key: &str| info.and_then(|i| literal(i.get(key)));

    let references = info
        .and_then(|i| i.get("References to papers"))
        .and_then(Value::as_array)
        .map(|refs| refs.iter().filter_map(|r| literal(Some(r))).collect())
        .unwrap_or_default();

    ModelMetadata {
        title: field("Title"),
        created_by: field("Created by"),
        creation_date: field("Creation date")
            .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        image_name: field("FAIRmodels image name"),
        references,
        outcome: card
            .get("Outcome")
            .and_then(|o| o.get("rdfs:label"))
            .and_then(Value::as_str)
            .map(str::to_string),
        ..ModelMetadata::default()
    }
}

fn literal(field: Option<&Value>) -> Option<String> {
    let raw = field?.get("@value")?;
    let s = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureConstraint;
    use serde_json::json;

    fn card() -> Value {
        json!({
            "Input data": [
                {
                    "Description": { "@value": "tLength" },
                    "Type of input": { "@value": "numerical" },
                    "Minimum - for numerical": { "@value": "0", "@type": "xsd:decimal" },
                    "Maximum - for numerical": { "@value": "1000", "@type": "xsd:decimal" },
                    "Categories": [{}],
                    "Input feature": {
                        "@id": "http://www.cancerdata.org/roo/C100074",
                        "rdfs:label": "Tumor Length"
                    }
                },
                {
                    "Description": { "@value": "Tumorlocation" },
                    "Type of input": { "@value": "categorical" },
                    "Categories": [
                        { "Identification for category used in model": { "@value": "1" } },
                        { "Identification for category used in model": { "@value": 2 } },
                        { "Identification for category used in model": { "@value": "3.0" } }
                    ]
                }
            ],
            "General Model Information": {
                "Title": { "@value": "Prediction of pathologic complete response" },
                "Created by": { "@value": "Model Author" },
                "Creation date": { "@value": "2024-08-24", "@type": "xsd:date" },
                "References to papers": [{ "@value": "https://doi.org/10.1016/j.radonc.2010.12.002" }]
            },
            "Outcome": { "rdfs:label": "Pathologic Complete Response" }
        })
    }

    #[test]
    fn parses_numeric_and_categorical_entries_in_order() {
        let features = parse_input_features(&card()).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "tLength");
        assert_eq!(features[0].label.as_deref(), Some("Tumor Length"));
        match &features[0].constraint {
            FeatureConstraint::Numeric(r) => assert_eq!((r.min, r.max), (0.0, 1000.0)),
            other => panic!("expected numeric, got {other:?}"),
        }
        match &features[1].constraint {
            FeatureConstraint::Categorical { categories } => {
                let codes: Vec<_> = categories.iter().map(|c| c.code.as_str()).collect();
                assert_eq!(codes, ["1", "2", "3"]);
                assert_eq!(categories[2].value, 3.0);
            }
            other => panic!("expected categorical, got {other:?}"),
        }
    }

    #[test]
    fn invalid_bound_is_schema_error() {
        let card = json!({
            "Input data": [{
                "Description": { "@value": "cT" },
                "Type of input": { "@value": "numerical" },
                "Maximum - for numerical": { "@value": "four" }
            }]
        });
        let err = parse_input_features(&card).unwrap_err();
        assert_eq!(err.kind(), "SchemaError");
        assert_eq!(err.feature(), Some("cT"));
    }

    #[test]
    fn missing_input_data_is_schema_error() {
        assert!(parse_input_features(&json!({})).is_err());
    }

    #[test]
    fn general_info_is_optional() {
        let info = parse_general_info(&card());
        assert_eq!(info.created_by.as_deref(), Some("Model Author"));
        assert_eq!(info.creation_date, chrono::NaiveDate::from_ymd_opt(2024, 8, 24));
        assert_eq!(info.references.len(), 1);
        assert_eq!(info.outcome.as_deref(), Some("Pathologic Complete Response"));

        let empty = parse_general_info(&json!({}));
        assert!(empty.title.is_none());
    }

    #[test]
    fn codes_normalize_across_representations() {
        assert_eq!(normalize_code(&json!(2)).as_deref(), Some("2"));
        assert_eq!(normalize_code(&json!(2.0)).as_deref(), Some("2"));
        assert_eq!(normalize_code(&json!(" 2 ")).as_deref(), Some("2"));
        assert_eq!(normalize_code(&json!("oral")).as_deref(), Some("oral"));
        assert_eq!(normalize_code(&json!(true)), None);
    }
}
