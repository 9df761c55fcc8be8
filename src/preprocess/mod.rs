//! Validation + transformation of raw input into model-ready feature rows.
//!
//! The pipeline is:
//! 1. validate every declared feature, in schema order (feature-major: all
//!    records for feature 0, then all records for feature 1, ...)
//! 2. encode categorical codes as their numeric value
//! 3. apply the feature's remap, if any; an indicator on a categorical
//!    feature tests the matched code, not its encoding
//!
//! The first failure is returned as-is; nothing is skipped or defaulted.

use crate::domain::{BoundKind, Category, FeatureConstraint, Input, NumericRange, Remap};
use crate::error::ValidationError;
use crate::schema::{FeatureSchema, lookup_categories, lookup_range};
use crate::validate::{validate_categorical, validate_numeric};

/// One transformed record: values aligned with `FeatureSchema::features()`.
pub type FeatureRow = Vec<f64>;

/// Validate and transform `input` into one row per record, in input order.
pub fn preprocess(schema: &FeatureSchema, input: &Input) -> Result<Vec<FeatureRow>, ValidationError> {
    let records = input.records()?;
    let mut rows: Vec<FeatureRow> = vec![Vec::with_capacity(schema.len()); records.len()];

    for spec in schema.features() {
        let remap = spec.remap.as_ref();
        let column = match &spec.constraint {
            FeatureConstraint::Numeric(_) => {
                let range = lookup_range(schema, &spec.name)?;
                let values = validate_numeric(input, &spec.name, &range)?;
                values
                    .into_iter()
                    .zip(&records)
                    .map(|(value, (item, _))| match remap {
                        Some(remap) => apply_remap(remap, &spec.name, value, *item),
                        None => Ok(value),
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            FeatureConstraint::Categorical { .. } => {
                let categories = lookup_categories(schema, &spec.name)?;
                let matched = validate_categorical(input, &spec.name, categories)?;
                matched
                    .into_iter()
                    .zip(&records)
                    .map(|(category, (item, _))| encode_category(category, remap, &spec.name, *item))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }

    Ok(rows)
}

/// Encoded value of a matched category after its remap.
fn encode_category(
    category: &Category,
    remap: Option<&Remap>,
    feature: &str,
    item: Option<usize>,
) -> Result<f64, ValidationError> {
    match remap {
        Some(Remap::Indicator { codes }) => {
            let hit = category
                .code
                .parse::<f64>()
                .is_ok_and(|code| indicator_hit(codes, code));
            Ok(if hit { 1.0 } else { 0.0 })
        }
        Some(remap) => apply_remap(remap, feature, category.value, item),
        None => Ok(category.value),
    }
}

fn indicator_hit(codes: &[f64], value: f64) -> bool {
    codes.iter().any(|c| (c - value).abs() < 1e-9)
}

/// Apply a post-validation transform to one value.
pub fn apply_remap(
    remap: &Remap,
    feature: &str,
    value: f64,
    item: Option<usize>,
) -> Result<f64, ValidationError> {
    match remap {
        Remap::Indicator { codes } => Ok(if indicator_hit(codes, value) { 1.0 } else { 0.0 }),
        Remap::Log => {
            if value > 0.0 {
                Ok(value.ln())
            } else {
                Err(ValidationError::OutOfRange {
                    feature: feature.to_string(),
                    item,
                    value,
                    range: NumericRange {
                        min: 0.0,
                        max: f64::INFINITY,
                        lower: BoundKind::Exclusive,
                        upper: BoundKind::Inclusive,
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, FeatureSpec};
    use serde_json::json;

    fn schema() -> FeatureSchema {
        let codes = |codes: &[&str]| {
            codes
                .iter()
                .map(|c| Category { code: c.to_string(), value: c.parse().unwrap() })
                .collect::<Vec<_>>()
        };
        FeatureSchema::new(vec![
            FeatureSpec::numeric("BMI", NumericRange::inclusive(10.0, 60.0)),
            FeatureSpec::categorical("Tclassification", codes(&["1", "2", "3", "4"]))
                .with_remap(Remap::Indicator { codes: vec![3.0, 4.0] }),
            FeatureSpec::categorical("Nclassification", codes(&["0", "1", "2", "3"]))
                .with_remap(Remap::Indicator { codes: vec![2.0, 3.0] }),
            FeatureSpec::numeric("gtv", NumericRange::inclusive(0.0, 500.0)).with_remap(Remap::Log),
        ])
        .unwrap()
    }

    #[test]
    fn rows_follow_schema_order_and_apply_remaps() {
        let input = Input::from_value(json!({
            "gtv": 1.0,
            "Nclassification": 2,
            "Tclassification": "1",
            "BMI": 19.5
        }))
        .unwrap();
        let rows = preprocess(&schema(), &input).unwrap();
        assert_eq!(rows, vec![vec![19.5, 0.0, 1.0, 0.0]]);
    }

    #[test]
    fn batch_rows_keep_input_order() {
        let input = Input::from_value(json!([
            { "BMI": 20, "Tclassification": 4, "Nclassification": 0, "gtv": 10 },
            { "BMI": 30, "Tclassification": 2, "Nclassification": 3, "gtv": 20 }
        ]))
        .unwrap();
        let rows = preprocess(&schema(), &input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][..3], [20.0, 1.0, 0.0]);
        assert_eq!(rows[1][..3], [30.0, 0.0, 1.0]);
        assert!((rows[1][3] - 20f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn first_failure_is_reported_in_schema_order() {
        // Both BMI (item 1) and Tclassification (item 0) are invalid; BMI is declared first.
        let input = Input::from_value(json!([
            { "BMI": 20, "Tclassification": 9, "Nclassification": 0, "gtv": 10 },
            { "BMI": 80, "Tclassification": 2, "Nclassification": 3, "gtv": 20 }
        ]))
        .unwrap();
        let err = preprocess(&schema(), &input).unwrap_err();
        assert_eq!(err.feature(), Some("BMI"));
        assert_eq!(err.item(), Some(1));
    }

    #[test]
    fn log_remap_rejects_zero() {
        let input = Input::from_value(json!({
            "BMI": 20, "Tclassification": 1, "Nclassification": 0, "gtv": 0
        }))
        .unwrap();
        let err = preprocess(&schema(), &input).unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");
        assert_eq!(err.feature(), Some("gtv"));
    }

    #[test]
    fn empty_batch_yields_no_rows() {
        let input = Input::from_value(json!([])).unwrap();
        assert!(preprocess(&schema(), &input).unwrap().is_empty());
    }

    #[test]
    fn indicator_tests_code_not_encoding() {
        let categories = [("1", 0.0), ("2", 10.0), ("3", 20.0)]
            .iter()
            .map(|(code, value)| Category { code: code.to_string(), value: *value })
            .collect();
        let schema = FeatureSchema::new(vec![
            FeatureSpec::categorical("N", categories).with_remap(Remap::Indicator { codes: vec![2.0, 3.0] }),
        ])
        .unwrap();

        let input = Input::from_value(json!([{ "N": 2 }, { "N": "3" }, { "N": 1 }])).unwrap();
        let rows = preprocess(&schema, &input).unwrap();
        assert_eq!(rows, vec![vec![1.0], vec![1.0], vec![0.0]]);
    }
}
