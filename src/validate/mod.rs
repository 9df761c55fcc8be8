//! Per-feature input validation.
//!
//! Each validator checks one feature across the whole input (a single record
//! or every item of a batch, in order) and returns the validated values, one
//! per record. The first failure wins and carries the feature name and, for
//! batches, the item position.

use serde_json::Value;

use crate::domain::{Category, Input, InputRecord, NumericRange};
use crate::error::ValidationError;
use crate::schema::normalize_code;

/// Validate a numeric feature and return its values.
///
/// Booleans are rejected even though some clients encode them as `0`/`1`:
/// a flag sent as `true` is a client bug, not a stage of `1`.
pub fn validate_numeric(
    input: &Input,
    feature: &str,
    range: &NumericRange,
) -> Result<Vec<f64>, ValidationError> {
    input
        .records()?
        .into_iter()
        .map(|(item, record)| check_numeric(record, feature, range, item))
        .collect()
}

/// Validate a categorical feature and return the matched category of each record.
pub fn validate_categorical<'c>(
    input: &Input,
    feature: &str,
    categories: &'c [Category],
) -> Result<Vec<&'c Category>, ValidationError> {
    input
        .records()?
        .into_iter()
        .map(|(item, record)| check_categorical(record, feature, categories, item))
        .collect()
}

fn check_numeric(
    record: &InputRecord,
    feature: &str,
    range: &NumericRange,
    item: Option<usize>,
) -> Result<f64, ValidationError> {
    let raw = present(record, feature, item)?;
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::TypeMismatch {
        feature: feature.to_string(),
        item,
        expected: "a number",
    })?;

    if !range.contains(value) {
        return Err(ValidationError::OutOfRange {
            feature: feature.to_string(),
            item,
            value,
            range: *range,
        });
    }
    Ok(value)
}

fn check_categorical<'c>(
    record: &InputRecord,
    feature: &str,
    categories: &'c [Category],
    item: Option<usize>,
) -> Result<&'c Category, ValidationError> {
    let raw = present(record, feature, item)?;
    normalize_code(raw)
        .and_then(|code| categories.iter().find(|c| c.code == code))
        .ok_or_else(|| ValidationError::InvalidCategory {
            feature: feature.to_string(),
            item,
            value: raw.to_string(),
            allowed: categories.iter().map(|c| c.code.clone()).collect(),
        })
}

fn present<'r>(
    record: &'r InputRecord,
    feature: &str,
    item: Option<usize>,
) -> Result<&'r Value, ValidationError> {
    record
        .get(feature)
        .ok_or_else(|| ValidationError::MissingFeature {
            feature: feature.to_string(),
            item,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundKind;
    use serde_json::json;

    fn input(value: Value) -> Input {
        Input::from_value(value).unwrap()
    }

    fn stages() -> Vec<Category> {
        ["1", "2", "3", "4"]
            .iter()
            .map(|code| Category {
                code: code.to_string(),
                value: code.parse().unwrap(),
            })
            .collect()
    }

    #[test]
    fn numeric_accepts_values_within_inclusive_bounds() {
        let range = NumericRange::inclusive(0.0, 4.0);
        let values = validate_numeric(&input(json!({ "cT": 4 })), "cT", &range).unwrap();
        assert_eq!(values, vec![4.0]);

        let values = validate_numeric(&input(json!([{ "cT": 0 }, { "cT": 2.5 }])), "cT", &range).unwrap();
        assert_eq!(values, vec![0.0, 2.5]);
    }

    #[test]
    fn numeric_missing_feature_names_it() {
        let range = NumericRange::inclusive(0.0, 4.0);
        let err = validate_numeric(&input(json!({ "cN": 1 })), "cT", &range).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFeature {
                feature: "cT".to_string(),
                item: None
            }
        );
    }

    #[test]
    fn numeric_rejects_bools_and_strings() {
        let range = NumericRange::inclusive(0.0, 4.0);
        for raw in [json!(true), json!("3"), json!(null)] {
            let err = validate_numeric(&input(json!({ "cT": raw })), "cT", &range).unwrap_err();
            assert_eq!(err.kind(), "TypeMismatch", "value {raw}");
        }
    }

    #[test]
    fn numeric_out_of_range_reports_batch_item() {
        let range = NumericRange::inclusive(0.0, 3.0);
        let err = validate_numeric(&input(json!([{ "cN": 1 }, { "cN": 7 }])), "cN", &range).unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");
        assert_eq!(err.item(), Some(1));
        assert_eq!(err.to_string(), "Invalid cN value in item 1: 7 (allowed range: [0, 3])");
    }

    #[test]
    fn exclusive_bounds_reject_endpoints() {
        let range = NumericRange::inclusive(0.0, 100.0)
            .with_bounds(BoundKind::Exclusive, BoundKind::Exclusive);
        assert!(validate_numeric(&input(json!({ "dose": 0 })), "dose", &range).is_err());
        assert!(validate_numeric(&input(json!({ "dose": 100 })), "dose", &range).is_err());
        assert!(validate_numeric(&input(json!({ "dose": 50 })), "dose", &range).is_ok());
    }

    #[test]
    fn batch_item_that_is_not_an_object_is_invalid_input() {
        let range = NumericRange::inclusive(0.0, 4.0);
        let err = validate_numeric(&input(json!([{ "cT": 1 }, [1, 2]])), "cT", &range).unwrap_err();
        assert_eq!(err, ValidationError::InvalidInput { item: Some(1) });
    }

    #[test]
    fn categorical_matches_numbers_and_strings() {
        let cats = stages();
        let matched = validate_categorical(&input(json!([{ "T": 2 }, { "T": "3" }])), "T", &cats).unwrap();
        assert_eq!(matched[0].code, "2");
        assert_eq!(matched[1].value, 3.0);
    }

    #[test]
    fn categorical_rejects_unknown_codes() {
        let cats = stages();
        let err = validate_categorical(&input(json!({ "T": 5 })), "T", &cats).unwrap_err();
        assert_eq!(err.kind(), "InvalidCategory");
        assert_eq!(err.to_string(), "Invalid T category: 5 (allowed codes: 1, 2, 3, 4)");

        let err = validate_categorical(&input(json!({ "T": false })), "T", &cats).unwrap_err();
        assert_eq!(err.kind(), "InvalidCategory");

        let err = validate_categorical(&input(json!({})), "T", &cats).unwrap_err();
        assert_eq!(err.kind(), "MissingFeature");
    }
}
