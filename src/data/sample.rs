//! Synthetic request records drawn from a model's feature schema.
//!
//! Every generated record passes validation for the model it was drawn from:
//! numeric values are uniform within the declared range (pulled inward for
//! exclusive bounds, kept positive for log-remapped inputs) and categorical
//! values are one of the declared codes.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde_json::{Map, Number, Value};

use crate::domain::{BoundKind, Category, FeatureConstraint, FeatureSpec, NumericRange, Remap};
use crate::error::AppError;
use crate::models::LogisticModel;

/// Fraction of the range kept clear of an exclusive endpoint.
const EXCLUSIVE_MARGIN: f64 = 1e-6;

pub fn generate_records(model: &LogisticModel, count: usize, seed: u64) -> Result<Vec<Value>, AppError> {
    if count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let features = model.input_parameters();
    let mut samplers = Vec::with_capacity(features.len());
    for spec in features {
        samplers.push((spec.name.as_str(), Sampler::for_feature(spec)?));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..count)
        .map(|_| {
            let record: Map<String, Value> = samplers
                .iter()
                .map(|(name, sampler)| (name.to_string(), sampler.draw(&mut rng)))
                .collect();
            Value::Object(record)
        })
        .collect();

    Ok(records)
}

enum Sampler<'a> {
    Fixed(f64),
    Uniform { lo: f64, hi: f64 },
    Pick(&'a [Category]),
}

impl<'a> Sampler<'a> {
    fn for_feature(spec: &'a FeatureSpec) -> Result<Self, AppError> {
        match &spec.constraint {
            FeatureConstraint::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(AppError::new(2, format!("No categories to sample for {}.", spec.name)));
                }
                Ok(Sampler::Pick(categories))
            }
            FeatureConstraint::Numeric(range) => {
                let (mut lo, hi) = sampling_interval(range);
                if matches!(spec.remap, Some(Remap::Log)) && lo <= 0.0 {
                    lo = (hi * EXCLUSIVE_MARGIN).max(f64::MIN_POSITIVE);
                }
                let admissible = lo.is_finite() && hi.is_finite() && lo <= hi;
                if !(admissible && range.contains(lo) && range.contains(hi)) {
                    return Err(AppError::new(
                        2,
                        format!("Range {range} of {} admits no values to sample.", spec.name),
                    ));
                }
                if lo == hi {
                    Ok(Sampler::Fixed(lo))
                } else {
                    Ok(Sampler::Uniform { lo, hi })
                }
            }
        }
    }

    fn draw(&self, rng: &mut StdRng) -> Value {
        match self {
            Sampler::Fixed(v) => number(*v),
            Sampler::Uniform { lo, hi } => number(rng.gen_range(*lo..=*hi).clamp(*lo, *hi)),
            Sampler::Pick(categories) => {
                let category = &categories[rng.gen_range(0..categories.len())];
                match category.code.parse::<i64>() {
                    Ok(n) => Value::Number(n.into()),
                    Err(_) => Value::String(category.code.clone()),
                }
            }
        }
    }
}

/// Closed interval to draw from; exclusive ends move at least one ulp inward.
fn sampling_interval(range: &NumericRange) -> (f64, f64) {
    let margin = (range.max - range.min) * EXCLUSIVE_MARGIN;
    let lo = match range.lower {
        BoundKind::Inclusive => range.min,
        BoundKind::Exclusive => (range.min + margin).max(next_up(range.min)),
    };
    let hi = match range.upper {
        BoundKind::Inclusive => range.max,
        BoundKind::Exclusive => (range.max - margin).min(next_down(range.max)),
    };
    (lo, hi)
}

/// Smallest float greater than finite `x`.
fn next_up(x: f64) -> f64 {
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    f64::from_bits(if x > 0.0 { bits + 1 } else { bits - 1 })
}

/// Largest float less than finite `x`.
fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

fn number(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Input, ModelMetadata, ModelSpec};
    use crate::schema::FeatureSchema;

    fn model() -> LogisticModel {
        let schema = FeatureSchema::new(vec![
            FeatureSpec::numeric(
                "dose",
                NumericRange::inclusive(0.0, 70.0).with_bounds(BoundKind::Exclusive, BoundKind::Exclusive),
            ),
            FeatureSpec::numeric("gtv", NumericRange::inclusive(0.0, 500.0)).with_remap(Remap::Log),
            FeatureSpec::categorical(
                "N",
                ["0", "1", "2"]
                    .iter()
                    .map(|c| Category { code: c.to_string(), value: c.parse().unwrap() })
                    .collect(),
            ),
        ])
        .unwrap();
        let spec = ModelSpec {
            intercept: 0.1,
            weights: vec![("dose".into(), 0.01), ("gtv".into(), 0.2), ("N".into(), -0.3)],
        };
        LogisticModel::new(ModelMetadata::default(), spec, schema).unwrap()
    }

    #[test]
    fn generated_records_pass_validation() {
        let model = model();
        let records = generate_records(&model, 200, 7).unwrap();
        assert_eq!(records.len(), 200);

        let scores = model.predict(&Input::from_value(Value::Array(records)).unwrap()).unwrap();
        assert_eq!(scores.as_slice().len(), 200);
    }

    #[test]
    fn same_seed_same_records() {
        let model = model();
        assert_eq!(generate_records(&model, 5, 42).unwrap(), generate_records(&model, 5, 42).unwrap());
        assert_ne!(generate_records(&model, 5, 42).unwrap(), generate_records(&model, 5, 43).unwrap());
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(generate_records(&model(), 0, 1).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn degenerate_exclusive_range_is_rejected() {
        let spec = FeatureSpec::numeric(
            "x",
            NumericRange::inclusive(1.0, 1.0).with_bounds(BoundKind::Exclusive, BoundKind::Inclusive),
        );
        assert!(Sampler::for_feature(&spec).is_err());

        let fixed = FeatureSpec::numeric("x", NumericRange::inclusive(1.0, 1.0));
        assert!(matches!(Sampler::for_feature(&fixed), Ok(Sampler::Fixed(v)) if v == 1.0));
    }

    #[test]
    fn exclusive_bounds_hold_at_large_magnitude() {
        let range = NumericRange::inclusive(1e9, 1e9 + 1e-3)
            .with_bounds(BoundKind::Exclusive, BoundKind::Exclusive);
        let (lo, hi) = sampling_interval(&range);
        assert!(range.contains(lo) && range.contains(hi));

        let schema = FeatureSchema::new(vec![FeatureSpec::numeric("x", range)]).unwrap();
        let spec = ModelSpec { intercept: 0.0, weights: vec![("x".into(), 1e-9)] };
        let model = LogisticModel::new(ModelMetadata::default(), spec, schema).unwrap();

        let records = generate_records(&model, 20_000, 3).unwrap();
        for record in &records {
            assert!(range.contains(record["x"].as_f64().unwrap()), "{record}");
        }
        assert!(model.predict(&Input::from_value(Value::Array(records)).unwrap()).is_ok());
    }

    #[test]
    fn neighbouring_floats() {
        assert!(next_up(1.0) > 1.0 && next_down(1.0) < 1.0);
        assert!(next_up(-1.0) > -1.0);
        assert!(next_up(0.0) > 0.0 && next_down(0.0) < 0.0);
        assert_eq!(next_down(next_up(1e9)), 1e9);
    }
}
