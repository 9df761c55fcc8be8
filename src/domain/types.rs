//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - loaded once from a model file at startup
//! - shared read-only between concurrent requests
//! - returned to callers as the model's input-parameter description

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Whether one side of a numeric range admits its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    #[default]
    Inclusive,
    Exclusive,
}

/// Allowed interval for a numeric feature.
///
/// Each side carries its own inclusivity; some published models use `<`
/// where most use `<=`, and the observed behavior is kept per feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub lower: BoundKind,
    pub upper: BoundKind,
}

impl NumericRange {
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            lower: BoundKind::Inclusive,
            upper: BoundKind::Inclusive,
        }
    }

    pub fn with_bounds(self, lower: BoundKind, upper: BoundKind) -> Self {
        Self { lower, upper, ..self }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = match self.lower {
            BoundKind::Inclusive => value >= self.min,
            BoundKind::Exclusive => value > self.min,
        };
        let below = match self.upper {
            BoundKind::Inclusive => value <= self.max,
            BoundKind::Exclusive => value < self.max,
        };
        above && below
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = match self.lower {
            BoundKind::Inclusive => '[',
            BoundKind::Exclusive => '(',
        };
        let close = match self.upper {
            BoundKind::Inclusive => ']',
            BoundKind::Exclusive => ')',
        };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

/// One allowed code of a categorical feature and the number the linear model sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub code: String,
    pub value: f64,
}

/// Validity constraint of a feature, tagged by kind for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeatureConstraint {
    Numeric(NumericRange),
    Categorical { categories: Vec<Category> },
}

/// Post-validation transform applied to a feature value before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Remap {
    /// `1.0` when the value is one of `codes`, else `0.0`.
    Indicator { codes: Vec<f64> },
    /// Natural logarithm; the value must be strictly positive.
    Log,
}

/// Schema entry describing validity constraints for one input feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(flatten)]
    pub constraint: FeatureConstraint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remap: Option<Remap>,
}

impl FeatureSpec {
    pub fn numeric(name: impl Into<String>, range: NumericRange) -> Self {
        Self {
            name: name.into(),
            label: None,
            concept: None,
            constraint: FeatureConstraint::Numeric(range),
            remap: None,
        }
    }

    pub fn categorical(name: impl Into<String>, categories: Vec<Category>) -> Self {
        Self {
            name: name.into(),
            label: None,
            concept: None,
            constraint: FeatureConstraint::Categorical { categories },
            remap: None,
        }
    }

    pub fn with_remap(mut self, remap: Remap) -> Self {
        self.remap = Some(remap);
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self.constraint {
            FeatureConstraint::Numeric(_) => "numeric",
            FeatureConstraint::Categorical { .. } => "categorical",
        }
    }
}

/// Coefficients of the linear predictor.
///
/// `weights` keeps the order of the model file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub intercept: f64,
    pub weights: Vec<(String, f64)>,
}

/// Descriptive information about a model (model card summary).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub model_uri: String,
    pub model_name: String,
    pub model_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// A raw request record: feature name to number or string code.
pub type InputRecord = serde_json::Map<String, Value>;

/// Request payload: one record or an ordered batch.
///
/// Batch items are kept as raw values so that a non-object item is reported
/// with its position instead of failing deserialization of the whole body.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Single(InputRecord),
    Batch(Vec<Value>),
}

impl Input {
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(record) => Ok(Input::Single(record)),
            Value::Array(items) => Ok(Input::Batch(items)),
            _ => Err(ValidationError::InvalidInput { item: None }),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Input::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Input::Single(_) => 1,
            Input::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records paired with their batch position (`None` for a single record).
    pub fn records(&self) -> Result<Vec<(Option<usize>, &InputRecord)>, ValidationError> {
        match self {
            Input::Single(record) => Ok(vec![(None, record)]),
            Input::Batch(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Value::Object(record) => Ok((Some(idx), record)),
                    _ => Err(ValidationError::InvalidInput { item: Some(idx) }),
                })
                .collect(),
        }
    }
}

/// Prediction output mirroring the input shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scores {
    Single(f64),
    Batch(Vec<f64>),
}

impl Scores {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Scores::Single(p) => std::slice::from_ref(p),
            Scores::Batch(ps) => ps,
        }
    }
}

/// HTTP service configuration, derived from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub model_path: PathBuf,
    pub addr: SocketAddr,
}
