//! Feature schema: the ordered list of declared input features.
//!
//! - parsing of model-card metadata into `FeatureSpec`s (`metadata`)
//! - accessors used by the validator (`lookup_range`, `lookup_categories`)

pub mod metadata;

pub use metadata::*;

use serde::Serialize;

use crate::domain::{Category, FeatureConstraint, FeatureSpec, NumericRange};
use crate::error::ValidationError;

/// Declared features in validation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build a schema, rejecting duplicate feature names.
    pub fn new(features: Vec<FeatureSpec>) -> Result<Self, ValidationError> {
        for (idx, spec) in features.iter().enumerate() {
            if features[..idx].iter().any(|other| other.name == spec.name) {
                return Err(ValidationError::schema(&spec.name, "declared more than once"));
            }
        }
        Ok(Self { features })
    }

    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|spec| spec.name == feature)
    }

    pub fn position(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|spec| spec.name == feature)
    }

    pub(crate) fn get_mut(&mut self, feature: &str) -> Option<&mut FeatureSpec> {
        self.features.iter_mut().find(|spec| spec.name == feature)
    }
}

/// Numeric bounds of `feature`.
pub fn lookup_range(schema: &FeatureSchema, feature: &str) -> Result<NumericRange, ValidationError> {
    let spec = schema
        .get(feature)
        .ok_or_else(|| ValidationError::schema(feature, "no range metadata found"))?;
    match &spec.constraint {
        FeatureConstraint::Numeric(range) => Ok(*range),
        FeatureConstraint::Categorical { .. } => {
            Err(ValidationError::schema(feature, "feature is categorical, not numeric"))
        }
    }
}

/// Allowed categories of `feature`.
pub fn lookup_categories<'a>(
    schema: &'a FeatureSchema,
    feature: &str,
) -> Result<&'a [Category], ValidationError> {
    let spec = schema
        .get(feature)
        .ok_or_else(|| ValidationError::schema(feature, "no category metadata found"))?;
    match &spec.constraint {
        FeatureConstraint::Categorical { categories } => Ok(categories),
        FeatureConstraint::Numeric(_) => {
            Err(ValidationError::schema(feature, "feature is numeric, not categorical"))
        }
    }
}
