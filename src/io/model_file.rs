//! Model definition files.
//!
//! A model file is the single external resource describing one model variant:
//! - identity (`model_uri`, `model_name`, `model_type`)
//! - coefficients (`intercept`, `covariate_weights` in file order)
//! - per-feature preprocessing overrides (`preprocessing`)
//! - the model card, inline (`metadata`) or by reference (`metadata_url`)
//!
//! The feature schema comes from the card's `"Input data"`; the overrides then
//! adjust bound inclusivity, category encodings, and remaps.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{BoundKind, FeatureConstraint, ModelMetadata, ModelSpec, Remap};
use crate::error::{AppError, ValidationError};
use crate::models::LogisticModel;
use crate::schema::{FeatureSchema, normalize_code, parse_general_info, parse_input_features};

pub const LOGISTIC_REGRESSION: &str = "logistic_regression";

/// On-disk model definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    pub model_uri: String,
    pub model_name: String,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub intercept: f64,
    pub covariate_weights: serde_json::Map<String, Value>,
    #[serde(default)]
    pub preprocessing: Preprocessing,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub metadata_url: Option<String>,
}

fn default_model_type() -> String {
    LOGISTIC_REGRESSION.to_string()
}

/// Per-feature adjustments on top of the card's schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preprocessing {
    #[serde(default)]
    pub bounds: BTreeMap<String, BoundOverride>,
    #[serde(default)]
    pub remaps: BTreeMap<String, Remap>,
    #[serde(default)]
    pub encodings: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundOverride {
    #[serde(default)]
    pub lower: BoundKind,
    #[serde(default)]
    pub upper: BoundKind,
}

/// Read and parse a model file without resolving its card.
pub fn read_model_file(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model file '{}': {e}", path.display())))?;
    let model: ModelFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid model file '{}': {e}", path.display())))?;

    if model.model_type != LOGISTIC_REGRESSION {
        return Err(AppError::new(
            2,
            format!(
                "Unsupported model_type '{}' in '{}' (expected '{LOGISTIC_REGRESSION}').",
                model.model_type,
                path.display()
            ),
        ));
    }
    Ok(model)
}

/// Assemble a model from its definition and resolved model card.
pub fn build_model(file: &ModelFile, card: &Value) -> Result<LogisticModel, ValidationError> {
    let mut schema = FeatureSchema::new(parse_input_features(card)?)?;
    apply_preprocessing(&mut schema, &file.preprocessing)?;
    ensure_encoded(&schema)?;

    let weights = file
        .covariate_weights
        .iter()
        .map(|(name, w)| {
            w.as_f64()
                .map(|w| (name.clone(), w))
                .ok_or_else(|| ValidationError::schema(name, format!("weight {w} is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let spec = ModelSpec {
        intercept: file.intercept,
        weights,
    };

    let metadata = ModelMetadata {
        model_uri: file.model_uri.clone(),
        model_name: file.model_name.clone(),
        model_type: file.model_type.clone(),
        ..parse_general_info(card)
    };

    LogisticModel::new(metadata, spec, schema)
}

fn apply_preprocessing(schema: &mut FeatureSchema, pre: &Preprocessing) -> Result<(), ValidationError> {
    for (feature, bounds) in &pre.bounds {
        let spec = schema
            .get_mut(feature)
            .ok_or_else(|| ValidationError::schema(feature, "bounds given for an undeclared feature"))?;
        match &mut spec.constraint {
            FeatureConstraint::Numeric(range) => {
                *range = range.with_bounds(bounds.lower, bounds.upper);
            }
            FeatureConstraint::Categorical { .. } => {
                return Err(ValidationError::schema(feature, "bounds given for a categorical feature"));
            }
        }
    }

    for (feature, encoding) in &pre.encodings {
        let spec = schema
            .get_mut(feature)
            .ok_or_else(|| ValidationError::schema(feature, "encoding given for an undeclared feature"))?;
        let FeatureConstraint::Categorical { categories } = &mut spec.constraint else {
            return Err(ValidationError::schema(feature, "encoding given for a numeric feature"));
        };
        for (code, value) in encoding {
            let code = normalize_code(&Value::String(code.clone())).unwrap_or_default();
            let category = categories
                .iter_mut()
                .find(|c| c.code == code)
                .ok_or_else(|| ValidationError::schema(feature, format!("encoding for unknown code '{code}'")))?;
            category.value = *value;
        }
    }

    for (feature, remap) in &pre.remaps {
        let spec = schema
            .get_mut(feature)
            .ok_or_else(|| ValidationError::schema(feature, "remap given for an undeclared feature"))?;
        spec.remap = Some(remap.clone());
    }

    Ok(())
}

fn ensure_encoded(schema: &FeatureSchema) -> Result<(), ValidationError> {
    for spec in schema.features() {
        if let FeatureConstraint::Categorical { categories } = &spec.constraint {
            if let Some(c) = categories.iter().find(|c| !c.value.is_finite()) {
                return Err(ValidationError::schema(
                    &spec.name,
                    format!("category code '{}' has no numeric encoding", c.code),
                ));
            }
        }
    }
    Ok(())
}
