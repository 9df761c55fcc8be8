//! Scoring for logistic-regression models.
//!
//! `predict` relies on two primitive operations:
//! - preprocess the input into feature rows (validation + remaps)
//! - evaluate the linear predictor and apply the logistic link
//!
//! The model holds no mutable state, so a single instance can be shared
//! across threads and requests.

use serde_json::Value;
use tracing::debug;

use crate::domain::{FeatureSpec, Input, ModelMetadata, ModelSpec, Scores};
use crate::error::ValidationError;
use crate::math::{linear_predictor, logistic};
use crate::preprocess::preprocess;
use crate::schema::FeatureSchema;

/// A loaded, validated model variant.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    metadata: ModelMetadata,
    spec: ModelSpec,
    schema: FeatureSchema,
    /// Schema position of each weighted feature, parallel to `spec.weights`.
    columns: Vec<usize>,
    weights: Vec<f64>,
}

/// Per-record scoring detail.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub logit: f64,
    pub probability: f64,
}

impl LogisticModel {
    /// Assemble a model, checking that every weight has a declared feature.
    pub fn new(
        metadata: ModelMetadata,
        spec: ModelSpec,
        schema: FeatureSchema,
    ) -> Result<Self, ValidationError> {
        if !spec.intercept.is_finite() {
            return Err(ValidationError::schema("intercept", "intercept must be finite"));
        }

        let mut columns = Vec::with_capacity(spec.weights.len());
        let mut weights = Vec::with_capacity(spec.weights.len());
        for (feature, weight) in &spec.weights {
            if !weight.is_finite() {
                return Err(ValidationError::schema(feature, "weight must be finite"));
            }
            let position = schema
                .position(feature)
                .ok_or_else(|| ValidationError::schema(feature, "weighted feature is not declared in the schema"))?;
            columns.push(position);
            weights.push(*weight);
        }

        Ok(Self {
            metadata,
            spec,
            schema,
            columns,
            weights,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature descriptions for external documentation.
    pub fn input_parameters(&self) -> &[FeatureSpec] {
        self.schema.features()
    }

    /// Probability for a record, or one probability per item for a batch.
    pub fn predict(&self, input: &Input) -> Result<Scores, ValidationError> {
        let scored = self.score(input)?;
        let probabilities: Vec<f64> = scored.into_iter().map(|s| s.probability).collect();
        match input {
            Input::Batch(_) => Ok(Scores::Batch(probabilities)),
            Input::Single(_) => probabilities
                .first()
                .copied()
                .map(Scores::Single)
                .ok_or(ValidationError::InvalidInput { item: None }),
        }
    }

    /// `predict` for a raw JSON body.
    pub fn predict_value(&self, body: Value) -> Result<Scores, ValidationError> {
        self.predict(&Input::from_value(body)?)
    }

    /// Logit and probability for every record, in input order.
    pub fn score(&self, input: &Input) -> Result<Vec<Scored>, ValidationError> {
        let rows = preprocess(&self.schema, input)?;
        let eta = linear_predictor(&rows, &self.columns, &self.weights, self.spec.intercept);

        debug!(model = %self.metadata.model_name, records = rows.len(), "scored input");

        Ok(eta
            .iter()
            .map(|&logit| Scored {
                logit,
                probability: logistic(logit),
            })
            .collect())
    }
}
