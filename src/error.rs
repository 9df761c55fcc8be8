//! Error types.
//!
//! - `ValidationError` is what the validation/scoring core returns; every
//!   variant names the offending feature and, for batches, the item index.
//! - `AppError` is what the binary reports: a message plus a process exit code.
//!
//! Exit codes: `2` configuration / model file / input parsing, `3` validation,
//! `4` network and I/O at runtime.

use crate::domain::NumericRange;

/// Input validation failures raised by the validator, preprocessor and scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing {feature}{}", in_item(.item))]
    MissingFeature { feature: String, item: Option<usize> },

    #[error("Invalid {feature} type{}, expected {expected}", in_item(.item))]
    TypeMismatch {
        feature: String,
        item: Option<usize>,
        expected: &'static str,
    },

    #[error("Invalid {feature} value{}: {value} (allowed range: {range})", in_item(.item))]
    OutOfRange {
        feature: String,
        item: Option<usize>,
        value: f64,
        range: NumericRange,
    },

    #[error("Invalid {feature} category{}: {value} (allowed codes: {})", in_item(.item), .allowed.join(", "))]
    InvalidCategory {
        feature: String,
        item: Option<usize>,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid input{}: expected a JSON object", in_item(.item))]
    InvalidInput { item: Option<usize> },

    #[error("Schema error for feature '{feature}': {reason}")]
    SchemaError { feature: String, reason: String },
}

fn in_item(item: &Option<usize>) -> String {
    match item {
        Some(idx) => format!(" in item {idx}"),
        None => String::new(),
    }
}

impl ValidationError {
    pub fn schema(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::SchemaError {
            feature: feature.into(),
            reason: reason.into(),
        }
    }

    /// Stable kind name, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingFeature { .. } => "MissingFeature",
            ValidationError::TypeMismatch { .. } => "TypeMismatch",
            ValidationError::OutOfRange { .. } => "OutOfRange",
            ValidationError::InvalidCategory { .. } => "InvalidCategory",
            ValidationError::InvalidInput { .. } => "InvalidInput",
            ValidationError::SchemaError { .. } => "SchemaError",
        }
    }

    pub fn feature(&self) -> Option<&str> {
        match self {
            ValidationError::MissingFeature { feature, .. }
            | ValidationError::TypeMismatch { feature, .. }
            | ValidationError::OutOfRange { feature, .. }
            | ValidationError::InvalidCategory { feature, .. }
            | ValidationError::SchemaError { feature, .. } => Some(feature),
            ValidationError::InvalidInput { .. } => None,
        }
    }

    pub fn item(&self) -> Option<usize> {
        match self {
            ValidationError::MissingFeature { item, .. }
            | ValidationError::TypeMismatch { item, .. }
            | ValidationError::OutOfRange { item, .. }
            | ValidationError::InvalidCategory { item, .. }
            | ValidationError::InvalidInput { item } => *item,
            ValidationError::SchemaError { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let exit_code = match err {
            ValidationError::SchemaError { .. } => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
