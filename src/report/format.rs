//! Formatted terminal output: predictions, input parameters, and model info.
//!
//! Formatting lives in one place so that scoring code stays free of
//! presentation concerns and output changes stay localized.

use crate::domain::{FeatureConstraint, FeatureSpec, Remap};
use crate::models::{LogisticModel, Scored};

/// Table of per-record logits and probabilities.
///
/// `batch` selects whether rows are labelled with their item position or as
/// the single record.
pub fn format_predictions(scored: &[Scored], batch: bool) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<8} {:>12} {:>12}\n", "item", "logit", "probability").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<8} {:-<12} {:-<12}\n", "", "", "").trim_end());
    out.push('\n');

    for (idx, s) in scored.iter().enumerate() {
        let item = if batch { idx.to_string() } else { "-".to_string() };
        out.push_str(format!("{:<8} {:>12.4} {:>12.4}\n", item, s.logit, s.probability).trim_end());
        out.push('\n');
    }

    out
}

/// Table of declared input features and their constraints.
pub fn format_parameters(features: &[FeatureSpec]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<20} {:<12} {:<28} {:<16} {:<24}\n", "feature", "kind", "allowed", "remap", "label").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<20} {:-<12} {:-<28} {:-<16} {:-<24}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for f in features {
        out.push_str(
            format!(
                "{:<20} {:<12} {:<28} {:<16} {:<24}\n",
                truncate(&f.name, 20),
                f.kind_name(),
                truncate(&fmt_allowed(&f.constraint), 28),
                fmt_remap(f.remap.as_ref()),
                truncate(f.label.as_deref().unwrap_or(""), 24),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Model identity, provenance, and coefficients.
pub fn format_model_info(model: &LogisticModel) -> String {
    let meta = model.metadata();
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", meta.model_name));
    out.push_str(&format!("URI: {}\n", meta.model_uri));
    out.push_str(&format!("Type: {}\n", meta.model_type));
    if let Some(title) = &meta.title {
        out.push_str(&format!("Title: {title}\n"));
    }
    if let Some(outcome) = &meta.outcome {
        out.push_str(&format!("Outcome: {outcome}\n"));
    }
    if let Some(author) = &meta.created_by {
        out.push_str(&format!("Created by: {author}\n"));
    }
    if let Some(date) = meta.creation_date {
        out.push_str(&format!("Created: {date}\n"));
    }
    if let Some(image) = &meta.image_name {
        out.push_str(&format!("Image: {image}\n"));
    }
    for reference in &meta.references {
        out.push_str(&format!("Reference: {reference}\n"));
    }

    out.push_str("\nCoefficients:\n");
    out.push_str(&format!("  {:<20} {:>10.4}\n", "(intercept)", model.spec().intercept));
    for (feature, weight) in &model.spec().weights {
        out.push_str(&format!("  {:<20} {:>10.4}\n", truncate(feature, 20), weight));
    }

    out
}

fn fmt_allowed(constraint: &FeatureConstraint) -> String {
    match constraint {
        FeatureConstraint::Numeric(range) => range.to_string(),
        FeatureConstraint::Categorical { categories } => {
            let codes: Vec<&str> = categories.iter().map(|c| c.code.as_str()).collect();
            format!("{{{}}}", codes.join(", "))
        }
    }
}

fn fmt_remap(remap: Option<&Remap>) -> String {
    match remap {
        None => String::new(),
        Some(Remap::Log) => "log".to_string(),
        Some(Remap::Indicator { codes }) => {
            let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
            format!("in {{{}}}", codes.join(", "))
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
