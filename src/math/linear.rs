//! Linear predictor `η = b + X w`.
//!
//! Rows of `X` are preprocessed records; columns are the weighted features in
//! model-file order. A batch is evaluated as a single matrix-vector product,
//! which keeps per-item results independent and in input order.

use nalgebra::{DMatrix, DVector};

/// Evaluate `intercept + rows * weights`.
///
/// `columns[j]` is the index into each row of the feature carrying `weights[j]`.
///
/// # Panics
/// Panics if a row is shorter than the largest index in `columns`, or if
/// `columns` and `weights` differ in length. Rows produced by the
/// preprocessor for the same schema always satisfy this.
pub fn linear_predictor(
    rows: &[Vec<f64>],
    columns: &[usize],
    weights: &[f64],
    intercept: f64,
) -> DVector<f64> {
    assert_eq!(columns.len(), weights.len(), "one column per weight");

    let x = DMatrix::from_fn(rows.len(), columns.len(), |i, j| rows[i][columns[j]]);
    let w = DVector::from_column_slice(weights);

    (x * w).add_scalar(intercept)
}
