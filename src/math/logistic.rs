//! Logistic (sigmoid) link.
//!
//! `σ(x) = 1 / (1 + exp(-x))`
//!
//! Numerical notes:
//! - The form `exp(x) / (1 + exp(x))` yields `inf / inf = NaN` for large `x`.
//! - We branch on the sign so the exponent passed to `exp` is always `<= 0`.

/// Logistic transform of a logit, always within `[0, 1]` for finite input.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
