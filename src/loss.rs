//! Log-loss.
//!
//! The cost of a batch is the binary cross-entropy of every category column,
//! summed across categories and averaged over records. `LOG_EPS` is added inside
//! both logarithms so saturated probabilities never produce `ln(0)`.

/// Smoothing term added inside the logarithms.
pub const LOG_EPS: f64 = 1e-7;

/// Batch log-loss over row-major `(len, n_category)` probabilities and targets.
///
/// Returns `-Σ[y·ln(a+ε) + (1-y)·ln(1-a+ε)] / len`.
///
/// Shape contract: `probs.len() == targets.len()`, `len > 0`.
#[inline]
pub fn log_loss(probs: &[f64], targets: &[f64], len: usize) -> f64 {
    assert_eq!(
        probs.len(),
        targets.len(),
        "probs len {} does not match targets len {}",
        probs.len(),
        targets.len()
    );
    assert!(len > 0, "log_loss requires at least one record");

    let mut sum = 0.0_f64;
    for (&a, &y) in probs.iter().zip(targets) {
        sum += y * (a + LOG_EPS).ln() + (1.0 - y) * (1.0 - a + LOG_EPS).ln();
    }
    -sum / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_predictions_cost_almost_nothing() {
        // The smoothing term lets a saturated, correct prediction dip just below zero.
        let cost = log_loss(&[1.0, 0.0], &[1.0, 0.0], 1);
        assert!(cost > -2.0 * LOG_EPS - 1e-12);
        assert!(cost < 1e-6);
    }

    #[test]
    fn confident_wrong_predictions_are_finite() {
        let cost = log_loss(&[0.0, 1.0], &[1.0, 0.0], 1);
        assert!(cost.is_finite());
        assert!((cost - 2.0 * -(LOG_EPS.ln())).abs() < 1e-9);
    }

    #[test]
    fn cost_is_averaged_over_records() {
        let one = log_loss(&[0.5], &[1.0], 1);
        let two = log_loss(&[0.5, 0.5], &[1.0, 1.0], 2);
        assert!((one - two).abs() < 1e-12);
        assert!((one - -(0.5 + LOG_EPS).ln()).abs() < 1e-12);
    }
}
