//! Logistic activation.
//!
//! Every category score `z = x·w + b` is squashed into `(0, 1)` with the
//! logistic function. Scores are clipped first so `exp(-z)` can never overflow.

/// Bound applied to raw scores before the logistic transform.
pub const SCORE_CLIP: f64 = 32.0;

/// Logistic function on a clipped score: `1 / (1 + exp(-clip(z, -32, 32)))`.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-SCORE_CLIP, SCORE_CLIP);
    1.0 / (1.0 + (-z).exp())
}

/// Apply [`sigmoid`] in place.
#[inline]
pub(crate) fn sigmoid_in_place(zs: &mut [f64]) {
    for z in zs.iter_mut() {
        *z = sigmoid(*z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_half_at_zero() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn extreme_scores_are_clipped() {
        assert_eq!(sigmoid(1e9), sigmoid(SCORE_CLIP));
        assert_eq!(sigmoid(-1e9), sigmoid(-SCORE_CLIP));
        assert!(sigmoid(-1e9) > 0.0);
        assert!(sigmoid(1e9) < 1.0 + f64::EPSILON);
    }

    #[test]
    fn sigmoid_is_symmetric() {
        for z in [-5.0, -1.5, 0.3, 2.0, 10.0] {
            assert!((sigmoid(z) + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }
}
