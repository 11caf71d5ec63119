//! Metrics.
//!
//! Metrics are evaluation helpers; they never feed back into training.

use crate::{Error, Matrix, Params, Result, predict};

/// Accuracy percentage in `[0, 100]` of `params` on `(x, y)`.
///
/// A record counts as correct when its predicted row equals its label row
/// exactly (for one-hot rows: half the summed absolute difference is zero).
pub fn evaluate(params: &Params, x: &Matrix, y: &Matrix) -> Result<f64> {
    let pred = predict(params, x)?;
    if pred.shape() != y.shape() {
        return Err(Error::InvalidShape(format!(
            "prediction shape {:?} does not match label shape {:?}",
            pred.shape(),
            y.shape()
        )));
    }

    let correct = (0..pred.rows())
        .filter(|&i| {
            pred.row(i)
                .iter()
                .zip(y.row(i))
                .all(|(&p, &t)| f64::from(p) == t)
        })
        .count();

    Ok(correct as f64 / pred.rows() as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_exact_row_matches() {
        let w = Matrix::from_rows(&[vec![1.0], vec![-1.0]]).unwrap();
        let params = Params::from_parts(w, vec![0.0, 0.0]).unwrap();
        let x = Matrix::column(vec![2.0, -2.0, 3.0, -1.0]);
        let y = Matrix::from_rows(&[
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ])
        .unwrap();
        assert_eq!(evaluate(&params, &x, &y).unwrap(), 75.0);
    }

    #[test]
    fn rejects_label_shape_mismatch() {
        let params = Params::zeros(2, 1);
        let x = Matrix::column(vec![1.0, 2.0]);
        let y = Matrix::column(vec![1.0, 0.0]);
        assert!(matches!(
            evaluate(&params, &x, &y),
            Err(Error::InvalidShape(_))
        ));
    }
}
