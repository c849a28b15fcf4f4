//! Ordinary least squares on small design matrices.
//!
//! The regressions here are tiny (a handful of columns), so the normal
//! equations with a Gauss-Jordan inverse are plenty.

use stockpipe_core::FitError;

#[derive(Debug, Clone)]
pub(crate) struct OlsFit {
    pub coef: Vec<f64>,
    pub residuals: Vec<f64>,
    pub sse: f64,
    /// Standard error per coefficient.
    pub std_errors: Vec<f64>,
}

/// Fit `y = X beta + e`. `rows` holds one regressor vector per observation.
pub(crate) fn ols(y: &[f64], rows: &[Vec<f64>]) -> Result<OlsFit, FitError> {
    let n = y.len();
    debug_assert_eq!(n, rows.len());
    let k = rows.first().map(Vec::len).unwrap_or(0);
    if k == 0 || n <= k {
        return Err(FitError::TooShort {
            required: k + 1,
            available: n,
        });
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let xtx_inv = invert(&xtx)?;

    let mut coef = vec![0.0; k];
    for i in 0..k {
        for j in 0..k {
            coef[i] += xtx_inv[i][j] * xty[j];
        }
    }

    let mut residuals = Vec::with_capacity(n);
    let mut sse = 0.0;
    for (row, &yi) in rows.iter().zip(y) {
        let fitted: f64 = row.iter().zip(&coef).map(|(x, b)| x * b).sum();
        let e = yi - fitted;
        sse += e * e;
        residuals.push(e);
    }

    let s2 = sse / (n - k) as f64;
    let std_errors: Vec<f64> = (0..k).map(|i| (s2 * xtx_inv[i][i]).sqrt()).collect();

    if coef.iter().chain(&std_errors).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("coefficient"));
    }

    Ok(OlsFit {
        coef,
        residuals,
        sse,
        std_errors,
    })
}

/// Gauss-Jordan inverse with partial pivoting.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, FitError> {
    let k = matrix.len();
    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..k).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&a, &b| {
                aug[a][col]
                    .abs()
                    .partial_cmp(&aug[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap();

        if aug[pivot_row][col].abs() < 1e-12 {
            return Err(FitError::Singular);
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for v in aug[col].iter_mut() {
            *v /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * k {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[k..].to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        // y = 2 + 3x, no noise
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let rows: Vec<Vec<f64>> = xs.iter().map(|&x| vec![1.0, x]).collect();
        let y: Vec<f64> = xs.iter().map(|&x| 2.0 + 3.0 * x).collect();

        let fit = ols(&y, &rows).unwrap();

        assert!((fit.coef[0] - 2.0).abs() < 1e-9);
        assert!((fit.coef[1] - 3.0).abs() < 1e-9);
        assert!(fit.sse < 1e-12);
    }

    #[test]
    fn test_singular_design_rejected() {
        // Two identical columns.
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();

        assert_eq!(ols(&y, &rows).unwrap_err(), FitError::Singular);
    }

    #[test]
    fn test_underdetermined_rejected() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let y = vec![1.0, 2.0];

        assert!(matches!(
            ols(&y, &rows),
            Err(FitError::TooShort { .. })
        ));
    }
}
