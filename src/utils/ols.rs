//! Ordinary Least Squares (OLS) helpers for local polynomial fits.
//!
//! A least-squares polynomial evaluated at a fixed position is a linear
//! function of the observations. [`fitted_value_weights`] returns those
//! linear weights so a sliding-window smoother can apply one dot product
//! per output instead of refitting every window.

use crate::error::{FeatureError, Result};

/// Coefficients of a polynomial `c0 + c1*t + ... + cd*t^d`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    pub coefficients: Vec<f64>,
}

impl PolyFit {
    /// Evaluate the polynomial at `t` (Horner's scheme).
    pub fn eval(&self, t: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Build the normal-equation matrix X'X for a polynomial design over `t`.
fn normal_matrix(t: &[f64], degree: usize) -> Vec<Vec<f64>> {
    let num_params = degree + 1;
    let mut xtx = vec![vec![0.0; num_params]; num_params];
    for &ti in t {
        for i in 0..num_params {
            for j in 0..num_params {
                xtx[i][j] += ti.powi((i + j) as i32);
            }
        }
    }
    xtx
}

fn check_design(n: usize, degree: usize) -> Result<()> {
    if n == 0 {
        return Err(FeatureError::InsufficientData { needed: 1, got: 0 });
    }
    if degree >= n {
        return Err(FeatureError::InvalidParameter(format!(
            "polynomial degree {} needs more than {} points",
            degree, n
        )));
    }
    Ok(())
}

/// Fit a polynomial of the given degree to `(t, y)` by least squares.
pub fn polyfit(t: &[f64], y: &[f64], degree: usize) -> Result<PolyFit> {
    if t.len() != y.len() {
        return Err(FeatureError::DimensionMismatch {
            expected: t.len(),
            got: y.len(),
        });
    }
    check_design(t.len(), degree)?;

    let xtx = normal_matrix(t, degree);
    let mut xty = vec![0.0; degree + 1];
    for (&ti, &yi) in t.iter().zip(y) {
        for (p, slot) in xty.iter_mut().enumerate() {
            *slot += ti.powi(p as i32) * yi;
        }
    }

    let coefficients = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        FeatureError::InvalidParameter("polynomial fit failed: matrix not positive definite".into())
    })?;

    Ok(PolyFit { coefficients })
}

/// Linear weights `w` such that the least-squares polynomial over `t`,
/// evaluated at `at`, equals `sum(w[j] * y[j])` for any `y`.
pub fn fitted_value_weights(t: &[f64], degree: usize, at: f64) -> Result<Vec<f64>> {
    check_design(t.len(), degree)?;

    // fitted(at) = v(at)' (X'X)^-1 X' y, so w = X (X'X)^-1 v(at)
    let xtx = normal_matrix(t, degree);
    let v: Vec<f64> = (0..=degree).map(|p| at.powi(p as i32)).collect();
    let c = solve_symmetric(&xtx, &v).ok_or_else(|| {
        FeatureError::InvalidParameter("polynomial fit failed: matrix not positive definite".into())
    })?;

    Ok(t.iter()
        .map(|&ti| {
            c.iter()
                .enumerate()
                .map(|(p, cp)| cp * ti.powi(p as i32))
                .sum()
        })
        .collect())
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
