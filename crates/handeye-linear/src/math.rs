//! Numeric helpers for the linear solvers.

use handeye_core::Real;
use nalgebra::{DMatrix, DVector};

/// Solve `ax² + bx + c = 0` for real roots.
///
/// Discriminants that are negative only by rounding (relative to the
/// coefficient scale, see `rel_tol`) are clamped to zero, yielding the double
/// root. Roots are returned in ascending order with duplicates removed.
pub fn solve_quadratic_real(a: Real, b: Real, c: Real, rel_tol: Real) -> Vec<Real> {
    let eps = 1e-12;
    if a.abs() < eps {
        if b.abs() < eps {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    let scale = b * b + (4.0 * a * c).abs();
    if disc < -rel_tol * scale {
        return Vec::new();
    }
    let sqrt_disc = disc.max(0.0).sqrt();
    // Numerically stable form avoiding cancellation.
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    let mut roots = if q.abs() < eps {
        vec![-b / (2.0 * a)]
    } else {
        vec![q / a, c / q]
    };
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|x, y| (*x - *y).abs() < 1e-12);
    roots
}

/// Singular values of `m` and the matching right singular vectors, sorted
/// by descending singular value.
///
/// Returns `None` when the decomposition does not provide `Vᵀ`.
pub fn sorted_right_singular_vectors(m: DMatrix<Real>) -> Option<Vec<(Real, DVector<Real>)>> {
    let svd = m.svd(false, true);
    let v_t = svd.v_t?;
    let mut pairs: Vec<(Real, DVector<Real>)> = svd
        .singular_values
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, v_t.row(i).transpose()))
        .collect();
    pairs.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(std::cmp::Ordering::Equal));
    Some(pairs)
}
