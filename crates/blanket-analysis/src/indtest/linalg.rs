//! Dense inversion for the small matrices partial correlation needs.

use ndarray::Array2;

const PIVOT_TOLERANCE: f64 = 1e-12;

/// Gauss-Jordan inverse with partial pivoting. `None` for a singular or non-square matrix.
pub(crate) fn invert(matrix: &Array2<f64>) -> Option<Array2<f64>> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return None;
    }
    let scale = matrix.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);
    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() <= PIVOT_TOLERANCE * scale {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
                inv.swap([pivot, k], [col, k]);
            }
        }
        let diag = a[[col, col]];
        for k in 0..n {
            a[[col, k]] /= diag;
            inv[[col, k]] /= diag;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[[row, k]] -= factor * a[[col, k]];
                inv[[row, k]] -= factor * inv[[col, k]];
            }
        }
    }
    Some(inv)
}
