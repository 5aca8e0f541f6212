//! Dense operator builders for the analytic and valuation channels.
//!
//! All matrices are real and symmetric, so they are Hermitian without
//! carrying complex storage.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelError, Result};
use crate::grid::PeriodicGrid;

/// Negative periodic second difference:
/// `(L ψ)[i] = -(ψ[i-1] - 2ψ[i] + ψ[i+1]) / h²`.
///
/// Positive semidefinite; the constant vector spans its kernel.
pub fn laplacian(grid: &PeriodicGrid) -> DMatrix<f64> {
    let n = grid.points();
    let inv_h2 = grid.spacing().powi(-2);
    let mut lap = DMatrix::<f64>::zeros(n, n);

    for i in 0..n {
        lap[(i, i)] = 2.0 * inv_h2;
        lap[(i, (i + 1) % n)] = -inv_h2;
        lap[(i, (i + n - 1) % n)] = -inv_h2;
    }

    lap
}

/// Permutation matrix with `(S_p ψ)[i] = ψ[(i + p) mod N]`.
pub fn shift_operator(n: usize, p: u64) -> DMatrix<f64> {
    let offset = reduce(p, n);
    let mut s = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        s[(i, (i + offset) % n)] = 1.0;
    }
    s
}

/// Apply `S_p` to a vector without materializing the permutation.
pub fn shift_vector(psi: &DVector<f64>, p: u64) -> DVector<f64> {
    let n = psi.len();
    if n == 0 {
        return psi.clone();
    }
    let offset = reduce(p, n);
    DVector::from_fn(n, |i, _| psi[(i + offset) % n])
}

/// Valuation penalty `H_p = (S_p - I)ᵀ (S_p - I) / (ln p)²`.
pub fn prime_penalty(n: usize, p: u64) -> Result<DMatrix<f64>> {
    if p < 2 {
        return Err(ModelError::InvalidPrime(p));
    }
    let d = shift_operator(n, p) - DMatrix::<f64>::identity(n, n);
    let scale = (p as f64).ln().powi(2);
    Ok((d.transpose() * &d) / scale)
}

/// Trial-division primality check.
pub fn is_prime(p: u64) -> bool {
    if p < 2 {
        return false;
    }
    if p % 2 == 0 {
        return p == 2;
    }
    let mut d = 3;
    while d * d <= p {
        if p % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Largest |m[i,j] - m[j,i]| over the matrix. Zero for a symmetric matrix.
pub fn max_asymmetry(m: &DMatrix<f64>) -> f64 {
    let mut worst = 0.0f64;
    for i in 0..m.nrows() {
        for j in (i + 1)..m.ncols() {
            worst = worst.max((m[(i, j)] - m[(j, i)]).abs());
        }
    }
    worst
}

fn reduce(p: u64, n: usize) -> usize {
    (p % n as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> PeriodicGrid {
        PeriodicGrid::new(n, None).unwrap()
    }

    #[test]
    fn test_laplacian_stencil() {
        let g = PeriodicGrid::new(5, Some(2.5)).unwrap(); // h = 1
        let lap = laplacian(&g);
        assert_eq!(lap[(0, 0)], 2.0);
        assert_eq!(lap[(0, 1)], -1.0);
        assert_eq!(lap[(0, 4)], -1.0);
        assert_eq!(lap[(0, 2)], 0.0);
        assert_eq!(lap[(4, 0)], -1.0);
    }

    #[test]
    fn test_laplacian_rows_sum_to_zero() {
        let lap = laplacian(&grid(20));
        for i in 0..20 {
            let row_sum: f64 = lap.row(i).iter().sum();
            assert!(row_sum.abs() < 1e-9, "row {i} sums to {row_sum}");
        }
    }

    #[test]
    fn test_shift_operator_rolls_left() {
        let s = shift_operator(10, 2);
        let v = DVector::from_fn(10, |i, _| i as f64);
        let shifted = &s * &v;
        for i in 0..10 {
            assert_eq!(shifted[i], ((i + 2) % 10) as f64);
        }
    }

    #[test]
    fn test_shift_vector_matches_matrix() {
        let v = DVector::from_fn(7, |i, _| (i as f64).sin());
        for p in [2, 3, 5, 7, 11] {
            let by_matrix = shift_operator(7, p) * &v;
            let direct = shift_vector(&v, p);
            assert_eq!(by_matrix, direct, "shift by {p}");
        }
    }

    #[test]
    fn test_shift_by_multiple_of_n_is_identity() {
        let s = shift_operator(6, 12);
        assert_eq!(s, DMatrix::<f64>::identity(6, 6));
        let penalty = prime_penalty(6, 12).unwrap();
        assert!(penalty.iter().all(|x| x.abs() < 1e-15));
    }

    #[test]
    fn test_penalty_stencil() {
        // 2I - S - Sᵀ scaled by 1 / (ln p)²
        let p = 3;
        let penalty = prime_penalty(10, p).unwrap();
        let scale = (p as f64).ln().powi(2);
        assert!((penalty[(0, 0)] - 2.0 / scale).abs() < 1e-12);
        assert!((penalty[(0, 3)] + 1.0 / scale).abs() < 1e-12);
        assert!((penalty[(0, 7)] + 1.0 / scale).abs() < 1e-12);
        assert!(penalty[(0, 1)].abs() < 1e-15);
    }

    #[test]
    fn test_penalty_half_turn_doubles_offdiagonal() {
        // 2p ≡ 0 mod N: forward and backward neighbours coincide
        let penalty = prime_penalty(4, 2).unwrap();
        let scale = 2f64.ln().powi(2);
        assert!((penalty[(0, 2)] + 2.0 / scale).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_symmetric_and_annihilates_constant() {
        let penalty = prime_penalty(30, 5).unwrap();
        assert!(max_asymmetry(&penalty) < 1e-15);
        let ones = DVector::from_element(30, 1.0);
        assert!((&penalty * ones).norm() < 1e-12);
    }

    #[test]
    fn test_penalty_rejects_small_shift() {
        assert!(matches!(prime_penalty(10, 1), Err(ModelError::InvalidPrime(1))));
        assert!(matches!(prime_penalty(10, 0), Err(ModelError::InvalidPrime(0))));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&p| is_prime(p)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_max_asymmetry_detects_skew() {
        let mut m = DMatrix::<f64>::identity(3, 3);
        m[(0, 2)] = 0.5;
        assert!((max_asymmetry(&m) - 0.5).abs() < 1e-15);
    }
}
