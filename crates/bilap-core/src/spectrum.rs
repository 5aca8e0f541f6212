use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::{ModelError, Result};

/// Eigen-decomposition of a real symmetric operator.
///
/// `SymmetricEigen` returns eigenpairs in no particular order, so they are
/// re-sorted ascending. Each eigenvector's sign is fixed so its
/// largest-magnitude component is positive, making repeated runs agree.
#[derive(Clone, Debug)]
pub struct Spectrum {
    eigenvalues: DVector<f64>,
    /// Column `k` is the unit eigenvector for `eigenvalues[k]`.
    eigenvectors: DMatrix<f64>,
}

impl Spectrum {
    /// Diagonalize `operator`. Cost: O(N³).
    pub fn compute(operator: &DMatrix<f64>) -> Self {
        let n = operator.nrows();
        let eigen = SymmetricEigen::new(operator.clone());

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let eigenvalues = DVector::from_iterator(n, order.iter().map(|&k| eigen.eigenvalues[k]));
        let mut eigenvectors = DMatrix::<f64>::zeros(n, n);
        for (col, &k) in order.iter().enumerate() {
            let mut v = eigen.eigenvectors.column(k).into_owned();
            fix_sign(&mut v);
            eigenvectors.set_column(col, &v);
        }

        Self {
            eigenvalues,
            eigenvectors,
        }
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// All eigenvalues, non-decreasing.
    pub fn eigenvalues(&self) -> &[f64] {
        self.eigenvalues.as_slice()
    }

    pub fn eigenvalue(&self, mode: usize) -> Result<f64> {
        self.check_mode(mode)?;
        Ok(self.eigenvalues[mode])
    }

    pub fn eigenvector(&self, mode: usize) -> Result<DVector<f64>> {
        self.check_mode(mode)?;
        Ok(self.eigenvectors.column(mode).into_owned())
    }

    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.eigenvectors
    }

    /// λ₁ − λ₀, or `None` for a one-dimensional spectrum.
    pub fn ground_gap(&self) -> Option<f64> {
        (self.len() >= 2).then(|| self.eigenvalues[1] - self.eigenvalues[0])
    }

    /// ‖Hψ − λψ‖ for eigenpair `mode` against `operator`.
    pub fn residual(&self, operator: &DMatrix<f64>, mode: usize) -> Result<f64> {
        let lambda = self.eigenvalue(mode)?;
        let psi = self.eigenvectors.column(mode);
        Ok((operator * &psi - &psi * lambda).norm())
    }

    fn check_mode(&self, mode: usize) -> Result<()> {
        if mode >= self.len() {
            return Err(ModelError::ModeOutOfRange {
                mode,
                dim: self.len(),
            });
        }
        Ok(())
    }
}

fn fix_sign(v: &mut DVector<f64>) {
    if v.is_empty() {
        return;
    }
    if v[v.iamax()] < 0.0 {
        v.neg_mut();
    }
}
