use std::sync::OnceLock;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POINTS, DEFAULT_PRIMES, DEFAULT_WEIGHT};
use crate::energy::{EnergyDecomposition, ValuationEnergy};
use crate::error::{ModelError, Result};
use crate::grid::PeriodicGrid;
use crate::operator::{laplacian, prime_penalty, shift_vector};
use crate::spectrum::Spectrum;

/// Construction parameters. Missing fields take the defaults: 100 points,
/// T = ln(points), primes {2, 3}, unit weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamiltonianParams {
    pub points: usize,
    pub half_period: Option<f64>,
    pub primes: Vec<u64>,
    pub weights: Option<Vec<f64>>,
}

impl Default for HamiltonianParams {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            half_period: None,
            primes: DEFAULT_PRIMES.to_vec(),
            weights: None,
        }
    }
}

impl HamiltonianParams {
    pub fn new(points: usize, primes: &[u64]) -> Self {
        Self {
            points,
            primes: primes.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_half_period(mut self, half_period: f64) -> Self {
        self.half_period = Some(half_period);
        self
    }

    pub fn with_weights(mut self, weights: &[f64]) -> Self {
        self.weights = Some(weights.to_vec());
        self
    }

    /// Weights as they will be applied: explicit, or one unit weight per prime.
    pub fn resolved_weights(&self) -> Vec<f64> {
        self.weights
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_WEIGHT; self.primes.len()])
    }
}

/// One weighted valuation term w_p · H_p.
#[derive(Clone, Debug)]
pub struct ValuationChannel {
    pub prime: u64,
    pub weight: f64,
    /// Unweighted H_p.
    pub penalty: DMatrix<f64>,
}

/// Bi-Laplacian operator H = L_D + Σ_p w_p H_p on a periodic grid.
///
/// The spectrum is computed on first use and cached; every accessor that
/// needs eigenpairs goes through [`BiLaplacian::spectrum`].
#[derive(Debug)]
pub struct BiLaplacian {
    grid: PeriodicGrid,
    analytic: DMatrix<f64>,
    channels: Vec<ValuationChannel>,
    operator: DMatrix<f64>,
    spectrum: OnceLock<Spectrum>,
}

impl BiLaplacian {
    pub fn new(params: &HamiltonianParams) -> Result<Self> {
        let weights = params.resolved_weights();
        if weights.len() != params.primes.len() {
            return Err(ModelError::WeightMismatch {
                primes: params.primes.len(),
                weights: weights.len(),
            });
        }

        let grid = PeriodicGrid::new(params.points, params.half_period)?;
        let n = grid.points();
        let analytic = laplacian(&grid);
        let mut operator = analytic.clone();
        let mut channels = Vec::with_capacity(params.primes.len());

        for (&prime, &weight) in params.primes.iter().zip(&weights) {
            if !weight.is_finite() {
                return Err(ModelError::InvalidWeight { prime, weight });
            }
            let penalty = prime_penalty(n, prime)?;
            operator += &penalty * weight;
            channels.push(ValuationChannel {
                prime,
                weight,
                penalty,
            });
        }

        let non_finite = operator.iter().filter(|x| !x.is_finite()).count();
        if non_finite > 0 {
            return Err(ModelError::NonFiniteOperator {
                entries: non_finite,
            });
        }

        Ok(Self {
            grid,
            analytic,
            channels,
            operator,
            spectrum: OnceLock::new(),
        })
    }

    pub fn grid(&self) -> &PeriodicGrid {
        &self.grid
    }

    pub fn dim(&self) -> usize {
        self.grid.points()
    }

    pub fn channels(&self) -> &[ValuationChannel] {
        &self.channels
    }

    pub fn primes(&self) -> Vec<u64> {
        self.channels.iter().map(|c| c.prime).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.channels.iter().map(|c| c.weight).collect()
    }

    /// Parameters with the half-period and weights filled in.
    pub fn params(&self) -> HamiltonianParams {
        HamiltonianParams {
            points: self.grid.points(),
            half_period: Some(self.grid.half_period()),
            primes: self.primes(),
            weights: Some(self.weights()),
        }
    }

    /// The assembled operator H.
    pub fn operator(&self) -> &DMatrix<f64> {
        &self.operator
    }

    /// The analytic part L_D.
    pub fn analytic_operator(&self) -> &DMatrix<f64> {
        &self.analytic
    }

    pub fn is_spectrum_cached(&self) -> bool {
        self.spectrum.get().is_some()
    }

    pub fn spectrum(&self) -> &Spectrum {
        self.spectrum.get_or_init(|| Spectrum::compute(&self.operator))
    }

    /// First `limit` eigenvalues, ascending. `None` or a limit past N returns all.
    pub fn eigenvalues(&self, limit: Option<usize>) -> &[f64] {
        let all = self.spectrum().eigenvalues();
        match limit {
            Some(k) => &all[..k.min(all.len())],
            None => all,
        }
    }

    /// Unit-norm eigenvector for mode `n`.
    pub fn eigenstate(&self, n: usize) -> Result<DVector<f64>> {
        self.spectrum().eigenvector(n)
    }

    /// E_∞(ψ) = ⟨ψ|L_D|ψ⟩
    pub fn analytic_energy(&self, psi: &DVector<f64>) -> Result<f64> {
        self.check_len(psi)?;
        Ok(quadratic_form(&self.analytic, psi))
    }

    /// E_p(ψ) = ⟨ψ|H_p|ψ⟩, unweighted. `p` need not be a configured channel.
    pub fn valuation_energy(&self, psi: &DVector<f64>, p: u64) -> Result<f64> {
        self.check_len(psi)?;
        match self.channels.iter().find(|c| c.prime == p) {
            Some(channel) => Ok(quadratic_form(&channel.penalty, psi)),
            None => Ok(quadratic_form(&prime_penalty(self.dim(), p)?, psi)),
        }
    }

    /// Split eigenstate `n` into its analytic and weighted valuation energies.
    pub fn decompose_energy(&self, n: usize) -> Result<EnergyDecomposition> {
        let spectrum = self.spectrum();
        let total = spectrum.eigenvalue(n)?;
        let psi = spectrum.eigenvector(n)?;

        let valuations = self
            .channels
            .iter()
            .map(|c| ValuationEnergy {
                prime: c.prime,
                weight: c.weight,
                energy: c.weight * quadratic_form(&c.penalty, &psi),
            })
            .collect();

        Ok(EnergyDecomposition {
            mode: n,
            total,
            analytic: quadratic_form(&self.analytic, &psi),
            valuations,
        })
    }

    /// ‖S_p ψ_n − ψ_n‖ / ‖ψ_n‖: zero when mode `n` is invariant under shift `p`.
    pub fn valuation_invariance(&self, n: usize, p: u64) -> Result<f64> {
        let psi = self.eigenstate(n)?;
        let norm = psi.norm();
        if norm <= 0.0 {
            return Ok(0.0);
        }
        Ok((shift_vector(&psi, p) - &psi).norm() / norm)
    }

    fn check_len(&self, psi: &DVector<f64>) -> Result<()> {
        if psi.len() != self.dim() {
            return Err(ModelError::DimensionMismatch {
                expected: self.dim(),
                actual: psi.len(),
            });
        }
        Ok(())
    }
}

/// ψᵀ M ψ
fn quadratic_form(m: &DMatrix<f64>, psi: &DVector<f64>) -> f64 {
    psi.dot(&(m * psi))
}
