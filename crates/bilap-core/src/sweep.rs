//! Parameter sweeps over the bi-Laplacian model.
//!
//! Each function builds whatever models it needs and returns structured rows;
//! formatting and output are left to the caller.

use serde::{Deserialize, Serialize};

use crate::energy::{ChannelBalance, EnergyDecomposition};
use crate::error::Result;
use crate::hamiltonian::{BiLaplacian, HamiltonianParams};

/// Invariance deviation of one mode under one shift.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDeviation {
    pub prime: u64,
    pub deviation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvarianceRow {
    pub mode: usize,
    pub eigenvalue: f64,
    pub deviations: Vec<ShiftDeviation>,
}

impl InvarianceRow {
    pub fn deviation(&self, prime: u64) -> Option<f64> {
        self.deviations
            .iter()
            .find(|d| d.prime == prime)
            .map(|d| d.deviation)
    }
}

/// λ₀, λ₁ and the mode-1 energy split at one grid size (T = ln N).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingPoint {
    pub points: usize,
    pub half_period: f64,
    pub lambda_0: f64,
    pub lambda_1: f64,
    /// E_∞ / Σ E_p for mode 1; `None` when the valuation channels are empty.
    pub analytic_ratio: Option<f64>,
    /// (π / T)²
    pub continuum_gap: f64,
}

/// Mode-1 channel energies for one prime set at unit weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimeSetSplit {
    pub primes: Vec<u64>,
    pub lambda_1: f64,
    /// `[E_∞, E_p1, E_p2, ...]`
    pub energies: Vec<f64>,
    pub balance: ChannelBalance,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    pub weight: f64,
    pub eigenvalues: Vec<f64>,
}

/// Energy decomposition for modes `0..modes`, capped at the model dimension.
pub fn mode_table(model: &BiLaplacian, modes: usize) -> Result<Vec<EnergyDecomposition>> {
    (0..modes.min(model.dim()))
        .map(|n| model.decompose_energy(n))
        .collect()
}

/// Invariance deviation of modes `0..modes` under every configured shift.
pub fn invariance_table(model: &BiLaplacian, modes: usize) -> Result<Vec<InvarianceRow>> {
    let primes = model.primes();
    (0..modes.min(model.dim()))
        .map(|n| {
            let deviations = primes
                .iter()
                .map(|&prime| {
                    Ok(ShiftDeviation {
                        prime,
                        deviation: model.valuation_invariance(n, prime)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(InvarianceRow {
                mode: n,
                eigenvalue: model.spectrum().eigenvalue(n)?,
                deviations,
            })
        })
        .collect()
}

/// Track λ₀, λ₁ and the mode-1 split as the grid grows, with T = ln N.
pub fn grid_scaling(
    sizes: &[usize],
    primes: &[u64],
    weights: Option<&[f64]>,
) -> Result<Vec<ScalingPoint>> {
    sizes
        .iter()
        .map(|&points| {
            let mut params = HamiltonianParams::new(points, primes);
            params.weights = weights.map(<[f64]>::to_vec);
            let model = BiLaplacian::new(&params)?;

            let spectrum = model.spectrum();
            let mode_1 = model.decompose_energy(1)?;
            Ok(ScalingPoint {
                points,
                half_period: model.grid().half_period(),
                lambda_0: spectrum.eigenvalue(0)?,
                lambda_1: mode_1.total,
                analytic_ratio: mode_1.analytic_ratio(),
                continuum_gap: model.grid().continuum_gap(),
            })
        })
        .collect()
}

/// Mode-1 channel split for each prime set, all weights 1.
pub fn prime_sets(points: usize, sets: &[Vec<u64>]) -> Result<Vec<PrimeSetSplit>> {
    sets.iter()
        .map(|primes| {
            let model = BiLaplacian::new(&HamiltonianParams::new(points, primes))?;
            let mode_1 = model.decompose_energy(1)?;
            Ok(PrimeSetSplit {
                primes: primes.clone(),
                lambda_1: mode_1.total,
                energies: mode_1.channel_energies(),
                balance: mode_1.balance(),
            })
        })
        .collect()
}

/// Apply one uniform weight to every channel and collect the first `count`
/// eigenvalues per run.
pub fn weight_scan(
    points: usize,
    primes: &[u64],
    weights: &[f64],
    count: usize,
) -> Result<Vec<WeightPoint>> {
    weights
        .iter()
        .map(|&weight| {
            let params =
                HamiltonianParams::new(points, primes).with_weights(&vec![weight; primes.len()]);
            let model = BiLaplacian::new(&params)?;
            Ok(WeightPoint {
                weight,
                eigenvalues: model.eigenvalues(Some(count)).to_vec(),
            })
        })
        .collect()
}
