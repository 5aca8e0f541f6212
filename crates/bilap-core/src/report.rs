//! JSON report format.
//!
//! Every document carries `version` and `kind` so downstream tooling can
//! dispatch on it. Field names are camelCase; `params` always records the
//! resolved half-period and weights so a report can be reproduced.

use serde::{Deserialize, Serialize};

use crate::energy::EnergyDecomposition;
use crate::error::Result;
use crate::hamiltonian::{BiLaplacian, HamiltonianParams};
use crate::sweep::{InvarianceRow, PrimeSetSplit, ScalingPoint, WeightPoint};

pub const REPORT_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireParams {
    pub points: usize,
    #[serde(rename = "halfPeriod")]
    pub half_period: f64,
    pub spacing: f64,
    pub primes: Vec<u64>,
    pub weights: Vec<f64>,
}

impl WireParams {
    pub fn from_model(model: &BiLaplacian) -> Self {
        Self {
            points: model.dim(),
            half_period: model.grid().half_period(),
            spacing: model.grid().spacing(),
            primes: model.primes(),
            weights: model.weights(),
        }
    }

    pub fn to_params(&self) -> HamiltonianParams {
        HamiltonianParams {
            points: self.points,
            half_period: Some(self.half_period),
            primes: self.primes.clone(),
            weights: Some(self.weights.clone()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpectrumReport {
    pub version: String,
    pub kind: String,
    pub params: WireParams,
    pub eigenvalues: Vec<f64>,
    #[serde(rename = "groundGap")]
    pub ground_gap: Option<f64>,
    #[serde(rename = "continuumGap")]
    pub continuum_gap: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecompositionReport {
    pub version: String,
    pub kind: String,
    pub params: WireParams,
    pub modes: Vec<WireDecomposition>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireDecomposition {
    pub mode: usize,
    pub total: f64,
    pub analytic: f64,
    /// Weighted valuation energy per prime, labelled `p=<prime>` in `channel`.
    pub valuations: Vec<WireValuation>,
    #[serde(rename = "analyticRatio")]
    pub analytic_ratio: Option<f64>,
    pub residual: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireValuation {
    pub channel: String,
    pub prime: u64,
    pub weight: f64,
    pub energy: f64,
}

impl From<&EnergyDecomposition> for WireDecomposition {
    fn from(d: &EnergyDecomposition) -> Self {
        Self {
            mode: d.mode,
            total: d.total,
            analytic: d.analytic,
            valuations: d
                .valuations
                .iter()
                .map(|v| WireValuation {
                    channel: format!("p={}", v.prime),
                    prime: v.prime,
                    weight: v.weight,
                    energy: v.energy,
                })
                .collect(),
            analytic_ratio: d.analytic_ratio(),
            residual: d.residual(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvarianceReport {
    pub version: String,
    pub kind: String,
    pub params: WireParams,
    pub modes: Vec<InvarianceRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EigenstateReport {
    pub version: String,
    pub kind: String,
    pub params: WireParams,
    pub mode: usize,
    pub eigenvalue: f64,
    /// `[t, ψ(t)]` at every grid point.
    pub samples: Vec<[f64; 2]>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScalingReport {
    pub version: String,
    pub kind: String,
    pub primes: Vec<u64>,
    pub points: Vec<ScalingPoint>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrimeSetReport {
    pub version: String,
    pub kind: String,
    #[serde(rename = "gridPoints")]
    pub grid_points: usize,
    pub sets: Vec<PrimeSetSplit>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeightScanReport {
    pub version: String,
    pub kind: String,
    #[serde(rename = "gridPoints")]
    pub grid_points: usize,
    pub primes: Vec<u64>,
    pub runs: Vec<WeightPoint>,
}

// --- Builders ---

pub fn spectrum_report(model: &BiLaplacian, count: Option<usize>) -> SpectrumReport {
    SpectrumReport {
        version: REPORT_VERSION.to_string(),
        kind: "spectrum".to_string(),
        params: WireParams::from_model(model),
        eigenvalues: model.eigenvalues(count).to_vec(),
        ground_gap: model.spectrum().ground_gap(),
        continuum_gap: model.grid().continuum_gap(),
    }
}

pub fn decomposition_report(model: &BiLaplacian, rows: &[EnergyDecomposition]) -> DecompositionReport {
    DecompositionReport {
        version: REPORT_VERSION.to_string(),
        kind: "decomposition".to_string(),
        params: WireParams::from_model(model),
        modes: rows.iter().map(WireDecomposition::from).collect(),
    }
}

pub fn invariance_report(model: &BiLaplacian, rows: Vec<InvarianceRow>) -> InvarianceReport {
    InvarianceReport {
        version: REPORT_VERSION.to_string(),
        kind: "invariance".to_string(),
        params: WireParams::from_model(model),
        modes: rows,
    }
}

pub fn eigenstate_report(model: &BiLaplacian, mode: usize) -> Result<EigenstateReport> {
    let psi = model.eigenstate(mode)?;
    let samples = model
        .grid()
        .coordinates()
        .into_iter()
        .zip(psi.iter())
        .map(|(t, &amp)| [t, amp])
        .collect();
    Ok(EigenstateReport {
        version: REPORT_VERSION.to_string(),
        kind: "eigenstate".to_string(),
        params: WireParams::from_model(model),
        mode,
        eigenvalue: model.spectrum().eigenvalue(mode)?,
        samples,
    })
}

pub fn scaling_report(primes: &[u64], points: Vec<ScalingPoint>) -> ScalingReport {
    ScalingReport {
        version: REPORT_VERSION.to_string(),
        kind: "scaling".to_string(),
        primes: primes.to_vec(),
        points,
    }
}

pub fn prime_set_report(grid_points: usize, sets: Vec<PrimeSetSplit>) -> PrimeSetReport {
    PrimeSetReport {
        version: REPORT_VERSION.to_string(),
        kind: "primeSets".to_string(),
        grid_points,
        sets,
    }
}

pub fn weight_scan_report(
    grid_points: usize,
    primes: &[u64],
    runs: Vec<WeightPoint>,
) -> WeightScanReport {
    WeightScanReport {
        version: REPORT_VERSION.to_string(),
        kind: "weightScan".to_string(),
        grid_points,
        primes: primes.to_vec(),
        runs,
    }
}

/// Pretty-printed JSON for any report.
pub fn export_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[derive(Deserialize)]
struct ParamsOnly {
    params: WireParams,
}

/// Recover model parameters from any report that carries a `params` block.
pub fn import_params(json: &str) -> Result<HamiltonianParams> {
    let doc: ParamsOnly = serde_json::from_str(json)?;
    Ok(doc.params.to_params())
}
