use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;

/// Weighted energy carried by one valuation channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationEnergy {
    pub prime: u64,
    pub weight: f64,
    /// w_p · ⟨ψ|H_p|ψ⟩
    pub energy: f64,
}

/// Split of one eigenstate's energy into analytic and per-prime parts.
///
/// For an exact eigenpair, `analytic + Σ valuations == total`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyDecomposition {
    pub mode: usize,
    /// Eigenvalue λ_n.
    pub total: f64,
    /// ⟨ψ|L_D|ψ⟩
    pub analytic: f64,
    pub valuations: Vec<ValuationEnergy>,
}

impl EnergyDecomposition {
    pub fn valuation(&self, prime: u64) -> Option<f64> {
        self.valuations
            .iter()
            .find(|v| v.prime == prime)
            .map(|v| v.energy)
    }

    pub fn valuation_total(&self) -> f64 {
        self.valuations.iter().map(|v| v.energy).sum()
    }

    pub fn channel_sum(&self) -> f64 {
        self.analytic + self.valuation_total()
    }

    /// Attribution error: channel sum minus eigenvalue.
    pub fn residual(&self) -> f64 {
        self.channel_sum() - self.total
    }

    /// E_∞ / Σ E_p. `None` when the valuation channels carry no energy.
    pub fn analytic_ratio(&self) -> Option<f64> {
        let val = self.valuation_total();
        (val > EPSILON).then(|| self.analytic / val)
    }

    /// `[E_∞, E_p1, E_p2, ...]` in configuration order.
    pub fn channel_energies(&self) -> Vec<f64> {
        std::iter::once(self.analytic)
            .chain(self.valuations.iter().map(|v| v.energy))
            .collect()
    }

    pub fn balance(&self) -> ChannelBalance {
        ChannelBalance::from_energies(&self.channel_energies())
    }
}

/// How evenly energy spreads across channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBalance {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// std_dev / mean; 0 when the mean is not positive.
    pub coefficient_of_variation: f64,
}

impl ChannelBalance {
    pub fn from_energies(energies: &[f64]) -> Self {
        if energies.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                coefficient_of_variation: 0.0,
            };
        }
        let n = energies.len() as f64;
        let mean = energies.iter().sum::<f64>() / n;
        let var = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        let std_dev = var.sqrt();
        let coefficient_of_variation = if mean > 0.0 { std_dev / mean } else { 0.0 };
        Self {
            mean,
            std_dev,
            coefficient_of_variation,
        }
    }
}
