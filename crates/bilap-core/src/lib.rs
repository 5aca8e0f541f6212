//! Bi-Laplacian operator on a finite periodic grid.
//!
//! Assembles H = L_D + Σ_p w_p H_p, where L_D is the periodic discrete
//! Laplacian and H_p = (S_p − I)ᵀ(S_p − I) / (ln p)² penalizes non-invariance
//! under a shift by p. Diagonalizes H and attributes each eigenvalue to the
//! analytic channel and one valuation channel per prime.
//!
//! Zero I/O. Pure math engine with no opinions about output or transport.

pub mod constants;
pub mod energy;
pub mod error;
pub mod grid;
pub mod hamiltonian;
pub mod operator;
pub mod report;
pub mod spectrum;
pub mod sweep;

pub use constants::{DEFAULT_POINTS, DEFAULT_PRIMES, DEFAULT_WEIGHT, EPSILON, MIN_POINTS};
pub use energy::{ChannelBalance, EnergyDecomposition, ValuationEnergy};
pub use error::{ModelError, Result};
pub use grid::PeriodicGrid;
pub use hamiltonian::{BiLaplacian, HamiltonianParams, ValuationChannel};
pub use operator::{is_prime, laplacian, max_asymmetry, prime_penalty, shift_operator, shift_vector};
pub use report::{REPORT_VERSION, export_json, import_params};
pub use spectrum::Spectrum;
pub use sweep::{
    InvarianceRow, PrimeSetSplit, ScalingPoint, ShiftDeviation, WeightPoint, grid_scaling,
    invariance_table, mode_table, prime_sets, weight_scan,
};
