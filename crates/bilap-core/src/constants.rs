/// Default number of grid points in the analytic direction.
pub const DEFAULT_POINTS: usize = 100;

/// Default shift set for the valuation channels.
pub const DEFAULT_PRIMES: [u64; 2] = [2, 3];

/// Default weight applied to every valuation channel.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Smallest grid a periodic three-point stencil can live on.
pub const MIN_POINTS: usize = 3;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;
