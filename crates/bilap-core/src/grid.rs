use serde::{Deserialize, Serialize};

use crate::constants::MIN_POINTS;
use crate::error::{ModelError, Result};

/// Uniform periodic sampling of the circle `[-T, T)`.
///
/// Point `i` sits at `t_i = -T + i·h` with spacing `h = 2T / N`; index `N`
/// wraps back to index 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodicGrid {
    points: usize,
    half_period: f64,
}

impl PeriodicGrid {
    /// Create a grid of `points` samples. `half_period` defaults to `ln(points)`.
    pub fn new(points: usize, half_period: Option<f64>) -> Result<Self> {
        if points < MIN_POINTS {
            return Err(ModelError::InvalidGrid(points));
        }
        let half_period = half_period.unwrap_or_else(|| (points as f64).ln());
        if !half_period.is_finite() || half_period <= 0.0 {
            return Err(ModelError::InvalidHalfPeriod(half_period));
        }
        Ok(Self {
            points,
            half_period,
        })
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn half_period(&self) -> f64 {
        self.half_period
    }

    /// Grid spacing h = 2T / N.
    pub fn spacing(&self) -> f64 {
        2.0 * self.half_period / self.points as f64
    }

    /// Coordinate of sample `i` (taken modulo N).
    pub fn coordinate(&self, i: usize) -> f64 {
        -self.half_period + (i % self.points) as f64 * self.spacing()
    }

    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.points).map(|i| self.coordinate(i)).collect()
    }

    /// First nonzero eigenvalue of the continuum Laplacian on a circle of
    /// length 2T: (π / T)².
    pub fn continuum_gap(&self) -> f64 {
        (std::f64::consts::PI / self.half_period).powi(2)
    }
}
