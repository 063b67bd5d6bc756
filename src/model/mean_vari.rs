//! Normal distribution parameter.

use serde::{Deserialize, Serialize};

use crate::constants::{INFINITE_VARIANCE, MAX_INVERSE_VARIANCE, ZERO_VARIANCE};

/// Mean and variance (or, after [`MeanVari::with_ivar`], mean and inverted variance) of normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanVari(
    /// Mean
    pub f64,
    /// Variance
    pub f64,
);

impl MeanVari {
    /// Get [`MeanVari`] with inverted variance.
    ///
    /// Infinite variance becomes `0.0` (no constraint), and zero variance is floored to a large finite value.
    pub fn with_ivar(&self) -> Self {
        let Self(mean, vari) = self;
        Self(*mean, invert_variance(*vari))
    }

    /// Returns new instance with its variance set to 0.
    pub fn with_0(&self) -> Self {
        let Self(mean, _) = self;
        Self(*mean, 0.0)
    }

    pub fn mean(&self) -> f64 {
        self.0
    }
    pub fn vari(&self) -> f64 {
        self.1
    }
}

pub(crate) fn invert_variance(vari: f64) -> f64 {
    if vari.abs() > INFINITE_VARIANCE {
        0.0
    } else if vari.abs() < ZERO_VARIANCE {
        MAX_INVERSE_VARIANCE
    } else {
        1.0 / vari
    }
}
