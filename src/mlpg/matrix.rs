//! MLPG normal equations and their banded LDL solver.
//!
//! For details, please refer to <https://doi.org/10.1109/ICASSP.2000.861820>.

use crate::model::{MeanVari, Windows};

use super::banded::BandedMatrix;

/// MLPG matrices of one static dimension.
#[derive(Debug, Clone)]
pub struct MlpgMatrix {
    win_size: usize,
    wuw: BandedMatrix,
    wum: Box<[f64]>,
}

impl MlpgMatrix {
    /// Calculate W^T U^{-1} W and W^T U^{-1} \mu
    /// (preparation for calculation of dynamic feature)
    ///
    /// `parameters[window][frame]` holds the mean and the inverse variance.
    pub fn calc_wuw_and_wum(windows: &Windows, parameters: &[Vec<MeanVari>]) -> Self {
        let length = parameters.first().map_or(0, Vec::len);
        let width = windows.band_width();
        let mut wum = boxed_slice![0.0; length];
        let mut wuw = BandedMatrix::zeros(length, width);

        for t in 0..length {
            for (window, params) in windows.iter().zip(parameters) {
                for shift in window.left_width()..=window.right_width() {
                    let coef = window.coefficient(-shift);
                    if coef == 0.0 {
                        continue;
                    }
                    let idx = match t.checked_add_signed(shift) {
                        Some(idx) if idx < length => idx,
                        _ => continue,
                    };

                    let MeanVari(mean, ivar) = params[idx];
                    let wu = coef * ivar;
                    wum[t] += wu * mean;

                    for j in 0..width.min(length - t) {
                        let inner = window.coefficient(j as isize - shift);
                        if inner != 0.0 {
                            wuw[(t, j)] += wu * inner;
                        }
                    }
                }
            }
        }

        Self {
            win_size: windows.size(),
            wuw,
            wum,
        }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.wum.len()
    }
    #[inline]
    pub fn win_size(&self) -> usize {
        self.win_size
    }
    pub fn wuw(&self) -> &BandedMatrix {
        &self.wuw
    }
    pub fn wum(&self) -> &[f64] {
        &self.wum
    }

    /// Perform LDL (banded Cholesky) decomposition.
    ///
    /// Returns the frame whose pivot is not positive when the matrix is not positive definite.
    pub fn factorize(&self) -> Result<LdlFactor, usize> {
        let width = self.wuw.width();
        let mut f = self.wuw.clone();

        for t in 0..self.length() {
            for i in 1..width.min(t + 1) {
                f[(t, 0)] -= f[(t - i, i)] * f[(t - i, i)] * f[(t - i, 0)];
            }
            // also rejects NaN
            if !(f[(t, 0)] > 0.0) {
                return Err(t);
            }
            for i in 1..width {
                for j in 1..(width - i).min(t + 1) {
                    f[(t, i)] -= f[(t - j, j)] * f[(t - j, i + j)] * f[(t - j, 0)];
                }
                f[(t, i)] /= f[(t, 0)];
            }
        }

        Ok(LdlFactor(f))
    }

    /// Solve equation $W^T U^{-1} W c = W^T U^{-1} \mu$ and return the vector $c$.
    pub fn solve(&self) -> Result<Box<[f64]>, usize> {
        Ok(self.factorize()?.solve(&self.wum))
    }
}

/// `W^T U^{-1} W = U^T D U` with `U` unit upper triangular.
///
/// Row `t` stores `D[t]` at offset 0 and `U[t][t + i]` at offset `i`.
#[derive(Debug, Clone)]
pub struct LdlFactor(BandedMatrix);

impl LdlFactor {
    pub fn diagonal(&self, t: usize) -> f64 {
        self.0[(t, 0)]
    }
    /// Element `(r, c)` of the unit upper triangular factor.
    pub fn upper(&self, r: usize, c: usize) -> f64 {
        match c.checked_sub(r) {
            Some(0) => 1.0,
            Some(i) if i < self.0.width() => self.0[(r, i)],
            _ => 0.0,
        }
    }

    /// Forward & backward substitution.
    pub fn solve(&self, wum: &[f64]) -> Box<[f64]> {
        let length = self.0.rows();
        let width = self.0.width();

        let mut g = boxed_slice![0.0; length];
        // forward
        for t in 0..length {
            g[t] = wum[t];
            for i in 1..width.min(t + 1) {
                g[t] -= self.0[(t - i, i)] * g[t - i];
            }
        }

        let mut par = boxed_slice![0.0; length];
        // backward
        for t in (0..length).rev() {
            par[t] = g[t] / self.0[(t, 0)];
            for i in 1..width.min(length - t) {
                par[t] -= self.0[(t, i)] * par[t + i];
            }
        }

        par
    }
}
