//! Parameter generation considering global variance (GV).
//!
//! For details, please refer to <https://doi.org/10.1093/ietisy/e90-d.5.816>.

use crate::config::GvConfig;

use super::matrix::MlpgMatrix;

/// Why the GV stage was not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GvSkip {
    /// GV is not used by this kind of stream.
    NotApplicable,
    /// The stream uses GV, but no model was provided.
    MissingModel,
    /// No frame takes part in the GV statistics.
    NoParticipatingFrames,
    /// The GV term has zero weight.
    ZeroWeight,
    /// Zero iterations were requested.
    NoIterations,
}

/// Result of the GV stage of one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GvOutcome {
    Skipped(GvSkip),
    Converged { iterations: usize },
    /// The iteration limit was reached; the best iterate was kept.
    NotConverged { iterations: usize },
}

impl GvOutcome {
    pub fn iterations(&self) -> usize {
        match self {
            Self::Skipped(_) => 0,
            Self::Converged { iterations } | Self::NotConverged { iterations } => *iterations,
        }
    }
}

/// MLPG global variance (GV) calculator.
#[derive(Debug, Clone)]
pub struct MlpgGlobalVariance<'a> {
    par: Box<[f64]>,
    gv_switch: &'a [bool],
    gv_length: usize,

    mtx: &'a MlpgMatrix,
}

impl<'a> MlpgGlobalVariance<'a> {
    /// Create a new GV structure from the maximum-likelihood solution `par` of `mtx`.
    pub fn new(mtx: &'a MlpgMatrix, par: Box<[f64]>, gv_switch: &'a [bool]) -> Self {
        let gv_length = gv_switch.iter().filter(|b| **b).count();
        Self {
            par,
            gv_switch,
            gv_length,
            mtx,
        }
    }

    /// Apply GV to the current parameter and returns it.
    pub fn apply_gv(
        mut self,
        gv_mean: f64,
        gv_ivar: f64,
        config: &GvConfig,
    ) -> (Box<[f64]>, GvOutcome) {
        let skip = if self.gv_length == 0 {
            Some(GvSkip::NoParticipatingFrames)
        } else if config.gv_weight == 0.0 {
            // the HMM term alone is already maximized by `par`
            Some(GvSkip::ZeroWeight)
        } else if config.max_iterations == 0 {
            Some(GvSkip::NoIterations)
        } else {
            None
        };
        if let Some(skip) = skip {
            return (self.par, GvOutcome::Skipped(skip));
        }

        let outcome = self.parmgen(gv_mean, gv_ivar, config);
        (self.par, outcome)
    }

    fn calc_gv(&self) -> (f64, f64) {
        let participating = || {
            self.par
                .iter()
                .zip(self.gv_switch.iter())
                .filter(|(_, sw)| **sw)
                .map(|(p, _)| *p)
        };
        let mean = participating().sum::<f64>() / self.gv_length as f64;
        let vari = participating()
            .map(|p| (p - mean) * (p - mean))
            .sum::<f64>()
            / self.gv_length as f64;

        (mean, vari)
    }

    /// Adjust parameter's deviation from mean value using gv_mean
    fn conv_gv(&mut self, gv_mean: f64) {
        let (mean, vari) = self.calc_gv();
        if vari <= 0.0 {
            return;
        }
        let ratio = (gv_mean / vari).sqrt();
        self.par
            .iter_mut()
            .zip(self.gv_switch.iter())
            .filter(|(_, sw)| **sw)
            .for_each(|(p, _)| *p = ratio * (*p - mean) + mean);
    }

    /// Objective to minimize, and its gradient with respect to each frame.
    fn calc_objective(
        &self,
        mean: f64,
        vari: f64,
        gv_mean: f64,
        gv_ivar: f64,
        config: &GvConfig,
    ) -> (f64, Box<[f64]>) {
        let length = self.mtx.length();
        let w = 1.0 / ((self.mtx.win_size() * length) as f64);
        let (w1, w2) = (config.hmm_weight, config.gv_weight);

        let g = self.mtx.wuw().mul_vec(&self.par);
        let wum = self.mtx.wum();

        let hmmobj: f64 = (0..length)
            .map(|t| w1 * w * self.par[t] * (wum[t] - 0.5 * g[t]))
            .sum();
        let gvobj = -0.5 * w2 * vari * gv_ivar * (vari - 2.0 * gv_mean);

        let dv = -2.0 * gv_ivar * (vari - gv_mean) / length as f64;
        let gradient = (0..length)
            .map(|t| {
                let hmm = w1 * w * (g[t] - wum[t]);
                if self.gv_switch[t] {
                    hmm - w2 * dv * (self.par[t] - mean)
                } else {
                    hmm
                }
            })
            .collect();

        (-(hmmobj + gvobj), gradient)
    }

    fn next_step(
        &mut self,
        gradient: &[f64],
        step: f64,
        (mean, vari): (f64, f64),
        (gv_mean, gv_ivar): (f64, f64),
        config: &GvConfig,
    ) {
        let length = self.mtx.length();
        let w = 1.0 / ((self.mtx.win_size() * length) as f64);
        let (w1, w2) = (config.hmm_weight, config.gv_weight);

        for t in 0..length {
            let h = -w1 * w * self.mtx.wuw()[(t, 0)]
                - w2 * 2.0 / (length * length) as f64
                    * ((length - 1) as f64 * gv_ivar * (vari - gv_mean)
                        + 2.0 * gv_ivar * (self.par[t] - mean) * (self.par[t] - mean));
            if h != 0.0 {
                self.par[t] += step * gradient[t] / h;
            }
        }
    }

    fn parmgen(&mut self, gv_mean: f64, gv_ivar: f64, config: &GvConfig) -> GvOutcome {
        let mut step = config.initial_step_size;
        let mut prev = f64::INFINITY;
        let mut best: Option<(f64, Box<[f64]>)> = None;

        self.conv_gv(gv_mean);
        for i in 1..=config.max_iterations {
            let (mean, vari) = self.calc_gv();
            let (obj, gradient) = self.calc_objective(mean, vari, gv_mean, gv_ivar, config);

            let norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            if norm < config.min_gradient_norm
                || (i > 1 && (prev - obj).abs() < config.convergence_epsilon * prev.abs())
            {
                // the current iterate has not been updated yet
                return GvOutcome::Converged { iterations: i - 1 };
            }

            if best.as_ref().is_none_or(|(best_obj, _)| obj < *best_obj) {
                best = Some((obj, self.par.clone()));
            }

            if i > 1 {
                if obj > prev {
                    step *= config.step_decrease_factor;
                } else if obj < prev {
                    step *= config.step_increase_factor;
                }
            }

            self.next_step(&gradient, step, (mean, vari), (gv_mean, gv_ivar), config);

            prev = obj;
        }

        // the last step has not been evaluated yet
        let (mean, vari) = self.calc_gv();
        let (last, _) = self.calc_objective(mean, vari, gv_mean, gv_ivar, config);
        if let Some((best_obj, best_par)) = best {
            if best_obj < last {
                self.par = best_par;
            }
        }

        GvOutcome::NotConverged {
            iterations: config.max_iterations,
        }
    }
}
