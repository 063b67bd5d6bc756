//! Generation settings.

use serde::Deserialize;

/// Settings of the global variance refinement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GvConfig {
    /// Maximum number of refinement iterations.
    pub max_iterations: usize,
    /// Stop once the gradient norm falls below this.
    pub min_gradient_norm: f64,
    /// Stop once the relative change of the objective falls below this.
    pub convergence_epsilon: f64,
    /// Weight of the HMM likelihood term.
    pub hmm_weight: f64,
    /// Weight of the GV likelihood term.
    pub gv_weight: f64,
    pub initial_step_size: f64,
    pub step_increase_factor: f64,
    pub step_decrease_factor: f64,
}

impl Default for GvConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            min_gradient_norm: 1e-2,
            convergence_epsilon: 1e-4,
            hmm_weight: 1.0,
            gv_weight: 1.0,
            initial_step_size: 0.1,
            step_increase_factor: 1.2,
            step_decrease_factor: 0.5,
        }
    }
}

impl GvConfig {
    /// Set maximum number of iterations
    /// Note: 0 disables the refinement.
    pub fn set_max_iterations(&mut self, i: usize) {
        self.max_iterations = i;
    }
    /// Set weight of the HMM term
    pub fn set_hmm_weight(&mut self, f: f64) {
        self.hmm_weight = f.max(0.0);
    }
    /// Set weight of the GV term
    /// Note: 0.0 leaves the maximum-likelihood trajectory untouched.
    pub fn set_gv_weight(&mut self, f: f64) {
        self.gv_weight = f.max(0.0);
    }
    /// Set step size used at the first iteration
    pub fn set_initial_step_size(&mut self, f: f64) {
        self.initial_step_size = f.max(0.0);
    }
}

/// Settings shared by all streams of an utterance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Condition {
    /// Frames whose voiced weight exceeds this are voiced.
    pub msd_threshold: f64,
    /// Speech speed
    pub speed: f64,
    /// Pitch shift in half tones
    pub additional_half_tone: f64,
    /// Global variance settings
    pub gv: GvConfig,
}

impl Default for Condition {
    fn default() -> Self {
        Self {
            msd_threshold: 0.5,
            speed: 1.0,
            additional_half_tone: 0.0,
            gv: GvConfig::default(),
        }
    }
}

impl Condition {
    /// Set threshold for MSD
    pub fn set_msd_threshold(&mut self, f: f64) {
        self.msd_threshold = f.clamp(0.0, 1.0);
    }
    /// Set speed
    /// Note: Default value is 1.0.
    pub fn set_speed(&mut self, f: f64) {
        self.speed = f.max(1.0E-06);
    }
    /// Set additional half tone
    pub fn set_additional_half_tone(&mut self, f: f64) {
        self.additional_half_tone = f;
    }
}
