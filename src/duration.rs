//! State duration estimation from duration distributions.

use crate::model::MeanVari;

pub struct DurationEstimator;

impl DurationEstimator {
    /// Durations of each state in frames, scaled by `speed`.
    pub fn create(&self, params: &[MeanVari], speed: f64) -> Vec<usize> {
        let duration = Self::estimate_duration(params, 0.0);
        if speed == 1.0 {
            return duration;
        }
        let length: usize = duration.iter().sum();
        Self::estimate_duration_with_frame_length(params, length as f64 / speed)
    }

    /// Durations of each state in frames, summing to `frame_length` (rounded).
    pub fn create_with_frame_length(&self, params: &[MeanVari], frame_length: f64) -> Vec<usize> {
        Self::estimate_duration_with_frame_length(params, frame_length)
    }

    fn estimate_duration(params: &[MeanVari], rho: f64) -> Vec<usize> {
        params
            .iter()
            .map(|MeanVari(mean, vari)| (mean + rho * vari).round().max(1.0) as usize)
            .collect()
    }

    fn estimate_duration_with_frame_length(params: &[MeanVari], frame_length: f64) -> Vec<usize> {
        let target: usize = frame_length.round().max(1.0) as usize;

        // every state takes at least one frame
        if target <= params.len() {
            return vec![1; params.len()];
        }

        let MeanVari(mean_sum, vari_sum) = params
            .iter()
            .fold(MeanVari(0.0, 0.0), |MeanVari(m, v), p| MeanVari(m + p.0, v + p.1));
        let rho = (target as f64 - mean_sum) / vari_sum;

        let mut duration = Self::estimate_duration(params, rho);
        let mut sum: usize = duration.iter().sum();

        // distance of a candidate duration from the common rho
        let cost = |d: usize, MeanVari(mean, vari): &MeanVari| (rho - (d as f64 - mean) / vari).abs();

        while sum != target {
            let grow = sum < target;
            let candidate = duration
                .iter_mut()
                .zip(params)
                .filter(|(d, _)| grow || **d > 1)
                .map(|(d, p)| {
                    let next = if grow { *d + 1 } else { *d - 1 };
                    (cost(next, p), d)
                })
                .min_by(|(a, _), (b, _)| a.total_cmp(b));
            let Some((_, d)) = candidate else {
                break;
            };
            if grow {
                *d += 1;
                sum += 1;
            } else {
                *d -= 1;
                sum -= 1;
            }
        }

        duration
    }
}
