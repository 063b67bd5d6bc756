//! Maximum-likelihood parameter generation (MLPG) for HMM-based speech synthesis.
//!
//! Per-frame Gaussian statistics of static and dynamic features are turned into a smooth
//! static trajectory by solving banded normal equations, optionally refined so that the
//! variance of the trajectory follows a global variance (GV) model.

#[macro_use]
mod util;

pub mod config;
pub mod constants;
pub mod duration;
pub mod error;
pub mod mlpg;
pub mod model;
pub mod pstream;
pub mod sstream;
pub mod utterance;

pub use crate::{
    config::{Condition, GvConfig},
    error::{GenerationError, PreconditionError},
    mlpg::{GenerationReport, GvOutcome, generate},
    model::{GlobalVarianceModel, MeanVari, StreamKind, Window, Windows},
    pstream::{ParameterStream, Trajectory},
};

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        GvConfig, ParameterStream, StreamKind, Window, Windows, generate,
        pstream::VoicingMask,
    };

    fn static_delta() -> Windows {
        Windows::new(vec![
            Window::identity(),
            Window::centered(vec![-0.5, 0.0, 0.5]).unwrap(),
        ])
    }

    #[test]
    fn static_window_only() {
        let windows = Windows::new(vec![Window::identity()]);
        let mut stream = ParameterStream::new(StreamKind::Spectrum, 3, 1, 1);
        for (t, mean) in [1.0, 5.0, 3.0].into_iter().enumerate() {
            stream.set(t, 0, 0, mean, 1.0);
        }
        generate(&mut stream, &windows, None, &GvConfig::default()).unwrap();

        let trajectory = stream.trajectory().unwrap();
        for (t, mean) in [1.0, 5.0, 3.0].into_iter().enumerate() {
            assert_abs_diff_eq!(trajectory.get(t, 0), mean, epsilon = 1e-12);
        }
    }

    #[test]
    fn voiced_segments_are_independent() {
        let mask: VoicingMask = [true, true, true, false, true, true, true]
            .into_iter()
            .collect();
        let mut stream = ParameterStream::with_voicing(StreamKind::Lf0, mask, 1, 2);
        for t in 0..6 {
            let mean = if t < 3 { 5.0 } else { 5.5 };
            stream.set(t, 0, 0, mean, 10.0);
            stream.set(t, 1, 0, 0.0, 100.0);
        }
        generate(&mut stream, &static_delta(), None, &GvConfig::default()).unwrap();

        let trajectory = stream.trajectory().unwrap();
        assert_eq!(trajectory.frames(), 6);
        for t in 0..6 {
            let expected = if t < 3 { 5.0 } else { 5.5 };
            assert_abs_diff_eq!(trajectory.get(t, 0), expected, epsilon = 1e-9);
        }
        let filled = stream.fill_unvoiced(crate::constants::NODATA).unwrap();
        assert_eq!(filled.frames(), 7);
        assert_eq!(filled.get(3, 0), crate::constants::NODATA);
        assert_abs_diff_eq!(filled.get(4, 0), 5.5, epsilon = 1e-9);
    }
}
