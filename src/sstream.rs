//! State-level model parameters of a stream, before expansion to frames.

use crate::{
    constants::{HALF_TONE, MAX_LF0, MIN_LF0},
    error::PreconditionError,
    model::{MeanVari, StreamKind, Windows},
    pstream::{ParameterStream, VoicingMask},
    util::IterExt,
};

/// Output distribution of one state, as selected by the upstream model lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct StateParameter {
    /// Mean and variance of each window and dimension, laid out as `window * static_size + dimension`.
    pub mean_vari: Vec<MeanVari>,
    /// Weight of the voiced space of a multi-space distribution.
    pub msd: f64,
    /// Whether the state takes part in GV.
    pub gv_switch: bool,
}

impl StateParameter {
    pub fn new(mean_vari: Vec<MeanVari>) -> Self {
        Self {
            mean_vari,
            msd: 1.0,
            gv_switch: true,
        }
    }
    pub fn with_msd(self, msd: f64) -> Self {
        Self { msd, ..self }
    }
    pub fn with_gv_switch(self, gv_switch: bool) -> Self {
        Self { gv_switch, ..self }
    }
}

/// Per-state parameters of one stream of an utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStream {
    kind: StreamKind,
    static_size: usize,
    states: Vec<StateParameter>,
}

impl StateStream {
    pub fn new(kind: StreamKind, static_size: usize, states: Vec<StateParameter>) -> Self {
        Self {
            kind,
            static_size,
            states,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }
    pub fn static_size(&self) -> usize {
        self.static_size
    }
    pub fn states(&self) -> &[StateParameter] {
        &self.states
    }

    /// Shift static log F0 means by `additional_half_tone` half tones.
    pub fn apply_additional_half_tone(&mut self, additional_half_tone: f64) {
        if self.kind != StreamKind::Lf0 || additional_half_tone == 0.0 {
            return;
        }
        for state in &mut self.states {
            if let Some(MeanVari(mean, _)) = state.mean_vari.first_mut() {
                *mean = (*mean + additional_half_tone * HALF_TONE).clamp(MIN_LF0, MAX_LF0);
            }
        }
    }

    /// Per-frame voicing of a multi-space stream; `None` for other streams.
    pub fn voicing(&self, durations: &[usize], msd_threshold: f64) -> Option<VoicingMask> {
        if !self.kind.is_msd() {
            return None;
        }
        Some(
            self.states
                .iter()
                .map(|state| state.msd > msd_threshold)
                .duration(durations)
                .collect(),
        )
    }

    /// Expand states into frames, keeping voiced frames only for multi-space streams.
    pub fn expand(
        &self,
        windows: &Windows,
        durations: &[usize],
        msd_threshold: f64,
    ) -> Result<ParameterStream, PreconditionError> {
        if durations.len() != self.states.len() {
            return Err(PreconditionError::DurationCountMismatch {
                expected: self.states.len(),
                actual: durations.len(),
            });
        }
        let vector_size = self.static_size * windows.size();
        if let Some((index, state)) = self
            .states
            .iter()
            .enumerate()
            .find(|(_, state)| state.mean_vari.len() != vector_size)
        {
            return Err(PreconditionError::VectorSizeMismatch {
                index,
                expected: vector_size,
                actual: state.mean_vari.len(),
            });
        }

        let voicing = self.voicing(durations, msd_threshold);
        let frames: Vec<&StateParameter> = match &voicing {
            Some(voicing) => voicing
                .filter(self.states.iter().duration(durations))
                .collect(),
            None => self.states.iter().duration(durations).collect(),
        };

        let mut stream = match voicing {
            Some(voicing) => {
                ParameterStream::with_voicing(self.kind, voicing, self.static_size, windows.size())
            }
            None => {
                ParameterStream::new(self.kind, frames.len(), self.static_size, windows.size())
            }
        };
        for (frame, state) in frames.iter().enumerate() {
            stream.set_frame(frame, &state.mean_vari)?;
        }
        stream.set_gv_switch(frames.iter().map(|state| state.gv_switch).collect())?;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{StateParameter, StateStream};
    use crate::{
        constants::{HALF_TONE, MAX_LF0},
        error::PreconditionError,
        model::{MeanVari, StreamKind, Window, Windows},
    };

    fn windows() -> Windows {
        Windows::new(vec![
            Window::identity(),
            Window::centered(vec![-0.5, 0.0, 0.5]).unwrap(),
        ])
    }

    fn lf0_state(mean: f64, msd: f64) -> StateParameter {
        StateParameter::new(vec![MeanVari(mean, 0.5), MeanVari(0.0, 0.25)]).with_msd(msd)
    }

    #[test]
    fn expand_spectrum() {
        let stream = StateStream::new(
            StreamKind::Spectrum,
            1,
            vec![
                StateParameter::new(vec![MeanVari(1.0, 2.0), MeanVari(0.0, 1.0)]),
                StateParameter::new(vec![MeanVari(3.0, 4.0), MeanVari(0.5, 1.0)])
                    .with_gv_switch(false),
            ],
        );
        let expanded = stream.expand(&windows(), &[2, 3], 0.5).unwrap();
        assert_eq!(expanded.frames(), 5);
        assert!(expanded.voicing().is_none());
        assert_eq!(expanded.mean(1, 0, 0), 1.0);
        assert_eq!(expanded.inverse_variance(1, 0, 0), 0.5);
        assert_eq!(expanded.mean(4, 1, 0), 0.5);
        assert_eq!(expanded.inverse_variance(4, 0, 0), 0.25);
        assert_eq!(
            expanded.gv_switch(),
            &[true, true, false, false, false]
        );
    }

    #[test]
    fn expand_lf0_keeps_voiced_frames() {
        let stream = StateStream::new(
            StreamKind::Lf0,
            1,
            vec![lf0_state(5.0, 0.9), lf0_state(0.0, 0.1), lf0_state(5.5, 0.8)],
        );
        let expanded = stream.expand(&windows(), &[2, 2, 3], 0.5).unwrap();
        assert_eq!(expanded.frames(), 5);
        assert_eq!(
            expanded.voicing().unwrap().voiced(),
            &[true, true, false, false, true, true, true]
        );
        assert_eq!(expanded.mean(1, 0, 0), 5.0);
        assert_eq!(expanded.mean(2, 0, 0), 5.5);
    }

    #[test]
    fn voicing_boundary_disables_delta() {
        let stream = StateStream::new(
            StreamKind::Lf0,
            1,
            vec![lf0_state(5.0, 1.0), lf0_state(0.0, 0.0), lf0_state(5.0, 1.0)],
        );
        let windows = windows();
        let mut expanded = stream.expand(&windows, &[3, 1, 3], 0.5).unwrap();
        // frame 2 is voiced and frame 3 is not
        assert_eq!(expanded.inverse_variance(2, 1, 0), 4.0);

        expanded.apply_boundary_constraints(&windows);
        assert_eq!(expanded.inverse_variance(1, 1, 0), 4.0);
        assert_eq!(expanded.inverse_variance(2, 1, 0), 0.0);
        assert_eq!(expanded.inverse_variance(3, 1, 0), 0.0);
        assert_eq!(expanded.inverse_variance(4, 1, 0), 4.0);
        // static constraints stay
        assert_eq!(expanded.inverse_variance(2, 0, 0), 2.0);
    }

    #[test]
    fn mismatches() {
        let stream = StateStream::new(StreamKind::Lf0, 1, vec![lf0_state(5.0, 1.0)]);
        assert_eq!(
            stream.expand(&windows(), &[1, 2], 0.5).unwrap_err(),
            PreconditionError::DurationCountMismatch {
                expected: 1,
                actual: 2
            }
        );
        let static_only = Windows::new(vec![Window::identity()]);
        assert_eq!(
            stream.expand(&static_only, &[1], 0.5).unwrap_err(),
            PreconditionError::VectorSizeMismatch {
                index: 0,
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn half_tone() {
        let mut stream = StateStream::new(
            StreamKind::Lf0,
            1,
            vec![lf0_state(5.0, 1.0), lf0_state(9.9, 1.0)],
        );
        stream.apply_additional_half_tone(2.0);
        assert_abs_diff_eq!(
            stream.states()[0].mean_vari[0].mean(),
            5.0 + 2.0 * HALF_TONE,
            epsilon = 1e-12
        );
        assert_eq!(stream.states()[1].mean_vari[0].mean(), MAX_LF0);
        // delta means are untouched
        assert_eq!(stream.states()[0].mean_vari[1].mean(), 0.0);
    }
}
