//! Parameter stream: per-frame Gaussian targets of one feature stream and the generated trajectory.

use crate::{
    error::PreconditionError,
    model::{MeanVari, StreamKind, Windows, invert_variance},
};

mod mask;

pub use self::mask::VoicingMask;

/// Per-frame means and inverse variances of one stream of one utterance.
///
/// Vectors are laid out as `window * static_size + dimension`.
#[derive(Debug, Clone)]
pub struct ParameterStream {
    kind: StreamKind,
    frames: usize,
    static_size: usize,
    num_windows: usize,
    mean: Box<[f64]>,
    ivar: Box<[f64]>,
    voicing: Option<VoicingMask>,
    gv_switch: Box<[bool]>,
    trajectory: Option<Trajectory>,
}

impl ParameterStream {
    /// Create a stream of `frames` frames whose parameters are still unset.
    pub fn new(kind: StreamKind, frames: usize, static_size: usize, num_windows: usize) -> Self {
        let size = frames * static_size * num_windows;
        Self {
            kind,
            frames,
            static_size,
            num_windows,
            mean: vec![f64::NAN; size].into(),
            ivar: vec![f64::NAN; size].into(),
            voicing: None,
            gv_switch: vec![true; frames].into(),
            trajectory: None,
        }
    }

    /// Create a stream covering only the voiced frames of `voicing`.
    pub fn with_voicing(
        kind: StreamKind,
        voicing: VoicingMask,
        static_size: usize,
        num_windows: usize,
    ) -> Self {
        let mut stream = Self::new(kind, voicing.voiced_count(), static_size, num_windows);
        stream.voicing = Some(voicing);
        stream
    }

    #[inline]
    fn offset(&self, frame: usize, window: usize, dimension: usize) -> usize {
        assert!(frame < self.frames, "frame {frame} out of range");
        assert!(window < self.num_windows, "window {window} out of range");
        assert!(dimension < self.static_size, "dimension {dimension} out of range");
        (frame * self.num_windows + window) * self.static_size + dimension
    }

    /// Set mean and inverse variance.
    pub fn set(&mut self, frame: usize, window: usize, dimension: usize, mean: f64, ivar: f64) {
        let offset = self.offset(frame, window, dimension);
        self.mean[offset] = mean;
        self.ivar[offset] = ivar;
    }

    /// Set mean and variance; the variance is inverted.
    pub fn set_mean_vari(
        &mut self,
        frame: usize,
        window: usize,
        dimension: usize,
        MeanVari(mean, vari): MeanVari,
    ) {
        self.set(frame, window, dimension, mean, invert_variance(vari));
    }

    /// Set a whole frame from mean/variance pairs.
    pub fn set_frame(&mut self, frame: usize, params: &[MeanVari]) -> Result<(), PreconditionError> {
        if params.len() != self.vector_size() {
            return Err(PreconditionError::VectorSizeMismatch {
                index: frame,
                expected: self.vector_size(),
                actual: params.len(),
            });
        }
        let start = self.offset(frame, 0, 0);
        for (i, MeanVari(mean, vari)) in params.iter().enumerate() {
            self.mean[start + i] = *mean;
            self.ivar[start + i] = invert_variance(*vari);
        }
        Ok(())
    }

    /// Remove the constraint of one feature by giving it infinite variance.
    pub fn disable(&mut self, frame: usize, window: usize, dimension: usize) {
        let offset = self.offset(frame, window, dimension);
        self.ivar[offset] = 0.0;
    }

    /// Select frames taking part in the GV statistics.
    pub fn set_gv_switch(&mut self, gv_switch: Vec<bool>) -> Result<(), PreconditionError> {
        if gv_switch.len() != self.frames {
            return Err(PreconditionError::GvSwitchLength {
                expected: self.frames,
                actual: gv_switch.len(),
            });
        }
        self.gv_switch = gv_switch.into();
        Ok(())
    }

    pub fn mean(&self, frame: usize, window: usize, dimension: usize) -> f64 {
        self.mean[self.offset(frame, window, dimension)]
    }
    pub fn inverse_variance(&self, frame: usize, window: usize, dimension: usize) -> f64 {
        self.ivar[self.offset(frame, window, dimension)]
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }
    pub fn frames(&self) -> usize {
        self.frames
    }
    pub fn static_size(&self) -> usize {
        self.static_size
    }
    pub fn num_windows(&self) -> usize {
        self.num_windows
    }
    pub fn vector_size(&self) -> usize {
        self.static_size * self.num_windows
    }
    pub fn voicing(&self) -> Option<&VoicingMask> {
        self.voicing.as_ref()
    }
    pub fn gv_switch(&self) -> &[bool] {
        &self.gv_switch
    }

    /// Generated trajectory, available after a successful generation.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }
    pub fn into_trajectory(self) -> Option<Trajectory> {
        self.trajectory
    }

    /// Trajectory spread over every frame of the utterance, with `default` on unvoiced frames.
    pub fn fill_unvoiced(&self, default: f64) -> Option<Trajectory> {
        let trajectory = self.trajectory.as_ref()?;
        let Some(voicing) = &self.voicing else {
            return Some(trajectory.clone());
        };

        let default_row = vec![default; self.static_size];
        let rows = voicing.fill(trajectory.rows(), &default_row[..]);
        Some(Trajectory {
            static_size: self.static_size,
            data: rows.concat().into(),
        })
    }

    /// Disable every dynamic feature whose window reaches over a voicing boundary or the utterance edge.
    pub fn apply_boundary_constraints(&mut self, windows: &Windows) {
        let distances: Vec<(usize, usize)> = match &self.voicing {
            Some(voicing) => voicing.filter(voicing.boundary_distances()).collect(),
            None => (0..self.frames)
                .map(|frame| (frame, self.frames - frame - 1))
                .collect(),
        };

        for (frame, (left, right)) in distances.into_iter().enumerate() {
            // the static window never crosses a boundary
            for (window_index, window) in
                windows.iter().enumerate().take(self.num_windows).skip(1)
            {
                let is_left_boundary = left < window.left_width().unsigned_abs();
                let is_right_boundary = right < window.right_width().unsigned_abs();
                if is_left_boundary || is_right_boundary {
                    for dimension in 0..self.static_size {
                        self.disable(frame, window_index, dimension);
                    }
                }
            }
        }
    }

    pub(crate) fn validate(&self, windows: &Windows) -> Result<(), PreconditionError> {
        if self.frames == 0 {
            return Err(PreconditionError::EmptyStream);
        }
        if windows.size() == 0 {
            return Err(PreconditionError::NoWindows);
        }
        if !windows.starts_with_static() {
            return Err(PreconditionError::FirstWindowNotStatic);
        }
        if windows.size() != self.num_windows {
            return Err(PreconditionError::WindowCountMismatch {
                expected: self.num_windows,
                actual: windows.size(),
            });
        }
        let unset = self
            .mean
            .iter()
            .zip(self.ivar.iter())
            .position(|(mean, ivar)| mean.is_nan() || ivar.is_nan());
        if let Some(position) = unset {
            return Err(PreconditionError::NotPopulated {
                frame: position / self.vector_size(),
                index: position % self.vector_size(),
            });
        }
        Ok(())
    }

    /// `parameters[window][frame]` of one static dimension, as mean and inverse variance.
    pub(crate) fn window_parameters(&self, dimension: usize) -> Vec<Vec<MeanVari>> {
        (0..self.num_windows)
            .map(|window| {
                (0..self.frames)
                    .map(|frame| {
                        let offset = self.offset(frame, window, dimension);
                        MeanVari(self.mean[offset], self.ivar[offset])
                    })
                    .collect()
            })
            .collect()
    }

    pub(crate) fn set_trajectory(&mut self, trajectory: Trajectory) {
        self.trajectory = Some(trajectory);
    }
}

/// Generated static parameter sequence; row = frame, column = static coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    static_size: usize,
    data: Box<[f64]>,
}

impl Trajectory {
    /// Assemble from one column per static dimension.
    pub(crate) fn from_columns(frames: usize, columns: &[Box<[f64]>]) -> Self {
        let static_size = columns.len();
        let mut data = vec![0.0; frames * static_size];
        for (dimension, column) in columns.iter().enumerate() {
            for (frame, value) in column.iter().enumerate() {
                data[frame * static_size + dimension] = *value;
            }
        }
        Self {
            static_size,
            data: data.into(),
        }
    }

    pub fn frames(&self) -> usize {
        self.data.len().checked_div(self.static_size).unwrap_or(0)
    }
    pub fn static_size(&self) -> usize {
        self.static_size
    }
    pub fn get(&self, frame: usize, dimension: usize) -> f64 {
        self.row(frame)[dimension]
    }
    pub fn row(&self, frame: usize) -> &[f64] {
        &self.data[frame * self.static_size..(frame + 1) * self.static_size]
    }
    pub fn rows(&self) -> impl '_ + Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.static_size.max(1))
    }
    pub fn column(&self, dimension: usize) -> impl '_ + Iterator<Item = f64> {
        self.rows().map(move |row| row[dimension])
    }
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}
