//! Parameter generation for every stream of an utterance.

use crate::{
    config::Condition,
    constants::NODATA,
    duration::DurationEstimator,
    error::GenerationError,
    mlpg::{DimensionReport, GenerationReport, GvOutcome, GvSkip, generate},
    model::{GlobalVarianceModel, MeanVari, Windows},
    pstream::{ParameterStream, Trajectory},
    sstream::StateStream,
};

/// Set of parameters associated with a stream.
pub struct StreamModel<'a> {
    /// State-level parameters.
    pub stream: StateStream,
    /// MLPG window coefficients.
    pub windows: &'a Windows,
    /// Global variance parameter.
    pub gv: Option<&'a GlobalVarianceModel>,
}

/// A stream whose trajectory has been generated.
#[derive(Debug, Clone)]
pub struct GeneratedStream {
    pub stream: ParameterStream,
    pub report: GenerationReport,
}

impl GeneratedStream {
    /// Trajectory over the frames of the stream (voiced frames only for multi-space streams).
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.stream.trajectory()
    }
    /// Trajectory over every frame of the utterance, [`NODATA`] on unvoiced frames.
    pub fn utterance_trajectory(&self) -> Option<Trajectory> {
        self.stream.fill_unvoiced(NODATA)
    }
}

/// Durations and generated streams of one utterance.
#[derive(Debug, Clone)]
pub struct GeneratedUtterance {
    /// Duration of each state in frames.
    pub durations: Vec<usize>,
    pub streams: Vec<GeneratedStream>,
}

/// Generate every stream of an utterance, estimating state durations from
/// `duration_params` at the speed of `condition`.
///
/// Fails as a whole if any stream fails; no partial result is returned.
pub fn generate_utterance(
    condition: &Condition,
    duration_params: &[MeanVari],
    streams: Vec<StreamModel<'_>>,
) -> Result<GeneratedUtterance, GenerationError> {
    let durations = DurationEstimator.create(duration_params, condition.speed);
    let streams = generate_utterance_with_durations(condition, &durations, streams)?;
    Ok(GeneratedUtterance { durations, streams })
}

/// Generate every stream of an utterance with the given state durations.
pub fn generate_utterance_with_durations(
    condition: &Condition,
    durations: &[usize],
    streams: Vec<StreamModel<'_>>,
) -> Result<Vec<GeneratedStream>, GenerationError> {
    streams
        .into_iter()
        .map(|model| generate_stream(condition, durations, model))
        .collect()
}

fn generate_stream(
    condition: &Condition,
    durations: &[usize],
    StreamModel {
        mut stream,
        windows,
        gv,
    }: StreamModel<'_>,
) -> Result<GeneratedStream, GenerationError> {
    stream.apply_additional_half_tone(condition.additional_half_tone);
    let mut expanded = stream.expand(windows, durations, condition.msd_threshold)?;

    // an utterance without any voiced frame has nothing to generate
    if expanded.frames() == 0 && expanded.voicing().is_some() {
        log::debug!("No voiced frame in {} stream", expanded.kind());
        let report = GenerationReport {
            kind: expanded.kind(),
            frames: 0,
            dimensions: (0..expanded.static_size())
                .map(|dimension| DimensionReport {
                    dimension,
                    gv: GvOutcome::Skipped(GvSkip::NoParticipatingFrames),
                })
                .collect(),
        };
        let columns = vec![Box::<[f64]>::default(); expanded.static_size()];
        expanded.set_trajectory(Trajectory::from_columns(0, &columns));
        return Ok(GeneratedStream {
            stream: expanded,
            report,
        });
    }

    let report = generate(&mut expanded, windows, gv, &condition.gv)?;
    Ok(GeneratedStream {
        stream: expanded,
        report,
    })
}
