//! Maximum-likelihood parameter generation, optionally refined with global variance.

use crate::{
    config::GvConfig,
    error::{GenerationError, PreconditionError},
    model::{GlobalVarianceModel, StreamKind, Windows},
    pstream::{ParameterStream, Trajectory},
};

mod banded;
mod gv;
mod matrix;

pub use self::{
    banded::BandedMatrix,
    gv::{GvOutcome, GvSkip, MlpgGlobalVariance},
    matrix::{LdlFactor, MlpgMatrix},
};

/// What happened to one static dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionReport {
    pub dimension: usize,
    pub gv: GvOutcome,
}

/// Diagnostics of one call to [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub kind: StreamKind,
    pub frames: usize,
    pub dimensions: Vec<DimensionReport>,
}

impl GenerationReport {
    /// GV iterations summed over all dimensions.
    pub fn total_gv_iterations(&self) -> usize {
        self.dimensions.iter().map(|d| d.gv.iterations()).sum()
    }
    /// Dimensions whose GV refinement hit the iteration limit.
    pub fn not_converged(&self) -> impl '_ + Iterator<Item = usize> {
        self.dimensions
            .iter()
            .filter(|d| matches!(d.gv, GvOutcome::NotConverged { .. }))
            .map(|d| d.dimension)
    }
}

/// Generate the static trajectory of `stream`.
///
/// Dynamic features crossing a voicing boundary or the utterance edge are disabled first
/// (see [`ParameterStream::apply_boundary_constraints`]). The trajectory is only written
/// when every dimension succeeded.
pub fn generate(
    stream: &mut ParameterStream,
    windows: &Windows,
    gv: Option<&GlobalVarianceModel>,
    config: &GvConfig,
) -> Result<GenerationReport, GenerationError> {
    stream.validate(windows)?;

    let kind = stream.kind();
    let gv = match (kind.uses_gv(), gv) {
        (false, _) => Err(GvSkip::NotApplicable),
        (true, None) => {
            log::debug!("No GV model for {kind} stream; using the ML trajectory");
            Err(GvSkip::MissingModel)
        }
        (true, Some(model)) if model.len() < stream.static_size() => {
            return Err(PreconditionError::GvDimensionMismatch {
                expected: stream.static_size(),
                actual: model.len(),
            }
            .into());
        }
        (true, Some(model)) => Ok(model),
    };

    stream.apply_boundary_constraints(windows);
    log::debug!(
        "Generating {kind} stream: {} frames, {} dimensions",
        stream.frames(),
        stream.static_size()
    );

    let source = &*stream;
    let run = |dimension| generate_dimension(source, windows, gv, config, dimension);

    #[cfg(feature = "multithread")]
    let results: Vec<_> = {
        use rayon::prelude::*;
        (0..source.static_size())
            .into_par_iter()
            .map(run)
            .collect::<Result<_, _>>()?
    };
    #[cfg(not(feature = "multithread"))]
    let results: Vec<_> = (0..source.static_size())
        .map(run)
        .collect::<Result<_, _>>()?;

    let (columns, dimensions): (Vec<_>, Vec<_>) = results.into_iter().unzip();
    let frames = stream.frames();
    stream.set_trajectory(Trajectory::from_columns(frames, &columns));

    Ok(GenerationReport {
        kind,
        frames,
        dimensions,
    })
}

fn generate_dimension(
    stream: &ParameterStream,
    windows: &Windows,
    gv: Result<&GlobalVarianceModel, GvSkip>,
    config: &GvConfig,
    dimension: usize,
) -> Result<(Box<[f64]>, DimensionReport), GenerationError> {
    let parameters = stream.window_parameters(dimension);
    let mtx = MlpgMatrix::calc_wuw_and_wum(windows, &parameters);
    let par = mtx
        .factorize()
        .map_err(|frame| GenerationError::SingularSystem { dimension, frame })?
        .solve(mtx.wum());

    let (par, outcome) = match gv {
        Err(skip) => (par, GvOutcome::Skipped(skip)),
        Ok(model) => {
            let Some((gv_mean, gv_ivar)) = model.get(dimension) else {
                return Err(PreconditionError::GvDimensionMismatch {
                    expected: stream.static_size(),
                    actual: model.len(),
                }
                .into());
            };
            MlpgGlobalVariance::new(&mtx, par, stream.gv_switch()).apply_gv(
                gv_mean, gv_ivar, config,
            )
        }
    };

    match outcome {
        GvOutcome::NotConverged { iterations } => log::warn!(
            "GV of {} stream, dimension {dimension} did not converge in {iterations} iterations",
            stream.kind()
        ),
        GvOutcome::Skipped(GvSkip::NoParticipatingFrames) => log::debug!(
            "GV of {} stream, dimension {dimension} skipped: no participating frame",
            stream.kind()
        ),
        _ => (),
    }

    Ok((
        par,
        DimensionReport {
            dimension,
            gv: outcome,
        },
    ))
}
