//! Model-side inputs of parameter generation.
//!
//! Selecting these from a trained voice is done upstream; this module only holds the results.

mod gv;
mod mean_vari;
mod stream_kind;
mod window;

pub use self::{
    gv::{GlobalVarianceModel, GvLengthError},
    mean_vari::MeanVari,
    stream_kind::{StreamKind, StreamKindError},
    window::{Window, WindowError, Windows},
};

pub(crate) use self::mean_vari::invert_variance;
