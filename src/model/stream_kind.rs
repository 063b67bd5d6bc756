use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown stream type {0}")]
pub struct StreamKindError(pub String);

/// Kind of feature stream generated for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// State duration.
    Duration,
    /// Log fundamental frequency.
    Lf0,
    /// Spectral envelope (mel-cepstrum, mel-generalized cepstrum or LSP).
    Spectrum,
    /// Excitation strength (band aperiodicity or low-pass filter).
    Strength,
    /// Fourier magnitude.
    Magnitude,
}

impl StreamKind {
    /// Whether the stream is a multi-space distribution, i.e. only defined on voiced frames.
    pub fn is_msd(&self) -> bool {
        matches!(self, Self::Lf0)
    }

    /// Whether global variance is trained for this kind of stream.
    pub fn uses_gv(&self) -> bool {
        matches!(self, Self::Lf0 | Self::Spectrum | Self::Strength)
    }
}

impl FromStr for StreamKind {
    type Err = StreamKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DUR" => Ok(Self::Duration),
            "LF0" => Ok(Self::Lf0),
            "MCP" | "MGC" | "LSP" => Ok(Self::Spectrum),
            "LPF" | "STR" | "BAP" => Ok(Self::Strength),
            "MAG" => Ok(Self::Magnitude),
            _ => Err(StreamKindError(s.to_string())),
        }
    }
}

impl Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Duration => "DUR",
            Self::Lf0 => "LF0",
            Self::Spectrum => "MCP",
            Self::Strength => "STR",
            Self::Magnitude => "MAG",
        };
        f.write_str(name)
    }
}
