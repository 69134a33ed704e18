use std::path::PathBuf;
use thiserror::Error;

/// Invalid analysis settings. Raised when a pipeline is built, before any track is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame_size must be greater than 1 (got {0})")]
    FrameSize(usize),
    #[error("hop_size must be greater than 0")]
    HopSize,
    #[error("mel_bands must be greater than 0")]
    MelBands,
    #[error("num_coeffs must be greater than 0")]
    NumCoeffs,
    #[error("num_coeffs ({coeffs}) cannot exceed mel_bands ({bands})")]
    CoeffsExceedBands { coeffs: usize, bands: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaveformError {
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open audio file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to probe audio format")]
    Probe(#[source] symphonia::core::errors::Error),
    #[error("no audio tracks found")]
    NoTrack,
    #[error("unknown sample rate")]
    UnknownSampleRate,
    #[error("failed to create audio decoder")]
    Codec(#[source] symphonia::core::errors::Error),
    #[error("decoding failed")]
    Decode(#[from] symphonia::core::errors::Error),
    #[error(transparent)]
    Waveform(#[from] WaveformError),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is empty (no header row)")]
    MissingHeader,
    #[error("manifest header has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {0}: unterminated quoted field")]
    UnterminatedQuote(usize),
}
