//! Fixed-length spectral feature vectors for audio tracks.
//!
//! A decoded mono [`Waveform`] is cut into overlapping Hann-windowed frames;
//! each frame's magnitude spectrum yields MFCCs, centroid, flatness and flux,
//! and [`FeaturePipeline::extract`] reduces those series to one
//! [`FeatureRecord`] per track.

pub mod audio;
pub mod batch;
pub mod config;
pub mod error;

pub use audio::analysis::FeaturePipeline;
pub use audio::decode::{decode_file, Waveform};
pub use audio::features::{FeatureRecord, FEATURE_NAMES};
pub use config::AnalysisConfig;
pub use error::{ConfigError, DecodeError, ManifestError, WaveformError};
