use serde::Serialize;

/// Column names of a [`FeatureRecord`], in output order after `track_id`.
pub const FEATURE_NAMES: [&str; 8] = [
    "mfcc_1_mean",
    "mfcc_1_std",
    "mfcc_13_mean",
    "spectral_centroid_mean",
    "spectral_centroid_std",
    "spectral_flatness_mean",
    "spectral_flux_mean",
    "rms_mean",
];

/// Descriptors of a single analysis frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameFeatures {
    /// Cepstral coefficients, `num_coeffs` long
    pub mfcc: Vec<f32>,
    /// Spectral centroid (Hz)
    pub spectral_centroid: f32,
    /// Spectral flatness (0.0-1.0)
    pub spectral_flatness: f32,
    /// Squared-difference flux against the previous frame
    pub spectral_flux: f32,
}

/// Per-frame descriptor series of one track, in frame order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSeries {
    pub mfcc: Vec<Vec<f32>>,
    pub spectral_centroid: Vec<f32>,
    pub spectral_flatness: Vec<f32>,
    pub spectral_flux: Vec<f32>,
}

impl TrackSeries {
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            mfcc: Vec::with_capacity(frames),
            spectral_centroid: Vec::with_capacity(frames),
            spectral_flatness: Vec::with_capacity(frames),
            spectral_flux: Vec::with_capacity(frames),
        }
    }

    pub fn push(&mut self, frame: FrameFeatures) {
        self.mfcc.push(frame.mfcc);
        self.spectral_centroid.push(frame.spectral_centroid);
        self.spectral_flatness.push(frame.spectral_flatness);
        self.spectral_flux.push(frame.spectral_flux);
    }

    pub fn num_frames(&self) -> usize {
        self.spectral_centroid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Coefficient `index` (0-based) across frames, or `None` if frames carry fewer coefficients.
    pub fn mfcc_coefficient(&self, index: usize) -> Option<Vec<f32>> {
        self.mfcc
            .iter()
            .map(|coeffs| coeffs.get(index).copied())
            .collect()
    }
}

/// Summary features of one track. All values are finite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub track_id: String,
    pub mfcc_1_mean: f64,
    pub mfcc_1_std: f64,
    pub mfcc_13_mean: f64,
    pub spectral_centroid_mean: f64,
    pub spectral_centroid_std: f64,
    pub spectral_flatness_mean: f64,
    pub spectral_flux_mean: f64,
    pub rms_mean: f64,
}

impl FeatureRecord {
    /// Record for a track with no analysable content.
    pub fn zeroed(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            mfcc_1_mean: 0.0,
            mfcc_1_std: 0.0,
            mfcc_13_mean: 0.0,
            spectral_centroid_mean: 0.0,
            spectral_centroid_std: 0.0,
            spectral_flatness_mean: 0.0,
            spectral_flux_mean: 0.0,
            rms_mean: 0.0,
        }
    }

    /// Feature values paired with their names, in [`FEATURE_NAMES`] order.
    pub fn values(&self) -> [(&'static str, f64); 8] {
        [
            (FEATURE_NAMES[0], self.mfcc_1_mean),
            (FEATURE_NAMES[1], self.mfcc_1_std),
            (FEATURE_NAMES[2], self.mfcc_13_mean),
            (FEATURE_NAMES[3], self.spectral_centroid_mean),
            (FEATURE_NAMES[4], self.spectral_centroid_std),
            (FEATURE_NAMES[5], self.spectral_flatness_mean),
            (FEATURE_NAMES[6], self.spectral_flux_mean),
            (FEATURE_NAMES[7], self.rms_mean),
        ]
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}
