use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::error::ConfigError;

use super::aggregate::{mean, rms, SeriesStats};
use super::decode::Waveform;
use super::descriptors::{spectral_centroid, spectral_flatness, spectral_flux};
use super::features::{FeatureRecord, FrameFeatures, TrackSeries};
use super::frames::{frame_count, Frames};
use super::mel::{MelBankCache, MelFilterBank};
use super::mfcc::Mfcc;
use super::spectrum::{SpectrumAnalyzer, SpectrumBuffer};
use super::window::HannWindow;

/// Index of the 13th cepstral coefficient.
const MFCC_13: usize = 12;

/// Per-track feature extraction.
///
/// Holds only read-only state (window, FFT plan, DCT matrix, cached filter
/// banks), so one pipeline can be shared by reference across worker threads.
#[derive(Debug)]
pub struct FeaturePipeline {
    config: AnalysisConfig,
    window: HannWindow,
    spectrum: SpectrumAnalyzer,
    mfcc: Mfcc,
    mel_banks: MelBankCache,
}

/// Carried from one frame to the next. Flux needs the previous spectrum.
struct FrameFold {
    previous: Vec<f32>,
    series: TrackSeries,
}

impl FeaturePipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            window: HannWindow::new(config.frame_size),
            spectrum: SpectrumAnalyzer::new(config.frame_size),
            mfcc: Mfcc::new(config.mel_bands, config.num_coeffs),
            mel_banks: MelBankCache::new(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The shared filter bank for `sample_rate` at this pipeline's frame size and band count.
    pub fn mel_bank(&self, sample_rate: u32) -> Arc<MelFilterBank> {
        self.mel_banks.get(sample_rate, self.config.frame_size, self.config.mel_bands)
    }

    /// Frames of `waveform` in emission order.
    pub fn frames<'a>(&self, waveform: &'a Waveform) -> Frames<'a> {
        Frames::new(waveform.samples(), self.config.frame_size, self.config.hop_size)
    }

    /// Summary features for one track. Never fails; a track with no full
    /// frame yields [`FeatureRecord::zeroed`].
    pub fn extract(&self, track_id: &str, waveform: &Waveform) -> FeatureRecord {
        let series = self.analyze(waveform);
        log::debug!(
            "{}: {} frames at {}Hz ({:.1}s)",
            track_id,
            series.num_frames(),
            waveform.sample_rate(),
            waveform.duration_secs()
        );
        if series.is_empty() {
            return FeatureRecord::zeroed(track_id);
        }
        self.summarize(track_id, &series, rms(waveform.samples()))
    }

    /// Per-frame descriptor series over the whole waveform.
    pub fn analyze(&self, waveform: &Waveform) -> TrackSeries {
        self.analyze_frames(self.frames(waveform), waveform.sample_rate())
    }

    /// Runs the per-frame chain over `frames` in the order given. Flux of each
    /// frame is taken against the frame before it, and against silence for the first.
    pub(crate) fn analyze_frames<'a, I>(&self, frames: I, sample_rate: u32) -> TrackSeries
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let frames = frames.into_iter();
        let bank = self.mel_bank(sample_rate);
        let bin_hz = sample_rate as f32 / self.config.frame_size as f32;
        let mut buf = self.spectrum.buffer();

        let init = FrameFold {
            previous: vec![0.0; self.spectrum.num_bins()],
            series: TrackSeries::with_capacity(frames.size_hint().0),
        };

        let done = frames.fold(init, |mut acc, frame| {
            let (features, spectrum) =
                self.analyze_frame(frame, &acc.previous, &bank, bin_hz, &mut buf);
            acc.series.push(features);
            acc.previous = spectrum;
            acc
        });
        done.series
    }

    fn analyze_frame(
        &self,
        frame: &[f32],
        previous: &[f32],
        bank: &MelFilterBank,
        bin_hz: f32,
        buf: &mut SpectrumBuffer,
    ) -> (FrameFeatures, Vec<f32>) {
        let windowed = self.window.apply(frame);
        let spectrum = self.spectrum.magnitude(&windowed, buf);

        let features = FrameFeatures {
            mfcc: self.mfcc.compute(bank, &spectrum),
            spectral_centroid: spectral_centroid(&spectrum, bin_hz),
            spectral_flatness: spectral_flatness(&spectrum),
            spectral_flux: spectral_flux(&spectrum, previous),
        };
        (features, spectrum)
    }

    /// Reduces per-frame series to the track's summary record.
    pub fn summarize(&self, track_id: &str, series: &TrackSeries, rms: f64) -> FeatureRecord {
        let mfcc_1 = series
            .mfcc_coefficient(0)
            .map(|c| SeriesStats::of(&c))
            .unwrap_or_default();
        let mfcc_13_mean = if self.mfcc.num_coeffs() > MFCC_13 {
            series
                .mfcc_coefficient(MFCC_13)
                .map(|c| mean(&c))
                .unwrap_or(0.0)
        } else {
            0.0
        };
        let centroid = SeriesStats::of(&series.spectral_centroid);

        FeatureRecord {
            track_id: track_id.to_string(),
            mfcc_1_mean: mfcc_1.mean,
            mfcc_1_std: mfcc_1.std,
            mfcc_13_mean,
            spectral_centroid_mean: centroid.mean,
            spectral_centroid_std: centroid.std,
            spectral_flatness_mean: mean(&series.spectral_flatness),
            spectral_flux_mean: mean(&series.spectral_flux),
            rms_mean: rms,
        }
    }

    /// Expected frame count for a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        frame_count(len, self.config.frame_size, self.config.hop_size)
    }
}
