use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// One triangular band, stored as the run of bins it touches.
#[derive(Clone, Debug, PartialEq)]
struct MelBand {
    start: usize,
    weights: Vec<f32>,
}

/// Triangular mel-spaced filters from 0 Hz to Nyquist over a one-sided
/// spectrum of `frame_size / 2 + 1` bins. Each band's weights sum to 1.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct MelFilterBank {
    sample_rate: u32,
    frame_size: usize,
    bands: Vec<MelBand>,
}

impl MelFilterBank {
    pub fn new(sample_rate: u32, frame_size: usize, num_bands: usize) -> Self {
        let num_bins = frame_size / 2 + 1;
        let nyquist = sample_rate as f64 / 2.0;
        let mel_max = hz_to_mel(nyquist);
        let edges: Vec<f64> = (0..num_bands + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (num_bands + 1) as f64))
            .collect();
        let bin_hz = sample_rate as f64 / frame_size as f64;

        let bands = edges
            .windows(3)
            .map(|w| {
                let (lo, centre, hi) = (w[0], w[1], w[2]);
                let raw: Vec<f64> = (0..num_bins)
                    .map(|k| {
                        let f = k as f64 * bin_hz;
                        if f <= lo || f >= hi {
                            0.0
                        } else if f < centre {
                            (f - lo) / (centre - lo)
                        } else {
                            (hi - f) / (hi - centre)
                        }
                    })
                    .collect();

                let first = raw.iter().position(|&v| v > 0.0);
                let last = raw.iter().rposition(|&v| v > 0.0);
                match (first, last) {
                    (Some(first), Some(last)) => {
                        let sum: f64 = raw[first..=last].iter().sum();
                        MelBand {
                            start: first,
                            weights: raw[first..=last]
                                .iter()
                                .map(|&v| (v / sum) as f32)
                                .collect(),
                        }
                    }
                    // Narrower than one bin: contributes nothing.
                    _ => MelBand {
                        start: 0,
                        weights: Vec::new(),
                    },
                }
            })
            .collect();

        Self {
            sample_rate,
            frame_size,
            bands,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Dense weights of band `index` over all bins.
    pub fn band_weights(&self, index: usize) -> Vec<f32> {
        let mut dense = vec![0.0; self.frame_size / 2 + 1];
        let band = &self.bands[index];
        dense[band.start..band.start + band.weights.len()].copy_from_slice(&band.weights);
        dense
    }

    /// Weighted energy per band for a power spectrum.
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        self.bands
            .iter()
            .map(|band| {
                band.weights
                    .iter()
                    .zip(&power[band.start..band.start + band.weights.len()])
                    .map(|(w, p)| w * p)
                    .sum()
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct MelKey {
    sample_rate: u32,
    frame_size: usize,
    num_bands: usize,
}

/// Filter banks shared across tracks, one per (sample rate, frame size, bands).
#[derive(Debug, Default)]
pub struct MelBankCache {
    banks: RwLock<HashMap<MelKey, Arc<MelFilterBank>>>,
}

impl MelBankCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sample_rate: u32, frame_size: usize, num_bands: usize) -> Arc<MelFilterBank> {
        let key = MelKey {
            sample_rate,
            frame_size,
            num_bands,
        };
        if let Some(bank) = self
            .banks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(bank);
        }

        let mut banks = self.banks.write().unwrap_or_else(PoisonError::into_inner);
        let bank = banks.entry(key).or_insert_with(|| {
            log::debug!(
                "Building mel filter bank: {} bands, {}Hz, frame {}",
                num_bands,
                sample_rate,
                frame_size
            );
            Arc::new(MelFilterBank::new(sample_rate, frame_size, num_bands))
        });
        Arc::clone(bank)
    }

    pub fn len(&self) -> usize {
        self.banks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_scale_round_trips() {
        for hz in [0.0, 100.0, 1000.0, 8000.0, 22050.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
        assert!((hz_to_mel(1000.0) - 1000.0).abs() < 0.5);
    }

    #[test]
    fn default_bank_shape() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        assert_eq!(bank.num_bands(), 40);
        for i in 0..40 {
            let w = bank.band_weights(i);
            assert_eq!(w.len(), 1025);
            assert!(w.iter().all(|&v| v >= 0.0));
            let sum: f32 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "band {} sums to {}", i, sum);
        }
    }

    #[test]
    fn band_peaks_increase_with_index() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        let peaks: Vec<usize> = (0..40)
            .map(|i| {
                bank.band_weights(i)
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(k, _)| k)
                    .unwrap()
            })
            .collect();
        assert!(peaks.windows(2).all(|p| p[0] <= p[1]));
        assert!(*peaks.last().unwrap() < 1025);
    }

    #[test]
    fn apply_on_flat_power_is_unit() {
        let bank = MelFilterBank::new(16000, 512, 20);
        let energies = bank.apply(&vec![1.0; 257]);
        assert_eq!(energies.len(), 20);
        for e in energies {
            assert!((e - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn apply_on_silence_is_zero() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        assert!(bank.apply(&vec![0.0; 1025]).iter().all(|&e| e == 0.0));
    }

    #[test]
    fn too_many_bands_leaves_empty_filters() {
        let bank = MelFilterBank::new(8000, 16, 40);
        let energies = bank.apply(&vec![1.0; 9]);
        assert_eq!(energies.len(), 40);
        assert!(energies.iter().all(|e| e.is_finite()));
        assert!(energies.iter().any(|&e| e == 0.0));
    }

    #[test]
    fn cache_shares_one_bank_per_key() {
        let cache = MelBankCache::new();
        let a = cache.get(44100, 2048, 40);
        let b = cache.get(44100, 2048, 40);
        assert!(Arc::ptr_eq(&a, &b));
        let c = cache.get(48000, 2048, 40);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cached_bank_matches_fresh_bank() {
        let cache = MelBankCache::new();
        let cached = cache.get(22050, 1024, 26);
        assert_eq!(*cached, MelFilterBank::new(22050, 1024, 26));
    }
}
