use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// One-sided magnitude spectrum of fixed-size real frames.
///
/// The FFT plan is built once and shared; per-call working memory lives in a
/// [`SpectrumBuffer`] owned by the caller, so one analyzer can serve many
/// threads at once.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
}

/// Scratch space for one thread of spectral analysis.
pub struct SpectrumBuffer {
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn frame_size(&self) -> usize {
        self.size
    }

    /// Number of bins in each output spectrum: `frame_size / 2 + 1`.
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    pub fn buffer(&self) -> SpectrumBuffer {
        SpectrumBuffer {
            buffer: vec![Complex::new(0.0, 0.0); self.size],
            scratch: vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()],
        }
    }

    /// Magnitudes of the DFT bins `0..=N/2` of an already-windowed frame.
    /// A frame shorter than `frame_size` is zero-padded.
    pub fn magnitude(&self, windowed: &[f32], buf: &mut SpectrumBuffer) -> Vec<f32> {
        debug_assert!(windowed.len() <= self.size);
        let samples = windowed.iter().map(|&s| Complex::new(s, 0.0));
        let padding = std::iter::repeat(Complex::new(0.0, 0.0));
        for (slot, value) in buf.buffer.iter_mut().zip(samples.chain(padding)) {
            *slot = value;
        }
        self.fft.process_with_scratch(&mut buf.buffer, &mut buf.scratch);

        buf.buffer[..self.num_bins()].iter().map(|c| c.norm()).collect()
    }
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn output_length_is_half_plus_one() {
        for size in [8usize, 9, 2048] {
            let analyzer = SpectrumAnalyzer::new(size);
            let mut buf = analyzer.buffer();
            let spec = analyzer.magnitude(&vec![0.1; size], &mut buf);
            assert_eq!(spec.len(), size / 2 + 1);
        }
    }

    #[test]
    fn silence_gives_zero_spectrum() {
        let analyzer = SpectrumAnalyzer::new(1024);
        let mut buf = analyzer.buffer();
        let spec = analyzer.magnitude(&vec![0.0; 1024], &mut buf);
        assert!(spec.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn constant_signal_lands_in_dc_bin() {
        let analyzer = SpectrumAnalyzer::new(16);
        let mut buf = analyzer.buffer();
        let spec = analyzer.magnitude(&vec![1.0; 16], &mut buf);
        assert!((spec[0] - 16.0).abs() < 1e-4);
        assert!(spec[1..].iter().all(|&m| m < 1e-4));
    }

    #[test]
    fn bin_centred_cosine_peaks_at_its_bin() {
        let n = 256;
        let analyzer = SpectrumAnalyzer::new(n);
        let mut buf = analyzer.buffer();
        let frame: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 10.0 * i as f32 / n as f32).cos())
            .collect();
        let spec = analyzer.magnitude(&frame, &mut buf);
        let peak = spec
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 10);
        assert!((spec[10] - n as f32 / 2.0).abs() < 1e-2);
    }

    #[test]
    fn buffer_reuse_does_not_leak_between_frames() {
        let analyzer = SpectrumAnalyzer::new(64);
        let mut buf = analyzer.buffer();
        let _ = analyzer.magnitude(&vec![1.0; 64], &mut buf);
        let spec = analyzer.magnitude(&vec![0.0; 64], &mut buf);
        assert!(spec.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn short_frame_is_zero_padded_after_a_full_one() {
        let analyzer = SpectrumAnalyzer::new(64);
        let short: Vec<f32> = (0..40).map(|i| (i as f32 * 0.3).sin()).collect();
        let mut padded = short.clone();
        padded.resize(64, 0.0);

        let mut buf = analyzer.buffer();
        let _ = analyzer.magnitude(&vec![1.0; 64], &mut buf);
        let reused = analyzer.magnitude(&short, &mut buf);

        let mut fresh_buf = analyzer.buffer();
        let expected = analyzer.magnitude(&padded, &mut fresh_buf);
        assert_eq!(reused, expected);
    }
}
