use std::f64::consts::PI;

use super::mel::MelFilterBank;

/// Floor applied to band energies before the logarithm.
pub const LOG_FLOOR: f32 = 1e-10;

/// Orthonormal DCT-II, truncated to the first `num_coeffs` outputs.
#[derive(Clone, Debug)]
pub struct Dct2 {
    input_len: usize,
    rows: Vec<Vec<f32>>,
}

impl Dct2 {
    pub fn new(input_len: usize, num_coeffs: usize) -> Self {
        let n = input_len as f64;
        let rows = (0..num_coeffs)
            .map(|k| {
                let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                (0..input_len)
                    .map(|i| {
                        (scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos()) as f32
                    })
                    .collect()
            })
            .collect();
        Self { input_len, rows }
    }

    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.input_len);
        self.rows
            .iter()
            .map(|row| row.iter().zip(input).map(|(c, x)| c * x).sum())
            .collect()
    }
}

/// Mel-frequency cepstral coefficients from a magnitude spectrum.
#[derive(Clone, Debug)]
pub struct Mfcc {
    num_coeffs: usize,
    dct: Dct2,
}

impl Mfcc {
    pub fn new(num_bands: usize, num_coeffs: usize) -> Self {
        Self {
            num_coeffs,
            dct: Dct2::new(num_bands, num_coeffs),
        }
    }

    pub fn num_coeffs(&self) -> usize {
        self.num_coeffs
    }

    pub fn compute(&self, bank: &MelFilterBank, magnitude: &[f32]) -> Vec<f32> {
        let power: Vec<f32> = magnitude.iter().map(|m| m * m).collect();
        let log_energies: Vec<f32> = bank
            .apply(&power)
            .into_iter()
            .map(|e| e.max(LOG_FLOOR).ln())
            .collect();
        self.dct.apply(&log_energies)
    }

    /// Coefficients produced when every band energy sits at the floor.
    pub fn silence(&self) -> Vec<f32> {
        self.dct.apply(&vec![LOG_FLOOR.ln(); self.dct.input_len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dct_of_constant_only_has_dc() {
        let dct = Dct2::new(8, 8);
        let out = dct.apply(&[3.0; 8]);
        assert!((out[0] - 3.0 * 8f32.sqrt()).abs() < 1e-5);
        assert!(out[1..].iter().all(|c| c.abs() < 1e-5));
    }

    #[test]
    fn dct_rows_are_orthonormal() {
        let dct = Dct2::new(40, 13);
        for a in 0..13 {
            for b in 0..13 {
                let dot: f32 = dct.rows[a].iter().zip(&dct.rows[b]).map(|(x, y)| x * y).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5, "rows {} {}", a, b);
            }
        }
    }

    #[test]
    fn silence_is_finite_and_deterministic() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        let mfcc = Mfcc::new(40, 13);
        let coeffs = mfcc.compute(&bank, &vec![0.0; 1025]);
        assert_eq!(coeffs.len(), 13);
        assert!(coeffs.iter().all(|c| c.is_finite()));
        assert_eq!(coeffs, mfcc.silence());
        let expected_c0 = 40f32.sqrt() * LOG_FLOOR.ln();
        assert!((coeffs[0] - expected_c0).abs() < 1e-3);
        assert!(coeffs[0] != 0.0);
    }

    #[test]
    fn louder_signal_raises_first_coefficient() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        let mfcc = Mfcc::new(40, 13);
        let quiet = mfcc.compute(&bank, &vec![0.1; 1025]);
        let loud = mfcc.compute(&bank, &vec![10.0; 1025]);
        assert!(loud[0] > quiet[0]);
    }

    #[test]
    fn retains_requested_count() {
        let bank = MelFilterBank::new(22050, 1024, 26);
        let mfcc = Mfcc::new(26, 5);
        assert_eq!(mfcc.compute(&bank, &vec![1.0; 513]).len(), 5);
    }
}
