use std::f32::consts::PI;

/// Symmetric Hann window, coefficients computed once for a fixed frame length.
#[derive(Clone, Debug)]
pub struct HannWindow {
    coeffs: Vec<f32>,
}

impl HannWindow {
    /// `size` must be greater than 1; the pipeline config enforces this.
    pub fn new(size: usize) -> Self {
        let denom = (size - 1) as f32;
        let coeffs = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect();
        Self { coeffs }
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coeffs
    }

    /// Returns a new, windowed copy of `frame`.
    pub fn apply(&self, frame: &[f32]) -> Vec<f32> {
        debug_assert_eq!(frame.len(), self.coeffs.len());
        frame
            .iter()
            .zip(self.coeffs.iter())
            .map(|(s, w)| s * w)
            .collect()
    }
}
