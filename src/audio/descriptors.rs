/// Magnitude-weighted mean frequency in Hz. Bin `k` sits at `k * bin_hz`.
/// Zero for an all-zero spectrum.
pub fn spectral_centroid(spectrum: &[f32], bin_hz: f32) -> f32 {
    let total: f64 = spectrum.iter().map(|&m| m as f64).sum();
    if total == 0.0 {
        return 0.0;
    }
    let weighted: f64 = spectrum
        .iter()
        .enumerate()
        .map(|(k, &m)| k as f64 * bin_hz as f64 * m as f64)
        .sum();
    (weighted / total) as f32
}

/// Geometric mean over arithmetic mean of the magnitudes, in `[0, 1]`.
/// Zero when any bin is zero, which covers silence.
pub fn spectral_flatness(spectrum: &[f32]) -> f32 {
    if spectrum.is_empty() || spectrum.iter().any(|&m| m <= 0.0) {
        return 0.0;
    }
    let n = spectrum.len() as f64;
    let arithmetic = spectrum.iter().map(|&m| m as f64).sum::<f64>() / n;
    let geometric = (spectrum.iter().map(|&m| (m as f64).ln()).sum::<f64>() / n).exp();
    (geometric / arithmetic) as f32
}

/// Sum of squared bin differences against the previous frame's spectrum.
pub fn spectral_flux(spectrum: &[f32], previous: &[f32]) -> f32 {
    debug_assert_eq!(spectrum.len(), previous.len());
    spectrum
        .iter()
        .zip(previous)
        .map(|(cur, prev)| {
            let d = cur - prev;
            d * d
        })
        .sum()
}
