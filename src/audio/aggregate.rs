/// Mean and population standard deviation of a per-frame series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub std: f64,
}

impl SeriesStats {
    /// Both fields are 0 for an empty series.
    pub fn of(series: &[f32]) -> Self {
        if series.is_empty() {
            return Self::default();
        }
        let mean = mean(series);
        let n = series.len() as f64;
        let var = series
            .iter()
            .map(|&x| {
                let d = x as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }
}

/// Arithmetic mean, 0 for an empty series.
pub fn mean(series: &[f32]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(|&x| x as f64).sum::<f64>() / series.len() as f64
}

/// Root mean square over a whole signal, 0 when empty.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / samples.len() as f64).sqrt()
}
