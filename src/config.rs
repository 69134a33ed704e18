use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Frame-analysis settings. The window is always Hann.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    #[serde(default = "default_mel_bands")]
    pub mel_bands: usize,
    #[serde(default = "default_num_coeffs")]
    pub num_coeffs: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BatchConfig {
    /// Worker threads; 0 lets rayon pick.
    #[serde(default)]
    pub workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
            hop_size: default_hop_size(),
            mel_bands: default_mel_bands(),
            num_coeffs: default_num_coeffs(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size <= 1 {
            return Err(ConfigError::FrameSize(self.frame_size));
        }
        if self.hop_size == 0 {
            return Err(ConfigError::HopSize);
        }
        if self.mel_bands == 0 {
            return Err(ConfigError::MelBands);
        }
        if self.num_coeffs == 0 {
            return Err(ConfigError::NumCoeffs);
        }
        if self.num_coeffs > self.mel_bands {
            return Err(ConfigError::CoeffsExceedBands {
                coeffs: self.num_coeffs,
                bands: self.mel_bands,
            });
        }
        Ok(())
    }
}

fn default_frame_size() -> usize { 2048 }
fn default_hop_size() -> usize { 1024 }
fn default_mel_bands() -> usize { 40 }
fn default_num_coeffs() -> usize { 13 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Explicit path first, then `./cepstra.toml`, then the per-user config locations.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("cepstra.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("cepstra").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("cepstra").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.frame_size, 2048);
        assert_eq!(cfg.hop_size, 1024);
        assert_eq!(cfg.mel_bands, 40);
        assert_eq!(cfg.num_coeffs, 13);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_settings() {
        let base = AnalysisConfig::default();
        let cases = [
            (AnalysisConfig { frame_size: 1, ..base }, ConfigError::FrameSize(1)),
            (AnalysisConfig { frame_size: 0, ..base }, ConfigError::FrameSize(0)),
            (AnalysisConfig { hop_size: 0, ..base }, ConfigError::HopSize),
            (AnalysisConfig { mel_bands: 0, ..base }, ConfigError::MelBands),
            (AnalysisConfig { num_coeffs: 0, ..base }, ConfigError::NumCoeffs),
            (
                AnalysisConfig { num_coeffs: 41, ..base },
                ConfigError::CoeffsExceedBands { coeffs: 41, bands: 40 },
            ),
        ];
        for (cfg, expected) in cases {
            assert_eq!(cfg.validate(), Err(expected));
        }
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            hop_size = 512

            [batch]
            workers = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.hop_size, 512);
        assert_eq!(cfg.analysis.frame_size, 2048);
        assert_eq!(cfg.batch.workers, 4);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        assert_eq!(cfg.batch.workers, 0);
    }

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/elsewhere.toml");
        assert_eq!(find_config(Some(p)), Some(p.to_path_buf()));
    }

    #[test]
    fn load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis\nframe_size = ").unwrap();
        assert!(load_config(&path).is_err());
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
