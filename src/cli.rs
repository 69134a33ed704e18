use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cepstra::batch::writer::OutputFormat;
use cepstra::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(name = "cepstra", about = "Spectral feature extraction for audio tracks")]
pub struct Cli {
    /// Config file (defaults to ./cepstra.toml or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Samples per analysis frame
    #[arg(long, global = true)]
    pub frame_size: Option<usize>,

    /// Samples between frame starts
    #[arg(long, global = true)]
    pub hop_size: Option<usize>,

    /// Number of mel bands
    #[arg(long, global = true)]
    pub mel_bands: Option<usize>,

    /// Number of cepstral coefficients
    #[arg(long, global = true)]
    pub num_coeffs: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one audio file and print its features as JSON
    Analyze {
        /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
        input: PathBuf,

        /// Track id to report (defaults to the file stem)
        #[arg(long)]
        track_id: Option<String>,
    },
    /// Analyze every track listed in a CSV manifest (track_id, file_path columns)
    Batch {
        /// Manifest CSV
        manifest: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "lowlevel.csv")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Worker threads (0 = one per core)
        #[arg(short = 'j', long)]
        workers: Option<usize>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Cli {
    /// Flags given on the command line override `base`.
    pub fn analysis_config(&self, base: AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            frame_size: self.frame_size.unwrap_or(base.frame_size),
            hop_size: self.hop_size.unwrap_or(base.hop_size),
            mel_bands: self.mel_bands.unwrap_or(base.mel_bands),
            num_coeffs: self.num_coeffs.unwrap_or(base.num_coeffs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["cepstra", "--hop-size", "512", "analyze", "a.wav"]);
        let cfg = cli.analysis_config(AnalysisConfig {
            mel_bands: 26,
            ..AnalysisConfig::default()
        });
        assert_eq!(cfg.hop_size, 512);
        assert_eq!(cfg.mel_bands, 26);
        assert_eq!(cfg.frame_size, 2048);
    }

    #[test]
    fn batch_defaults() {
        let cli = Cli::parse_from(["cepstra", "batch", "tracks.csv"]);
        match cli.command {
            Command::Batch {
                output,
                format,
                workers,
                quiet,
                ..
            } => {
                assert_eq!(output, PathBuf::from("lowlevel.csv"));
                assert_eq!(format, OutputFormat::Csv);
                assert_eq!(workers, None);
                assert!(!quiet);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cepstra", "batch", "m.csv", "--format", "jsonl", "--num-coeffs", "20"]);
        assert_eq!(cli.num_coeffs, Some(20));
        assert!(matches!(
            cli.command,
            Command::Batch {
                format: OutputFormat::Jsonl,
                ..
            }
        ));
    }
}
