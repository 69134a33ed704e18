mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cepstra::batch::{self, manifest, writer, BatchOptions};
use cepstra::config::{self, Config};
use cepstra::{decode_file, FeaturePipeline};
use cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => Config::default(),
    };

    let analysis = cli.analysis_config(cfg.analysis);
    let pipeline = FeaturePipeline::new(analysis).context("Invalid analysis configuration")?;
    log::info!(
        "Analysis: frame={} hop={} mel_bands={} coeffs={} window=hann",
        analysis.frame_size,
        analysis.hop_size,
        analysis.mel_bands,
        analysis.num_coeffs
    );

    match cli.command {
        Command::Analyze { input, track_id } => {
            let track_id = track_id.unwrap_or_else(|| {
                input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| input.display().to_string())
            });
            let waveform = decode_file(&input)
                .with_context(|| format!("Failed loading {}", input.display()))?;
            let record = pipeline.extract(&track_id, &waveform);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Batch {
            manifest: manifest_path,
            output,
            format,
            workers,
            quiet,
        } => {
            let entries = manifest::read_manifest(&manifest_path)?;
            log::info!("Loaded manifest: {} tracks", entries.len());

            let options = BatchOptions {
                workers: workers.unwrap_or(cfg.batch.workers),
                show_progress: !quiet,
            };
            let (records, _summary) = batch::run(&pipeline, &entries, options)?;

            if records.is_empty() {
                log::warn!("No features extracted!");
                return Ok(());
            }
            writer::write_to_path(&output, &records, format)?;
            log::info!("Done: {} tracks -> {}", records.len(), output.display());
        }
    }

    Ok(())
}
