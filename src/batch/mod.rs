pub mod manifest;
pub mod writer;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::audio::analysis::FeaturePipeline;
use crate::audio::decode::decode_file;
use crate::audio::features::FeatureRecord;

use manifest::ManifestEntry;

#[derive(Clone, Copy, Debug, Default)]
pub struct BatchOptions {
    /// Worker threads; 0 lets rayon pick.
    pub workers: usize,
    pub show_progress: bool,
}

/// Counts of how each manifest entry ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub missing: usize,
    pub failed: usize,
}

#[derive(Debug)]
enum TrackOutcome {
    Done(FeatureRecord),
    Missing,
    Failed,
}

/// Analyses every entry on a bounded worker pool, one track per task.
///
/// A missing or undecodable file is logged and skipped; it never stops the
/// batch. Records come back sorted by track id.
pub fn run(
    pipeline: &FeaturePipeline,
    entries: &[ManifestEntry],
    options: BatchOptions,
) -> Result<(Vec<FeatureRecord>, BatchSummary)> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .context("Failed to start worker pool")?;

    let pb = if options.show_progress {
        let pb = ProgressBar::new(entries.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tracks ({eta} remaining)")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    log::info!(
        "Processing {} tracks on {} workers",
        entries.len(),
        pool.current_num_threads()
    );

    let outcomes: Vec<TrackOutcome> = pool.install(|| {
        entries
            .par_iter()
            .map(|entry| {
                let outcome = process_entry(pipeline, entry);
                pb.inc(1);
                outcome
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut summary = BatchSummary::default();
    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            TrackOutcome::Done(record) => {
                summary.processed += 1;
                records.push(record);
            }
            TrackOutcome::Missing => summary.missing += 1,
            TrackOutcome::Failed => summary.failed += 1,
        }
    }
    records.sort_by(|a, b| a.track_id.cmp(&b.track_id));

    log::info!(
        "Batch finished: {} processed, {} missing, {} failed",
        summary.processed,
        summary.missing,
        summary.failed
    );
    Ok((records, summary))
}

fn process_entry(pipeline: &FeaturePipeline, entry: &ManifestEntry) -> TrackOutcome {
    if !entry.file_path.exists() {
        log::warn!("File not found: {}", entry.file_path.display());
        return TrackOutcome::Missing;
    }

    log::debug!("Processing: {}", entry.file_path.display());
    match decode_file(&entry.file_path) {
        Ok(waveform) => TrackOutcome::Done(pipeline.extract(&entry.track_id, &waveform)),
        Err(err) => {
            log::error!(
                "Failed loading {}: {:#}",
                entry.file_path.display(),
                anyhow::Error::new(err)
            );
            TrackOutcome::Failed
        }
    }
}
