use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::audio::features::{FeatureRecord, FEATURE_NAMES};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated table with a header row
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

pub fn write_records<W: Write>(out: W, records: &[FeatureRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, records),
        OutputFormat::Jsonl => write_jsonl(out, records),
    }
}

pub fn write_to_path(path: &Path, records: &[FeatureRecord], format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, records, format)?;
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn csv_header() -> String {
    std::iter::once("track_id")
        .chain(FEATURE_NAMES)
        .collect::<Vec<_>>()
        .join(",")
}

fn write_csv<W: Write>(mut out: W, records: &[FeatureRecord]) -> Result<()> {
    writeln!(out, "{}", csv_header())?;
    for record in records {
        write!(out, "{}", csv_field(&record.track_id))?;
        for (_, value) in record.values() {
            write!(out, ",{}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_jsonl<W: Write>(mut out: W, records: &[FeatureRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    Ok(())
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
