use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// One track to analyse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub track_id: String,
    pub file_path: PathBuf,
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content)
}

/// Parses a CSV table with a header naming at least `track_id` and
/// `file_path`. Other columns are ignored and blank lines skipped. Quoted
/// fields may span lines.
pub fn parse_manifest(content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = tokenize(content)?.into_iter();

    let header = records.next().ok_or(ManifestError::MissingHeader)?;
    let column = |name: &'static str| {
        header
            .fields
            .iter()
            .position(|c| c.trim() == name)
            .ok_or(ManifestError::MissingColumn(name))
    };
    let id_col = column("track_id")?;
    let path_col = column("file_path")?;
    let needed = id_col.max(path_col) + 1;

    records
        .map(|record| {
            if record.fields.len() < needed {
                return Err(ManifestError::ShortRow {
                    line: record.line,
                    expected: needed,
                    found: record.fields.len(),
                });
            }
            Ok(ManifestEntry {
                track_id: record.fields[id_col].clone(),
                file_path: PathBuf::from(&record.fields[path_col]),
            })
        })
        .collect()
}

/// One CSV record and the line it starts on.
#[derive(Debug)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Splits the whole input into records. Inside quotes, commas and line
/// breaks are literal and `""` is an escaped quote; outside quotes a `\r`
/// before a line break is dropped.
fn tokenize(content: &str) -> Result<Vec<Record>, ManifestError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => {
                in_quotes = true;
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) if matches!(chars.peek(), Some('\n') | None) => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, start, std::mem::take(&mut fields), quoted);
                quoted = false;
                start = line;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(ManifestError::UnterminatedQuote(start));
    }
    if quoted || !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        push_record(&mut records, start, fields, quoted);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>, quoted: bool) {
    let blank = !quoted && fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}
