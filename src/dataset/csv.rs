//! CSV reader for the global bleaching dataset
//!
//! Reads just the columns the model cares about. The source file is
//! Latin-1 encoded, uses quoted fields, and marks missing values with
//! the literal `nd` or an empty cell.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DatasetError;
use crate::model::forest::{FEATURE_COLUMNS, FEATURE_COUNT};

/// Bleaching level column name
pub const BLEACHING_LEVEL: &str = "Bleaching_Level";
/// Percent bleaching column name
pub const PERCENT_BLEACHING: &str = "Percent_Bleaching";

/// One dataset row projected onto the relevant columns
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Feature cells in [`FEATURE_COLUMNS`] order; `None` marks a
    /// missing or unusable value
    pub features: [Option<f64>; FEATURE_COUNT],
    pub bleaching_level: Option<String>,
    pub percent_bleaching: Option<f64>,
}

/// Read the dataset, projecting onto the feature and target columns
pub fn read_bleaching_csv(path: &Path) -> Result<Vec<RawRow>, DatasetError> {
    let bytes = fs::read(path).map_err(|e| DatasetError::Io(PathBuf::from(path), e))?;
    // Latin-1: every byte maps directly to the code point of equal value
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let records = parse_records(&text)?;
    let mut iter = records.into_iter();
    let header = iter.next().ok_or(DatasetError::Empty)?;

    let mut feature_indices = [0usize; FEATURE_COUNT];
    for (slot, name) in feature_indices.iter_mut().zip(FEATURE_COLUMNS) {
        *slot = find_column(&header, name)?;
    }
    let level_index = find_column(&header, BLEACHING_LEVEL)?;
    let percent_index = find_column(&header, PERCENT_BLEACHING)?;

    let mut rows = Vec::new();
    for (offset, record) in iter.enumerate() {
        if record.len() != header.len() {
            return Err(DatasetError::Parse {
                // header is record 1
                record: offset + 2,
                detail: format!(
                    "expected {} fields, found {}",
                    header.len(),
                    record.len()
                ),
            });
        }

        let mut features = [None; FEATURE_COUNT];
        for (value, &index) in features.iter_mut().zip(&feature_indices) {
            *value = parse_number(&record[index]);
        }

        rows.push(RawRow {
            features,
            bleaching_level: parse_text(&record[level_index]),
            percent_bleaching: parse_number(&record[percent_index]),
        });
    }

    Ok(rows)
}

fn find_column(header: &[String], name: &str) -> Result<usize, DatasetError> {
    header
        .iter()
        .position(|column| column.trim() == name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

/// Parse a numeric cell; empty, `nd`, unparseable, and non-finite cells
/// all count as missing
fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "nd" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_text(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "nd" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split raw text into records, honoring quoted fields, escaped quotes,
/// and CRLF line endings
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, DatasetError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DatasetError::Parse {
            record: records.len() + 1,
            detail: "unterminated quoted field".to_string(),
        });
    }

    // Final record when the file does not end with a newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    // Skip blank lines
    if record.len() == 1 && record[0].is_empty() {
        return;
    }
    records.push(record);
}
