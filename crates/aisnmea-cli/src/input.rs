//! Capture readers: plain NMEA text, and the CSV and JSONL files this
//! tool writes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::export::CsvMessageRow;

/// Format of an input capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputFormat {
    Text,
    Csv,
    Jsonl,
}

/// One unit of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRecord {
    /// A raw NMEA sentence that still needs parsing and reassembly.
    Sentence(String),
    /// A complete payload from a previous export.
    Payload {
        payload: String,
        fill_bits: u8,
        rxtime: Option<String>,
    },
}

/// Read every record of `path`.
pub fn read_input(path: &Path, format: InputFormat) -> Result<Vec<InputRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    match format {
        InputFormat::Text => read_text(BufReader::new(file)),
        InputFormat::Csv => read_csv(file),
        InputFormat::Jsonl => read_jsonl(BufReader::new(file)),
    }
}

/// One sentence per line. Anything before the first `!` (a tag block or
/// receiver prefix) is dropped, as are lines with no `!` at all.
pub fn read_text(reader: impl BufRead) -> Result<Vec<InputRecord>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(start) = line.find('!') {
            records.push(InputRecord::Sentence(line[start..].trim_end().to_string()));
        }
    }
    Ok(records)
}

// No fill bit column: re-imported CSV payloads decode with zero fill.
fn read_csv(reader: impl std::io::Read) -> Result<Vec<InputRecord>> {
    let mut csv = csv::Reader::from_reader(reader);
    csv.deserialize::<CsvMessageRow>()
        .map(|row| {
            let row = row?;
            Ok(InputRecord::Payload {
                payload: row.payload,
                fill_bits: 0,
                rxtime: known_time(Some(row.received_time)),
            })
        })
        .collect()
}

fn read_jsonl(reader: impl BufRead) -> Result<Vec<InputRecord>> {
    #[derive(Deserialize)]
    struct Row {
        payload: String,
        #[serde(default)]
        fill_bits: u8,
        #[serde(default)]
        rxtime: Option<String>,
    }

    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Row = serde_json::from_str(&line)
            .with_context(|| format!("line {}: not a message row", number + 1))?;
        records.push(InputRecord::Payload {
            payload: row.payload,
            fill_bits: row.fill_bits,
            rxtime: known_time(row.rxtime),
        });
    }
    Ok(records)
}

fn known_time(time: Option<String>) -> Option<String> {
    time.filter(|t| !t.is_empty() && t != aisnmea_tracker::TIME_NOT_AVAILABLE)
}
