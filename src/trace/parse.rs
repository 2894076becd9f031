//! Trace record parsing.
//!
//! Traces are JSON Lines: one transfer per line, tagged with its category.
//! Blank lines and lines starting with `#` are skipped.

use std::collections::HashMap;
use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

use super::event::{Category, TransferEvent};

/// Errors that can occur while reading a trace.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: read failed: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed record: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: unknown category: {name}")]
    UnknownCategory { line: usize, name: String },
}

/// On-disk shape of one trace line.
#[derive(Debug, Deserialize)]
struct RawRecord {
    category: String,
    start_ns: u64,
    end_ns: u64,
    size: u64,
    rank_path: String,
}

/// Parse one trace line. `line_no` is only used for error reporting.
pub fn parse_record(line: &str, line_no: usize) -> Result<(Category, TransferEvent), ParseError> {
    let raw: RawRecord = serde_json::from_str(line).map_err(|source| ParseError::Malformed {
        line: line_no,
        source,
    })?;

    let category = Category::from_name(&raw.category).ok_or(ParseError::UnknownCategory {
        line: line_no,
        name: raw.category,
    })?;

    Ok((
        category,
        TransferEvent {
            start_time_ns: raw.start_ns,
            end_time_ns: raw.end_ns,
            size: raw.size,
            channel_id: raw.rank_path,
        },
    ))
}

/// Transfer events grouped by category, in input order.
#[derive(Debug, Default)]
pub struct TraceSet {
    events: HashMap<Category, Vec<TransferEvent>>,
}

impl TraceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, event: TransferEvent) {
        self.events.entry(category).or_default().push(event);
    }

    /// Events recorded for `category`; empty if none were seen.
    pub fn events(&self, category: Category) -> &[TransferEvent] {
        self.events.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Total number of events across all categories.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a whole trace, stopping at the first bad line.
pub fn read_trace<R: BufRead>(reader: R) -> Result<TraceSet, ParseError> {
    let mut set = TraceSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ParseError::Read {
            line: idx + 1,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (category, event) = parse_record(trimmed, idx + 1)?;
        set.push(category, event);
    }

    tracing::debug!(events = set.len(), "trace loaded");

    Ok(set)
}
