//! Raw and normalized records.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Output format of [`ProcessedAt`].
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize a header cell for name matching: trim, drop a BOM, collapse
/// inner whitespace, ASCII lower-case.
pub fn normalize_header_name(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// One row as read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source (0 when unknown).
    pub line: u64,
    pub values: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, values: Vec<String>) -> Self {
        Self { line, values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A loaded source: optional header plus records in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header names as they appear in the source, when the source has one.
    pub headers: Option<Vec<String>>,
    pub records: Vec<RawRecord>,
    /// Lines skipped because they could not be parsed.
    pub malformed_skipped: usize,
}

impl RawTable {
    pub fn new(headers: Option<Vec<String>>) -> Self {
        Self {
            headers,
            records: Vec::new(),
            malformed_skipped: 0,
        }
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the header matching `name` (see [`normalize_header_name`]).
    pub fn header_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header_name(name);
        self.headers
            .as_ref()?
            .iter()
            .position(|header| normalize_header_name(header) == wanted)
    }

    /// Number of addressable fields: header width, else the first record's width.
    pub fn width(&self) -> Option<usize> {
        match &self.headers {
            Some(headers) => Some(headers.len()),
            None => self.records.first().map(RawRecord::len),
        }
    }
}

/// Processing time shared by every row of a run, at second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessedAt(DateTime<Utc>);

impl ProcessedAt {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value.trunc_subsecs(0))
    }

    /// Parse the `YYYY-MM-DD HH:MM:SS` form produced by `Display`.
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for ProcessedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub code: String,
    pub description: String,
    pub is_valid: bool,
    pub last_updated: ProcessedAt,
}
