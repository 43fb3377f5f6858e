use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::LineError;
use crate::schema;

/// How a source file is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Line-oriented instrument dump with sentinel markers
    Raw,
    /// JSON interchange document with a top-level `data` array
    Structured,
}

impl SourceFormat {
    /// Guess the format from a file extension. Anything that is not `.json` is
    /// treated as a raw dump.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => SourceFormat::Structured,
            _ => SourceFormat::Raw,
        }
    }
}

/// One point of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub depth: f64,
    pub value: f64,
}

impl Measurement {
    pub fn new(depth: f64, value: f64) -> Self {
        Self { depth, value }
    }
}

/// One profiling cast.
///
/// `measurements` keeps source order; depth is neither sorted nor unique.
/// A missing metadata key means the value is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub metadata: BTreeMap<String, f64>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, depth: f64, value: f64) {
        self.measurements.push(Measurement::new(depth, value));
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.metadata.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }

    /// Number of measurements.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// `(latitude, longitude)` of the GPS fix, if both were recorded.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.get(schema::LATITUDE)?, self.get(schema::LONGITUDE)?))
    }

    /// The abort status, if it is one of the codes the instrument reports.
    pub fn status_code(&self) -> Option<u8> {
        let code = whole_number(self.get(schema::ABORT_STATUS)?)?;
        u8::try_from(code)
            .ok()
            .filter(|code| schema::KNOWN_STATUS_CODES.contains(code))
    }

    /// Rebuild the cast time from the split timestamp fields.
    ///
    /// The fractional part of `second` is kept as sub-second precision.
    /// Returns `None` when a component is missing or the date is invalid.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let year = i32::try_from(whole_number(self.get(schema::YEAR)?)?).ok()?;
        let month = whole_number(self.get(schema::MONTH)?)?;
        let day = whole_number(self.get(schema::DAY)?)?;
        let hour = whole_number(self.get(schema::HOUR)?)?;
        let minute = whole_number(self.get(schema::MINUTE)?)?;

        let second = self.get(schema::SECOND)?;
        if !second.is_finite() || second < 0.0 {
            return None;
        }
        let whole_seconds = u32::try_from(second.trunc() as u64).ok()?;
        let nanos = ((second.fract() * 1e9).round() as u32).min(999_999_999);

        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, whole_seconds, nanos)
    }
}

fn whole_number(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Section of a raw dump a line was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Data,
    Metadata,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Data => write!(f, "data"),
            Section::Metadata => write!(f, "metadata"),
        }
    }
}

/// A raw-dump line that was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// 1-based line number in the source
    pub line_number: usize,
    pub section: Section,
    /// The line after trimming
    pub content: String,
    pub error: LineError,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: error parsing {} line '{}': {}",
            self.line_number, self.section, self.content, self.error
        )
    }
}

/// Output of one parse: the kept collections and every dropped line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub collections: Vec<Collection>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedLog {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
