//! Decoder for raw ADCP instrument dumps.
//!
//! A dump is a stream of whitespace-separated numbers, one record fragment per
//! line. Three sentinel values split it into collections:
//!
//! ```text
//! 111111          start of a collection, depth/value pairs follow
//! 1.0 100.0
//! 2.0 200.0
//! 0.000000        end of the data section, metadata follows
//! 40.0 -70.0      latitude, longitude
//! 3.5 6           altitude, month
//! 0.31            vwc
//! 999999          end of the collection
//! ```
//!
//! Metadata lines carry no labels. Fields are assigned by the position of the
//! line in the metadata section, see [`crate::schema::METADATA_SLOTS`].

use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{LineError, Result};
use crate::models::{Collection, ParseWarning, ParsedLog, Section};
use crate::schema::{METADATA_SLOTS, VWC};

const START_MARKER: &str = "111111";
const END_OF_DATA_MARKER: &str = "0.000000";
const END_MARKER: &str = "999999";

/// A classified input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    StartOfCollection,
    EndOfData,
    EndOfCollection,
    /// Anything else, trimmed
    Content(&'a str),
}

/// Classify one line.
///
/// Markers are unanchored substring tests checked in a fixed order, so
/// `"10.000000 5"` is an end-of-data marker and never a data point.
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.contains(START_MARKER) {
        Line::StartOfCollection
    } else if line.contains(END_OF_DATA_MARKER) {
        Line::EndOfData
    } else if line.contains(END_MARKER) {
        Line::EndOfCollection
    } else {
        Line::Content(line)
    }
}

/// Only finite values are accepted: `NaN` and `inf` cannot be written to the
/// JSON interchange format.
fn parse_numbers(line: &str) -> std::result::Result<Vec<f64>, LineError> {
    line.split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(LineError::InvalidNumber {
                token: token.to_string(),
            }),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Metadata,
    Data,
}

/// The collection being built plus its cursor into the slot table.
#[derive(Debug, Default)]
struct Accumulator {
    collection: Collection,
    next_slot: usize,
}

impl Accumulator {
    fn assign_pair(&mut self, first: f64, second: f64) {
        // Pairs past the last slot are dropped without a warning.
        if let Some(slot) = METADATA_SLOTS.get(self.next_slot) {
            self.collection.insert(slot.first, first);
            self.collection.insert(slot.second, second);
            self.next_slot += 1;
        }
    }
}

struct ParserState {
    mode: Mode,
    current: Accumulator,
    output: Vec<Collection>,
    warnings: Vec<ParseWarning>,
    log_warnings: bool,
}

impl ParserState {
    fn new(log_warnings: bool) -> Self {
        Self {
            mode: Mode::Metadata,
            current: Accumulator::default(),
            output: Vec::new(),
            warnings: Vec::new(),
            log_warnings,
        }
    }

    /// Hand the current collection to the output if it holds data, and start
    /// a fresh accumulator either way.
    fn finalize(&mut self) {
        let done = std::mem::take(&mut self.current).collection;
        if !done.is_empty() {
            self.output.push(done);
        }
    }

    fn step(mut self, line_number: usize, raw: &str) -> Self {
        match classify_line(raw) {
            Line::StartOfCollection => {
                if !self.current.collection.is_empty() {
                    self.finalize();
                }
                self.mode = Mode::Data;
            }
            Line::EndOfData => self.mode = Mode::Metadata,
            Line::EndOfCollection => self.finalize(),
            Line::Content(line) => {
                let (section, outcome) = match self.mode {
                    Mode::Data => (Section::Data, self.data_line(line)),
                    Mode::Metadata => (Section::Metadata, self.metadata_line(line)),
                };
                if let Err(error) = outcome {
                    self.reject(line_number, section, line, error);
                }
            }
        }
        self
    }

    fn data_line(&mut self, line: &str) -> std::result::Result<(), LineError> {
        match parse_numbers(line)?.as_slice() {
            &[depth, value] => {
                self.current.collection.push(depth, value);
                Ok(())
            }
            other => Err(LineError::WrongTokenCount {
                expected: "2",
                found: other.len(),
            }),
        }
    }

    fn metadata_line(&mut self, line: &str) -> std::result::Result<(), LineError> {
        match parse_numbers(line)?.as_slice() {
            &[first, second] => self.current.assign_pair(first, second),
            &[vwc] => self.current.collection.insert(VWC, vwc),
            other => {
                return Err(LineError::WrongTokenCount {
                    expected: "1 or 2",
                    found: other.len(),
                })
            }
        }
        Ok(())
    }

    fn reject(&mut self, line_number: usize, section: Section, line: &str, error: LineError) {
        let warning = ParseWarning {
            line_number,
            section,
            content: line.to_string(),
            error,
        };
        if self.log_warnings {
            warn!("{}", warning);
        }
        self.warnings.push(warning);
    }

    fn finish(mut self) -> ParsedLog {
        self.finalize();
        debug!(
            "Parsed {} collection(s), dropped {} line(s)",
            self.output.len(),
            self.warnings.len()
        );
        ParsedLog {
            collections: self.output,
            warnings: self.warnings,
        }
    }
}

/// Single-pass parser for raw instrument dumps.
///
/// The parser only holds configuration; every call builds its own state, so
/// one instance can be shared across threads and reused.
///
/// # Examples
///
/// ```
/// use adcp_parser::RawLogParser;
///
/// let log = RawLogParser::new().parse_lines([
///     "111111", "1.0 100.0", "2.0 200.0", "0.000000", "40.0 -70.0", "999999",
/// ]);
///
/// assert_eq!(log.collections.len(), 1);
/// assert_eq!(log.collections[0].len(), 2);
/// assert_eq!(log.collections[0].get("latitude"), Some(40.0));
/// ```
#[derive(Debug, Clone)]
pub struct RawLogParser {
    log_warnings: bool,
}

impl RawLogParser {
    pub fn new() -> Self {
        Self { log_warnings: true }
    }

    /// Whether dropped lines are also reported through `log::warn!`.
    ///
    /// They are always collected in [`ParsedLog::warnings`]. Default is `true`.
    pub fn log_warnings(mut self, enabled: bool) -> Self {
        self.log_warnings = enabled;
        self
    }

    /// Parse an in-memory sequence of lines. Cannot fail.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParsedLog
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .fold(ParserState::new(self.log_warnings), |state, (idx, line)| {
                state.step(idx + 1, line.as_ref())
            })
            .finish()
    }

    /// Parse a whole dump held in a string. LF and CRLF endings are accepted.
    pub fn parse_str(&self, text: &str) -> ParsedLog {
        self.parse_lines(text.lines())
    }

    /// Parse from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if a line cannot be read or is not UTF-8.
    /// Lines already consumed are discarded.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParsedLog> {
        let mut state = ParserState::new(self.log_warnings);
        for (idx, line) in reader.lines().enumerate() {
            state = state.step(idx + 1, &line?);
        }
        Ok(state.finish())
    }

    /// Open and parse a dump file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedLog> {
        let file = File::open(path.as_ref())?;
        self.parse_reader(BufReader::new(file))
    }
}

impl Default for RawLogParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> ParsedLog {
        RawLogParser::new().log_warnings(false).parse_lines(lines)
    }

    #[test]
    fn test_classify_markers() {
        assert_eq!(classify_line("111111"), Line::StartOfCollection);
        assert_eq!(classify_line("  0.000000\r"), Line::EndOfData);
        assert_eq!(classify_line("999999"), Line::EndOfCollection);
        assert_eq!(classify_line(" 1.5 2.5 "), Line::Content("1.5 2.5"));
    }

    #[test]
    fn test_classify_precedence() {
        // start wins over both other markers
        assert_eq!(classify_line("111111 999999"), Line::StartOfCollection);
        assert_eq!(classify_line("0.000000 999999"), Line::EndOfData);
        // unanchored match inside a larger token
        assert_eq!(classify_line("10.000000 5"), Line::EndOfData);
        assert_eq!(classify_line("1111112.5 3"), Line::StartOfCollection);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("1 -2.5 3e2").unwrap(), vec![1.0, -2.5, 300.0]);
        assert!(parse_numbers("").unwrap().is_empty());
        assert_eq!(
            parse_numbers("1 x").unwrap_err(),
            LineError::InvalidNumber {
                token: "x".to_string()
            }
        );
        for token in ["NaN", "inf", "-inf", "1e400"] {
            assert_eq!(
                parse_numbers(&format!("1.0 {}", token)).unwrap_err(),
                LineError::InvalidNumber {
                    token: token.to_string()
                }
            );
        }
    }

    #[test]
    fn test_slot_cursor_stops_after_last_slot() {
        let mut acc = Accumulator::default();
        for i in 0..10 {
            acc.assign_pair(i as f64, -(i as f64));
        }
        assert_eq!(acc.next_slot, METADATA_SLOTS.len());
        assert_eq!(acc.collection.metadata.len(), 16);
        assert_eq!(acc.collection.get("position_correction_count"), Some(-7.0));
    }

    #[test]
    fn test_empty_input() {
        let log = parse(&[]);
        assert!(log.collections.is_empty());
        assert!(log.warnings.is_empty());
    }

    #[test]
    fn test_metadata_before_first_marker_is_kept() {
        // No data yet, so the start marker keeps the accumulator and its metadata.
        let log = parse(&["40.0 -70.0", "111111", "1 2"]);
        assert_eq!(log.collections.len(), 1);
        assert_eq!(log.collections[0].position(), Some((40.0, -70.0)));
    }

    #[test]
    fn test_end_marker_keeps_mode() {
        // Data after 999999 with no 0.000000 still lands in a fresh collection.
        let log = parse(&["111111", "1 2", "999999", "3 4"]);
        assert_eq!(log.collections.len(), 2);
        assert_eq!(log.collections[1].measurements[0].depth, 3.0);
    }

    #[test]
    fn test_warning_records_line_and_section() {
        let log = parse(&["111111", "1 2", "oops", "0.000000", "1 2 3"]);
        assert_eq!(log.warnings.len(), 2);
        assert_eq!(log.warnings[0].line_number, 3);
        assert_eq!(log.warnings[0].section, Section::Data);
        assert_eq!(log.warnings[0].content, "oops");
        assert_eq!(log.warnings[1].line_number, 5);
        assert_eq!(log.warnings[1].section, Section::Metadata);
        assert_eq!(
            log.warnings[1].error,
            LineError::WrongTokenCount {
                expected: "1 or 2",
                found: 3
            }
        );
    }
}
