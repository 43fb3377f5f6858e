//! # ADCP Parser
//!
//! A Rust library for decoding logs of an underwater acoustic/pressure
//! profiling instrument (ADCP) into collections: one depth/value profile per
//! cast plus the instrument metadata recorded with it.
//!
//! ## Source Formats
//!
//! - **Raw dumps** (`.adcp`): unlabeled number lines split into collections by
//!   the sentinel values `111111` (start), `0.000000` (end of data) and
//!   `999999` (end of collection). Metadata fields are inferred from their
//!   position in the metadata section.
//! - **Structured** (`.json`): a `data` array of records, each with a
//!   `measurements` list and arbitrary extra fields.
//!
//! ## Quick Start
//!
//! ```no_run
//! use adcp_parser::{AdcpReader, ParquetWriter};
//!
//! // Read a raw dump
//! let reader = AdcpReader::from_file("ADCP24_test.adcp")?;
//! let collections = reader.read_all()?;
//!
//! println!("Read {} collections", collections.len());
//!
//! // Write to Parquet format
//! ParquetWriter::new("output_directory")
//!     .chunk_size(100_000)
//!     .write(&collections)?;
//! # Ok::<(), adcp_parser::Error>(())
//! ```
//!
//! ## Malformed Lines
//!
//! A bad line in a raw dump never fails the file. It is dropped, logged with
//! `log::warn!`, and reported back:
//!
//! ```
//! use adcp_parser::RawLogParser;
//!
//! let log = RawLogParser::new().parse_str("111111\n1.0 100.0\nabc def ghi\n2.0 200.0\n");
//!
//! assert_eq!(log.collections[0].len(), 2);
//! assert_eq!(log.warnings.len(), 1);
//! assert_eq!(log.warnings[0].line_number, 3);
//! ```
//!
//! ## Error Handling
//!
//! Only file-level problems are errors:
//!
//! ```no_run
//! use adcp_parser::{AdcpReader, Error};
//!
//! match AdcpReader::from_file("cast.json").and_then(|r| r.read_all()) {
//!     Ok(collections) => {
//!         // An empty Vec is a valid, data-less file
//!     }
//!     Err(Error::InvalidFormat(msg)) => {
//!         eprintln!("Invalid ADCP log: {}", msg);
//!     }
//!     Err(Error::Io(err)) => {
//!         eprintln!("I/O error: {}", err);
//!     }
//!     Err(err) => {
//!         eprintln!("Error: {}", err);
//!     }
//! }
//! ```

// Public API modules
pub mod error;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, LineError, Result};
pub use reader::{AdcpReader, AdcpReaderBuilder};
pub use writer::{JsonWriter, ParquetWriter, ParquetWriterBuilder, WriteStats};

// Re-export models for users who need them
pub use models::{Collection, Measurement, ParseWarning, ParsedLog, Section, SourceFormat};
pub use rawlog::RawLogParser;
pub use structured::StructuredLoader;

// Lower-level modules (public but not part of the high-level API)
pub mod display;
pub mod formats;
pub mod models;
pub mod rawlog;
pub mod schema;
pub mod structured;
