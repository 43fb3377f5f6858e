//! High-level API for reading ADCP log files.

use log::debug;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::Result;
use crate::models::{Collection, ParsedLog, SourceFormat};
use crate::rawlog::RawLogParser;
use crate::structured::StructuredLoader;

/// A reader for ADCP logs in either source format.
///
/// # Examples
///
/// ```no_run
/// use adcp_parser::AdcpReader;
///
/// // Read from a file, the format is picked from the extension
/// let reader = AdcpReader::from_file("ADCP24_test.adcp")?;
/// let collections = reader.read_all()?;
/// # Ok::<(), adcp_parser::Error>(())
/// ```
pub struct AdcpReader {
    text: String,
    format: SourceFormat,
    log_warnings: bool,
}

impl AdcpReader {
    /// Create a new reader from a file path.
    ///
    /// The whole file is loaded into memory. `.json` files are read as the
    /// structured format, everything else as a raw dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = SourceFormat::from_path(path.as_ref());
        Self::open(path.as_ref(), format, true)
    }

    fn open(path: &Path, format: SourceFormat, log_warnings: bool) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        debug!("Read {} bytes from {}", text.len(), path.display());

        Ok(Self {
            text,
            format,
            log_warnings,
        })
    }

    /// Create a new reader from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] with `InvalidData` if the bytes are not UTF-8.
    pub fn from_bytes(data: Vec<u8>, format: SourceFormat) -> Result<Self> {
        let text =
            String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self::from_text(text, format))
    }

    /// Create a new reader over text already in memory.
    pub fn from_text(text: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            text: text.into(),
            format,
            log_warnings: true,
        }
    }

    /// The format this reader will decode.
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Read every collection in the source.
    ///
    /// An empty result is a success: the file simply held no profile data.
    /// Malformed raw-dump lines are dropped, use
    /// [`read_all_with_warnings`](Self::read_all_with_warnings) to see them.
    ///
    /// # Errors
    ///
    /// Structured sources fail on invalid JSON or a missing `data` array.
    /// Raw sources never fail at this point.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use adcp_parser::AdcpReader;
    ///
    /// let reader = AdcpReader::from_file("ADCP24_test.adcp")?;
    /// let collections = reader.read_all()?;
    ///
    /// println!("Read {} collections", collections.len());
    /// for collection in collections.iter().take(5) {
    ///     println!("{} points, timestamp {:?}", collection.len(), collection.timestamp());
    /// }
    /// # Ok::<(), adcp_parser::Error>(())
    /// ```
    pub fn read_all(self) -> Result<Vec<Collection>> {
        Ok(self.read_all_with_warnings()?.collections)
    }

    /// Read every collection along with the lines that were dropped.
    ///
    /// Structured sources always report no warnings.
    pub fn read_all_with_warnings(self) -> Result<ParsedLog> {
        match self.format {
            SourceFormat::Raw => Ok(RawLogParser::new()
                .log_warnings(self.log_warnings)
                .parse_str(&self.text)),
            SourceFormat::Structured => Ok(ParsedLog {
                collections: StructuredLoader::load_str(&self.text)?,
                warnings: Vec::new(),
            }),
        }
    }
}

/// Builder for configuring ADCP reading options.
///
/// # Examples
///
/// ```no_run
/// use adcp_parser::{AdcpReaderBuilder, SourceFormat};
///
/// let reader = AdcpReaderBuilder::new()
///     .format(SourceFormat::Raw)
///     .log_warnings(false)
///     .from_file("cast_dump.txt")?;
/// let log = reader.read_all_with_warnings()?;
/// println!("{} line(s) dropped", log.warnings.len());
/// # Ok::<(), adcp_parser::Error>(())
/// ```
pub struct AdcpReaderBuilder {
    format: Option<SourceFormat>,
    log_warnings: bool,
}

impl AdcpReaderBuilder {
    /// Create a new reader builder with default options.
    pub fn new() -> Self {
        Self {
            format: None,
            log_warnings: true,
        }
    }

    /// Force the source format instead of detecting it from the extension.
    pub fn format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Whether dropped raw-dump lines are logged. Default is `true`.
    pub fn log_warnings(mut self, enabled: bool) -> Self {
        self.log_warnings = enabled;
        self
    }

    /// Build a reader from a file path.
    pub fn from_file<P: AsRef<Path>>(self, path: P) -> Result<AdcpReader> {
        let format = self
            .format
            .unwrap_or_else(|| SourceFormat::from_path(path.as_ref()));
        AdcpReader::open(path.as_ref(), format, self.log_warnings)
    }

    /// Build a reader from raw bytes. Without an explicit format the bytes are
    /// read as a raw dump.
    pub fn from_bytes(self, data: Vec<u8>) -> Result<AdcpReader> {
        let mut reader = AdcpReader::from_bytes(data, self.format.unwrap_or(SourceFormat::Raw))?;
        reader.log_warnings = self.log_warnings;
        Ok(reader)
    }
}

impl Default for AdcpReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
