//! High-level API for exporting parsed collections.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats::json::JsonFormatter;
use crate::formats::parquet::ParquetFormatter;
use crate::models::Collection;

const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Writer for outputting collections to Apache Parquet format.
///
/// Rows are in long format: one row per measurement with the collection
/// index, the point index, depth, value, and one nullable column per metadata
/// field.
///
/// # Examples
///
/// ```no_run
/// use adcp_parser::{AdcpReader, ParquetWriter};
///
/// // Read an ADCP dump
/// let reader = AdcpReader::from_file("ADCP24_test.adcp")?;
/// let collections = reader.read_all()?;
///
/// // Write to Parquet
/// ParquetWriter::new("output_dir")
///     .write(&collections)?;
/// # Ok::<(), adcp_parser::Error>(())
/// ```
pub struct ParquetWriter {
    output_directory: String,
    chunk_size: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer that will write to the specified directory.
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_string_lossy().to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the maximum number of rows per Parquet file. Default is 50,000.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Write the collections to Parquet format.
    ///
    /// This will create one or more Parquet files in the output directory,
    /// named `file_part000.parquet`, `file_part001.parquet`, etc.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output directory cannot be created
    /// - The Parquet files cannot be written
    /// - There are no measurements to write, or the chunk size is zero
    pub fn write(self, collections: &[Collection]) -> Result<()> {
        let formatter = ParquetFormatter::new(self.output_directory, self.chunk_size);

        formatter
            .convert(collections)
            .map_err(|e| Error::OutputError(e.to_string()))?;

        Ok(())
    }

    /// Write collections to Parquet and return statistics about the write operation.
    pub fn write_with_stats(self, collections: &[Collection]) -> Result<WriteStats> {
        let num_collections = collections.iter().filter(|c| !c.is_empty()).count();
        let num_rows: usize = collections.iter().map(Collection::len).sum();
        let chunk_size = self.chunk_size;
        let num_chunks = if chunk_size == 0 {
            0
        } else {
            num_rows.div_ceil(chunk_size)
        };

        self.write(collections)?;

        Ok(WriteStats {
            num_collections,
            num_rows,
            num_chunks,
            chunk_size,
        })
    }
}

/// Statistics about a Parquet write operation.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Collections that contributed rows
    pub num_collections: usize,
    /// Total number of measurement rows written
    pub num_rows: usize,
    /// Number of Parquet files created
    pub num_chunks: usize,
    /// Maximum rows per file
    pub chunk_size: usize,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} rows from {} collection(s) across {} file(s) ({} rows per file)",
            self.num_rows, self.num_collections, self.num_chunks, self.chunk_size
        )
    }
}

/// Builder for configuring Parquet write options.
///
/// # Examples
///
/// ```no_run
/// use adcp_parser::{AdcpReader, ParquetWriterBuilder};
///
/// let reader = AdcpReader::from_file("ADCP24_test.adcp")?;
/// let collections = reader.read_all()?;
///
/// ParquetWriterBuilder::new()
///     .output_directory("./output")
///     .chunk_size(75_000)
///     .build()?
///     .write(&collections)?;
/// # Ok::<(), adcp_parser::Error>(())
/// ```
pub struct ParquetWriterBuilder {
    output_directory: Option<String>,
    chunk_size: usize,
}

impl ParquetWriterBuilder {
    /// Create a new Parquet writer builder with default options.
    pub fn new() -> Self {
        Self {
            output_directory: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the output directory.
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the chunk size.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Build the Parquet writer.
    ///
    /// # Errors
    ///
    /// Returns an error if output_directory was not set.
    pub fn build(self) -> Result<ParquetWriter> {
        let output_directory = self
            .output_directory
            .ok_or_else(|| Error::Other("Output directory not set".to_string()))?;

        Ok(ParquetWriter {
            output_directory,
            chunk_size: self.chunk_size,
        })
    }
}

impl Default for ParquetWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer for the JSON interchange format read by
/// [`StructuredLoader`](crate::StructuredLoader).
///
/// # Examples
///
/// ```no_run
/// use adcp_parser::{AdcpReader, JsonWriter};
///
/// let collections = AdcpReader::from_file("ADCP24_test.adcp")?.read_all()?;
/// JsonWriter::new("ADCP24_test.json").pretty(false).write(&collections)?;
/// # Ok::<(), adcp_parser::Error>(())
/// ```
pub struct JsonWriter {
    output_path: PathBuf,
    pretty: bool,
}

impl JsonWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    /// Indent the output. Default is `true`.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write the collections, creating parent directories as needed.
    pub fn write(self, collections: &[Collection]) -> Result<()> {
        JsonFormatter::new(self.pretty)
            .convert(&self.output_path, collections)
            .map_err(|e| Error::OutputError(e.to_string()))
    }
}
