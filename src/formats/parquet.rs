use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::{create_dir_all, File};
use std::path::Path;
use std::sync::Arc;

use crate::models::{Collection, Measurement};

const PROFILE_COLUMNS: [&str; 4] = ["collection", "point", "depth", "value"];
const METADATA_PREFIX: &str = "meta_";

/// One measurement flattened together with its collection's metadata.
struct ProfileRow<'a> {
    collection: u32,
    point: u32,
    measurement: &'a Measurement,
    metadata: &'a BTreeMap<String, f64>,
}

pub struct ParquetFormatter {
    output_directory: String,
    chunk_size: usize,
}

impl ParquetFormatter {
    pub fn new(output_directory: String, chunk_size: usize) -> Self {
        Self {
            output_directory,
            chunk_size,
        }
    }

    /// Write all measurements in long format, one row per point.
    pub fn convert(&self, collections: &[Collection]) -> Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("Chunk size must be greater than zero");
        }

        let rows = flatten(collections)?;
        if rows.is_empty() {
            anyhow::bail!("No measurements to write to Parquet");
        }

        create_dir_all(&self.output_directory)?;

        let total_chunks = rows.len().div_ceil(self.chunk_size);
        info!(
            "Writing {} rows from {} collection(s) into {} chunk(s)",
            rows.len(),
            collections.len(),
            total_chunks
        );

        for (i, chunk) in rows.chunks(self.chunk_size).enumerate() {
            info!(
                "Writing chunk {}/{}, {} rows",
                i + 1,
                total_chunks,
                chunk.len()
            );

            let output_path = Path::new(&self.output_directory)
                .join(format!("file_part{:03}.parquet", i));

            self.write_chunk_to_parquet(chunk, &output_path)?;
        }

        info!("All chunks have been written");
        Ok(())
    }

    fn write_chunk_to_parquet(&self, rows: &[ProfileRow<'_>], output_path: &Path) -> Result<()> {
        let metadata_columns = metadata_columns(rows);

        let mut fields = vec![
            Field::new(PROFILE_COLUMNS[0], DataType::UInt32, false),
            Field::new(PROFILE_COLUMNS[1], DataType::UInt32, false),
            Field::new(PROFILE_COLUMNS[2], DataType::Float64, false),
            Field::new(PROFILE_COLUMNS[3], DataType::Float64, false),
        ];
        for (col_name, _) in &metadata_columns {
            fields.push(Field::new(col_name.as_str(), DataType::Float64, true));
        }

        let schema = Arc::new(Schema::new(fields));

        let collections: ArrayRef = Arc::new(UInt32Array::from_iter_values(
            rows.iter().map(|r| r.collection),
        ));
        let points: ArrayRef = Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.point)));
        let depths: ArrayRef = Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.measurement.depth),
        ));
        let values: ArrayRef = Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.measurement.value),
        ));

        let mut arrays: Vec<ArrayRef> = vec![collections, points, depths, values];

        for (_, key) in &metadata_columns {
            let column: Vec<Option<f64>> = rows
                .iter()
                .map(|r| r.metadata.get(*key).copied())
                .collect();
            arrays.push(Arc::new(Float64Array::from(column)));
        }

        let batch = RecordBatch::try_new(schema.clone(), arrays)?;

        let file = File::create(output_path)?;
        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }
}

fn flatten(collections: &[Collection]) -> Result<Vec<ProfileRow<'_>>> {
    let mut rows = Vec::with_capacity(collections.iter().map(Collection::len).sum());
    for (c, collection) in collections.iter().enumerate() {
        let c = u32::try_from(c)?;
        for (p, measurement) in collection.measurements.iter().enumerate() {
            rows.push(ProfileRow {
                collection: c,
                point: u32::try_from(p)?,
                measurement,
                metadata: &collection.metadata,
            });
        }
    }
    Ok(rows)
}

/// Metadata keys present in a chunk, sorted by key, paired with their column
/// name. A key that collides with a profile column (or with another key once
/// prefixed) gets `meta_` prepended until the name is unique.
fn metadata_columns<'a>(rows: &[ProfileRow<'a>]) -> Vec<(String, &'a String)> {
    let keys: BTreeSet<&'a String> = rows.iter().flat_map(|r| r.metadata.keys()).collect();

    let mut taken: HashSet<String> = PROFILE_COLUMNS.iter().map(|c| c.to_string()).collect();
    taken.extend(keys.iter().map(|k| k.to_string()));

    keys.into_iter()
        .map(|key| {
            if !PROFILE_COLUMNS.contains(&key.as_str()) {
                return (key.clone(), key);
            }
            let mut name = format!("{}{}", METADATA_PREFIX, key);
            while taken.contains(&name) {
                name = format!("{}{}", METADATA_PREFIX, name);
            }
            taken.insert(name.clone());
            (name, key)
        })
        .collect()
}
