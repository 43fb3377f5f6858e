//! Loader for the JSON interchange format.
//!
//! ```json
//! {
//!   "data": [
//!     {
//!       "measurements": [{"depth": 1.0, "value": 100.0}],
//!       "metadata": {"latitude": 40.0},
//!       "unit_number": 101
//!     }
//!   ]
//! }
//! ```
//!
//! Every field of a record other than the profile list ends up in the
//! collection metadata. A nested `metadata` object is flattened and wins over
//! a top-level field of the same name.

use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Collection, Measurement};

const DATA_KEY: &str = "data";
const MEASUREMENTS_KEY: &str = "measurements";
const METADATA_KEY: &str = "metadata";

/// Reads structured documents into [`Collection`]s.
pub struct StructuredLoader;

impl StructuredLoader {
    /// Open and load a JSON document.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Json`] on a syntax
    /// error, [`Error::InvalidFormat`] if there is no `data` array.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Collection>> {
        let file = File::open(path.as_ref())?;
        Self::load_reader(BufReader::new(file))
    }

    pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Collection>> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::load_value(document)
    }

    pub fn load_str(text: &str) -> Result<Vec<Collection>> {
        let document: Value = serde_json::from_str(text)?;
        Self::load_value(document)
    }

    /// Convert an already parsed document.
    pub fn load_value(document: Value) -> Result<Vec<Collection>> {
        let records = match document {
            Value::Object(mut root) => root
                .remove(DATA_KEY)
                .ok_or_else(|| Error::InvalidFormat("No 'data' key found".to_string()))?,
            _ => {
                return Err(Error::InvalidFormat(
                    "Expected a JSON object at the top level".to_string(),
                ))
            }
        };

        let Value::Array(records) = records else {
            return Err(Error::InvalidFormat("'data' is not an array".to_string()));
        };

        let collections: Vec<Collection> = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| record_to_collection(idx, record))
            .collect();

        debug!("Loaded {} structured collection(s)", collections.len());
        Ok(collections)
    }
}

fn record_to_collection(idx: usize, record: Value) -> Option<Collection> {
    let Value::Object(mut fields) = record else {
        warn!("Skipping record {}: not a JSON object", idx);
        return None;
    };

    let mut collection = Collection::new();

    // `data` is the legacy name of the profile list.
    let points = fields
        .remove(MEASUREMENTS_KEY)
        .or_else(|| fields.remove(DATA_KEY));
    if let Some(Value::Array(points)) = points {
        collection.measurements = points.iter().filter_map(to_measurement).collect();
        if collection.measurements.len() != points.len() {
            debug!(
                "Record {}: skipped {} point(s) without numeric depth/value",
                idx,
                points.len() - collection.measurements.len()
            );
        }
    }

    let nested = fields.remove(METADATA_KEY);
    move_fields(idx, fields, &mut collection);
    match nested {
        Some(Value::Object(nested)) => move_fields(idx, nested, &mut collection),
        Some(other) => move_field(idx, METADATA_KEY.to_string(), &other, &mut collection),
        None => {}
    }

    Some(collection)
}

fn to_measurement(point: &Value) -> Option<Measurement> {
    let depth = point.get("depth")?.as_f64().filter(|d| d.is_finite())?;
    let value = point.get("value")?.as_f64().filter(|v| v.is_finite())?;
    Some(Measurement::new(depth, value))
}

fn move_fields(idx: usize, fields: Map<String, Value>, collection: &mut Collection) {
    for (key, value) in fields {
        move_field(idx, key, &value, collection);
    }
}

fn move_field(idx: usize, key: String, value: &Value, collection: &mut Collection) {
    match numeric_value(value) {
        Some(number) => collection.insert(key, number),
        None => debug!("Record {}: skipping non-numeric field '{}'", idx, key),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|n: &f64| n.is_finite())
}
