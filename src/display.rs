//! Text and series preparation for presenting collections.
//!
//! Nothing here renders; these helpers build the labels, metadata listings and
//! per-key series a plotting front end consumes.

use std::collections::BTreeMap;
use std::path::Path;

use crate::models::Collection;
use crate::schema::{self, field_rank};

/// Metadata keys charted next to the profiles unless the caller picks others.
pub const DEFAULT_SERIES_KEYS: [&str; 3] = [schema::ALTITUDE, schema::VWC, schema::UNIT_NUMBER];

const SHORT_NAME_LIMIT: usize = 20;
const SHORT_NAME_PREFIX: usize = 12;

/// Format a metadata value, dropping the decimal part of whole numbers.
pub fn format_metadata_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Metadata keys of a collection: schema fields in slot order, then `vwc`,
/// then anything else alphabetically.
pub fn ordered_keys(collection: &Collection) -> Vec<&str> {
    let mut keys: Vec<&str> = collection.metadata.keys().map(String::as_str).collect();
    keys.sort_by_key(|key| (field_rank(key).unwrap_or(usize::MAX), *key));
    keys
}

/// Human-readable metadata listing for one collection.
pub fn describe_metadata(file_name: &str, index: usize, collection: &Collection) -> Vec<String> {
    if collection.metadata.is_empty() {
        return vec!["No metadata available.".to_string()];
    }

    let mut lines = vec![format!(
        "Metadata for {} - Collection {}:",
        file_name,
        index + 1
    )];
    for key in ordered_keys(collection) {
        if let Some(value) = collection.get(key) {
            lines.push(format!("{}: {}", key, format_metadata_value(value)));
        }
    }
    lines
}

/// List entry for a collection, e.g. `cast.adcp - Collection 3`.
pub fn collection_label(file_name: &str, index: usize) -> String {
    format!("{} - Collection {}", file_name, index + 1)
}

/// File stem, abbreviated when long so plot legends stay readable.
pub fn short_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    if stem.chars().count() > SHORT_NAME_LIMIT {
        let prefix: String = stem.chars().take(SHORT_NAME_PREFIX).collect();
        format!("{}_...", prefix.trim_end_matches('_'))
    } else {
        stem.to_string()
    }
}

/// Legend entry for a plotted collection, e.g. `cast #3`.
pub fn plot_label(file_name: &str, index: usize) -> String {
    format!("{} #{}", short_name(file_name), index + 1)
}

/// One value per collection for each requested key, `None` where unknown.
pub fn metadata_series<'a, I>(collections: I, keys: &[&str]) -> BTreeMap<String, Vec<Option<f64>>>
where
    I: IntoIterator<Item = &'a Collection>,
{
    let mut series: BTreeMap<String, Vec<Option<f64>>> =
        keys.iter().map(|key| (key.to_string(), Vec::new())).collect();

    for collection in collections {
        for (key, values) in series.iter_mut() {
            values.push(collection.get(key));
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata_value() {
        assert_eq!(format_metadata_value(6.0), "6");
        assert_eq!(format_metadata_value(-70.0), "-70");
        assert_eq!(format_metadata_value(0.8), "0.8");
        assert_eq!(format_metadata_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_describe_metadata_order() {
        let mut collection = Collection::new();
        collection.insert("salinity", 35.0);
        collection.insert(schema::VWC, 0.25);
        collection.insert(schema::MONTH, 6.0);
        collection.insert(schema::LATITUDE, 40.5);

        let lines = describe_metadata("cast.adcp", 0, &collection);
        assert_eq!(
            lines,
            vec![
                "Metadata for cast.adcp - Collection 1:",
                "latitude: 40.5",
                "month: 6",
                "vwc: 0.25",
                "salinity: 35",
            ]
        );
    }

    #[test]
    fn test_describe_empty_metadata() {
        let lines = describe_metadata("cast.adcp", 0, &Collection::new());
        assert_eq!(lines, vec!["No metadata available."]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(collection_label("cast.adcp", 2), "cast.adcp - Collection 3");
        assert_eq!(short_name("cast.adcp"), "cast");
        assert_eq!(short_name("ADCP24_deployment_june_final.json"), "ADCP24_deplo_...");
        assert_eq!(short_name("ADCP24_test_long_name_x.adcp"), "ADCP24_test_...");
        assert_eq!(plot_label("cast.adcp", 0), "cast #1");
    }

    #[test]
    fn test_metadata_series() {
        let mut first = Collection::new();
        first.insert(schema::ALTITUDE, 3.5);
        let mut second = Collection::new();
        second.insert(schema::VWC, 0.2);

        let series = metadata_series([&first, &second], &DEFAULT_SERIES_KEYS);
        assert_eq!(series["altitude"], vec![Some(3.5), None]);
        assert_eq!(series["vwc"], vec![None, Some(0.2)]);
        assert_eq!(series["unit_number"], vec![None, None]);
    }
}
