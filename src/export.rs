//! Flatten feature records into a CSV table.

use csv::WriterBuilder;
use std::collections::BTreeSet;
use tracing::info;

use crate::error::{LocatorError, Result};
use crate::models::FeatureRecord;

/// Columns written before the tag columns
pub const FIXED_COLUMNS: [&str; 3] = ["name", "lat", "lon"];

/// Suggested download name for exported tables
pub const EXPORT_FILENAME: &str = "business_data.csv";

/// Header row: fixed columns, then every tag key seen in any record, sorted
pub fn table_header(records: &[FeatureRecord]) -> Vec<String> {
    let tag_keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.tags.keys().map(String::as_str))
        .collect();

    FIXED_COLUMNS
        .iter()
        .copied()
        .chain(tag_keys)
        .map(String::from)
        .collect()
}

/// Serialize records as comma-delimited text with a header row.
///
/// One row per record; a record missing a tag leaves that cell empty. A tag
/// key equal to a fixed column name still gets its own column.
pub fn export_table(records: &[FeatureRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(LocatorError::EmptyInput);
    }

    let header = table_header(records);
    let tag_keys = &header[FIXED_COLUMNS.len()..];

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(&header)?;

    for record in records {
        let mut row = Vec::with_capacity(header.len());
        row.push(record.name.clone());
        row.push(record.location.lat.to_string());
        row.push(record.location.lon.to_string());
        row.extend(
            tag_keys
                .iter()
                .map(|key| record.tags.get(key).cloned().unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LocatorError::Export(e.error().to_string()))?;

    info!(
        "Exported {} records with {} columns",
        records.len(),
        header.len()
    );
    Ok(bytes)
}
