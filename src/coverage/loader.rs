//! Measurement loading from delimited text
//!
//! Every cell is read as text (no schema inference) and parsed here, so a bad
//! cell is reported with its row and column instead of silently becoming null.
//! Loading is all-or-nothing: a single invalid row aborts the whole load, since
//! a dropped row would shift the color domain for every other point.

use super::error::{CoverageError, DataError, Result};
use polars::prelude::{CsvReadOptions, DataFrame, PolarsError, SerReader, StringChunked};
use std::io::{Cursor, Read};
use std::path::Path;

/// One validated, geotagged signal measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub latitude: f64,
    pub longitude: f64,
    pub metric: f64,
    /// 1-based data row in the source (header excluded)
    pub row: usize,
    /// Extra popup columns as (column, raw text), in configured order
    pub attributes: Vec<(String, String)>,
}

impl Measurement {
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Non-empty, ordered measurements of one run
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSet {
    records: Vec<Measurement>,
}

impl MeasurementSet {
    /// Wrap already-validated records
    ///
    /// # Errors
    /// `EmptyDataset` if `records` is empty
    pub fn new(records: Vec<Measurement>) -> Result<Self> {
        if records.is_empty() {
            return Err(CoverageError::EmptyDataset);
        }
        Ok(MeasurementSet { records })
    }

    pub fn first(&self) -> &Measurement {
        &self.records[0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.records.iter()
    }

    pub fn metrics(&self) -> Vec<f64> {
        self.records.iter().map(|m| m.metric).collect()
    }
}

impl<'a> IntoIterator for &'a MeasurementSet {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Which source columns feed a Measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub latitude: String,
    pub longitude: String,
    pub metric: String,
    /// Stable reorder by this column before composing
    pub sort_by: Option<String>,
    /// Extra columns copied verbatim into each popup
    pub popup_columns: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            metric: "rsrp".to_string(),
            sort_by: None,
            popup_columns: Vec::new(),
        }
    }
}

/// Load measurements from a CSV file
pub fn load(path: &Path, columns: &ColumnMapping) -> Result<MeasurementSet> {
    let bytes = std::fs::read(path).map_err(|e| CoverageError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read measurement source");
    load_bytes(bytes, columns)
}

/// Load measurements from any CSV byte stream
pub fn load_from_reader<R: Read>(mut reader: R, columns: &ColumnMapping) -> Result<MeasurementSet> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| CoverageError::io("<reader>", e))?;
    load_bytes(bytes, columns)
}

fn load_bytes(bytes: Vec<u8>, columns: &ColumnMapping) -> Result<MeasurementSet> {
    let df = read_table(bytes)?;
    if df.height() == 0 {
        return Err(CoverageError::EmptyDataset);
    }

    let latitudes = text_column(&df, &columns.latitude)?;
    let longitudes = text_column(&df, &columns.longitude)?;
    let metrics = text_column(&df, &columns.metric)?;
    let popup_columns = columns
        .popup_columns
        .iter()
        .map(|name| text_column(&df, name).map(|ca| (name.as_str(), ca)))
        .collect::<Result<Vec<_>>>()?;
    let sort_column = columns
        .sort_by
        .as_deref()
        .map(|name| text_column(&df, name))
        .transpose()?;

    let mut records = Vec::with_capacity(df.height());
    for (idx, ((lat, lon), metric)) in latitudes
        .iter()
        .zip(longitudes.iter())
        .zip(metrics.iter())
        .enumerate()
    {
        let row = idx + 1;
        let latitude = parse_coordinate(row, &columns.latitude, lat, 90.0)?;
        let longitude = parse_coordinate(row, &columns.longitude, lon, 180.0)?;
        let metric = parse_number(row, &columns.metric, metric)?;

        let attributes = popup_columns
            .iter()
            .map(|(name, ca)| {
                let text = ca.get(idx).unwrap_or("").trim().to_string();
                (name.to_string(), text)
            })
            .collect();

        records.push(Measurement {
            latitude,
            longitude,
            metric,
            row,
            attributes,
        });
    }

    if let (Some(name), Some(keys)) = (columns.sort_by.as_deref(), sort_column) {
        let keys: Vec<&str> = keys.iter().map(|k| k.unwrap_or("").trim()).collect();
        records = reorder(records, &keys);
        tracing::debug!(column = name, "sorted measurements");
    }

    tracing::info!(
        rows = records.len(),
        metric = %columns.metric,
        "loaded measurements"
    );

    MeasurementSet::new(records)
}

/// Parse CSV bytes into an all-text DataFrame
fn read_table(bytes: Vec<u8>) -> Result<DataFrame> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CoverageError::EmptyDataset);
    }

    CsvReadOptions::default()
        .with_has_header(true)
        // Schema length 0 reads every column as String
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| match e {
            PolarsError::NoData(_) => CoverageError::EmptyDataset,
            other => DataError::Malformed(other.to_string()).into(),
        })
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    let column = df.column(name).map_err(|_| DataError::MissingColumn {
        column: name.to_string(),
    })?;
    let text = column
        .str()
        .map_err(|e| DataError::Malformed(format!("column '{}': {}", name, e)))?;
    Ok(text)
}

fn parse_number(
    row: usize,
    column: &str,
    cell: Option<&str>,
) -> std::result::Result<f64, DataError> {
    let raw = cell.unwrap_or("").trim();
    let value: f64 = raw.parse().map_err(|_| DataError::NotNumeric {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(DataError::NotFinite {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        });
    }

    Ok(value)
}

fn parse_coordinate(
    row: usize,
    column: &str,
    cell: Option<&str>,
    limit: f64,
) -> std::result::Result<f64, DataError> {
    let value = parse_number(row, column, cell)?;
    if !(-limit..=limit).contains(&value) {
        return Err(DataError::OutOfRange {
            row,
            column: column.to_string(),
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(value)
}

/// Stable reorder by `keys`: numeric when every key is a finite number, lexical otherwise
fn reorder(records: Vec<Measurement>, keys: &[&str]) -> Vec<Measurement> {
    let numeric: Option<Vec<f64>> = keys
        .iter()
        .map(|k| k.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    let mut order: Vec<usize> = (0..records.len()).collect();
    match numeric {
        Some(values) => order.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
        None => order.sort_by(|&a, &b| keys[a].cmp(keys[b])),
    }

    let mut slots: Vec<Option<Measurement>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}
