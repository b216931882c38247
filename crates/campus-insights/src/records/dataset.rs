use super::analytics::{aggregate, available_years, AggregateBundle, YearFilter};
use super::normalizer::{normalize_all, NormalizedRecord, RawRecord, RecordCategory};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset must be a JSON array of records")]
    NotAnArray,
    #[error("dataset entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("unsupported dataset format for '{}': expected .json or .csv", path.display())]
    UnsupportedFormat { path: PathBuf },
}

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Normalized student records loaded for analytics.
///
/// Every load gets a fresh `version`, so caches keyed on it never serve a
/// bundle computed from an older dataset.
#[derive(Debug, Clone)]
pub struct StudentDataset {
    records: Vec<NormalizedRecord>,
    version: u64,
    loaded_at: DateTime<Utc>,
}

impl Default for StudentDataset {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl StudentDataset {
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        Self {
            records,
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            loaded_at: Utc::now(),
        }
    }

    pub fn from_raw(raw: &[RawRecord]) -> Self {
        Self::new(normalize_all(RecordCategory::Student, raw))
    }

    /// Builds a dataset from an already-parsed JSON array of objects.
    pub fn from_json_value(value: Value) -> Result<Self, DatasetError> {
        let raw = raw_records(value)?;
        Ok(Self::from_raw(&raw))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_reader(reader)?;
        let dataset = Self::from_json_value(value)?;
        info!(records = dataset.len(), "loaded student dataset from JSON");
        Ok(dataset)
    }

    /// Reads a CSV export with a header row. Every cell is kept as text and
    /// blank cells count as missing. Malformed rows are skipped with a warning.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut raw = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in csv_reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    warn!(row = index + 1, error = %err, "skipping malformed CSV row");
                    skipped += 1;
                    continue;
                }
            };

            let record: RawRecord = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.to_string(), Value::from(cell)))
                .collect();
            raw.push(record);
        }

        let dataset = Self::from_raw(&raw);
        info!(
            records = dataset.len(),
            skipped, "loaded student dataset from CSV"
        );
        Ok(dataset)
    }

    /// Loads `.json` or `.csv` files, chosen by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        debug!(path = %path.display(), "opening student dataset");
        match extension.as_deref() {
            Some("json") => Self::from_json_reader(BufReader::new(File::open(path)?)),
            Some("csv") => Self::from_csv_reader(File::open(path)?),
            _ => Err(DatasetError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn available_years(&self) -> Vec<String> {
        available_years(&self.records)
    }

    pub fn aggregate(&self, year_filter: &YearFilter) -> AggregateBundle {
        aggregate(&self.records, year_filter)
    }
}

/// Splits a JSON array into raw record objects.
pub(crate) fn raw_records(value: Value) -> Result<Vec<RawRecord>, DatasetError> {
    let Value::Array(items) = value else {
        return Err(DatasetError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(DatasetError::NotAnObject { index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::normalizer::keys;
    use std::io::Cursor;

    #[test]
    fn json_array_loads_and_normalizes() {
        let payload = r#"[{"IDNUM": "1", "YR_CDE": 2023, "CAREER_GPA": "3.2"}, {"idNum": "2"}]"#;
        let dataset = StudentDataset::from_json_reader(Cursor::new(payload)).expect("dataset loads");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].text(keys::YEAR).as_deref(), Some("2023"));
        assert_eq!(dataset.available_years(), ["2023"]);
    }

    #[test]
    fn empty_array_is_a_valid_dataset() {
        let dataset = StudentDataset::from_json_reader(Cursor::new("[]")).expect("dataset loads");
        assert!(dataset.is_empty());
        assert!(dataset.aggregate(&YearFilter::All).is_empty());
    }

    #[test]
    fn non_array_and_non_object_entries_are_rejected() {
        let err = StudentDataset::from_json_reader(Cursor::new(r#"{"idNum": "1"}"#))
            .expect_err("object payload rejected");
        assert!(matches!(err, DatasetError::NotAnArray));

        let err = StudentDataset::from_json_reader(Cursor::new(r#"[{"idNum": "1"}, 7]"#))
            .expect_err("scalar entry rejected");
        assert!(matches!(err, DatasetError::NotAnObject { index: 1 }));

        let err = StudentDataset::from_json_reader(Cursor::new("[{"))
            .expect_err("truncated payload rejected");
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn csv_export_loads_with_blank_cells_missing() {
        let csv = "ID_NUM,YR_CDE,CAREER_GPA,GENDER\n1,2022,3.1,F\n2,2023,,M\n3,2023,2.0,\n";
        let dataset = StudentDataset::from_csv_reader(Cursor::new(csv)).expect("csv loads");

        assert_eq!(dataset.len(), 3);
        assert!(dataset.records()[1].is_missing(keys::GPA));
        assert_eq!(dataset.records()[1].gpa(), 0.0);
        assert_eq!(dataset.records()[2].bucket_key(keys::GENDER), "Undefined");
        assert_eq!(dataset.available_years(), ["2022", "2023"]);
    }

    #[test]
    fn malformed_csv_rows_are_skipped() {
        let csv = "ID_NUM,YR_CDE\n1,2022\n2,2023,extra\n3,2024\n";
        let dataset = StudentDataset::from_csv_reader(Cursor::new(csv)).expect("csv loads");
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn every_load_gets_a_new_version() {
        let first = StudentDataset::default();
        let second = StudentDataset::default();
        assert_ne!(first.version(), second.version());
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        let err = StudentDataset::from_path("students.xlsx").expect_err("xlsx rejected");
        assert!(matches!(err, DatasetError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("students.xlsx"));
    }
}
