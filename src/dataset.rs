use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::catalog;
use crate::record::{FieldLookup, Record};
use crate::{DatasetKind, FileFormat};

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(1);

/// Options controlling how a dataset file is read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub format: Option<FileFormat>,
    /// Dataset kind; detected from the header when `None`.
    pub kind: Option<DatasetKind>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_kind(mut self, kind: DatasetKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A loaded set of uniform contact records.
///
/// Each dataset gets a process-unique id when it is built; filter results are cached against it.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: u64,
    kind: DatasetKind,
    file_name: String,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(
        kind: DatasetKind,
        file_name: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            id: NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            file_name: file_name.into(),
            columns,
            records,
        }
    }

    /// Load a dataset file, picking the reader from `options.format` or the file extension.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let format = options
            .format
            .or_else(|| FileFormat::from_path(path))
            .unwrap_or(FileFormat::Csv);
        match format {
            FileFormat::Csv => Self::from_csv(path, options),
            FileFormat::Json => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
                Self::from_json_str(&content, &file_stem(path), options.kind)
            }
        }
    }

    /// Read a delimited file. Every column is read as text; empty cells become missing fields.
    pub fn from_csv(path: &Path, options: &LoadOptions) -> Result<Self> {
        let delimiter = options
            .delimiter
            .unwrap_or_else(|| default_delimiter(path));
        let df = CsvReadOptions::default()
            .with_has_header(options.has_header.unwrap_or(true))
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(delimiter))
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?;

        let dataset = Self::from_dataframe(&df, &file_stem(path), options.kind)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            kind = dataset.kind.as_str(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    fn from_dataframe(df: &DataFrame, file_name: &str, kind: Option<DatasetKind>) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        let kind = resolve_kind(kind, &columns)?;

        let mut records = vec![Record::new(); df.height()];
        for name in &columns {
            let column = df.column(name.as_str())?.cast(&DataType::String)?;
            for (record, value) in records.iter_mut().zip(column.str()?.into_iter()) {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    record.insert(name.as_str(), value);
                }
            }
        }

        Ok(Self::from_records(kind, file_name, columns, records))
    }

    /// Parse a JSON array of objects. Only string values are kept; anything else counts as
    /// missing.
    pub fn from_json_str(json: &str, file_name: &str, kind: Option<DatasetKind>) -> Result<Self> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)
            .map_err(|e| eyre!("Expected a JSON array of objects: {}", e))?;

        let mut columns: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(rows.len());
        let mut dropped = 0usize;
        for row in &rows {
            let mut record = Record::new();
            for (name, value) in row {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
                match row.field(name) {
                    Some(text) if !text.is_empty() => record.insert(name.as_str(), text),
                    Some(_) => {}
                    None => dropped += usize::from(!value.is_null()),
                }
            }
            records.push(record);
        }
        if dropped > 0 {
            debug!(dropped, "ignored non-text JSON values");
        }

        let kind = resolve_kind(kind, &columns)?;
        Ok(Self::from_records(kind, file_name, columns, records))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Logical columns this dataset can be sub-filtered on.
    ///
    /// Only the kind's allowed columns that exist in the file are offered; email fields are
    /// offered once, as EMAIL. B2C columns come in their fixed presentation order.
    pub fn available_columns(&self) -> Vec<String> {
        let mut available: Vec<String> = Vec::new();
        for column in &self.columns {
            let logical = catalog::normalize_column(column);
            if catalog::is_sub_filterable(self.kind, logical)
                && !available.iter().any(|c| c == logical)
            {
                available.push(logical.to_string());
            }
        }
        available.sort_by_key(|c| catalog::column_rank(self.kind, c));
        available
    }
}

fn resolve_kind(kind: Option<DatasetKind>, columns: &[String]) -> Result<DatasetKind> {
    kind.or_else(|| catalog::detect_kind(columns)).ok_or_else(|| {
        eyre!("Could not tell whether the dataset holds B2B or B2C contacts; pass --kind")
    })
}

/// Separator implied by the file extension: tab for `.tsv`, comma otherwise.
fn default_delimiter(path: &Path) -> u8 {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}
