//! Interactive filtering session over one dataset: which columns are active, what is selected
//! in each, whether Unknown buckets are shown, and the filtered rows that follow from them.

use color_eyre::Result;
use polars::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregate::{aggregate, AggregateOptions, Bucket};
use crate::catalog;
use crate::contact_stats::ContactStats;
use crate::dataset::Dataset;
use crate::filter::FilterCache;
use crate::record::{FieldLookup, Record};
use crate::selection::{known_values, FilterSelection};

/// Receives the filtered rows every time the selection or the Unknown toggle changes.
pub trait FilterObserver {
    fn on_filtered(&mut self, filtered: &[&Record], show_unknowns: bool);
}

impl<F> FilterObserver for F
where
    F: FnMut(&[&Record], bool),
{
    fn on_filtered(&mut self, filtered: &[&Record], show_unknowns: bool) {
        self(filtered, show_unknowns)
    }
}

pub struct Session {
    dataset: Dataset,
    /// Active logical columns in activation order. A column stays active after "none" clears
    /// its selection.
    active_columns: Vec<String>,
    selection: FilterSelection,
    show_unknowns: bool,
    cache: FilterCache,
    observers: Vec<Box<dyn FilterObserver>>,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            active_columns: Vec::new(),
            selection: FilterSelection::new(),
            show_unknowns: false,
            cache: FilterCache::new(),
            observers: Vec::new(),
        }
    }

    /// Replace the dataset and forget every filter.
    pub fn load(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.active_columns.clear();
        self.selection = FilterSelection::new();
        self.cache.invalidate();
        self.notify();
    }

    pub fn subscribe(&mut self, observer: Box<dyn FilterObserver>) {
        self.observers.push(observer);
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn active_columns(&self) -> &[String] {
        &self.active_columns
    }

    pub fn is_column_active(&self, column: &str) -> bool {
        let column = catalog::normalize_column(column);
        self.active_columns.iter().any(|c| c == column)
    }

    pub fn show_unknowns(&self) -> bool {
        self.show_unknowns
    }

    /// Display values the column can be filtered on, taken from the whole dataset.
    pub fn known_values(&self, column: &str) -> Vec<String> {
        known_values(self.dataset.records(), column)
    }

    /// Activate an inactive column with everything selected, or deactivate an active one.
    /// Returns whether the column is active afterwards.
    pub fn toggle_column(&mut self, column: &str) -> bool {
        let column = catalog::normalize_column(column).to_string();
        let next = if self.is_column_active(&column) {
            self.active_columns.retain(|c| *c != column);
            self.selection.deactivate(&column)
        } else {
            self.active_columns.push(column.clone());
            self.selection
                .activate(&column, self.known_values(&column))
        };
        self.apply(next);
        self.is_column_active(&column)
    }

    /// Flip one value of a column's selection, activating the column if needed.
    pub fn toggle_value(&mut self, column: &str, value: &str) {
        self.mark_active(column);
        let next = self.selection.toggle_value(column, value);
        self.apply(next);
    }

    pub fn select_all(&mut self, column: &str) {
        self.mark_active(column);
        let next = self.selection.select_all(column, self.known_values(column));
        self.apply(next);
    }

    pub fn select_none(&mut self, column: &str) {
        let next = self.selection.select_none(column);
        self.apply(next);
    }

    pub fn set_show_unknowns(&mut self, show_unknowns: bool) {
        if self.show_unknowns != show_unknowns {
            self.show_unknowns = show_unknowns;
            self.notify();
        }
    }

    pub fn toggle_show_unknowns(&mut self) -> bool {
        self.set_show_unknowns(!self.show_unknowns);
        self.show_unknowns
    }

    fn mark_active(&mut self, column: &str) {
        if !self.is_column_active(column) {
            self.active_columns
                .push(catalog::normalize_column(column).to_string());
        }
    }

    fn apply(&mut self, next: FilterSelection) {
        debug_assert!(next.is_normalized());
        if next != self.selection {
            self.selection = next;
            self.notify();
        }
    }

    fn refresh(&mut self) {
        self.cache
            .get_or_compute(self.dataset.id(), self.dataset.records(), &self.selection);
    }

    fn view(&self) -> Vec<&Record> {
        let records = self.dataset.records();
        self.cache.indices().iter().map(|&i| &records[i]).collect()
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        self.refresh();
        let records = self.dataset.records();
        let filtered: Vec<&Record> = self.cache.indices().iter().map(|&i| &records[i]).collect();
        for observer in &mut self.observers {
            observer.on_filtered(&filtered, self.show_unknowns);
        }
    }

    /// Records passing the current selection, in dataset order.
    pub fn filtered(&mut self) -> Vec<&Record> {
        self.refresh();
        self.view()
    }

    pub fn filtered_count(&mut self) -> usize {
        self.refresh();
        self.cache.indices().len()
    }

    /// Frequency table of `column` over the filtered records, honoring the Unknown toggle.
    pub fn aggregate(&mut self, column: &str, limit: Option<usize>) -> Vec<Bucket> {
        let options = AggregateOptions {
            limit,
            include_unknown: self.show_unknowns,
        };
        let filtered = self.filtered();
        aggregate(&filtered, column, options)
    }

    pub fn contact_stats(&mut self) -> ContactStats {
        ContactStats::from_records(&self.filtered())
    }

    /// File name (without extension) for exporting the filtered rows:
    /// `"{file} - {KIND}"`, followed by ` - ` and the active columns when any are active.
    pub fn export_file_name(&self) -> String {
        let base = format!("{} - {}", self.dataset.file_name(), self.dataset.kind().label());
        if self.active_columns.is_empty() {
            return base;
        }
        let columns: Vec<String> = self
            .active_columns
            .iter()
            .map(|c| readable_column(c))
            .collect();
        format!("{} - {}", base, columns.join(" - "))
    }

    /// Write the filtered rows as CSV into `dir`, columns in dataset order. Returns the path.
    pub fn export_csv(&mut self, dir: &Path) -> Result<PathBuf> {
        self.refresh();
        let filtered = self.view();

        let columns: Vec<Column> = self
            .dataset
            .columns()
            .iter()
            .map(|name| {
                let values: Vec<Option<&str>> = filtered.iter().map(|r| r.field(name)).collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();
        let mut df = DataFrame::new(columns)?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", self.export_file_name()));
        let file = std::fs::File::create(&path)?;
        CsvWriter::new(file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        info!(path = %path.display(), rows = df.height(), "exported filtered records");
        Ok(path)
    }
}

/// Column name with underscores and characters that are unsafe in file names turned into
/// single spaces.
fn readable_column(column: &str) -> String {
    let readable = if let Ok(re) = Regex::new(r#"[_/\\:*?"<>|]+"#) {
        re.replace_all(column, " ").into_owned()
    } else {
        column.replace('_', " ")
    };
    readable.trim().to_string()
}
