//! Filter selection state: which display values are selected for each active column.
//!
//! A [`FilterSelection`] is a plain value. Every operation returns a new selection, and none of
//! them ever leaves a column present with an empty set: an empty selection means the column no
//! longer constrains the rows, not that it rejects all of them.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use crate::catalog::{self, ColumnKind};
use crate::record::FieldLookup;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start filtering on `column` with every known value selected.
    pub fn activate<I, S>(&self, column: &str, all_known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_values(column, all_known.into_iter().map(Into::into).collect())
    }

    /// Stop filtering on `column`.
    pub fn deactivate(&self, column: &str) -> Self {
        let mut next = self.clone();
        next.columns.remove(catalog::normalize_column(column));
        next
    }

    /// Flip one value. Toggling on an inactive column creates it with just that value;
    /// removing the last selected value deactivates the column.
    pub fn toggle_value(&self, column: &str, value: &str) -> Self {
        let column = catalog::normalize_column(column);
        let mut values = self.columns.get(column).cloned().unwrap_or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        self.with_values(column, values)
    }

    pub fn select_all<I, S>(&self, column: &str, all_known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activate(column, all_known)
    }

    /// Clearing a column removes its constraint rather than filtering every row out.
    pub fn select_none(&self, column: &str) -> Self {
        self.deactivate(column)
    }

    fn with_values(&self, column: &str, values: BTreeSet<String>) -> Self {
        let mut next = self.clone();
        let column = catalog::normalize_column(column).to_string();
        if values.is_empty() {
            next.columns.remove(&column);
        } else {
            next.columns.insert(column, values);
        }
        next
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.columns.contains_key(catalog::normalize_column(column))
    }

    pub fn is_selected(&self, column: &str, value: &str) -> bool {
        self.values(column).is_some_and(|v| v.contains(value))
    }

    pub fn values(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.columns.get(catalog::normalize_column(column))
    }

    /// Active columns with their selected display values, in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn active_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when no column holds an empty set.
    pub fn is_normalized(&self) -> bool {
        self.columns.values().all(|v| !v.is_empty())
    }

    /// Content hash: two selections built separately but holding the same values agree.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Display values a column can currently be filtered on.
///
/// Composite columns offer all of their member labels. Other columns offer the distinct
/// populated values found in `records`, relabeled and ordered by the column's ordering table
/// (labels missing from the table go last, alphabetically), or alphabetically when the column
/// has no table.
pub fn known_values<R: FieldLookup>(records: &[R], column: &str) -> Vec<String> {
    let field = match catalog::column_kind(column) {
        ColumnKind::PresenceUnion { members } => {
            return members.iter().map(|(_, label)| label.to_string()).collect();
        }
        ColumnKind::Direct { field } => field,
    };

    let labels: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.populated(field))
        .map(|raw| catalog::display_of(field, raw))
        .collect();

    let mut labels: Vec<&str> = labels.into_iter().collect();
    if let Some(order) = catalog::order_of(field) {
        // stable: labels outside the table keep their alphabetical order
        labels.sort_by_key(|label| order.iter().position(|o| o == label).unwrap_or(usize::MAX));
    }
    labels.into_iter().map(str::to_string).collect()
}
