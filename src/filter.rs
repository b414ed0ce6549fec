//! Apply a [`FilterSelection`] to records: every active column must match (AND), and within a
//! column any selected value may match (OR).

use std::collections::HashSet;
use tracing::debug;

use crate::catalog::{self, ColumnKind};
use crate::record::FieldLookup;
use crate::selection::FilterSelection;

/// One active column, resolved to what a record has to satisfy.
enum ColumnPredicate<'a> {
    /// At least one of these fields must be populated.
    AnyPopulated(Vec<&'a str>),
    /// The field's raw value must be one of these.
    RawIn {
        field: &'a str,
        raw: HashSet<&'a str>,
    },
}

impl ColumnPredicate<'_> {
    fn matches<R: FieldLookup>(&self, record: &R) -> bool {
        match self {
            ColumnPredicate::AnyPopulated(fields) => {
                fields.iter().any(|f| record.populated(f).is_some())
            }
            ColumnPredicate::RawIn { field, raw } => record
                .field(field)
                .is_some_and(|value| raw.contains(value)),
        }
    }
}

fn compile(selection: &FilterSelection) -> Vec<ColumnPredicate<'_>> {
    selection
        .iter()
        .map(|(column, selected)| match catalog::column_kind(column) {
            ColumnKind::PresenceUnion { members } => ColumnPredicate::AnyPopulated(
                members
                    .iter()
                    .filter(|(_, label)| selected.contains(*label))
                    .map(|(field, _)| *field)
                    .collect(),
            ),
            ColumnKind::Direct { field } => ColumnPredicate::RawIn {
                field,
                raw: selected
                    .iter()
                    .map(|display| catalog::raw_of(field, display))
                    .collect(),
            },
        })
        .collect()
}

/// Positions of the records that pass `selection`, in input order.
pub fn filter_indices<R: FieldLookup>(records: &[R], selection: &FilterSelection) -> Vec<usize> {
    let predicates = compile(selection);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.iter().all(|p| p.matches(*record)))
        .map(|(idx, _)| idx)
        .collect()
}

/// Records that pass `selection`, in input order.
pub fn filter_records<'a, R: FieldLookup>(
    records: &'a [R],
    selection: &FilterSelection,
) -> Vec<&'a R> {
    let predicates = compile(selection);
    records
        .iter()
        .filter(|record| predicates.iter().all(|p| p.matches(*record)))
        .collect()
}

/// Remembers the last filter result for one dataset.
///
/// Keyed by the dataset's id and the selection's content, so a selection rebuilt from scratch
/// with the same content is a hit. The structural hash only short-cuts the comparison.
#[derive(Debug, Default)]
pub struct FilterCache {
    key: Option<(u64, u64, FilterSelection)>,
    indices: Vec<usize>,
    hits: usize,
    misses: usize,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<R: FieldLookup>(
        &mut self,
        dataset_id: u64,
        records: &[R],
        selection: &FilterSelection,
    ) -> &[usize] {
        let hash = selection.structural_hash();
        let hit = matches!(
            &self.key,
            Some((id, h, cached)) if *id == dataset_id && *h == hash && cached == selection
        );
        if hit {
            self.hits += 1;
            debug!(dataset_id, rows = self.indices.len(), "filter cache hit");
        } else {
            self.misses += 1;
            self.indices = filter_indices(records, selection);
            self.key = Some((dataset_id, hash, selection.clone()));
            debug!(
                dataset_id,
                active_columns = selection.len(),
                rows = self.indices.len(),
                total = records.len(),
                "recomputed filtered rows"
            );
        }
        &self.indices
    }

    /// Result of the last computation (empty before the first one).
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selection the current result was computed for.
    pub fn cached_selection(&self) -> Option<&FilterSelection> {
        self.key.as_ref().map(|(_, _, selection)| selection)
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.indices.clear();
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
