//! Frequency tables for charting: count a column's values, relabel them, order them by the
//! column's ordering table (or by count), cap the visible categories and report missing
//! values in a trailing Unknown bucket.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{self, UNKNOWN_LABEL};
use crate::record::FieldLookup;

/// One category of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Keep at most this many regular buckets. The Unknown bucket is never counted against it.
    pub limit: Option<usize>,
    /// Append an Unknown bucket when some records have no value.
    pub include_unknown: bool,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_unknown(mut self, include_unknown: bool) -> Self {
        self.include_unknown = include_unknown;
        self
    }
}

/// Count `column` across `records`.
///
/// Reads one physical field. Raw values sharing a display label are merged. With an ordering
/// table, buckets follow the table and labels outside it come after, by descending count then
/// label; without one, buckets are sorted by descending count then label. A regular bucket
/// labelled Unknown always sorts last, and with `include_unknown` it is merged into the
/// trailing Unknown bucket. `limit` is applied before the Unknown bucket is appended.
pub fn aggregate<R: FieldLookup>(
    records: &[R],
    column: &str,
    options: AggregateOptions,
) -> Vec<Bucket> {
    let mut raw_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unknown = 0usize;
    for record in records {
        match record.populated(column) {
            Some(raw) => *raw_counts.entry(raw).or_default() += 1,
            None => unknown += 1,
        }
    }

    let mut by_label: BTreeMap<&str, usize> = BTreeMap::new();
    for (raw, count) in raw_counts {
        *by_label.entry(catalog::display_of(column, raw)).or_default() += count;
    }

    let mut buckets: Vec<Bucket> = by_label
        .into_iter()
        .map(|(label, count)| Bucket::new(label, count))
        .collect();

    // a raw value that already reads "Unknown" (GENDER "U") joins the trailing bucket
    if options.include_unknown {
        if let Some(pos) = buckets.iter().position(|b| b.label == UNKNOWN_LABEL) {
            unknown += buckets.remove(pos).count;
        }
    }
    sort_buckets(&mut buckets, catalog::order_of(column));

    if let Some(limit) = options.limit {
        buckets.truncate(limit);
    }

    if options.include_unknown && unknown > 0 {
        buckets.push(Bucket::new(UNKNOWN_LABEL, unknown));
    }

    buckets
}

fn sort_buckets(buckets: &mut [Bucket], order: Option<&[&str]>) {
    // buckets arrive in label order, and every sort below is stable
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(order) = order {
        buckets.sort_by_key(|b| {
            order
                .iter()
                .position(|o| *o == b.label)
                .unwrap_or(usize::MAX)
        });
    }
    buckets.sort_by_key(|b| b.label == UNKNOWN_LABEL);
}

/// Sum of the bucket counts.
pub fn total(buckets: &[Bucket]) -> usize {
    buckets.iter().map(|b| b.count).sum()
}
