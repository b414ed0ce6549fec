//! Plain-text and JSON rendering of a filtered session.

use color_eyre::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::aggregate::{total, Bucket};
use crate::catalog;
use crate::charts::ChartRequest;
use crate::contact_stats::ContactStats;
use crate::session::Session;
use crate::DatasetKind;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub column: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResult {
    pub id: String,
    pub title: String,
    pub column: String,
    /// Records the chart covers, counted before the category limit.
    pub total: usize,
    pub buckets: Vec<Bucket>,
}

/// Everything shown for one run: the selection, its charts and contact channel counts.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file_name: String,
    pub kind: DatasetKind,
    pub total_records: usize,
    pub filtered_records: usize,
    pub show_unknowns: bool,
    pub filters: Vec<FilterSummary>,
    pub charts: Vec<ChartResult>,
    pub contact_stats: ContactStats,
}

impl Report {
    pub fn build(session: &mut Session, charts: &[ChartRequest]) -> Self {
        let filters = session
            .active_columns()
            .iter()
            .map(|column| FilterSummary {
                column: column.clone(),
                values: session
                    .selection()
                    .values(column)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let charts = charts
            .iter()
            .map(|chart| {
                let buckets = session.aggregate(&chart.column, chart.limit);
                // the heading counts every record, including categories cut by the limit
                let covered = match chart.limit {
                    Some(_) => total(&session.aggregate(&chart.column, None)),
                    None => total(&buckets),
                };
                ChartResult {
                    id: chart.id.clone(),
                    title: chart.title.clone(),
                    column: chart.column.clone(),
                    total: covered,
                    buckets,
                }
            })
            .collect();

        Self {
            file_name: session.dataset().file_name().to_string(),
            kind: session.dataset().kind(),
            total_records: session.dataset().len(),
            filtered_records: session.filtered_count(),
            show_unknowns: session.show_unknowns(),
            filters,
            charts,
            contact_stats: session.contact_stats(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({}): {} of {} records",
            self.file_name,
            self.kind.label(),
            self.filtered_records,
            self.total_records
        );

        for filter in &self.filters {
            let values = if filter.values.is_empty() {
                "(none)".to_string()
            } else {
                filter.values.join(", ")
            };
            let _ = writeln!(
                out,
                "  filter {}: {}",
                catalog::column_display_name(&filter.column),
                values
            );
        }

        for chart in &self.charts {
            let _ = writeln!(out);
            render_chart(&mut out, chart);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Contact Information");
        for (group, items) in self.contact_stats.groups() {
            let counts: Vec<String> = items
                .iter()
                .map(|(label, count)| format!("{label}: {count}"))
                .collect();
            let _ = writeln!(out, "  {:<18} {}", group, counts.join("  "));
        }
        out
    }
}

fn render_chart(out: &mut String, chart: &ChartResult) {
    let _ = writeln!(out, "{} ({})", chart.title, chart.total);
    if chart.buckets.is_empty() {
        let _ = writeln!(out, "  no data");
        return;
    }

    let label_width = chart
        .buckets
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    let count_width = chart
        .buckets
        .iter()
        .map(|b| b.count.to_string().len())
        .max()
        .unwrap_or(1);
    let max_count = chart.buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    for bucket in &chart.buckets {
        let bar = "#".repeat((bucket.count * BAR_WIDTH).div_ceil(max_count));
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:>count_width$}  {}",
            bucket.label, bucket.count, bar
        );
    }
}
