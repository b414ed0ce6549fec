use serde::Serialize;

use crate::dataset::Dataset;
use crate::DatasetKind;

/// Categories shown before a chart is expanded.
pub const DEFAULT_INITIAL_DISPLAY: usize = 5;

/// A standard chart: which column it aggregates and how many categories it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartDefinition {
    pub id: &'static str,
    pub kind: DatasetKind,
    pub title: &'static str,
    pub column: &'static str,
    /// `None` shows every category (age bands are few and ordered).
    pub initial_display: Option<usize>,
}

const fn chart(
    id: &'static str,
    kind: DatasetKind,
    title: &'static str,
    column: &'static str,
) -> ChartDefinition {
    ChartDefinition {
        id,
        kind,
        title,
        column,
        initial_display: Some(DEFAULT_INITIAL_DISPLAY),
    }
}

const REGISTRY: &[ChartDefinition] = &[
    chart("industries", DatasetKind::B2b, "Industries", "COMPANY_INDUSTRY"),
    chart("job-titles", DatasetKind::B2b, "Job Titles", "JOB_TITLE"),
    chart("seniority", DatasetKind::B2b, "Seniority Levels", "SENIORITY_LEVEL"),
    chart("company-size", DatasetKind::B2b, "Company Size", "COMPANY_EMPLOYEE_COUNT"),
    chart("company-revenue", DatasetKind::B2b, "Company Revenue", "COMPANY_REVENUE"),
    ChartDefinition {
        id: "age",
        kind: DatasetKind::B2c,
        title: "Age Distribution",
        column: "AGE_RANGE",
        initial_display: None,
    },
    chart("gender", DatasetKind::B2c, "Gender Distribution", "GENDER"),
    chart("married", DatasetKind::B2c, "Marital Status", "MARRIED"),
    chart("children", DatasetKind::B2c, "Children", "CHILDREN"),
    chart("income", DatasetKind::B2c, "Income Range", "INCOME_RANGE"),
    chart("net-worth", DatasetKind::B2c, "Net Worth", "NET_WORTH"),
];

pub fn chart_registry() -> &'static [ChartDefinition] {
    REGISTRY
}

pub fn charts_for(kind: DatasetKind) -> impl Iterator<Item = &'static ChartDefinition> {
    REGISTRY.iter().filter(move |c| c.kind == kind)
}

pub fn chart_by_id(id: &str) -> Option<&'static ChartDefinition> {
    REGISTRY.iter().find(|c| c.id == id)
}

/// Chart for a user-supplied name: a registry id, or the column a registered chart uses.
pub fn resolve_chart(kind: DatasetKind, name: &str) -> Option<&'static ChartDefinition> {
    chart_by_id(name).or_else(|| charts_for(kind).find(|c| c.column == name))
}

/// A chart resolved against one dataset: a registry entry, or an ad-hoc chart over any
/// column the dataset has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    pub id: String,
    pub title: String,
    pub column: String,
    pub limit: Option<usize>,
}

impl ChartRequest {
    /// Registry chart with its truncation; charts that truncate use `default_limit`.
    pub fn from_definition(def: &ChartDefinition, default_limit: usize) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            column: def.column.to_string(),
            limit: def.initial_display.map(|_| default_limit),
        }
    }

    /// Resolve `name` as a registry id or column for the dataset's kind, falling back to a
    /// plain column of the dataset.
    pub fn resolve(dataset: &Dataset, name: &str, default_limit: usize) -> Option<Self> {
        if let Some(def) = resolve_chart(dataset.kind(), name) {
            return Some(Self::from_definition(def, default_limit));
        }
        // ad-hoc charts count one physical field, so composite columns never resolve here
        dataset.has_column(name).then(|| Self {
            id: name.to_lowercase().replace('_', "-"),
            title: name.replace('_', " "),
            column: name.to_string(),
            limit: Some(default_limit),
        })
    }

    /// The standard charts for the dataset's kind whose column the dataset has.
    pub fn defaults_for(dataset: &Dataset, default_limit: usize) -> Vec<Self> {
        charts_for(dataset.kind())
            .filter(|def| dataset.has_column(def.column))
            .map(|def| Self::from_definition(def, default_limit))
            .collect()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
