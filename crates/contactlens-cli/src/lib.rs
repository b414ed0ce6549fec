//! Shared CLI definitions for contactlens.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which family of contact records a dataset holds.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Business contacts (company, job title, seniority, ...)
    B2b,
    /// Consumer contacts (age, gender, income, ...)
    B2c,
}

impl DatasetKind {
    pub const ALL: [Self; 2] = [Self::B2b, Self::B2c];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::B2b => "b2b",
            Self::B2c => "b2c",
        }
    }

    /// Upper-case tag used in titles and export file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::B2b => "B2B",
            Self::B2c => "B2C",
        }
    }
}

/// Input file format (used to bypass extension-based detection).
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (or another delimiter with --delimiter)
    Csv,
    /// JSON array of objects
    Json,
}

impl FileFormat {
    /// Detect file format from path extension. Returns None when extension is missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Image format for exported charts.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// Raster image rendered with plotters
    Png,
    /// Encapsulated PostScript
    Eps,
}

impl ChartFormat {
    pub const ALL: [Self; 2] = [Self::Png, Self::Eps];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Eps => "eps",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "eps" => Some(Self::Eps),
            _ => None,
        }
    }
}

/// Command-line arguments for contactlens
#[derive(Parser, Debug)]
#[command(version, about = "Filter contact datasets and chart the result")]
pub struct Args {
    /// Dataset to load (CSV or JSON array of objects)
    #[arg(required_unless_present_any = ["generate_config", "remove_layouts"], value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Dataset kind. Detected from the column names when omitted.
    #[arg(long = "kind", value_enum)]
    pub kind: Option<DatasetKind>,

    /// Input format. Detected from the file extension when omitted.
    #[arg(long = "format", value_enum)]
    pub format: Option<FileFormat>,

    /// Specify the delimiter to use when reading a CSV file
    #[arg(long = "delimiter")]
    pub delimiter: Option<char>,

    /// Specify that the CSV file has no header
    #[arg(long = "no-header", action)]
    pub no_header: bool,

    /// Activate a column filter with every known value selected (repeatable)
    #[arg(long = "filter", value_name = "COLUMN")]
    pub filters: Vec<String>,

    /// Toggle one value of a column filter, e.g. GENDER=Female (repeatable)
    #[arg(long = "select", value_name = "COLUMN=VALUE")]
    pub selections: Vec<String>,

    /// Clear the selection of a column so it no longer constrains rows (repeatable)
    #[arg(long = "none", value_name = "COLUMN")]
    pub none: Vec<String>,

    /// Column or chart id to aggregate (repeatable). Defaults to the dataset's standard charts.
    #[arg(long = "chart", value_name = "COLUMN")]
    pub charts: Vec<String>,

    /// Use the charts of a saved report layout
    #[arg(long = "layout", value_name = "NAME")]
    pub layout: Option<String>,

    /// Save the charts being shown as a report layout with this name
    #[arg(long = "save-layout", value_name = "NAME")]
    pub save_layout: Option<String>,

    /// Maximum number of categories per chart (the Unknown bucket is not counted)
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Include an Unknown bucket for records with no value
    #[arg(long = "show-unknowns", action)]
    pub show_unknowns: bool,

    /// Print results as JSON instead of tables
    #[arg(long = "json", action)]
    pub json: bool,

    /// Write the filtered records as CSV into this directory
    #[arg(long = "export", value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Write one chart image per aggregated column into this directory
    #[arg(long = "chart-dir", value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    /// Image format for --chart-dir
    #[arg(long = "chart-format", value_enum)]
    pub chart_format: Option<ChartFormat>,

    /// Enable debug logging
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write a default configuration file and exit
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Overwrite an existing configuration file (with --generate-config)
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,

    /// Remove all saved report layouts and exit
    #[arg(long = "remove-layouts", action)]
    pub remove_layouts: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if !arg.get_action().takes_values() || placeholder.is_empty() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
