use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;

pub mod aggregate;
pub mod catalog;
pub mod chart_export;
pub mod charts;
pub mod config;
pub mod contact_stats;
pub mod dataset;
pub mod filter;
pub mod record;
pub mod render;
pub mod report;
pub mod selection;
pub mod session;

pub use aggregate::{aggregate, AggregateOptions, Bucket};
pub use charts::{ChartDefinition, ChartRequest};
pub use config::{AppConfig, ConfigManager};
pub use contact_stats::ContactStats;
pub use dataset::{Dataset, LoadOptions};
pub use filter::{filter_records, FilterCache};
pub use record::{FieldLookup, Record};
pub use render::Report;
pub use report::{ReportLayout, ReportLayoutStore};
pub use selection::FilterSelection;
pub use session::{FilterObserver, Session};

/// Re-export CLI definitions shared with the build script
pub use contactlens_cli::{Args, ChartFormat, DatasetKind, FileFormat};

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "contactlens";

impl LoadOptions {
    /// Create LoadOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Result<Self> {
        let mut opts = LoadOptions::new();

        opts.delimiter = match args.delimiter.or(config.file_loading.delimiter) {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => return Err(eyre!("Delimiter must be an ASCII character, got '{}'", c)),
            None => None,
        };

        // --no-header overrides config
        opts.has_header = if args.no_header {
            Some(false)
        } else {
            config.file_loading.has_header
        };

        opts.format = args.format;
        opts.kind = args.kind;
        Ok(opts)
    }
}

/// Output settings for one run, merged from CLI args and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Applied to every chart when set; otherwise each chart keeps its own truncation.
    pub limit: Option<usize>,
    pub default_limit: usize,
    pub show_unknowns: bool,
    pub export_dir: Option<PathBuf>,
    pub chart_dir: Option<PathBuf>,
    pub chart_format: ChartFormat,
}

impl ReportOptions {
    /// Create ReportOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Self {
        Self {
            limit: args.limit,
            default_limit: config.display.default_limit,
            show_unknowns: args.show_unknowns || config.display.show_unknowns,
            export_dir: args
                .export
                .clone()
                .or_else(|| config.export.directory.clone()),
            chart_dir: args
                .chart_dir
                .clone()
                .or_else(|| config.export.directory.clone()),
            chart_format: args.chart_format.unwrap_or_else(|| config.chart_format()),
        }
    }
}

impl From<&Args> for ReportOptions {
    fn from(args: &Args) -> Self {
        // Use default config if creating from args alone
        let config = AppConfig::default();
        Self::from_args_and_config(args, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_overrides_config_file_loading() {
        let mut config = AppConfig::default();
        config.file_loading.delimiter = Some(';');
        config.file_loading.has_header = Some(true);

        let args = Args::parse_from(["contactlens", "data.csv", "--no-header"]);
        let opts = LoadOptions::from_args_and_config(&args, &config).unwrap();
        assert_eq!(opts.delimiter, Some(b';'));
        assert_eq!(opts.has_header, Some(false));

        let args = Args::parse_from(["contactlens", "data.csv", "--delimiter", "|"]);
        let opts = LoadOptions::from_args_and_config(&args, &config).unwrap();
        assert_eq!(opts.delimiter, Some(b'|'));
        assert_eq!(opts.has_header, Some(true));
    }

    #[test]
    fn non_ascii_delimiter_is_an_error() {
        let args = Args::parse_from(["contactlens", "data.csv", "--delimiter", "§"]);
        assert!(LoadOptions::from_args_and_config(&args, &AppConfig::default()).is_err());
    }

    #[test]
    fn report_options_fall_back_to_config() {
        let mut config = AppConfig::default();
        config.display.show_unknowns = true;
        config.export.chart_format = "eps".to_string();
        config.export.directory = Some(PathBuf::from("/tmp/out"));

        let args = Args::parse_from(["contactlens", "data.csv"]);
        let opts = ReportOptions::from_args_and_config(&args, &config);
        assert!(opts.show_unknowns);
        assert_eq!(opts.chart_format, ChartFormat::Eps);
        assert_eq!(opts.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(opts.chart_dir, Some(PathBuf::from("/tmp/out")));

        let args = Args::parse_from(["contactlens", "data.csv", "--chart-dir", "/tmp/charts"]);
        let opts = ReportOptions::from_args_and_config(&args, &config);
        assert_eq!(opts.chart_dir, Some(PathBuf::from("/tmp/charts")));
        assert_eq!(opts.export_dir, Some(PathBuf::from("/tmp/out")));

        let args = Args::parse_from(["contactlens", "data.csv", "--chart-format", "png"]);
        let opts: ReportOptions = (&args).into();
        assert_eq!(opts.chart_format, ChartFormat::Png);
        assert!(!opts.show_unknowns);
    }
}
