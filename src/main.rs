use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use contactlens::chart_export::write_chart;
use contactlens::{
    catalog, AppConfig, Args, ChartRequest, ConfigManager, Dataset, LoadOptions, Report,
    ReportLayoutStore, ReportOptions, Session, APP_NAME,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Split a `COLUMN=VALUE` selection. The value may itself contain `=`.
fn parse_selection(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .map(|(column, value)| (column.trim(), value.trim()))
        .filter(|(column, value)| !column.is_empty() && !value.is_empty())
        .ok_or_else(|| eyre!("Invalid selection '{}': expected COLUMN=VALUE", pair))
}

/// Logical column for a user-supplied name, if the dataset can be filtered on it.
fn filter_column(session: &Session, name: &str) -> Result<String> {
    let available = session.dataset().available_columns();
    let column = catalog::normalize_column(name);
    if available.iter().any(|c| c == column) {
        Ok(column.to_string())
    } else {
        Err(eyre!(
            "Cannot filter on '{}' for {} datasets. Available columns: {}",
            name,
            session.dataset().kind().label(),
            available.join(", ")
        ))
    }
}

fn apply_filters(session: &mut Session, args: &Args) -> Result<()> {
    for name in &args.filters {
        let column = filter_column(session, name)?;
        if !session.is_column_active(&column) {
            session.toggle_column(&column);
        }
    }
    for pair in &args.selections {
        let (name, value) = parse_selection(pair)?;
        let column = filter_column(session, name)?;
        if !session.known_values(&column).iter().any(|v| v == value) {
            warn!(column = %column, value, "selected value does not occur in the dataset");
        }
        session.toggle_value(&column, value);
    }
    for name in &args.none {
        let column = filter_column(session, name)?;
        session.select_none(&column);
    }
    Ok(())
}

fn resolve_charts(
    session: &Session,
    args: &Args,
    opts: &ReportOptions,
    layouts: &ReportLayoutStore,
) -> Result<Vec<ChartRequest>> {
    let dataset = session.dataset();
    let names: Vec<String> = if !args.charts.is_empty() {
        args.charts.clone()
    } else if let Some(name) = &args.layout {
        layouts
            .layout_by_name(name)
            .map(|layout| layout.charts.clone())
            .ok_or_else(|| eyre!("No report layout named '{}'", name))?
    } else {
        return Ok(ChartRequest::defaults_for(dataset, opts.default_limit)
            .into_iter()
            .map(|chart| match opts.limit {
                Some(limit) => chart.with_limit(limit),
                None => chart,
            })
            .collect());
    };

    names
        .iter()
        .map(|name| {
            let chart = ChartRequest::resolve(dataset, name, opts.default_limit)
                .ok_or_else(|| eyre!("Unknown chart or column '{}'", name))?;
            Ok(match opts.limit {
                Some(limit) => chart.with_limit(limit),
                None => chart,
            })
        })
        .collect()
}

fn init_logging(args: &Args, config: &AppConfig) {
    let level = if args.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let path = args
        .path
        .as_ref()
        .ok_or_else(|| eyre!("A dataset path is required"))?;
    if !path.exists() {
        return Err(eyre!("File not found: {}", path.display()));
    }

    let load_opts = LoadOptions::from_args_and_config(args, config)?;
    let report_opts = ReportOptions::from_args_and_config(args, config);
    debug!(?load_opts, ?report_opts, "resolved options");

    let dataset = Dataset::load(path, &load_opts)?;
    let mut session = Session::new(dataset);
    session.set_show_unknowns(report_opts.show_unknowns);
    apply_filters(&mut session, args)?;

    let config_manager = ConfigManager::new(APP_NAME)?;
    let mut layouts = ReportLayoutStore::new(&config_manager)?;
    let charts = resolve_charts(&session, args, &report_opts, &layouts)?;

    if let Some(name) = &args.save_layout {
        let ids = charts.iter().map(|c| c.id.clone()).collect();
        layouts.create_layout(name.clone(), ids)?;
        eprintln!("Saved report layout '{}'", name);
    }

    let report = Report::build(&mut session, &charts);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(dir) = &report_opts.export_dir {
        let written = session.export_csv(dir)?;
        eprintln!("Exported {} records to {}", report.filtered_records, written.display());
    }

    if let Some(dir) = &report_opts.chart_dir {
        for chart in &report.charts {
            if chart.buckets.is_empty() {
                warn!(chart = %chart.id, "no data to chart, skipping image");
                continue;
            }
            let title = format!("{} - {}", report.kind.label(), chart.title);
            let written = write_chart(
                dir,
                &chart.id,
                report_opts.chart_format,
                &chart.buckets,
                &title,
            )?;
            eprintln!("Wrote {}", written.display());
        }
    }

    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let config = ConfigManager::new(APP_NAME)?;
        match config.write_default_config(args.force) {
            Ok(path) => {
                println!("Configuration written to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error writing configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.remove_layouts {
        match ConfigManager::new(APP_NAME) {
            Ok(config) => match ReportLayoutStore::new(&config) {
                Ok(mut layouts) => {
                    if let Err(e) = layouts.remove_all_layouts() {
                        eprintln!("Error removing report layouts: {}", e);
                        std::process::exit(1);
                    }
                    println!("All report layouts removed successfully");
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error initializing report layouts: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let config = AppConfig::load(APP_NAME)?;
    init_logging(&args, &config);

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
