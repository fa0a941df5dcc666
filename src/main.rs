//! CLI entry point for the route planner.
//!
//! Provides subcommands for ranking routes by an optimization priority,
//! listing filter options, summarizing and comparing filtered routes,
//! exporting them to CSV, and rendering text reports.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use route_planner::analyzers::insights::{compare_routes, summarize};
use route_planner::analyzers::ranking::{Direction, Metric, Priority, recommend, sort_view};
use route_planner::analyzers::scoring::{ScoredView, score_view};
use route_planner::cache::TableCache;
use route_planner::config::Config;
use route_planner::filter::{DistanceRange, FilterOptions, RouteFilter, Selection};
use route_planner::loader::RouteTable;
use route_planner::output::{export_view, print_json, print_pretty, write_json, write_rows};
use route_planner::report::{PageLayout, write_report};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(name = "route_planner")]
#[command(about = "Rank logistics routes by cost, time and emissions", long_about = None)]
struct Cli {
    /// Route dataset CSV [default: $ROUTES_DATA_PATH or routes_data.csv]
    #[arg(short, long, global = true, value_name = "CSV")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Predicates shared by every command that works on a filtered view.
#[derive(Args, Debug)]
struct FilterArgs {
    /// Domestic, International or All
    #[arg(long, default_value = "All")]
    route_type: Selection,

    /// Origin city or All
    #[arg(long, default_value = "All")]
    origin: Selection,

    /// Destination city or All
    #[arg(long, default_value = "All")]
    destination: Selection,

    /// Weather impact category or All
    #[arg(long, default_value = "All")]
    weather: Selection,

    /// Lower distance bound in km, inclusive
    #[arg(long)]
    min_distance: Option<f64>,

    /// Upper distance bound in km, inclusive
    #[arg(long)]
    max_distance: Option<f64>,
}

impl FilterArgs {
    /// An open end of the distance range falls back to the dataset bound.
    fn to_filter(&self, bounds: Option<DistanceRange>) -> RouteFilter {
        let distance = match (self.min_distance, self.max_distance) {
            (None, None) => None,
            (min, max) => {
                let full = bounds.unwrap_or(DistanceRange {
                    min: f64::NEG_INFINITY,
                    max: f64::INFINITY,
                });
                Some(DistanceRange {
                    min: min.unwrap_or(full.min),
                    max: max.unwrap_or(full.max),
                })
            }
        };

        RouteFilter {
            route_type: self.route_type.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            weather: self.weather.clone(),
            distance,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the top 5 routes for an optimization priority
    Recommend {
        /// balanced, cost, time or environmental
        #[arg(short, long, default_value = "balanced")]
        priority: Priority,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered routes to stdout as CSV, sorted by a metric
    Table {
        /// efficiency-score, total-cost, total-time, co2-emissions or distance
        #[arg(short, long, default_value = "efficiency-score")]
        sort_by: Metric,

        /// asc or desc
        #[arg(short, long, default_value = "desc")]
        order: Direction,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export the filtered routes with all derived and score columns
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "filtered_routes.csv")]
        output: PathBuf,

        /// Gzip compress the export (appends .gz)
        #[arg(long, default_value_t = false)]
        gzip: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print key metrics and breakdowns of the filtered routes as JSON
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Compare up to 5 routes side by side
    Compare {
        /// Route to compare, e.g. "Delhi-Mumbai" (repeatable)
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List the values each filter accepts
    Options,
    /// Render a text file as a paginated fixed-width report
    Report {
        /// Text file to render
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file [default: <FILE>.report.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page header [default: file name]
        #[arg(short, long)]
        title: Option<String>,

        /// Characters per line
        #[arg(short, long)]
        width: Option<usize>,

        /// Body lines per page
        #[arg(long)]
        lines_per_page: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env()?;
    let _file_guard = init_tracing(&config.log_file_path)?;

    let data_path = cli.data.clone().unwrap_or_else(|| config.data_path.clone());
    let mut cache = TableCache::new();

    match cli.command {
        Commands::Recommend { priority, filters } => {
            let table = load_table(&mut cache, &data_path)?;
            let Some(view) = filtered_view(&table, &filters) else {
                return Ok(());
            };

            let rec = recommend(&view, priority);
            info!(
                priority = %rec.priority,
                metric = %rec.metric,
                direction = %rec.direction,
                unranked = rec.unranked,
                "Top routes"
            );

            for (rank, row) in rec.routes.iter().enumerate() {
                let r = row.route;
                info!(
                    rank = rank + 1,
                    order_id = %r.order_id,
                    route = %r.route,
                    value = rec.metric.value(row),
                    distance_km = r.distance_km,
                    total_cost_inr = r.metrics.total_cost,
                    total_time_hours = r.metrics.total_time_hours,
                    co2_emissions_kg = r.metrics.co2_emissions,
                    weather = %r.weather_impact,
                    efficiency_score = r.efficiency_score,
                    "Recommended route"
                );
            }

            if let Some(insights) = summarize(&view, Some(&rec)) {
                print_json(&insights)?;
            }
        }
        Commands::Table {
            sort_by,
            order,
            filters,
        } => {
            let table = load_table(&mut cache, &data_path)?;
            let Some(view) = filtered_view(&table, &filters) else {
                return Ok(());
            };

            let sorted = sort_view(&view, sort_by, order);
            write_rows(std::io::stdout().lock(), sorted.iter())?;
        }
        Commands::Export {
            output,
            gzip,
            filters,
        } => {
            let table = load_table(&mut cache, &data_path)?;
            let Some(view) = filtered_view(&table, &filters) else {
                return Ok(());
            };

            export_view(&output, view.iter(), gzip)?;
        }
        Commands::Summary { filters } => {
            let table = load_table(&mut cache, &data_path)?;
            let Some(view) = filtered_view(&table, &filters) else {
                return Ok(());
            };

            let rec = recommend(&view, Priority::Balanced);
            if let Some(insights) = summarize(&view, Some(&rec)) {
                write_json(std::io::stdout().lock(), &insights)?;
            }
        }
        Commands::Compare { routes, filters } => {
            let table = load_table(&mut cache, &data_path)?;
            let Some(view) = filtered_view(&table, &filters) else {
                return Ok(());
            };

            let compared = compare_routes(&view, &routes);
            if compared.is_empty() {
                warn!(?routes, "None of the selected routes are in the filtered view");
            }
            write_json(std::io::stdout().lock(), &compared)?;
        }
        Commands::Options => {
            let table = load_table(&mut cache, &data_path)?;
            write_json(std::io::stdout().lock(), &FilterOptions::from_table(&table))?;
        }
        Commands::Report {
            input,
            output,
            title,
            width,
            lines_per_page,
        } => {
            let output = output
                .unwrap_or_else(|| PathBuf::from(format!("{}.report.txt", input.display())));
            let layout = PageLayout::new(
                width.unwrap_or(config.report_layout.width),
                lines_per_page.unwrap_or(config.report_layout.lines_per_page),
            );

            info!(input = %input.display(), output = %output.display(), "Generating report");
            write_report(&input, &output, title.as_deref(), layout)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("route_planner.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Loads the dataset, reporting a missing or unreadable file before bailing out.
fn load_table(cache: &mut TableCache, path: &Path) -> Result<Arc<RouteTable>> {
    cache
        .load(path)
        .inspect_err(|e| error!(path = %path.display(), error = %e, "Error loading route data"))
        .with_context(|| format!("could not load route data from {}", path.display()))
}

/// Applies the filters and scores the result. `None` means nothing matched.
fn filtered_view<'a>(table: &'a RouteTable, filters: &FilterArgs) -> Option<ScoredView<'a>> {
    let filter = filters.to_filter(table.distance_bounds());
    print_pretty(&filter);

    let rows = filter.apply(table);
    info!(routes_found = rows.len(), total = table.len(), "Filters applied");

    if rows.is_empty() {
        warn!("No routes match your filter criteria. Please adjust the filters.");
        return None;
    }

    Some(score_view(&rows))
}
