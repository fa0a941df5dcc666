//! Output formatting and persistence for scored route views.
//!
//! Supports pretty-printing, JSON serialization, and CSV export with
//! optional gzip compression.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::scoring::ScoredRoute;

/// One exported row: base columns, derived metrics and view-relative scores.
///
/// Column names match the input file so an export can be loaded again.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Order_ID")]
    order_id: &'a str,
    #[serde(rename = "Route")]
    route: &'a str,
    #[serde(rename = "Distance_KM")]
    distance_km: f64,
    #[serde(rename = "Fuel_Consumption_L")]
    fuel_consumption_l: f64,
    #[serde(rename = "Toll_Charges_INR")]
    toll_charges_inr: f64,
    #[serde(rename = "Traffic_Delay_Minutes")]
    traffic_delay_minutes: f64,
    #[serde(rename = "Weather_Impact")]
    weather_impact: &'a str,
    #[serde(rename = "Fuel_Cost_INR")]
    fuel_cost: f64,
    #[serde(rename = "Total_Cost_INR")]
    total_cost: f64,
    #[serde(rename = "CO2_Emissions_KG")]
    co2_emissions: f64,
    #[serde(rename = "Total_Time_Hours")]
    total_time_hours: f64,
    #[serde(rename = "Efficiency_Score")]
    efficiency_score: f64,
    #[serde(rename = "Origin")]
    origin: Option<&'a str>,
    #[serde(rename = "Destination")]
    destination: Option<&'a str>,
    #[serde(rename = "Route_Type")]
    route_type: &'static str,
    #[serde(rename = "Cost_Score")]
    cost_score: f64,
    #[serde(rename = "Time_Score")]
    time_score: f64,
    #[serde(rename = "Eco_Score")]
    eco_score: f64,
    #[serde(rename = "Balanced_Score")]
    balanced_score: f64,
}

impl<'a, 'r: 'a> From<&'a ScoredRoute<'r>> for ExportRow<'a> {
    fn from(row: &'a ScoredRoute<'r>) -> Self {
        let r = row.route;
        ExportRow {
            order_id: &r.order_id,
            route: &r.route,
            distance_km: r.distance_km,
            fuel_consumption_l: r.fuel_consumption_l,
            toll_charges_inr: r.toll_charges_inr,
            traffic_delay_minutes: r.traffic_delay_minutes,
            weather_impact: &r.weather_impact,
            fuel_cost: r.metrics.fuel_cost,
            total_cost: r.metrics.total_cost,
            co2_emissions: r.metrics.co2_emissions,
            total_time_hours: r.metrics.total_time_hours,
            efficiency_score: r.efficiency_score,
            origin: r.origin.as_deref(),
            destination: r.destination.as_deref(),
            route_type: r.route_type.as_str(),
            cost_score: row.scores.cost_score,
            time_score: row.scores.time_score,
            eco_score: row.scores.eco_score,
            balanced_score: row.scores.balanced_score,
        }
    }
}

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs any value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes any value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `rows` as CSV with a header row to any writer.
pub fn write_rows<'a, 'r: 'a, W, I>(writer: W, rows: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ScoredRoute<'r>>,
{
    let mut writer = csv::Writer::from_writer(writer);
    let mut count = 0;

    for row in rows {
        writer.serialize(ExportRow::from(row))?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

/// Exports rows to `path`, replacing any existing file.
///
/// With `gzip`, the output is compressed and `.gz` is appended to the file
/// name. Returns the path actually written.
pub fn export_view<'a, 'r: 'a, I>(path: &Path, rows: I, gzip: bool) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a ScoredRoute<'r>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let target = if gzip {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        PathBuf::from(name)
    } else {
        path.to_path_buf()
    };

    let file = File::create(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;

    let count = if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        let count = write_rows(&mut encoder, rows)?;
        encoder.finish()?;
        count
    } else {
        write_rows(file, rows)?
    };

    info!(path = %target.display(), rows = count, gzip, "Exported routes");
    Ok(target)
}
