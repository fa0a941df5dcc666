//! CSV loader for route datasets.
//!
//! Reads the raw rows, repairs missing values, derives per-route metrics and
//! snapshots the dataset maxima that the efficiency score is normalized
//! against.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::enrich::{MetricMaxima, RouteMetrics, efficiency_score};
use crate::error::LoadError;
use crate::filter::DistanceRange;
use crate::types::{EnrichedRoute, NO_WEATHER_IMPACT, RawRoute, RouteType};
use crate::analyzers::utility::{nan_max, nan_min};

/// The loaded dataset: enriched records plus the maxima they were scored against.
///
/// Immutable once built; filtering and scoring only borrow from it.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<EnrichedRoute>,
    maxima: MetricMaxima,
}

impl RouteTable {
    pub fn records(&self) -> &[EnrichedRoute] {
        &self.records
    }

    pub fn maxima(&self) -> &MetricMaxima {
        &self.maxima
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest distance in the dataset, ignoring NaN.
    pub fn distance_bounds(&self) -> Option<DistanceRange> {
        let min = nan_min(self.records.iter().map(|r| r.distance_km));
        let max = nan_max(self.records.iter().map(|r| r.distance_km));
        if min.is_finite() && max.is_finite() {
            Some(DistanceRange { min, max })
        } else {
            None
        }
    }
}

/// Splits `"Origin-Destination"` on the first hyphen.
///
/// Both cities are trimmed and must be non-empty. `"Delhi-Hong Kong"`
/// yields `("Delhi", "Hong Kong")`; `"Delhi"` and `"-Goa"` yield `None`.
pub fn split_route(route: &str) -> Option<(String, String)> {
    let (origin, destination) = route.split_once('-')?;
    let (origin, destination) = (origin.trim(), destination.trim());
    if origin.is_empty() || destination.is_empty() {
        return None;
    }
    Some((origin.to_string(), destination.to_string()))
}

pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io(e),
    })
}

/// Loads and enriches the route CSV at `path`.
///
/// # Errors
///
/// [`LoadError::NotFound`] if the file is absent, [`LoadError::Malformed`]
/// if a row cannot be parsed.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<RouteTable, LoadError> {
    let bytes = read_source(path)?;
    let table = load_from_reader(bytes.as_slice())?;
    info!(records = table.len(), "Route data loaded");
    Ok(table)
}

/// Columns every input file must have. Empty cells are allowed, missing columns are not.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Order_ID",
    "Route",
    "Distance_KM",
    "Fuel_Consumption_L",
    "Toll_Charges_INR",
    "Traffic_Delay_Minutes",
];

/// Loads and enriches route CSV data from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RouteTable, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().map_err(LoadError::from_csv)?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|name| !headers.iter().any(|h| h == **name))
    {
        return Err(LoadError::Malformed {
            line: 1,
            message: format!("missing column {missing}"),
        });
    }

    let mut raw = Vec::new();

    for result in rdr.deserialize() {
        let record: RawRoute = result.map_err(LoadError::from_csv)?;
        raw.push(record);
    }

    Ok(enrich_rows(raw))
}

fn enrich_rows(raw: Vec<RawRoute>) -> RouteTable {
    let metrics: Vec<RouteMetrics> = raw
        .iter()
        .map(|r| {
            RouteMetrics::derive(
                r.distance_km.unwrap_or(f64::NAN),
                r.fuel_consumption_l.unwrap_or(f64::NAN),
                r.toll_charges_inr.unwrap_or(f64::NAN),
                r.traffic_delay_minutes.unwrap_or(f64::NAN),
            )
        })
        .collect();
    let maxima = MetricMaxima::from_metrics(&metrics);

    let mut malformed_routes = 0usize;
    let mut missing_weather = 0usize;

    let records = raw
        .into_iter()
        .zip(metrics)
        .map(|(r, metrics)| {
            let (origin, destination) = match split_route(&r.route) {
                Some((o, d)) => (Some(o), Some(d)),
                None => {
                    malformed_routes += 1;
                    warn!(
                        order_id = %r.order_id,
                        route = %r.route,
                        "Route does not name an origin and destination"
                    );
                    (None, None)
                }
            };

            let weather_impact = match r.weather_impact {
                Some(w) if !w.trim().is_empty() => w,
                _ => {
                    missing_weather += 1;
                    NO_WEATHER_IMPACT.to_string()
                }
            };

            let efficiency_score = r
                .efficiency_score
                .unwrap_or_else(|| efficiency_score(&metrics, &maxima));

            EnrichedRoute {
                route_type: RouteType::for_destination(destination.as_deref()),
                order_id: r.order_id,
                route: r.route,
                origin,
                destination,
                distance_km: r.distance_km.unwrap_or(f64::NAN),
                fuel_consumption_l: r.fuel_consumption_l.unwrap_or(f64::NAN),
                toll_charges_inr: r.toll_charges_inr.unwrap_or(f64::NAN),
                traffic_delay_minutes: r.traffic_delay_minutes.unwrap_or(f64::NAN),
                weather_impact,
                metrics,
                efficiency_score,
            }
        })
        .collect();

    debug!(malformed_routes, missing_weather, ?maxima, "Route rows enriched");

    RouteTable { records, maxima }
}
