//! Per-route cost, time and emissions metrics.
//!
//! Everything here is a pure function of a route's base columns, except the
//! efficiency score, which is normalized against [`MetricMaxima`] taken over
//! the whole loaded dataset.

use serde::Serialize;

use crate::analyzers::utility::{nan_max, normalized};

/// Diesel price in INR per liter.
pub const FUEL_PRICE_PER_LITER: f64 = 102.0;

/// Kilograms of CO2 emitted per liter of fuel burned.
pub const CO2_PER_LITER: f64 = 2.68;

/// Assumed average speed in km/h; also converts delay minutes to hours.
pub const KM_PER_HOUR: f64 = 60.0;

/// Efficiency score weights. They sum to 100.
pub const COST_WEIGHT: f64 = 30.0;
pub const TIME_WEIGHT: f64 = 30.0;
pub const CO2_WEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub fuel_cost: f64,
    pub total_cost: f64,
    pub co2_emissions: f64,
    pub total_time_hours: f64,
}

impl RouteMetrics {
    pub fn derive(
        distance_km: f64,
        fuel_consumption_l: f64,
        toll_charges_inr: f64,
        traffic_delay_minutes: f64,
    ) -> Self {
        let fuel_cost = fuel_consumption_l * FUEL_PRICE_PER_LITER;
        RouteMetrics {
            fuel_cost,
            total_cost: fuel_cost + toll_charges_inr,
            co2_emissions: fuel_consumption_l * CO2_PER_LITER,
            total_time_hours: distance_km / KM_PER_HOUR + traffic_delay_minutes / KM_PER_HOUR,
        }
    }
}

/// Column maxima used to normalize cost, time and emissions.
///
/// NaN values are skipped. A set with no comparable values yields
/// `f64::NEG_INFINITY`, which normalizes to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricMaxima {
    pub total_cost: f64,
    pub total_time_hours: f64,
    pub co2_emissions: f64,
}

impl MetricMaxima {
    pub fn from_metrics<'a, I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = &'a RouteMetrics>,
        I::IntoIter: Clone,
    {
        let iter = metrics.into_iter();
        MetricMaxima {
            total_cost: nan_max(iter.clone().map(|m| m.total_cost)),
            total_time_hours: nan_max(iter.clone().map(|m| m.total_time_hours)),
            co2_emissions: nan_max(iter.map(|m| m.co2_emissions)),
        }
    }
}

/// Dataset-relative efficiency on a 0–100 scale (higher is better).
///
/// Returns NaN when any of the dataset maxima is zero or undefined.
pub fn efficiency_score(metrics: &RouteMetrics, maxima: &MetricMaxima) -> f64 {
    let penalty = COST_WEIGHT * normalized(metrics.total_cost, maxima.total_cost)
        + TIME_WEIGHT * normalized(metrics.total_time_hours, maxima.total_time_hours)
        + CO2_WEIGHT * normalized(metrics.co2_emissions, maxima.co2_emissions);
    100.0 - penalty
}
