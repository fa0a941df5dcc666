//! Summary metrics over a scored view: totals, averages, delay and weather
//! exposure, category breakdowns and side-by-side route comparison.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::analyzers::ranking::{Direction, Metric, Recommendation, top_n};
use crate::analyzers::scoring::{ScoredRoute, ScoredView};
use crate::analyzers::utility::{mean, nan_sum};
use crate::types::NO_WEATHER_IMPACT;

/// Delay in minutes above which a route counts as traffic-affected.
pub const DELAY_THRESHOLD_MINUTES: f64 = 30.0;

/// Length of the origin, destination and emitter leaderboards.
pub const LEADERBOARD_SIZE: usize = 10;

/// Most routes that can be compared side by side.
pub const MAX_COMPARED_ROUTES: usize = 5;

#[derive(Debug, Serialize)]
pub struct KeyMetrics {
    pub total_distance_km: f64,
    pub total_cost_inr: f64,
    pub total_co2_kg: f64,
    pub total_time_hours: f64,
    pub avg_efficiency: f64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CostSplit {
    pub fuel_cost_inr: f64,
    pub toll_charges_inr: f64,
}

#[derive(Debug, Serialize)]
pub struct Emitter {
    pub order_id: String,
    pub route: String,
    pub co2_emissions_kg: f64,
}

#[derive(Debug, Serialize)]
pub struct Breakdown {
    pub by_route_type: Vec<CategoryCount>,
    pub by_weather: Vec<CategoryCount>,
    pub top_origins: Vec<CategoryCount>,
    pub top_destinations: Vec<CategoryCount>,
    pub cost_split: CostSplit,
    pub top_emitters: Vec<Emitter>,
}

#[derive(Debug, Serialize)]
pub struct RouteInsights {
    pub generated_at: DateTime<Utc>,
    pub route_count: usize,
    pub key_metrics: KeyMetrics,
    pub avg_cost_inr: f64,
    pub avg_time_hours: f64,
    pub avg_co2_kg: f64,
    /// Average cost minus the cost of the top recommendation.
    pub best_route_savings_inr: Option<f64>,
    pub delayed_routes: usize,
    pub weather_affected_pct: f64,
    pub breakdown: Breakdown,
}

fn column(view: &ScoredView<'_>, f: impl Fn(&ScoredRoute<'_>) -> f64) -> Vec<f64> {
    view.iter().map(f).collect()
}

/// Counts by value, most frequent first; equal counts keep first-appearance order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for v in values {
        let count = counts.entry(v).or_insert_with(|| {
            order.push(v);
            0
        });
        *count += 1;
    }

    let mut result: Vec<CategoryCount> = order
        .into_iter()
        .map(|name| CategoryCount {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Pct of routes whose share is `part` of `total`, 0 for an empty view.
fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Summarizes a non-empty view. Returns `None` for an empty one.
pub fn summarize(
    view: &ScoredView<'_>,
    recommendation: Option<&Recommendation<'_>>,
) -> Option<RouteInsights> {
    if view.is_empty() {
        return None;
    }

    let costs = column(view, |r| r.route.metrics.total_cost);
    let times = column(view, |r| r.route.metrics.total_time_hours);
    let emissions = column(view, |r| r.route.metrics.co2_emissions);
    let efficiency = column(view, |r| r.route.efficiency_score);

    let avg_cost_inr = mean(&costs);

    let key_metrics = KeyMetrics {
        total_distance_km: nan_sum(view.iter().map(|r| r.route.distance_km)),
        total_cost_inr: nan_sum(costs.iter().copied()),
        total_co2_kg: nan_sum(emissions.iter().copied()),
        total_time_hours: nan_sum(times.iter().copied()),
        avg_efficiency: mean(&efficiency),
    };

    let best_route_savings_inr = recommendation
        .and_then(|rec| rec.best())
        .map(|best| avg_cost_inr - best.route.metrics.total_cost);

    let delayed_routes = view
        .iter()
        .filter(|r| r.route.traffic_delay_minutes > DELAY_THRESHOLD_MINUTES)
        .count();
    let weather_affected = view
        .iter()
        .filter(|r| r.route.weather_impact != NO_WEATHER_IMPACT)
        .count();

    let mut top_origins = value_counts(view.iter().filter_map(|r| r.route.origin.as_deref()));
    top_origins.truncate(LEADERBOARD_SIZE);
    let mut top_destinations =
        value_counts(view.iter().filter_map(|r| r.route.destination.as_deref()));
    top_destinations.truncate(LEADERBOARD_SIZE);

    let emitters = top_n(view, Metric::Co2Emissions, Direction::LargestFirst, LEADERBOARD_SIZE);
    let top_emitters = emitters
        .into_iter()
        .map(|r| Emitter {
            order_id: r.route.order_id.clone(),
            route: r.route.route.clone(),
            co2_emissions_kg: r.route.metrics.co2_emissions,
        })
        .collect();

    let breakdown = Breakdown {
        by_route_type: value_counts(view.iter().map(|r| r.route.route_type.as_str())),
        by_weather: value_counts(view.iter().map(|r| r.route.weather_impact.as_str())),
        top_origins,
        top_destinations,
        cost_split: CostSplit {
            fuel_cost_inr: nan_sum(view.iter().map(|r| r.route.metrics.fuel_cost)),
            toll_charges_inr: nan_sum(view.iter().map(|r| r.route.toll_charges_inr)),
        },
        top_emitters,
    };

    Some(RouteInsights {
        generated_at: Utc::now(),
        route_count: view.len(),
        key_metrics,
        avg_cost_inr,
        avg_time_hours: mean(&times),
        avg_co2_kg: mean(&emissions),
        best_route_savings_inr,
        delayed_routes,
        weather_affected_pct: pct(weather_affected, view.len()),
        breakdown,
    })
}

/// Scope-relative scores of one route string, for side-by-side comparison.
#[derive(Debug, Serialize)]
pub struct RouteComparison {
    pub route: String,
    pub order_id: String,
    pub cost_score: f64,
    pub time_score: f64,
    pub eco_score: f64,
    pub distance_km: f64,
    pub total_cost_inr: f64,
    pub total_time_hours: f64,
    pub co2_emissions_kg: f64,
    pub traffic_delay_minutes: f64,
    pub weather_impact: String,
    pub efficiency_score: f64,
}

/// Compares up to [`MAX_COMPARED_ROUTES`] route strings using the first
/// matching record of each. Routes absent from the view are skipped.
pub fn compare_routes(view: &ScoredView<'_>, routes: &[String]) -> Vec<RouteComparison> {
    if routes.len() > MAX_COMPARED_ROUTES {
        warn!(
            requested = routes.len(),
            max = MAX_COMPARED_ROUTES,
            "Too many routes to compare, extra routes ignored"
        );
    }

    routes
        .iter()
        .take(MAX_COMPARED_ROUTES)
        .filter_map(|name| view.iter().find(|r| &r.route.route == name))
        .map(|r| RouteComparison {
            route: r.route.route.clone(),
            order_id: r.route.order_id.clone(),
            cost_score: r.scores.cost_score,
            time_score: r.scores.time_score,
            eco_score: r.scores.eco_score,
            distance_km: r.route.distance_km,
            total_cost_inr: r.route.metrics.total_cost,
            total_time_hours: r.route.metrics.total_time_hours,
            co2_emissions_kg: r.route.metrics.co2_emissions,
            traffic_delay_minutes: r.route.traffic_delay_minutes,
            weather_impact: r.route.weather_impact.clone(),
            efficiency_score: r.route.efficiency_score,
        })
        .collect()
}
