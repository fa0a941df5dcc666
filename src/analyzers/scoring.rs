//! Scores relative to the current filtered view.
//!
//! Unlike the efficiency score, these are recomputed from the view's own
//! maxima every time the filter changes. Scoring borrows the enriched
//! records and returns a new [`ScoredView`]; the loaded table is never
//! touched.

use serde::Serialize;

use crate::analyzers::utility::normalized;
use crate::enrich::MetricMaxima;
use crate::types::EnrichedRoute;

/// 0–100 scores where 100 means "best in view". NaN when the view's
/// maximum for that metric is zero or undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub cost_score: f64,
    pub time_score: f64,
    pub eco_score: f64,
    pub balanced_score: f64,
}

impl Scores {
    fn against(route: &EnrichedRoute, maxima: &MetricMaxima) -> Self {
        let m = &route.metrics;
        let cost_score = inverse_score(m.total_cost, maxima.total_cost);
        let time_score = inverse_score(m.total_time_hours, maxima.total_time_hours);
        let eco_score = inverse_score(m.co2_emissions, maxima.co2_emissions);

        Scores {
            cost_score,
            time_score,
            eco_score,
            balanced_score: (cost_score + time_score + eco_score) / 3.0,
        }
    }
}

fn inverse_score(value: f64, max: f64) -> f64 {
    100.0 - 100.0 * normalized(value, max)
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredRoute<'a> {
    pub route: &'a EnrichedRoute,
    pub scores: Scores,
}

/// A filtered view paired with its scope-relative scores, in filter order.
#[derive(Debug, Clone)]
pub struct ScoredView<'a> {
    rows: Vec<ScoredRoute<'a>>,
    maxima: MetricMaxima,
}

impl<'a> ScoredView<'a> {
    pub fn rows(&self) -> &[ScoredRoute<'a>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredRoute<'a>> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// An empty view carries no scores; ranking must be skipped.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maxima of the view the scores were normalized against.
    pub fn maxima(&self) -> &MetricMaxima {
        &self.maxima
    }
}

/// Computes cost, time, eco and balanced scores over `rows`.
pub fn score_view<'a>(rows: &[&'a EnrichedRoute]) -> ScoredView<'a> {
    let maxima = MetricMaxima::from_metrics(rows.iter().map(|r| &r.metrics));

    let rows = rows
        .iter()
        .map(|&route| ScoredRoute {
            route,
            scores: Scores::against(route, &maxima),
        })
        .collect();

    ScoredView { rows, maxima }
}
