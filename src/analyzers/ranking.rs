//! Top-N selection and sorting over a scored view.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::analyzers::scoring::{ScoredRoute, ScoredView};
use crate::error::UnknownVariant;

/// Number of routes returned as optimization recommendations.
pub const RECOMMENDATION_COUNT: usize = 5;

/// A rankable column of a scored route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    TotalCost,
    TotalTimeHours,
    Co2Emissions,
    BalancedScore,
    EfficiencyScore,
    DistanceKm,
}

/// `(metric, cli name, export column)`
static METRIC_NAMES: &[(Metric, &str, &str)] = &[
    (Metric::TotalCost, "total-cost", "Total_Cost_INR"),
    (Metric::TotalTimeHours, "total-time", "Total_Time_Hours"),
    (Metric::Co2Emissions, "co2-emissions", "CO2_Emissions_KG"),
    (Metric::BalancedScore, "balanced-score", "Balanced_Score"),
    (Metric::EfficiencyScore, "efficiency-score", "Efficiency_Score"),
    (Metric::DistanceKm, "distance", "Distance_KM"),
];

impl Metric {
    pub fn value(&self, row: &ScoredRoute<'_>) -> f64 {
        let r = row.route;
        match self {
            Metric::TotalCost => r.metrics.total_cost,
            Metric::TotalTimeHours => r.metrics.total_time_hours,
            Metric::Co2Emissions => r.metrics.co2_emissions,
            Metric::BalancedScore => row.scores.balanced_score,
            Metric::EfficiencyScore => r.efficiency_score,
            Metric::DistanceKm => r.distance_km,
        }
    }

    fn names(&self) -> (&'static str, &'static str) {
        METRIC_NAMES
            .iter()
            .find(|(m, _, _)| m == self)
            .map(|(_, name, column)| (*name, *column))
            .unwrap_or(("", ""))
    }

    /// Column header used for this metric in exported CSVs.
    pub fn column(&self) -> &'static str {
        self.names().1
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.names().0)
    }
}

impl FromStr for Metric {
    type Err = UnknownVariant;

    /// Accepts the CLI name (`total-cost`) or the export column (`Total_Cost_INR`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METRIC_NAMES
            .iter()
            .find(|(_, name, column)| {
                s.eq_ignore_ascii_case(name) || s.eq_ignore_ascii_case(column)
            })
            .map(|(m, _, _)| *m)
            .ok_or_else(|| UnknownVariant {
                kind: "metric",
                value: s.to_string(),
                expected: "total-cost, total-time, co2-emissions, balanced-score, efficiency-score, distance",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    SmallestFirst,
    LargestFirst,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SmallestFirst => f.write_str("smallest-first"),
            Direction::LargestFirst => f.write_str("largest-first"),
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "smallest-first" => Ok(Direction::SmallestFirst),
            "desc" | "descending" | "largest-first" => Ok(Direction::LargestFirst),
            _ => Err(UnknownVariant {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

/// What the user wants to optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    Balanced,
    Cost,
    Time,
    Environmental,
}

static PRIORITY_TARGETS: &[(Priority, Metric, Direction)] = &[
    (Priority::Cost, Metric::TotalCost, Direction::SmallestFirst),
    (Priority::Time, Metric::TotalTimeHours, Direction::SmallestFirst),
    (Priority::Environmental, Metric::Co2Emissions, Direction::SmallestFirst),
    (Priority::Balanced, Metric::BalancedScore, Direction::LargestFirst),
];

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Balanced,
        Priority::Cost,
        Priority::Time,
        Priority::Environmental,
    ];

    /// The metric and direction a priority ranks by.
    pub fn target(&self) -> (Metric, Direction) {
        PRIORITY_TARGETS
            .iter()
            .find(|(p, _, _)| p == self)
            .map(|(_, m, d)| (*m, *d))
            .unwrap_or((Metric::BalancedScore, Direction::LargestFirst))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Balanced => "Balanced",
            Priority::Cost => "Cost",
            Priority::Time => "Time",
            Priority::Environmental => "Environmental",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
                expected: "balanced, cost, time, environmental",
            })
    }
}

/// Orders two metric values, putting NaN last regardless of direction.
fn compare(a: f64, b: f64, direction: Direction) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                Direction::SmallestFirst => ord,
                Direction::LargestFirst => ord.reverse(),
            }
        }
    }
}

/// Stable sort of the whole view. Ties keep view order; NaN values go last.
pub fn sort_view<'a>(
    view: &ScoredView<'a>,
    metric: Metric,
    direction: Direction,
) -> Vec<ScoredRoute<'a>> {
    let mut rows = view.rows().to_vec();
    rows.sort_by(|a, b| compare(metric.value(a), metric.value(b), direction));
    rows
}

/// Returns up to `n` rows ordered by `metric`.
///
/// Rows whose metric is NaN are left out rather than ranked.
pub fn top_n<'a>(
    view: &ScoredView<'a>,
    metric: Metric,
    direction: Direction,
    n: usize,
) -> Vec<ScoredRoute<'a>> {
    let mut rows: Vec<_> = view
        .iter()
        .copied()
        .filter(|row| !metric.value(row).is_nan())
        .collect();

    let excluded = view.len() - rows.len();
    if excluded > 0 {
        debug!(%metric, excluded, "Skipping routes with undefined metric");
    }

    rows.sort_by(|a, b| compare(metric.value(a), metric.value(b), direction));
    rows.truncate(n);
    rows
}

/// Best routes for a priority, plus how many rows could not be ranked.
#[derive(Debug, Clone)]
pub struct Recommendation<'a> {
    pub priority: Priority,
    pub metric: Metric,
    pub direction: Direction,
    pub routes: Vec<ScoredRoute<'a>>,
    pub unranked: usize,
}

impl<'a> Recommendation<'a> {
    pub fn best(&self) -> Option<&ScoredRoute<'a>> {
        self.routes.first()
    }
}

/// Picks the top [`RECOMMENDATION_COUNT`] routes for `priority`.
pub fn recommend<'a>(view: &ScoredView<'a>, priority: Priority) -> Recommendation<'a> {
    let (metric, direction) = priority.target();
    let routes = top_n(view, metric, direction, RECOMMENDATION_COUNT);
    let unranked = view
        .iter()
        .filter(|row| metric.value(row).is_nan())
        .count();

    Recommendation {
        priority,
        metric,
        direction,
        routes,
        unranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::scoring::score_view;
    use crate::loader::tests::route;
    use crate::types::EnrichedRoute;

    fn sample() -> Vec<EnrichedRoute> {
        vec![
            route("1", "Delhi-Mumbai", 1400.0, 180.0, 500.0, 45.0),
            route("2", "Delhi-Dubai", 2200.0, 300.0, 0.0, 10.0),
            route("3", "Pune-Goa", 450.0, 60.0, 250.0, 90.0),
            route("4", "Chennai-Bangalore", 350.0, 40.0, 300.0, 20.0),
            route("5", "Kolkata-Bangkok", 1600.0, 210.0, 0.0, 5.0),
            route("6", "Pune-Goa", 450.0, 60.0, 250.0, 90.0),
            route("7", "Jaipur-Agra", 240.0, 30.0, 150.0, 35.0),
        ]
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(
            Priority::Cost.target(),
            (Metric::TotalCost, Direction::SmallestFirst)
        );
        assert_eq!(
            Priority::Time.target(),
            (Metric::TotalTimeHours, Direction::SmallestFirst)
        );
        assert_eq!(
            Priority::Environmental.target(),
            (Metric::Co2Emissions, Direction::SmallestFirst)
        );
        assert_eq!(
            Priority::Balanced.target(),
            (Metric::BalancedScore, Direction::LargestFirst)
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("environmental".parse::<Priority>().unwrap(), Priority::Environmental);
        assert_eq!("Total_Cost_INR".parse::<Metric>().unwrap(), Metric::TotalCost);
        assert_eq!("distance".parse::<Metric>().unwrap(), Metric::DistanceKm);
        assert_eq!("desc".parse::<Direction>().unwrap(), Direction::LargestFirst);
        assert!("speed".parse::<Metric>().is_err());
        assert!("fastest".parse::<Priority>().is_err());
    }

    #[test]
    fn test_top_by_cost_is_non_decreasing() {
        let routes = sample();
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        let top = top_n(&view, Metric::TotalCost, Direction::SmallestFirst, 5);

        assert_eq!(top.len(), 5);
        assert!(top
            .windows(2)
            .all(|w| w[0].route.metrics.total_cost <= w[1].route.metrics.total_cost));
        assert_eq!(top[0].route.order_id, "7");
    }

    #[test]
    fn test_top_size_is_bounded_by_view() {
        let routes = sample();
        let refs: Vec<_> = routes.iter().take(3).collect();
        let view = score_view(&refs);

        let rec = recommend(&view, Priority::Time);
        assert_eq!(rec.routes.len(), 3);
        assert_eq!(rec.unranked, 0);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let routes = sample();
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        let top = top_n(&view, Metric::TotalCost, Direction::SmallestFirst, 7);
        let ids: Vec<_> = top.iter().map(|r| r.route.order_id.as_str()).collect();
        let pos3 = ids.iter().position(|id| *id == "3").unwrap();
        let pos6 = ids.iter().position(|id| *id == "6").unwrap();
        assert_eq!(pos6, pos3 + 1);
    }

    #[test]
    fn test_balanced_is_largest_first() {
        let routes = sample();
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        let rec = recommend(&view, Priority::Balanced);
        assert_eq!(rec.routes.len(), RECOMMENDATION_COUNT);
        assert!(rec
            .routes
            .windows(2)
            .all(|w| w[0].scores.balanced_score >= w[1].scores.balanced_score));
        assert_eq!(rec.best().unwrap().route.order_id, "7");
    }

    #[test]
    fn test_nan_rows_are_not_ranked() {
        let mut routes = sample();
        routes[6] = route("7", "Jaipur-Agra", 240.0, f64::NAN, 150.0, 35.0);
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        let rec = recommend(&view, Priority::Cost);
        assert_eq!(rec.unranked, 1);
        assert!(rec.routes.iter().all(|r| r.route.order_id != "7"));
        assert_eq!(rec.best().unwrap().route.order_id, "4");
    }

    #[test]
    fn test_sort_view_keeps_view_order_for_ties() {
        let routes = sample();
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        for direction in [Direction::SmallestFirst, Direction::LargestFirst] {
            let sorted = sort_view(&view, Metric::DistanceKm, direction);
            let ids: Vec<_> = sorted.iter().map(|r| r.route.order_id.as_str()).collect();
            let pos3 = ids.iter().position(|id| *id == "3").unwrap();
            let pos6 = ids.iter().position(|id| *id == "6").unwrap();
            assert_eq!(pos6, pos3 + 1, "{direction}: {ids:?}");
        }
    }

    #[test]
    fn test_sort_view_puts_nan_last() {
        let mut routes = sample();
        routes[0] = route("1", "Delhi-Mumbai", f64::NAN, 180.0, 500.0, 45.0);
        let refs: Vec<_> = routes.iter().collect();
        let view = score_view(&refs);

        for direction in [Direction::SmallestFirst, Direction::LargestFirst] {
            let sorted = sort_view(&view, Metric::DistanceKm, direction);
            assert_eq!(sorted.len(), view.len());
            assert_eq!(sorted.last().unwrap().route.order_id, "1");
        }

        let desc = sort_view(&view, Metric::DistanceKm, Direction::LargestFirst);
        assert_eq!(desc[0].route.order_id, "2");
    }
}
