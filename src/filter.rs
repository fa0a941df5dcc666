//! Route filtering.
//!
//! A [`RouteFilter`] is a conjunction of predicates. Categorical predicates
//! are inactive when set to `All`; the distance range is inactive when it
//! spans the whole dataset. Filtering never reorders records.

use serde::Serialize;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::loader::RouteTable;
use crate::types::EnrichedRoute;

/// Sentinel that disables a categorical predicate.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn is_active(&self) -> bool {
        matches!(self, Selection::Only(_))
    }

    /// A missing value never satisfies an active selection.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selection::from(s))
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        if s == ALL {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// Inclusive distance interval in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    /// NaN distances are never contained.
    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km >= self.min && distance_km <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteFilter {
    pub route_type: Selection,
    pub origin: Selection,
    pub destination: Selection,
    pub weather: Selection,
    pub distance: Option<DistanceRange>,
}

impl RouteFilter {
    /// Filters the whole table, treating its distance bounds as the full range.
    pub fn apply<'a>(&self, table: &'a RouteTable) -> Vec<&'a EnrichedRoute> {
        let rows: Vec<_> = table.records().iter().collect();
        self.apply_to(&rows, table.distance_bounds())
    }

    /// Filters `rows`, where `bounds` is the full range of the dataset they came from.
    pub fn apply_to<'a>(
        &self,
        rows: &[&'a EnrichedRoute],
        bounds: Option<DistanceRange>,
    ) -> Vec<&'a EnrichedRoute> {
        let distance = self.distance.filter(|range| Some(*range) != bounds);
        rows.iter()
            .copied()
            .filter(|r| self.matches_categories(r))
            .filter(|r| distance.is_none_or(|range| range.contains(r.distance_km)))
            .collect()
    }

    fn matches_categories(&self, r: &EnrichedRoute) -> bool {
        self.route_type.matches(Some(r.route_type.as_str()))
            && self.origin.matches(r.origin.as_deref())
            && self.destination.matches(r.destination.as_deref())
            && self.weather.matches(Some(r.weather_impact.as_str()))
    }

    pub fn is_active(&self, bounds: Option<DistanceRange>) -> bool {
        self.route_type.is_active()
            || self.origin.is_active()
            || self.destination.is_active()
            || self.weather.is_active()
            || self.distance.is_some_and(|range| Some(range) != bounds)
    }
}

/// Values a user can pick from for each filter, each list led by `All`.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub route_types: Vec<String>,
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub weather: Vec<String>,
    pub distance: Option<DistanceRange>,
}

impl FilterOptions {
    /// Route types keep first-appearance order; cities and weather are sorted.
    pub fn from_table(table: &RouteTable) -> Self {
        let records = table.records();

        let mut seen = HashSet::new();
        let route_types = records
            .iter()
            .map(|r| r.route_type.as_str())
            .filter(|t| seen.insert(*t))
            .map(str::to_string);

        FilterOptions {
            route_types: with_all(route_types),
            origins: with_all(sorted_distinct(records.iter().filter_map(|r| r.origin.as_deref()))),
            destinations: with_all(sorted_distinct(
                records.iter().filter_map(|r| r.destination.as_deref()),
            )),
            weather: with_all(sorted_distinct(records.iter().map(|r| r.weather_impact.as_str()))),
            distance: table.distance_bounds(),
        }
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> impl Iterator<Item = String> {
    let mut distinct: Vec<&str> = values.collect::<HashSet<_>>().into_iter().collect();
    distinct.sort_unstable();
    distinct.into_iter().map(str::to_string)
}

fn with_all(values: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}
