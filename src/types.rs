//! Record types shared by the loading, filtering and scoring stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enrich::RouteMetrics;

/// Weather category assigned when the input leaves the column empty.
pub const NO_WEATHER_IMPACT: &str = "None";

/// Destinations that make a route international. Everything else is domestic.
pub static INTERNATIONAL_DESTINATIONS: &[&str] = &["Dubai", "Singapore", "Hong Kong", "Bangkok"];

/// A single row deserialized from the input CSV.
///
/// Numeric cells are optional so that empty cells become NaN downstream
/// instead of rejecting the whole file.
#[derive(Debug, Deserialize)]
pub struct RawRoute {
    #[serde(rename = "Order_ID")]
    pub(crate) order_id: String,
    #[serde(rename = "Route")]
    pub(crate) route: String,
    #[serde(rename = "Distance_KM", default)]
    pub(crate) distance_km: Option<f64>,
    #[serde(rename = "Fuel_Consumption_L", default)]
    pub(crate) fuel_consumption_l: Option<f64>,
    #[serde(rename = "Toll_Charges_INR", default)]
    pub(crate) toll_charges_inr: Option<f64>,
    #[serde(rename = "Traffic_Delay_Minutes", default)]
    pub(crate) traffic_delay_minutes: Option<f64>,
    #[serde(rename = "Weather_Impact", default)]
    pub(crate) weather_impact: Option<String>,

    // present when re-loading an exported view
    #[serde(rename = "Efficiency_Score", default)]
    pub(crate) efficiency_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Domestic,
    International,
}

impl RouteType {
    /// Classifies a route by its destination city.
    pub fn for_destination(destination: Option<&str>) -> Self {
        match destination {
            Some(city) if INTERNATIONAL_DESTINATIONS.contains(&city) => RouteType::International,
            _ => RouteType::Domestic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::Domestic => "Domestic",
            RouteType::International => "International",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route with its base columns and every load-time derived column.
///
/// `origin` and `destination` are `None` when the route string does not
/// split into two non-empty cities.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRoute {
    pub order_id: String,
    pub route: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: f64,
    pub fuel_consumption_l: f64,
    pub toll_charges_inr: f64,
    pub traffic_delay_minutes: f64,
    pub weather_impact: String,
    pub route_type: RouteType,
    pub metrics: RouteMetrics,
    pub efficiency_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_destinations() {
        assert_eq!(
            RouteType::for_destination(Some("Dubai")),
            RouteType::International
        );
        assert_eq!(
            RouteType::for_destination(Some("Hong Kong")),
            RouteType::International
        );
        assert_eq!(
            RouteType::for_destination(Some("Mumbai")),
            RouteType::Domestic
        );
    }

    #[test]
    fn test_unknown_destination_is_domestic() {
        assert_eq!(RouteType::for_destination(None), RouteType::Domestic);
        // case sensitive, like the city names in the dataset
        assert_eq!(
            RouteType::for_destination(Some("dubai")),
            RouteType::Domestic
        );
    }

    #[test]
    fn test_route_type_display() {
        assert_eq!(RouteType::International.to_string(), "International");
        assert_eq!(RouteType::Domestic.as_str(), "Domestic");
    }
}
