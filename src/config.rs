//! Environment configuration.
//!
//! Values come from the process environment, which `main` first seeds from
//! a `.env` file. Command-line flags take precedence over everything here.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::report::PageLayout;

pub const DEFAULT_DATA_PATH: &str = "routes_data.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/route_planner.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `ROUTES_DATA_PATH`
    pub data_path: PathBuf,
    /// `LOG_FILE_PATH`
    pub log_file_path: PathBuf,
    /// `REPORT_WIDTH` and `REPORT_LINES_PER_PAGE`
    pub report_layout: PageLayout,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = PageLayout::default();

        let width = parse_usize(&lookup, "REPORT_WIDTH")?.unwrap_or(defaults.width);
        let lines_per_page =
            parse_usize(&lookup, "REPORT_LINES_PER_PAGE")?.unwrap_or(defaults.lines_per_page);

        Ok(Config {
            data_path: lookup("ROUTES_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string())
                .into(),
            report_layout: PageLayout::new(width, lines_per_page),
        })
    }
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .with_context(|| format!("{key} must be a positive integer, got '{v}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.data_path, PathBuf::from("routes_data.csv"));
        assert_eq!(config.log_file_path, PathBuf::from("logs/route_planner.log"));
        assert_eq!(config.report_layout, PageLayout::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ROUTES_DATA_PATH", "data/routes.csv"),
            ("REPORT_WIDTH", "80"),
            ("REPORT_LINES_PER_PAGE", " 50 "),
        ]))
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("data/routes.csv"));
        assert_eq!(config.report_layout, PageLayout::new(80, 50));
    }

    #[test]
    fn test_invalid_width_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("REPORT_WIDTH", "wide")])).unwrap_err();
        assert!(err.to_string().contains("REPORT_WIDTH"));
    }

    #[test]
    fn test_tiny_width_is_clamped() {
        let config = Config::from_lookup(lookup_from(&[("REPORT_WIDTH", "4")])).unwrap();
        assert_eq!(config.report_layout.width, crate::report::MIN_WIDTH);
    }
}
