//! Route planning over a logistics route dataset.
//!
//! The pipeline is load → enrich → filter → score → rank:
//!
//! - [`loader`] reads the CSV and builds an immutable [`loader::RouteTable`]
//! - [`enrich`] derives cost, time, emissions and efficiency per route
//! - [`filter`] narrows the table to a view
//! - [`analyzers`] scores, ranks and summarizes a view
//! - [`output`] and [`report`] write results back out

pub mod analyzers;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod report;
pub mod types;
