//! Scoring, ranking and summary analysis of filtered route views.
//!
//! Scores are relative to the view they are computed over, so every
//! function here takes a [`scoring::ScoredView`] produced for the current
//! filter rather than the loaded table.

pub mod insights;
pub mod ranking;
pub mod scoring;
pub mod utility;
