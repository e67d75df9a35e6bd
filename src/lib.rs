//! Neighborly Algo - neighborhood matching service for Neighborly
//!
//! This library provides the deterministic scoring and ranking engine that
//! recommends neighborhoods from a user's budget, commute, lifestyle and
//! priority preferences, plus the catalog quality checks that feed it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, RankResult, compute_data_quality, validate_catalog, score_neighborhood};
pub use crate::models::{Neighborhood, UserPreferences, MatchResult, ScoreBreakdown, ScoringWeights, DataQualityMetrics};
