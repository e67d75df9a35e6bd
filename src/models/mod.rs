// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Neighborhood, UserPreferences, ScoreBreakdown, MatchResult, ScoringWeights, WeightsError, DataQualityMetrics, ValidationReport, CatalogStats};
pub use requests::{MatchQuery, NeighborhoodListQuery};
pub use responses::{MatchResponse, NeighborhoodPage, HealthResponse, ErrorResponse};
