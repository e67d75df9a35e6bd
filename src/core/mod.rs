// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod quality;
pub mod reasons;
pub mod scoring;
pub mod vocabulary;

pub use filters::{catalog_stats, FilterError, NeighborhoodFilter, NeighborhoodQuery, SortKey, SortOrder};
pub use matcher::{Matcher, RankResult, DEFAULT_LIMIT};
pub use quality::{compute_data_quality, validate_catalog};
pub use reasons::generate_match_reasons;
pub use scoring::score_neighborhood;
pub use vocabulary::CATEGORY_MAX;
