use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string for the match endpoint
///
/// The upper bound is `matching.max_limit`, checked by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Query string for browsing the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodListQuery {
    pub city: Option<String>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    /// Comma-separated feature keywords
    pub features: Option<String>,
    pub min_walk_score: Option<f64>,
    pub min_safety_rating: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: usize,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_limit")]
    pub limit: usize,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

impl NeighborhoodListQuery {
    /// Feature keywords split out of the comma-separated parameter
    pub fn feature_list(&self) -> Vec<String> {
        self.features
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn default_page() -> usize {
    1
}

fn default_page_limit() -> usize {
    10
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_sort_order() -> String {
    "asc".to_string()
}
