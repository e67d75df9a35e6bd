use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Neighborhood, NeighborhoodListQuery, NeighborhoodPage, CatalogStats};

/// Errors building a catalog query from request parameters
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown sort key: {0}")]
    InvalidSortKey(String),

    #[error("sort order must be asc or desc, got {0}")]
    InvalidSortOrder(String),
}

/// Field a catalog page is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    City,
    State,
    AverageRent,
    WalkScore,
    SafetyRating,
}

impl SortKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(SortKey::Name),
            "city" => Some(SortKey::City),
            "state" => Some(SortKey::State),
            "average_rent" | "averageRent" => Some(SortKey::AverageRent),
            "walk_score" | "walkScore" => Some(SortKey::WalkScore),
            "safety_rating" | "safetyRating" => Some(SortKey::SafetyRating),
            _ => None,
        }
    }

    fn compare(self, a: &Neighborhood, b: &Neighborhood) -> Ordering {
        let by_number = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::City => a.city.to_lowercase().cmp(&b.city.to_lowercase()),
            SortKey::State => a.state.to_lowercase().cmp(&b.state.to_lowercase()),
            SortKey::AverageRent => by_number(a.average_rent, b.average_rent),
            SortKey::WalkScore => by_number(a.walk_score, b.walk_score),
            SortKey::SafetyRating => by_number(a.safety_rating, b.safety_rating),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(order: &str) -> Option<Self> {
        match order.to_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Hard constraints a catalog entry must satisfy to be listed
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodFilter {
    pub city: Option<String>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    /// At least one of these must appear in the features
    pub features: Vec<String>,
    pub min_walk_score: Option<f64>,
    pub min_safety_rating: Option<f64>,
}

impl NeighborhoodFilter {
    /// Check if a neighborhood passes every constraint that is set
    #[inline]
    pub fn matches(&self, n: &Neighborhood) -> bool {
        if let Some(city) = &self.city {
            if !n.city.to_lowercase().contains(&city.to_lowercase()) {
                return false;
            }
        }

        if self.min_rent.is_some_and(|min| n.average_rent.is_nan() || n.average_rent < min) {
            return false;
        }

        if self.max_rent.is_some_and(|max| n.average_rent.is_nan() || n.average_rent > max) {
            return false;
        }

        if !self.features.is_empty()
            && !self.features.iter().any(|feature| n.has_feature_like(feature)) {
            return false;
        }

        if self.min_walk_score.is_some_and(|min| n.walk_score.is_nan() || n.walk_score < min) {
            return false;
        }

        if self.min_safety_rating.is_some_and(|min| n.safety_rating.is_nan() || n.safety_rating < min) {
            return false;
        }

        true
    }
}

/// Filter, order and page through a catalog
#[derive(Debug, Clone)]
pub struct NeighborhoodQuery {
    pub filter: NeighborhoodFilter,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for NeighborhoodQuery {
    fn default() -> Self {
        Self {
            filter: NeighborhoodFilter::default(),
            sort_key: SortKey::Name,
            sort_order: SortOrder::Asc,
            page: 1,
            limit: 10,
        }
    }
}

impl NeighborhoodQuery {
    /// Build a query from validated request parameters
    pub fn from_request(request: &NeighborhoodListQuery) -> Result<Self, FilterError> {
        let sort_key = SortKey::parse(&request.sort_by)
            .ok_or_else(|| FilterError::InvalidSortKey(request.sort_by.clone()))?;
        let sort_order = SortOrder::parse(&request.sort_order)
            .ok_or_else(|| FilterError::InvalidSortOrder(request.sort_order.clone()))?;

        Ok(Self {
            filter: NeighborhoodFilter {
                city: request.city.clone().filter(|c| !c.is_empty()),
                min_rent: request.min_rent,
                max_rent: request.max_rent,
                features: request.feature_list(),
                min_walk_score: request.min_walk_score,
                min_safety_rating: request.min_safety_rating,
            },
            sort_key,
            sort_order,
            page: request.page,
            limit: request.limit,
        })
    }

    /// Run the query against a catalog snapshot
    pub fn apply(&self, catalog: &[Neighborhood]) -> NeighborhoodPage {
        let mut selected: Vec<&Neighborhood> = catalog
            .iter()
            .filter(|n| self.filter.matches(n))
            .collect();

        selected.sort_by(|a, b| {
            let ordering = self.sort_key.compare(a, b);
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let limit = self.limit.max(1);
        let page = self.page.max(1);
        let total = selected.len();
        let start = (page - 1).saturating_mul(limit);

        let neighborhoods = selected
            .into_iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect();

        NeighborhoodPage {
            neighborhoods,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// Aggregate numbers over a catalog; all zero when it is empty
pub fn catalog_stats(catalog: &[Neighborhood]) -> CatalogStats {
    if catalog.is_empty() {
        return CatalogStats::default();
    }

    // Records with unknown numerics are left out of the averages
    let mean = |value: fn(&Neighborhood) -> f64| {
        let known: Vec<f64> = catalog.iter().map(value).filter(|v| v.is_finite()).collect();
        if known.is_empty() {
            0.0
        } else {
            known.iter().sum::<f64>() / known.len() as f64
        }
    };

    let cities: HashSet<&str> = catalog.iter().map(|n| n.city.as_str()).collect();

    CatalogStats {
        total_neighborhoods: catalog.len(),
        cities: cities.len(),
        average_rent: mean(|n| n.average_rent).round(),
        average_walk_score: mean(|n| n.walk_score).round(),
        average_safety_rating: (mean(|n| n.safety_rating) * 10.0).round() / 10.0,
        feature_count: catalog.iter().map(|n| n.features.len()).sum(),
        pet_friendly_count: catalog.iter().filter(|n| n.pet_friendly).count(),
    }
}
