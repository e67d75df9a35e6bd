use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A neighborhood record from the catalog
///
/// Keys are snake_case, matching the catalog file. Nothing is required: a
/// missing `id` reads as `0` and a missing or null core numeric as NaN, so
/// incomplete records still load and are flagged by the quality checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "unknown_number", deserialize_with = "number_or_unknown")]
    pub average_rent: f64,
    #[serde(default = "unknown_number", deserialize_with = "number_or_unknown")]
    pub walk_score: f64,
    #[serde(default = "unknown_number", deserialize_with = "number_or_unknown")]
    pub safety_rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crime_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_rating: Option<f64>,
}

fn unknown_number() -> f64 {
    f64::NAN
}

/// `null` reads as NaN; serde_json writes NaN back out as `null`
fn number_or_unknown<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Neighborhood {
    /// True if any feature contains `needle`, ignoring case
    pub fn has_feature_like(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.features
            .iter()
            .any(|feature| feature.to_lowercase().contains(&needle))
    }
}

/// Lifestyle preferences submitted by a user
///
/// Every field is optional and an empty list means the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "budgetRange", default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<Vec<f64>>,
    #[serde(rename = "maxCommute", default, skip_serializing_if = "Option::is_none")]
    pub max_commute: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<Vec<String>>,
}

impl UserPreferences {
    /// Target budget (first element of the budget range)
    pub fn target_budget(&self) -> Option<f64> {
        self.budget_range.as_deref().and_then(|range| range.first().copied())
    }

    /// Commute ceiling (first element of the commute range)
    pub fn commute_ceiling(&self) -> Option<f64> {
        self.max_commute.as_deref().and_then(|range| range.first().copied())
    }

    /// Requested lifestyle tags, empty if none
    pub fn lifestyle_tags(&self) -> &[String] {
        self.lifestyle.as_deref().unwrap_or(&[])
    }

    /// Requested priority keys, empty if none
    pub fn priority_keys(&self) -> &[String] {
        self.priorities.as_deref().unwrap_or(&[])
    }

    /// True when the body named no preference key at all
    ///
    /// Keys given as empty lists still count as present.
    pub fn is_unset(&self) -> bool {
        self.budget_range.is_none()
            && self.max_commute.is_none()
            && self.lifestyle.is_none()
            && self.priorities.is_none()
    }

    /// True when the user expressed no preference at all
    pub fn is_empty(&self) -> bool {
        self.target_budget().is_none()
            && self.commute_ceiling().is_none()
            && self.lifestyle_tags().is_empty()
            && self.priority_keys().is_empty()
    }
}

/// Per-category scores for one neighborhood against one preference set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub budget: f64,
    pub lifestyle: f64,
    pub priorities: f64,
    pub commute: f64,
    pub safety: f64,
    pub walkability: f64,
    pub amenities: f64,
    /// Weighted sum before rounding
    pub total: f64,
}

impl ScoreBreakdown {
    /// Category scores in weight order
    pub fn categories(&self) -> [f64; 7] {
        [
            self.budget,
            self.lifestyle,
            self.priorities,
            self.commute,
            self.safety,
            self.walkability,
            self.amenities,
        ]
    }
}

/// Ranked neighborhood with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub neighborhood: Neighborhood,
    pub score: i64,
    #[serde(rename = "scoreBreakdown")]
    pub score_breakdown: ScoreBreakdown,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
    #[serde(rename = "compatibilityPercentage")]
    pub compatibility_percentage: u8,
}

/// Errors raised when a weight table cannot be used
#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight for {0} must be finite and non-negative")]
    InvalidWeight(&'static str),

    #[error("weights must sum to 1.0, got {0}")]
    NotNormalized(f64),
}

/// Category weights for the weighted total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub budget: f64,
    pub lifestyle: f64,
    pub priorities: f64,
    pub commute: f64,
    pub safety: f64,
    pub walkability: f64,
    pub amenities: f64,
}

impl ScoringWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    /// Weights in category order, paired with their names
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("budget", self.budget),
            ("lifestyle", self.lifestyle),
            ("priorities", self.priorities),
            ("commute", self.commute),
            ("safety", self.safety),
            ("walkability", self.walkability),
            ("amenities", self.amenities),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.named().iter().map(|(_, w)| w).sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.named().len() as f64
    }

    /// Check that every weight is usable and that they sum to 1.0
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, weight) in self.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightsError::InvalidWeight(name));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(WeightsError::NotNormalized(sum));
        }

        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 0.25,
            lifestyle: 0.20,
            priorities: 0.20,
            commute: 0.15,
            safety: 0.10,
            walkability: 0.05,
            amenities: 0.05,
        }
    }
}

/// Completeness and accuracy of a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityMetrics {
    pub completeness: f64,
    pub accuracy: f64,
    #[serde(rename = "missingFields")]
    pub missing_fields: BTreeSet<String>,
    #[serde(rename = "sourceReliability")]
    pub source_reliability: f64,
    #[serde(rename = "lastUpdated")]
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

/// Outcome of validating catalog records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Aggregate numbers over a catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_neighborhoods: usize,
    pub cities: usize,
    pub average_rent: f64,
    pub average_walk_score: f64,
    pub average_safety_rating: f64,
    pub feature_count: usize,
    pub pet_friendly_count: usize,
}
