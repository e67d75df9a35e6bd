use crate::models::{Neighborhood, UserPreferences, ScoreBreakdown};
use crate::core::vocabulary::CATEGORY_MAX;

/// Maximum number of reasons attached to a match
pub const MAX_REASONS: usize = 3;

/// Number of features quoted in the highlight reason
const HIGHLIGHTED_FEATURES: usize = 3;

const BUDGET_REASON_THRESHOLD: f64 = 0.8;
const LIFESTYLE_REASON_THRESHOLD: f64 = 0.7;
const SAFETY_REASON_THRESHOLD: f64 = 0.8;
const WALKABILITY_REASON_THRESHOLD: f64 = 0.7;

/// Build up to three human-readable reasons for a match
///
/// Candidates are considered in a fixed order (budget, lifestyle, safety,
/// walkability, feature highlight) and the first three that apply are kept.
pub fn generate_match_reasons(
    neighborhood: &Neighborhood,
    preferences: &UserPreferences,
    breakdown: &ScoreBreakdown,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(MAX_REASONS + 2);

    if breakdown.budget > CATEGORY_MAX * BUDGET_REASON_THRESHOLD {
        reasons.push(format!("Great value at ${}/month", neighborhood.average_rent));
    }

    if breakdown.lifestyle > CATEGORY_MAX * LIFESTYLE_REASON_THRESHOLD {
        let matching: Vec<&str> = preferences
            .lifestyle_tags()
            .iter()
            .filter(|tag| neighborhood.has_feature_like(tag))
            .map(String::as_str)
            .collect();

        if !matching.is_empty() {
            reasons.push(format!("Perfect for {} lifestyle", matching.join(", ")));
        }
    }

    if breakdown.safety > CATEGORY_MAX * SAFETY_REASON_THRESHOLD {
        reasons.push(format!("High safety rating of {}/5", neighborhood.safety_rating));
    }

    if breakdown.walkability > CATEGORY_MAX * WALKABILITY_REASON_THRESHOLD {
        reasons.push(format!("Excellent walkability score of {}", neighborhood.walk_score));
    }

    if !neighborhood.features.is_empty() {
        let highlighted: Vec<&str> = neighborhood
            .features
            .iter()
            .take(HIGHLIGHTED_FEATURES)
            .map(String::as_str)
            .collect();
        reasons.push(format!("Features: {}", highlighted.join(", ")));
    }

    reasons.truncate(MAX_REASONS);
    reasons
}
