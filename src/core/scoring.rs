use crate::models::{Neighborhood, UserPreferences, ScoreBreakdown, ScoringWeights};
use crate::core::vocabulary::{
    lifestyle_keywords, Priority, AMENITY_TERMS, BUDGET_FLOOR, BUDGET_TIERS, CATEGORY_MAX,
    PEDESTRIAN_TERMS,
};

/// Share of the category max awarded when the user has no opinion
const NEUTRAL_FRACTION: f64 = 0.5;

/// Walkability bonus for pedestrian-friendly features, as a share of max
const PEDESTRIAN_BONUS: f64 = 0.2;

/// Crime penalty cap, as a share of max
const CRIME_PENALTY_CAP: f64 = 0.3;

/// Points deducted per unit of crime rate
const CRIME_PENALTY_PER_UNIT: f64 = 10.0;

/// Commute proxy shares for walk, transit and bike scores
const COMMUTE_WALK_SHARE: f64 = 0.4;
const COMMUTE_TRANSIT_SHARE: f64 = 0.3;
const COMMUTE_BIKE_SHARE: f64 = 0.3;

/// Feature count at which the amenities priority is fully satisfied
const AMENITY_PRIORITY_SATURATION: f64 = 10.0;

/// Score a neighborhood against a preference set
///
/// Each category lands in `[0, CATEGORY_MAX]`. `total` is the weighted sum:
/// ```text
/// total = budget      * w.budget
///       + lifestyle   * w.lifestyle
///       + priorities  * w.priorities
///       + commute     * w.commute
///       + safety      * w.safety
///       + walkability * w.walkability
///       + amenities   * w.amenities
/// ```
pub fn score_neighborhood(
    neighborhood: &Neighborhood,
    preferences: &UserPreferences,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let features = FeatureText::new(neighborhood);

    let mut breakdown = ScoreBreakdown {
        budget: calculate_budget_score(neighborhood, preferences),
        lifestyle: calculate_lifestyle_score(&features, preferences),
        priorities: calculate_priorities_score(neighborhood, preferences),
        commute: calculate_commute_score(neighborhood, preferences),
        safety: calculate_safety_score(neighborhood),
        walkability: calculate_walkability_score(neighborhood, &features),
        amenities: calculate_amenities_score(&features),
        total: 0.0,
    };

    breakdown.total = weighted_total(&breakdown, weights);
    breakdown
}

/// Weighted sum of the seven categories
pub fn weighted_total(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    breakdown
        .categories()
        .iter()
        .zip(weights.named().iter())
        .map(|(score, (_, weight))| score * weight)
        .sum()
}

/// Lower-cased feature list, built once per neighborhood
struct FeatureText {
    lowered: Vec<String>,
}

impl FeatureText {
    fn new(neighborhood: &Neighborhood) -> Self {
        Self {
            lowered: neighborhood.features.iter().map(|f| f.to_lowercase()).collect(),
        }
    }

    /// True if any feature contains `keyword`, ignoring case
    fn mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.lowered.iter().any(|feature| feature.contains(&keyword))
    }
}

/// Clamp into the category range; non-finite values count as nothing
#[inline]
fn bounded(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, CATEGORY_MAX)
}

#[inline]
fn neutral() -> f64 {
    CATEGORY_MAX * NEUTRAL_FRACTION
}

/// Tiered closeness of rent to the target budget
fn calculate_budget_score(neighborhood: &Neighborhood, preferences: &UserPreferences) -> f64 {
    let Some(target) = preferences.target_budget() else {
        return neutral();
    };

    if !target.is_finite() || target <= 0.0 {
        return CATEGORY_MAX * BUDGET_FLOOR;
    }

    let percentage_diff = (neighborhood.average_rent - target).abs() * 100.0 / target;

    let fraction = BUDGET_TIERS
        .iter()
        .find(|(limit, _)| percentage_diff <= *limit)
        .map(|(_, fraction)| *fraction)
        .unwrap_or(BUDGET_FLOOR);

    bounded(CATEGORY_MAX * fraction)
}

/// Share of each requested lifestyle's keywords found among the features
fn calculate_lifestyle_score(features: &FeatureText, preferences: &UserPreferences) -> f64 {
    let tags = preferences.lifestyle_tags();
    if tags.is_empty() {
        return neutral();
    }

    let share = CATEGORY_MAX / tags.len() as f64;

    let total: f64 = tags
        .iter()
        .map(|tag| {
            let keywords = lifestyle_keywords(tag);
            let matched = keywords.iter().filter(|k| features.mentions(k)).count();
            share * (matched as f64 / keywords.len() as f64)
        })
        .sum();

    bounded(total)
}

/// Equal share per requested priority, scaled by how well it is met
fn calculate_priorities_score(neighborhood: &Neighborhood, preferences: &UserPreferences) -> f64 {
    let keys = preferences.priority_keys();
    if keys.is_empty() {
        return neutral();
    }

    let share = CATEGORY_MAX / keys.len() as f64;
    let target_budget = preferences.target_budget();

    let total: f64 = keys
        .iter()
        .map(|key| match Priority::parse(key) {
            Some(Priority::Walkability) => neighborhood.walk_score / 100.0 * share,
            Some(Priority::Safety) => neighborhood.safety_rating / 5.0 * share,
            Some(Priority::Affordability) => match target_budget {
                Some(target) if neighborhood.average_rent <= target => share,
                _ => 0.0,
            },
            // No travel-time data; a flat half share stands in
            Some(Priority::Commute) => share * 0.5,
            Some(Priority::Schools) => neighborhood
                .school_rating
                .map_or(0.0, |rating| rating / 10.0 * share),
            Some(Priority::Amenities) => {
                let ratio = neighborhood.features.len() as f64 / AMENITY_PRIORITY_SATURATION;
                ratio.min(1.0) * share
            }
            None => 0.0,
        })
        .sum();

    bounded(total)
}

/// Commute proxy from walk, transit and bike scores
///
/// The stated commute ceiling only switches the category on; the catalog has
/// no travel times to compare it against.
fn calculate_commute_score(neighborhood: &Neighborhood, preferences: &UserPreferences) -> f64 {
    if preferences.commute_ceiling().is_none() {
        return neutral();
    }

    let walk = neighborhood.walk_score / 100.0 * CATEGORY_MAX * COMMUTE_WALK_SHARE;
    let transit = neighborhood
        .transit_score
        .map_or(0.0, |s| s / 100.0 * CATEGORY_MAX * COMMUTE_TRANSIT_SHARE);
    let bike = neighborhood
        .bike_score
        .map_or(0.0, |s| s / 100.0 * CATEGORY_MAX * COMMUTE_BIKE_SHARE);

    bounded(walk + transit + bike)
}

/// Safety rating, less a capped crime penalty when crime data exists
fn calculate_safety_score(neighborhood: &Neighborhood) -> f64 {
    let mut score = neighborhood.safety_rating / 5.0 * CATEGORY_MAX;

    if let Some(crime_rate) = neighborhood.crime_rate {
        let penalty = (crime_rate * CRIME_PENALTY_PER_UNIT)
            .clamp(0.0, CATEGORY_MAX * CRIME_PENALTY_CAP);
        score -= penalty;
    }

    bounded(score)
}

/// Walk score plus a bonus for pedestrian-friendly features
fn calculate_walkability_score(neighborhood: &Neighborhood, features: &FeatureText) -> f64 {
    let mut score = neighborhood.walk_score / 100.0 * CATEGORY_MAX;

    if PEDESTRIAN_TERMS.iter().any(|term| features.mentions(term)) {
        score += CATEGORY_MAX * PEDESTRIAN_BONUS;
    }

    bounded(score)
}

/// Fraction of the amenity vocabulary present in the features
fn calculate_amenities_score(features: &FeatureText) -> f64 {
    let found = AMENITY_TERMS
        .iter()
        .filter(|term| features.mentions(term))
        .count();

    bounded(found as f64 / AMENITY_TERMS.len() as f64 * CATEGORY_MAX)
}
