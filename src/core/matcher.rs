use std::time::Instant;

use crate::models::{Neighborhood, UserPreferences, MatchResult, ScoringWeights};
use crate::core::{
    reasons::generate_match_reasons,
    scoring::score_neighborhood,
    vocabulary::CATEGORY_MAX,
};

/// Number of score categories
const CATEGORY_COUNT: usize = 7;

/// Default number of results returned by a ranking pass
pub const DEFAULT_LIMIT: usize = 5;

/// Result of a ranking pass
#[derive(Debug)]
pub struct RankResult {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Ranking orchestrator
///
/// # Pipeline
/// 1. Score every neighborhood in the catalog
/// 2. Weight and round the total
/// 3. Explain the match
/// 4. Normalize to a compatibility percentage
/// 5. Stable sort by score, then truncate
///
/// The matcher holds only immutable configuration, so one instance can be
/// shared freely across requests.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    compatibility_denominator: f64,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        // Sum of all category maxes scaled by the mean weight
        let max_possible = CATEGORY_MAX * CATEGORY_COUNT as f64;
        let compatibility_denominator = max_possible * weights.mean();

        Self {
            weights,
            compatibility_denominator,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank the catalog against a preference set
    ///
    /// # Arguments
    /// * `catalog` - Snapshot of the neighborhood catalog
    /// * `preferences` - The user's stated preferences (may be empty)
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// RankResult with at most `limit` matches, best first. Equal scores keep
    /// their catalog order.
    pub fn rank(
        &self,
        catalog: &[Neighborhood],
        preferences: &UserPreferences,
        limit: usize,
    ) -> RankResult {
        let started = Instant::now();
        let total_candidates = catalog.len();

        let mut matches: Vec<MatchResult> = catalog
            .iter()
            .map(|neighborhood| self.evaluate(neighborhood, preferences))
            .collect();

        // sort_by is stable, so ties stay in catalog order
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);

        tracing::debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            candidates = total_candidates,
            results = matches.len(),
            "ranked neighborhood catalog"
        );

        RankResult {
            matches,
            total_candidates,
        }
    }

    /// Score and explain a single neighborhood
    pub fn evaluate(&self, neighborhood: &Neighborhood, preferences: &UserPreferences) -> MatchResult {
        let score_breakdown = score_neighborhood(neighborhood, preferences, &self.weights);
        let score = score_breakdown.total.round() as i64;
        let match_reasons = generate_match_reasons(neighborhood, preferences, &score_breakdown);
        let compatibility_percentage = self.compatibility_percentage(score);

        MatchResult {
            neighborhood: neighborhood.clone(),
            score,
            score_breakdown,
            match_reasons,
            compatibility_percentage,
        }
    }

    /// Map a weighted total onto 0-100
    ///
    /// With weights summing to 1.0 the total can never exceed the
    /// denominator, so the clamp only guards against rounding at the edges.
    pub fn compatibility_percentage(&self, total: i64) -> u8 {
        if self.compatibility_denominator <= 0.0 {
            return 0;
        }

        let percentage = (total as f64 / self.compatibility_denominator * 100.0).round();
        percentage.clamp(0.0, 100.0) as u8
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_neighborhood(id: u32, rent: f64, walk_score: f64, safety_rating: f64) -> Neighborhood {
        Neighborhood {
            id,
            name: format!("Neighborhood {}", id),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            features: vec!["parks".to_string()],
            average_rent: rent,
            walk_score,
            safety_rating,
            description: String::new(),
            image: String::new(),
            pet_friendly: false,
            transit_score: None,
            bike_score: None,
            crime_rate: None,
            school_rating: None,
        }
    }

    fn create_preferences() -> UserPreferences {
        UserPreferences {
            budget_range: Some(vec![2000.0]),
            max_commute: Some(vec![30.0]),
            lifestyle: Some(vec!["family".to_string()]),
            priorities: Some(vec!["safety".to_string()]),
        }
    }

    #[test]
    fn test_rank_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let catalog = vec![
            create_neighborhood(1, 4000.0, 40.0, 2.0),
            create_neighborhood(2, 2000.0, 90.0, 4.8),
            create_neighborhood(3, 2400.0, 70.0, 3.5),
        ];

        let result = matcher.rank(&catalog, &create_preferences(), 10);

        assert_eq!(result.total_candidates, 3);
        let ids: Vec<u32> = result.matches.iter().map(|m| m.neighborhood.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let matcher = Matcher::with_default_weights();
        let catalog: Vec<Neighborhood> = (1..=6)
            .map(|id| create_neighborhood(id, 2000.0, 70.0, 4.0))
            .collect();

        let result = matcher.rank(&catalog, &create_preferences(), 4);

        let ids: Vec<u32> = result.matches.iter().map(|m| m.neighborhood.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let catalog: Vec<Neighborhood> = (0..20)
            .map(|i| create_neighborhood(i, 1500.0 + i as f64 * 50.0, 60.0, 3.0))
            .collect();

        assert_eq!(matcher.rank(&catalog, &create_preferences(), DEFAULT_LIMIT).matches.len(), 5);
        assert!(matcher.rank(&catalog, &create_preferences(), 0).matches.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let matcher = Matcher::default();
        let result = matcher.rank(&[], &UserPreferences::default(), 5);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_compatibility_percentage() {
        let matcher = Matcher::with_default_weights();

        assert_eq!(matcher.compatibility_percentage(0), 0);
        assert_eq!(matcher.compatibility_percentage(753), 75);
        assert_eq!(matcher.compatibility_percentage(1000), 100);
        assert_eq!(matcher.compatibility_percentage(1200), 100);
        assert_eq!(matcher.compatibility_percentage(-20), 0);
    }

    #[test]
    fn test_denominator_follows_weights() {
        let weights = ScoringWeights {
            budget: 0.5,
            lifestyle: 0.5,
            priorities: 0.0,
            commute: 0.0,
            safety: 0.0,
            walkability: 0.0,
            amenities: 0.0,
        };
        let matcher = Matcher::new(weights);

        assert_eq!(matcher.compatibility_percentage(500), 50);
    }
}
