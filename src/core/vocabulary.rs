//! Keyword tables used by the scoring engine.
//!
//! Kept as plain data so new lifestyle tags or amenity terms are a one-line
//! change and can be tested without touching the scoring code.

/// Maximum points for every score category
pub const CATEGORY_MAX: f64 = 1000.0;

/// Lifestyle tag -> feature keywords that count as evidence for it
pub const LIFESTYLE_SYNONYMS: &[(&str, &[&str])] = &[
    ("nightlife", &["nightlife", "restaurants", "bars", "entertainment"]),
    ("family", &["family-friendly", "schools", "parks", "quiet"]),
    ("fitness", &["parks", "gym", "hiking", "outdoor"]),
    ("culture", &["art galleries", "museums", "theaters", "historic"]),
    ("food", &["restaurants", "cafes", "food scene", "dining"]),
    ("quiet", &["quiet", "peaceful", "suburban", "residential"]),
];

/// Everyday amenities looked for in feature lists
pub const AMENITY_TERMS: &[&str] = &[
    "restaurants",
    "cafes",
    "shopping",
    "grocery",
    "pharmacy",
    "bank",
    "post office",
    "library",
    "park",
    "gym",
    "hospital",
    "school",
];

/// Features that earn the walkability bonus
pub const PEDESTRIAN_TERMS: &[&str] = &["walkable", "sidewalks", "pedestrian", "walking"];

/// Budget tiers: (max percentage difference, fraction of the category max)
pub const BUDGET_TIERS: &[(f64, f64)] = &[
    (5.0, 1.0),
    (10.0, 0.9),
    (20.0, 0.7),
    (30.0, 0.5),
    (50.0, 0.3),
];

/// Fraction awarded when the rent is further off than every tier
pub const BUDGET_FLOOR: f64 = 0.1;

/// Keywords for a lifestyle tag; unknown tags stand for themselves
pub fn lifestyle_keywords(tag: &str) -> Vec<&str> {
    let key = tag.trim().to_lowercase();
    match LIFESTYLE_SYNONYMS.iter().find(|(name, _)| *name == key) {
        Some((_, words)) => words.to_vec(),
        None => vec![tag],
    }
}

/// Priority keys understood by the priorities category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Walkability,
    Safety,
    Affordability,
    Commute,
    Schools,
    Amenities,
}

impl Priority {
    /// Parse a priority key, ignoring case; `None` for unknown keys
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "walkability" => Some(Priority::Walkability),
            "safety" => Some(Priority::Safety),
            "affordability" => Some(Priority::Affordability),
            "commute" => Some(Priority::Commute),
            "schools" => Some(Priority::Schools),
            "amenities" => Some(Priority::Amenities),
            _ => None,
        }
    }
}
