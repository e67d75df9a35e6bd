use std::collections::{BTreeSet, HashSet};

use crate::models::{Neighborhood, DataQualityMetrics, ValidationReport};

/// Accuracy before deductions
const BASE_ACCURACY: f64 = 95.0;

/// Deduction when every record lacks a critical field
const CRITICAL_FIELD_PENALTY: f64 = 10.0;

/// Deduction when every record has an outlier rent
const RENT_OUTLIER_PENALTY: f64 = 5.0;

/// Rents outside this band are treated as suspicious
const PLAUSIBLE_RENT: std::ops::RangeInclusive<f64> = 500.0..=5000.0;

/// Fixed until the catalog carries provenance data
const SOURCE_RELIABILITY: f64 = 85.0;

/// Presence of every tracked field on a record
///
/// Strings count as missing when empty, optional numerics when absent, the
/// id when zero and core numerics when NaN.
fn field_presence(n: &Neighborhood) -> [(&'static str, bool); 15] {
    [
        ("id", n.id != 0),
        ("name", !n.name.is_empty()),
        ("city", !n.city.is_empty()),
        ("state", !n.state.is_empty()),
        ("features", true),
        ("average_rent", !n.average_rent.is_nan()),
        ("walk_score", !n.walk_score.is_nan()),
        ("safety_rating", !n.safety_rating.is_nan()),
        ("description", !n.description.is_empty()),
        ("image", !n.image.is_empty()),
        ("pet_friendly", true),
        ("transit_score", n.transit_score.is_some()),
        ("bike_score", n.bike_score.is_some()),
        ("crime_rate", n.crime_rate.is_some()),
        ("school_rating", n.school_rating.is_some()),
    ]
}

/// Compute completeness and accuracy for a catalog
///
/// Completeness is the percentage of tracked fields that are filled, rounded
/// to two decimals. Accuracy starts at 95 and loses up to 10 points for
/// records missing a name, city or rent and up to 5 for implausible rents.
/// An empty catalog scores zero on both.
pub fn compute_data_quality(catalog: &[Neighborhood]) -> DataQualityMetrics {
    let mut total_fields = 0usize;
    let mut filled_fields = 0usize;
    let mut missing_fields = BTreeSet::new();

    for neighborhood in catalog {
        for (field, present) in field_presence(neighborhood) {
            total_fields += 1;
            if present {
                filled_fields += 1;
            } else {
                missing_fields.insert(field.to_string());
            }
        }
    }

    let completeness = if total_fields == 0 {
        0.0
    } else {
        let raw = filled_fields as f64 / total_fields as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    };

    DataQualityMetrics {
        completeness,
        accuracy: calculate_accuracy(catalog),
        missing_fields,
        source_reliability: SOURCE_RELIABILITY,
        last_updated: chrono::Utc::now(),
    }
}

fn calculate_accuracy(catalog: &[Neighborhood]) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }

    let count = catalog.len() as f64;

    let missing_critical = catalog
        .iter()
        .filter(|n| n.name.is_empty() || n.city.is_empty() || n.average_rent == 0.0 || n.average_rent.is_nan())
        .count() as f64;

    let rent_outliers = catalog
        .iter()
        .filter(|n| !n.average_rent.is_nan() && !PLAUSIBLE_RENT.contains(&n.average_rent))
        .count() as f64;

    let accuracy = BASE_ACCURACY
        - missing_critical / count * CRITICAL_FIELD_PENALTY
        - rent_outliers / count * RENT_OUTLIER_PENALTY;

    accuracy.round().max(0.0)
}

/// Validate catalog records
///
/// Errors make the catalog invalid: missing identity fields, required
/// numerics outside their ranges, duplicate ids. Warnings flag records that
/// are usable but thin or carry out-of-range optional scores.
pub fn validate_catalog(catalog: &[Neighborhood]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, n) in catalog.iter().enumerate() {
        if n.id == 0 {
            errors.push(format!("Neighborhood {}: Missing ID", index));
        }
        if n.name.is_empty() {
            errors.push(format!("Neighborhood {}: Missing name", index));
        }
        if n.city.is_empty() {
            errors.push(format!("Neighborhood {}: Missing city", index));
        }

        if !n.average_rent.is_finite() || n.average_rent <= 0.0 {
            errors.push(format!("Neighborhood {}: Invalid rent value", n.id));
        }
        if !(0.0..=100.0).contains(&n.walk_score) {
            errors.push(format!("Neighborhood {}: Invalid walk score", n.id));
        }
        if !(0.0..=5.0).contains(&n.safety_rating) {
            errors.push(format!("Neighborhood {}: Invalid safety rating", n.id));
        }

        let optional_ranges = [
            ("transit score", n.transit_score, 0.0..=100.0),
            ("bike score", n.bike_score, 0.0..=100.0),
            ("school rating", n.school_rating, 0.0..=10.0),
            ("crime rate", n.crime_rate, 0.0..=f64::MAX),
        ];
        for (label, value, range) in optional_ranges {
            if let Some(value) = value {
                if !range.contains(&value) {
                    warnings.push(format!("Neighborhood {}: Out-of-range {}", n.id, label));
                }
            }
        }

        if n.features.is_empty() {
            warnings.push(format!("Neighborhood {}: No features listed", n.id));
        }
        if n.description.is_empty() {
            warnings.push(format!("Neighborhood {}: No description", n.id));
        }
        if n.image.is_empty() {
            warnings.push(format!("Neighborhood {}: No image", n.id));
        }
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = catalog
        .iter()
        .filter(|n| n.id != 0 && !seen.insert(n.id))
        .map(|n| n.id.to_string())
        .collect();
    if !duplicates.is_empty() {
        errors.push(format!("Duplicate IDs found: {}", duplicates.join(", ")));
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_neighborhood(id: u32, name: &str, rent: f64) -> Neighborhood {
        Neighborhood {
            id,
            name: name.to_string(),
            city: "Riverton".to_string(),
            state: "CA".to_string(),
            features: vec!["parks".to_string()],
            average_rent: rent,
            walk_score: 75.0,
            safety_rating: 4.0,
            description: "Leafy and calm".to_string(),
            image: "riverton.jpg".to_string(),
            pet_friendly: true,
            transit_score: Some(60.0),
            bike_score: Some(55.0),
            crime_rate: Some(2.0),
            school_rating: Some(8.0),
        }
    }

    #[test]
    fn test_complete_catalog() {
        let catalog = vec![create_neighborhood(1, "A", 1800.0), create_neighborhood(2, "B", 2200.0)];
        let metrics = compute_data_quality(&catalog);

        assert_eq!(metrics.completeness, 100.0);
        assert_eq!(metrics.accuracy, 95.0);
        assert!(metrics.missing_fields.is_empty());
        assert_eq!(metrics.source_reliability, 85.0);
    }

    #[test]
    fn test_missing_fields_reduce_completeness() {
        let mut sparse = create_neighborhood(2, "B", 2200.0);
        sparse.image.clear();
        sparse.crime_rate = None;
        sparse.school_rating = None;
        let catalog = vec![create_neighborhood(1, "A", 1800.0), sparse];

        let metrics = compute_data_quality(&catalog);

        // 27 of 30 fields filled
        assert_eq!(metrics.completeness, 90.0);
        let missing: Vec<&str> = metrics.missing_fields.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["crime_rate", "image", "school_rating"]);
    }

    #[test]
    fn test_accuracy_deductions() {
        let catalog = vec![
            create_neighborhood(1, "", 1800.0),
            create_neighborhood(2, "B", 6000.0),
            create_neighborhood(3, "C", 2000.0),
            create_neighborhood(4, "D", 2000.0),
        ];

        // 95 - 1/4 * 10 - 1/4 * 5 = 91.25
        assert_eq!(compute_data_quality(&catalog).accuracy, 91.0);
    }

    #[test]
    fn test_empty_catalog_scores_zero() {
        let metrics = compute_data_quality(&[]);
        assert_eq!(metrics.completeness, 0.0);
        assert_eq!(metrics.accuracy, 0.0);
        assert!(metrics.missing_fields.is_empty());
    }

    #[test]
    fn test_validation_passes_clean_catalog() {
        let report = validate_catalog(&[create_neighborhood(1, "A", 1800.0)]);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validation_flags_ranges_and_duplicates() {
        let mut bad = create_neighborhood(2, "B", 1800.0);
        bad.walk_score = 140.0;
        bad.safety_rating = 6.0;
        bad.transit_score = Some(-1.0);
        let catalog = vec![create_neighborhood(1, "A", 1800.0), bad, create_neighborhood(1, "C", 0.0)];

        let report = validate_catalog(&catalog);

        assert!(!report.valid);
        assert!(report.errors.contains(&"Neighborhood 2: Invalid walk score".to_string()));
        assert!(report.errors.contains(&"Neighborhood 2: Invalid safety rating".to_string()));
        assert!(report.errors.contains(&"Neighborhood 1: Invalid rent value".to_string()));
        assert!(report.errors.contains(&"Duplicate IDs found: 1".to_string()));
        assert!(report.warnings.contains(&"Neighborhood 2: Out-of-range transit score".to_string()));
    }

    #[test]
    fn test_incomplete_record_is_flagged_not_dropped() {
        let mut incomplete = create_neighborhood(0, "F", f64::NAN);
        incomplete.walk_score = f64::NAN;
        let catalog = vec![create_neighborhood(1, "A", 1800.0), incomplete];

        let metrics = compute_data_quality(&catalog);
        let missing: Vec<&str> = metrics.missing_fields.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["average_rent", "id", "walk_score"]);
        // 95 - 1/2 * 10, the unknown rent is not an outlier
        assert_eq!(metrics.accuracy, 90.0);

        let report = validate_catalog(&catalog);
        assert!(!report.valid);
        assert!(report.errors.contains(&"Neighborhood 1: Missing ID".to_string()));
        assert!(report.errors.contains(&"Neighborhood 0: Invalid rent value".to_string()));
        assert!(report.errors.contains(&"Neighborhood 0: Invalid walk score".to_string()));
        assert!(!report.errors.iter().any(|e| e.starts_with("Duplicate")));
    }

    #[test]
    fn test_validation_warns_on_thin_records() {
        let mut thin = create_neighborhood(5, "E", 1800.0);
        thin.features.clear();
        thin.description.clear();

        let report = validate_catalog(&[thin]);

        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec!["Neighborhood 5: No features listed", "Neighborhood 5: No description"]
        );
    }
}
