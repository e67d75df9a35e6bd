use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse, MatchQuery, MatchResponse, UserPreferences};
use crate::services::CatalogStore;

/// Reported alongside every ranking response
pub const ALGORITHM_VERSION: &str = "2.0";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure health and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.catalog.snapshot();
    let status = if catalog.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        neighborhood_count: catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank the catalog against the submitted preferences
///
/// POST /api/v1/match?limit=5
///
/// Request body:
/// ```json
/// {
///   "budgetRange": [2000],
///   "maxCommute": [30],
///   "lifestyle": ["food", "nightlife"],
///   "priorities": ["walkability", "safety"]
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    query: web::Query<MatchQuery>,
    body: web::Json<UserPreferences>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let max_limit = state.matching.max_limit;
    let limit = query.limit.unwrap_or(state.matching.default_limit);
    if limit > max_limit {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            format!("limit must be between 1 and {}", max_limit),
            400,
        ));
    }

    let preferences = body.into_inner();
    if preferences.is_unset() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "User preferences are required",
            "Provide at least one of budgetRange, maxCommute, lifestyle or priorities",
            400,
        ));
    }
    let limit = limit as usize;

    let started = Instant::now();
    let catalog = state.catalog.snapshot();
    let result = state.matcher.rank(&catalog.neighborhoods, &preferences, limit);
    let response_time_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        "Returning {} matches (from {} neighborhoods) in {}ms",
        result.matches.len(),
        result.total_candidates,
        response_time_ms
    );

    HttpResponse::Ok().json(MatchResponse {
        matches: result.matches,
        total_neighborhoods: result.total_candidates,
        response_time_ms,
        algorithm_version: ALGORITHM_VERSION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::models::Neighborhood;

    fn create_state(neighborhoods: Vec<Neighborhood>) -> AppState {
        AppState {
            catalog: Arc::new(CatalogStore::from_neighborhoods(neighborhoods)),
            matcher: Matcher::with_default_weights(),
            matching: MatchingSettings::default(),
        }
    }

    fn create_neighborhood(id: u32, rent: f64) -> Neighborhood {
        Neighborhood {
            id,
            name: format!("Neighborhood {}", id),
            city: "Metroville".to_string(),
            state: "NY".to_string(),
            features: vec!["restaurants".to_string(), "walkable".to_string()],
            average_rent: rent,
            walk_score: 85.0,
            safety_rating: 4.0,
            description: String::new(),
            image: String::new(),
            pet_friendly: false,
            transit_score: Some(80.0),
            bike_score: None,
            crime_rate: None,
            school_rating: None,
        }
    }

    #[actix_web::test]
    async fn test_match_endpoint_ranks_catalog() {
        let catalog = (1..=8).map(|i| create_neighborhood(i, 1500.0 + i as f64 * 100.0)).collect();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(catalog)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match?limit=3")
            .set_json(serde_json::json!({ "budgetRange": [1800] }))
            .to_request();
        let resp: MatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches.len(), 3);
        assert_eq!(resp.total_neighborhoods, 8);
        assert_eq!(resp.algorithm_version, "2.0");
        assert_eq!(resp.matches[0].neighborhood.id, 3);
    }

    #[actix_web::test]
    async fn test_match_endpoint_defaults_limit() {
        let catalog = (1..=8).map(|i| create_neighborhood(i, 2000.0)).collect();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(catalog)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match")
            .set_json(serde_json::json!({ "priorities": ["safety"] }))
            .to_request();
        let resp: MatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches.len(), 5);
    }

    #[actix_web::test]
    async fn test_empty_preferences_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(vec![create_neighborhood(1, 2000.0)])))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn test_limit_out_of_range_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(vec![create_neighborhood(1, 2000.0)])))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match?limit=0")
            .set_json(serde_json::json!({ "budgetRange": [2000] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn test_limit_above_configured_max_rejected() {
        let catalog = (1..=70).map(|i| create_neighborhood(i, 2000.0)).collect();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(catalog)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match?limit=80")
            .set_json(serde_json::json!({ "budgetRange": [2000] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let req = test::TestRequest::post()
            .uri("/match?limit=50")
            .set_json(serde_json::json!({ "budgetRange": [2000] }))
            .to_request();
        let resp: MatchResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.matches.len(), 50);
    }

    #[actix_web::test]
    async fn test_raised_max_limit_is_reachable() {
        let catalog = (1..=150).map(|i| create_neighborhood(i, 2000.0)).collect();
        let mut state = create_state(catalog);
        state.matching.max_limit = 200;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match?limit=120")
            .set_json(serde_json::json!({ "priorities": ["safety"] }))
            .to_request();
        let resp: MatchResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.matches.len(), 120);
    }

    #[actix_web::test]
    async fn test_empty_preference_lists_rank_on_neutral_scores() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(vec![create_neighborhood(1, 2000.0)])))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match")
            .set_json(serde_json::json!({ "lifestyle": [], "priorities": [] }))
            .to_request();
        let resp: MatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches.len(), 1);
        let breakdown = &resp.matches[0].score_breakdown;
        assert_eq!(breakdown.lifestyle, 500.0);
        assert_eq!(breakdown.priorities, 500.0);
    }

    #[actix_web::test]
    async fn test_health_reports_catalog_size() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(vec![create_neighborhood(1, 2000.0)])))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.neighborhood_count, 1);
    }
}
