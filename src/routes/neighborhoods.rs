use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{catalog_stats, NeighborhoodQuery};
use crate::models::{ErrorResponse, NeighborhoodListQuery};
use crate::routes::matches::AppState;

/// Configure catalog browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/neighborhoods", web::get().to(list_neighborhoods))
        .route("/neighborhoods/{id}", web::get().to(get_neighborhood))
        .route("/data/quality", web::get().to(data_quality))
        .route("/stats", web::get().to(stats));
}

/// List neighborhoods with filtering, sorting and pagination
///
/// GET /api/v1/neighborhoods?city=bay&maxRent=2500&features=parks,cafes&sortBy=average_rent&sortOrder=desc&page=1&limit=10
async fn list_neighborhoods(
    state: web::Data<AppState>,
    query: web::Query<NeighborhoodListQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let catalog_query = match NeighborhoodQuery::from_request(&query) {
        Ok(q) => q,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Invalid query",
                e.to_string(),
                400,
            ));
        }
    };

    let catalog = state.catalog.snapshot();
    let page = catalog_query.apply(&catalog.neighborhoods);

    tracing::debug!("Listing page {} of {} ({} total)", page.page, page.total_pages, page.total);

    HttpResponse::Ok().json(page)
}

/// Fetch one neighborhood by id
async fn get_neighborhood(state: web::Data<AppState>, path: web::Path<u32>) -> impl Responder {
    let id = path.into_inner();
    let catalog = state.catalog.snapshot();

    match catalog.get(id) {
        Some(neighborhood) => HttpResponse::Ok().json(neighborhood),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "Neighborhood not found",
            format!("No neighborhood with id {}", id),
            404,
        )),
    }
}

/// Data quality of the current catalog snapshot
async fn data_quality(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.catalog.snapshot();
    HttpResponse::Ok().json(&catalog.quality)
}

/// Aggregate statistics over the current catalog snapshot
async fn stats(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.catalog.snapshot();
    HttpResponse::Ok().json(catalog_stats(&catalog.neighborhoods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use std::sync::Arc;
    use crate::config::MatchingSettings;
    use crate::core::Matcher;
    use crate::models::{CatalogStats, DataQualityMetrics, Neighborhood, NeighborhoodPage};
    use crate::services::CatalogStore;

    fn create_neighborhood(id: u32, name: &str, city: &str, rent: f64) -> Neighborhood {
        Neighborhood {
            id,
            name: name.to_string(),
            city: city.to_string(),
            state: "CA".to_string(),
            features: vec!["parks".to_string()],
            average_rent: rent,
            walk_score: 70.0,
            safety_rating: 4.0,
            description: String::new(),
            image: String::new(),
            pet_friendly: true,
            transit_score: None,
            bike_score: None,
            crime_rate: None,
            school_rating: None,
        }
    }

    fn create_state() -> web::Data<AppState> {
        let catalog = vec![
            create_neighborhood(1, "Maple Grove", "Riverton", 1600.0),
            create_neighborhood(2, "Downtown", "Bay City", 2800.0),
            create_neighborhood(3, "Arts District", "Bay City", 2200.0),
        ];
        web::Data::new(AppState {
            catalog: Arc::new(CatalogStore::from_neighborhoods(catalog)),
            matcher: Matcher::with_default_weights(),
            matching: MatchingSettings::default(),
        })
    }

    #[actix_web::test]
    async fn test_list_filters_and_sorts() {
        let app = test::init_service(App::new().app_data(create_state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/neighborhoods?city=bay&sortBy=average_rent&sortOrder=desc")
            .to_request();
        let page: NeighborhoodPage = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<u32> = page.neighborhoods.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(page.total_pages, 1);
    }

    #[actix_web::test]
    async fn test_list_rejects_unknown_sort_key() {
        let app = test::init_service(App::new().app_data(create_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/neighborhoods?sortBy=population").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn test_get_by_id() {
        let app = test::init_service(App::new().app_data(create_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/neighborhoods/3").to_request();
        let n: Neighborhood = test::call_and_read_body_json(&app, req).await;
        assert_eq!(n.name, "Arts District");

        let req = test::TestRequest::get().uri("/neighborhoods/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[actix_web::test]
    async fn test_quality_and_stats() {
        let app = test::init_service(App::new().app_data(create_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/data/quality").to_request();
        let quality: DataQualityMetrics = test::call_and_read_body_json(&app, req).await;
        assert_eq!(quality.accuracy, 95.0);
        assert!(quality.missing_fields.contains("description"));

        let req = test::TestRequest::get().uri("/stats").to_request();
        let stats: CatalogStats = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.total_neighborhoods, 3);
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.pet_friendly_count, 3);
    }
}
