use actix_web::{web, HttpRequest, HttpResponse, Result};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::{error_response, RelayError};
use crate::models::{ErrorResponse, SearchRequest, SearchResponse};
use crate::providers::SearchProvider;
use crate::AppState;

pub async fn search(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse> {
    if let Some(denied) = super::enforce_rate_limit(&state, &http_req).await {
        return Ok(denied);
    }

    // Validate request
    if let Err(e) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    let Some(provider) = SearchProvider::parse(&req.provider) else {
        let e = RelayError::BadRequest("Invalid search provider".to_string());
        return Ok(error_response(&e, state.config.server.development));
    };

    let request_id = Uuid::new_v4();
    info!(%request_id, %provider, "Dispatching search request");

    match state
        .search_service
        .search(provider, &req.query, &req.api_key)
        .await
    {
        Ok(results) => {
            info!(%request_id, count = results.len(), "Search completed");
            Ok(HttpResponse::Ok().json(SearchResponse {
                success: true,
                results,
                query: req.query.clone(),
                provider: provider.token().to_string(),
            }))
        }
        Err(e) => {
            error!(%request_id, "Search error: {:?}", e);
            Ok(error_response(&e, state.config.server.development))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::json;

    use crate::handlers::test_support::test_state;
    use crate::handlers::not_found;
    use crate::models::ErrorResponse;
    use crate::routes::api;

    #[actix_rt::test]
    async fn unknown_provider_is_rejected_before_any_network_call() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "rust ownership", "provider": "google", "apiKey": "k" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid search provider");
    }

    #[actix_rt::test]
    async fn oversized_query_is_rejected_with_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({
                "query": "x".repeat(501),
                "provider": "serpapi",
                "apiKey": "k"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid request");
    }

    #[actix_rt::test]
    async fn empty_query_is_rejected_with_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "", "provider": "serpapi", "apiKey": "k" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn missing_fields_are_rejected_with_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "rust ownership" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn eleventh_request_within_the_window_gets_429() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config())
                .default_service(web::route().to(not_found)),
        )
        .await;

        let peer = "10.0.0.1:40000".parse().unwrap();
        for _ in 0..10 {
            let req = test::TestRequest::post()
                .uri("/api/search")
                .peer_addr(peer)
                .set_json(json!({ "query": "q", "provider": "nope", "apiKey": "k" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            // The gate runs first, so these fail validation, not the limiter.
            assert_eq!(resp.status(), 400);
        }

        let req = test::TestRequest::post()
            .uri("/api/search")
            .peer_addr(peer)
            .set_json(json!({ "query": "q", "provider": "nope", "apiKey": "k" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);

        // A different client is unaffected.
        let req = test::TestRequest::post()
            .uri("/api/search")
            .peer_addr("10.0.0.2:40000".parse().unwrap())
            .set_json(json!({ "query": "q", "provider": "nope", "apiKey": "k" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
