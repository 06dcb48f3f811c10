use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde_json::json;

use crate::models::HealthResponse;
use crate::providers::{AiProvider, SearchProvider};
use crate::AppState;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: vec![
            "search".to_string(),
            "ai-generation".to_string(),
            "streaming".to_string(),
            "chat-history".to_string(),
        ],
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn api_info() -> Result<HttpResponse> {
    let search_providers: Vec<&str> = SearchProvider::ALL.iter().map(|p| p.token()).collect();
    let ai_providers: Vec<&str> = AiProvider::ALL.iter().map(|p| p.token()).collect();

    Ok(HttpResponse::Ok().json(json!({
        "name": "Search Relay API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered search relay with real-time web search and AI answer synthesis",
        "endpoints": {
            "/api/search": "Perform web search",
            "/api/ai-generate": "Generate AI response based on search results",
            "/api/ai-stream": "Stream AI response",
            "/api/chat": "Chat with AI using conversation history",
            "/api/health": "Health check",
            "/api/info": "API info"
        },
        "supported_providers": {
            "search": search_providers,
            "ai": ai_providers
        }
    })))
}

pub async fn not_found() -> Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(json!({
        "error": "Endpoint not found",
        "available_endpoints": [
            "/api/search",
            "/api/ai-generate",
            "/api/ai-stream",
            "/api/chat",
            "/api/health",
            "/api/info"
        ]
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::Value;

    use crate::handlers::not_found;
    use crate::handlers::test_support::test_state;
    use crate::routes::api;

    #[actix_rt::test]
    async fn health_reports_ok_with_features() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["features"]
            .as_array()
            .unwrap()
            .contains(&Value::from("streaming")));
    }

    #[actix_rt::test]
    async fn info_lists_supported_providers() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/info").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["supported_providers"]["search"],
            serde_json::json!(["serpapi", "brave", "serper"])
        );
        assert_eq!(
            body["supported_providers"]["ai"],
            serde_json::json!(["openai", "groq", "cohere", "anthropic"])
        );
    }

    #[actix_rt::test]
    async fn unmatched_routes_get_404_with_known_endpoints() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(api::config())
                .default_service(web::route().to(not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Endpoint not found");
        assert!(body["available_endpoints"]
            .as_array()
            .unwrap()
            .contains(&Value::from("/api/search")));
    }
}
