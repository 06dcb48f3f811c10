use crate::handlers;
use actix_web::{web, Scope};

pub fn config() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health_check))
        .route("/info", web::get().to(handlers::api_info))
        .route("/search", web::post().to(handlers::search))
        .route("/ai-generate", web::post().to(handlers::ai_generate))
        .route("/ai-stream", web::post().to(handlers::ai_stream))
        .route("/chat", web::post().to(handlers::chat))
}
