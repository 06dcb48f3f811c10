mod config;
mod error;
mod handlers;
mod models;
mod providers;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use handlers::health::not_found;
use models::ErrorResponse;
use routes::api;
use services::{AiService, RateLimiter, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub search_service: SearchService,
    pub ai_service: AiService,
    pub rate_limiter: RateLimiter,
    pub config: Config,
    pub start_time: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting Search Relay Service on port {}",
        config.server.port
    );

    let http_client = reqwest::Client::new();
    let search_service = SearchService::new(http_client.clone(), &config.upstream);
    let ai_service = AiService::new(http_client, &config.upstream);
    let rate_limiter = RateLimiter::new(
        config.security.rate_limit_requests,
        Duration::from_secs(config.security.rate_limit_period),
    );

    let state = AppState {
        search_service,
        ai_service,
        rate_limiter,
        config: config.clone(),
        start_time: Instant::now(),
    };

    // Create HTTP server
    let server = HttpServer::new(move || {
        let cors = build_cors(&state.config.security.allowed_origins);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config(state.config.server.max_json_payload_size))
            .wrap(cors)
            .wrap(Logger::default())
            .service(api::config())
            .default_service(web::route().to(not_found))
    })
    .bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Server started successfully at http://{}:{}",
        config.server.host, config.server.port
    );

    // Run the server
    server.workers(config.server.workers).run().await
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request body",
            err.to_string(),
        ));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}
