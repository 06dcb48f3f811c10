pub mod ai;
pub mod chat;
pub mod health;
pub mod search;

pub use ai::*;
pub use chat::*;
pub use health::*;
pub use search::*;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use tracing::warn;

use crate::models::ErrorResponse;
use crate::services::RateDecision;
use crate::AppState;

pub(crate) fn client_identity(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) async fn enforce_rate_limit(
    state: &AppState,
    req: &HttpRequest,
) -> Option<HttpResponse> {
    let client_id = client_identity(req);
    match state.rate_limiter.check(&client_id).await {
        RateDecision::Allowed => None,
        RateDecision::Limited { retry_after } => {
            warn!("Rate limit exceeded for {}", client_id);
            Some(
                HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, retry_after.as_secs().to_string()))
                    .json(ErrorResponse::new(
                        "Rate limit exceeded. Please try again in a minute.",
                    )),
            )
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::{Duration, Instant};

    use crate::config::Config;
    use crate::services::{AiService, RateLimiter, SearchService};
    use crate::AppState;

    pub(crate) fn test_state() -> AppState {
        test_state_with_config(Config::default())
    }

    pub(crate) fn test_state_with_config(config: Config) -> AppState {
        let client = reqwest::Client::new();
        AppState {
            search_service: SearchService::new(client.clone(), &config.upstream),
            ai_service: AiService::new(client, &config.upstream),
            rate_limiter: RateLimiter::new(
                config.security.rate_limit_requests,
                Duration::from_secs(config.security.rate_limit_period),
            ),
            config,
            start_time: Instant::now(),
        }
    }
}
