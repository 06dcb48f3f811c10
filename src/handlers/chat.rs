use actix_web::{web, HttpRequest, HttpResponse, Result};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::{error_response, RelayError};
use crate::models::{AiGenerateResponse, ChatRequest, ErrorResponse};
use crate::providers::AiProvider;
use crate::AppState;

pub async fn chat(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<ChatRequest>,
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

    let Some(provider) = AiProvider::parse(&req.provider) else {
        let e = RelayError::BadRequest("Invalid AI provider".to_string());
        return Ok(error_response(&e, state.config.server.development));
    };

    // Multi-turn history is only wired up for a subset of AI providers.
    if !provider.supports_chat() {
        let e = RelayError::BadRequest("Invalid AI provider for chat".to_string());
        return Ok(error_response(&e, state.config.server.development));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, %provider, turns = req.messages.len(), "Dispatching chat request");

    match state
        .ai_service
        .chat(provider, &req.messages, &req.api_key)
        .await
    {
        Ok(answer) => Ok(HttpResponse::Ok().json(AiGenerateResponse {
            success: true,
            response: answer,
            provider: provider.token().to_string(),
        })),
        Err(e) => {
            error!(%request_id, "Chat error: {:?}", e);
            Ok(error_response(&e, state.config.server.development))
        }
    }
}
