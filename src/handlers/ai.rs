use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{error_response, RelayError};
use crate::models::{AiGenerateRequest, AiGenerateResponse, ErrorResponse};
use crate::providers::AiProvider;
use crate::utils::{SseEvent, SseParser};
use crate::AppState;

pub async fn ai_generate(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<AiGenerateRequest>,
) -> Result<HttpResponse> {
    run_generate(state, http_req, req.into_inner()).await
}

pub async fn ai_stream(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<AiGenerateRequest>,
) -> Result<HttpResponse> {
    let mut req = req.into_inner();
    req.stream = Some(true);
    run_generate(state, http_req, req).await
}

async fn run_generate(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: AiGenerateRequest,
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

    let context = req.search_results.unwrap_or_default();
    let wants_stream = req.stream.unwrap_or(false)
        || http_req
            .headers()
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("text/event-stream"))
            .unwrap_or(false);

    let request_id = Uuid::new_v4();
    info!(%request_id, %provider, stream = wants_stream, "Dispatching AI generation request");

    // Streaming is only offered where the provider can deliver it; otherwise
    // the request falls back to the regular response path.
    if wants_stream && provider.supports_streaming() {
        match state
            .ai_service
            .stream_generate(provider, &req.query, &context, &req.api_key)
            .await
        {
            Ok(upstream) => Ok(stream_answer_response(upstream)),
            Err(e) => {
                error!(%request_id, "AI streaming error: {:?}", e);
                Ok(error_response(&e, state.config.server.development))
            }
        }
    } else {
        match state
            .ai_service
            .generate(provider, &req.query, &context, &req.api_key)
            .await
        {
            Ok(answer) => Ok(HttpResponse::Ok().json(AiGenerateResponse {
                success: true,
                response: answer,
                provider: provider.token().to_string(),
            })),
            Err(e) => {
                error!(%request_id, "AI generation error: {:?}", e);
                Ok(error_response(&e, state.config.server.development))
            }
        }
    }
}

fn stream_answer_response(upstream: reqwest::Response) -> HttpResponse {
    let (tx, rx) = mpsc::channel::<Bytes>(32);
    tokio::spawn(forward_stream(Box::pin(upstream.bytes_stream()), tx));

    let stream = ReceiverStream::new(rx).map(Ok::<Bytes, std::io::Error>);
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream)
}

// Relays upstream delta frames to the client. The terminal marker is emitted
// exactly once, whether the upstream sent it, errored, or closed early.
async fn forward_stream<S, E>(mut body: S, tx: mpsc::Sender<Bytes>)
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

    let mut parser = SseParser::new();

    'upstream: while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Upstream stream error: {}", e);
                break;
            }
        };

        for event in parser.push(&chunk) {
            match event {
                SseEvent::Delta(text) => {
                    let frame = format!("data: {}\n\n", json!({ "content": text }));
                    // A failed send means the client disconnected; stop
                    // forwarding and release the upstream connection.
                    if tx.send(Bytes::from(frame)).await.is_err() {
                        return;
                    }
                }
                SseEvent::Done => break 'upstream,
            }
        }
    }

    let _ = tx.send(Bytes::from_static(DONE_FRAME)).await;
}
