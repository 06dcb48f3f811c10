use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid API key. Please check your credentials.")]
    InvalidApiKey,
    #[error("API rate limit exceeded. Please try again later.")]
    UpstreamRateLimited,
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("Upstream API error: {status} - {body}")]
    Upstream { status: u16, body: String },
    #[error("Internal server error. Please try again later.")]
    Internal(anyhow::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            RelayError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => RelayError::InvalidApiKey,
            429 => RelayError::UpstreamRateLimited,
            other => RelayError::Upstream {
                status: other,
                body,
            },
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Internal(err.into())
        }
    }
}

pub fn error_response(err: &RelayError, development: bool) -> HttpResponse {
    let body = match err {
        RelayError::Internal(source) if development => {
            ErrorResponse::with_details(err.to_string(), source.to_string())
        }
        _ => ErrorResponse::new(err.to_string()),
    };
    HttpResponse::build(err.status_code()).json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::FORBIDDEN, StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS)]
    #[case(StatusCode::BAD_GATEWAY, StatusCode::BAD_GATEWAY)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    fn upstream_status_mapping(#[case] upstream: StatusCode, #[case] expected: StatusCode) {
        let err = RelayError::from_status(upstream, "boom".to_string());
        assert_eq!(err.status_code(), expected);
    }

    #[actix_rt::test]
    async fn internal_detail_only_in_development() {
        let err = RelayError::Internal(anyhow::anyhow!("connection reset by peer"));

        let public = error_response(&err, false);
        assert_eq!(public.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(public.into_body()).await.unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("connection reset by peer"));

        let detailed = error_response(&err, true);
        assert_eq!(detailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(detailed.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("connection reset by peer"));
    }

    #[test]
    fn timeout_maps_to_408() {
        assert_eq!(RelayError::Timeout.status_code(), StatusCode::REQUEST_TIMEOUT);
    }
}
