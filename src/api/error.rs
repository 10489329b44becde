use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::EngineError;
use crate::providers::ProviderError;

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) => engine_status(e),
            ApiError::Provider(ProviderError::NoData { .. }) => StatusCode::NOT_FOUND,
            ApiError::Provider(ProviderError::Series(e)) => engine_status(e),
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

fn engine_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidBarSeries(_) | EngineError::InsufficientData { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_engine_errors_to_4xx() {
        let insufficient = ApiError::from(EngineError::InsufficientData {
            indicator: "ADX",
            required: 29,
            available: 3,
        });
        assert_eq!(insufficient.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::from(EngineError::InvalidRequest("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn maps_provider_errors() {
        let no_data = ApiError::from(ProviderError::NoData {
            provider: "yahoo".into(),
            symbol: "ZZZ".into(),
        });
        assert_eq!(no_data.status(), StatusCode::NOT_FOUND);

        let upstream = ApiError::from(ProviderError::Upstream {
            provider: "finnhub".into(),
            status: 429,
            message: "rate limited".into(),
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let bad_series = ApiError::from(ProviderError::Series(EngineError::InvalidBarSeries("empty".into())));
        assert_eq!(bad_series.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
