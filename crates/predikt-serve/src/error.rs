use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use predikt_core::PrediktError;
use serde::Serialize;
use thiserror::Error;

/// Every failure a predictor handler can report, rendered as
/// `{"error": "<message>"}` with the matching status code.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServeError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ServeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Validation(_) => StatusCode::BAD_REQUEST,
            ServeError::NotFound(_) => StatusCode::NOT_FOUND,
            ServeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let code = self.status();
        if code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = code.as_u16(), error = %self, "request rejected");
        }
        let msg = match self {
            ServeError::Validation(s) | ServeError::NotFound(s) | ServeError::Internal(s) => s,
        };
        (code, Json(ErrBody { error: msg })).into_response()
    }
}

// Input-shaped errors are the caller's fault; everything else is ours.
impl From<PrediktError> for ServeError {
    fn from(err: PrediktError) -> Self {
        if err.is_input_error() {
            ServeError::Validation(err.to_string())
        } else {
            ServeError::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_renders_error_body() {
        let resp = ServeError::validation("Missing field: age").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Missing field: age"}));
    }

    #[test]
    fn test_from_predikt_error() {
        let e: ServeError = PrediktError::MissingColumn("distance".into()).into();
        assert!(matches!(e, ServeError::Validation(_)));
        let e: ServeError = PrediktError::UnseenLabel("Initech".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "y contains previously unseen labels: 'Initech'");
    }
}
