use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Handler-level error with stable HTTP mapping.
#[derive(Debug)]
pub enum WebError {
    Input(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "input_error".to_string()),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found".to_string()),
            WebError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "internal_error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

impl From<crate::core::BagError> for WebError {
    fn from(err: crate::core::BagError) -> Self {
        use crate::core::BagError;
        match err {
            BagError::NotFound(id) => Self::NotFound(format!("item '{id}' not found")),
            BagError::Validation(msg) => Self::Input(msg),
            BagError::MutationFailed(cause) => Self::Internal(cause.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BagError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let mapped = WebError::from(BagError::Validation("name is required".to_string()));
        assert!(matches!(mapped, WebError::Input(_)));

        let response = mapped.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = WebError::from(BagError::NotFound("a".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
