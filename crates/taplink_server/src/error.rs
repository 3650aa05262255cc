//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taplink_core::content::{DecodeError, EditError};
use taplink_core::AppError;

/// Wrapper mapping [`AppError`] onto HTTP responses.
///
/// Handlers return `Result<_, HttpError>` and use `?` on core operations;
/// the status mapping lives in one place here.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<EditError> for HttpError {
    fn from(value: EditError) -> Self {
        Self(AppError::BadRequest(value.to_string()))
    }
}

impl From<DecodeError> for HttpError {
    fn from(value: DecodeError) -> Self {
        Self(AppError::BadRequest(value.to_string()))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::StorageMessage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            other => {
                tracing::error!("Internal error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_error_variants() {
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Conflict("taken".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Unauthorized("no token".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = HttpError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn edit_and_decode_errors_map_to_bad_request() {
        let edit: HttpError = EditError::UnknownComponentType("Carousel".to_string()).into();
        assert_eq!(edit.into_response().status(), StatusCode::BAD_REQUEST);

        let decode: HttpError = DecodeError::Malformed("oops".to_string()).into();
        assert_eq!(decode.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
