//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use order_store::OrderStoreError;
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Saga execution error.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => plain_error(StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => plain_error(StatusCode::BAD_REQUEST, msg),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                plain_error(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

fn plain_error(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}

fn saga_error_to_response(err: SagaError) -> Response {
    match &err {
        // Field errors go back to the caller structured, so clients can
        // attach them to the offending inputs.
        SagaError::Validation(fields) => {
            let body = serde_json::json!({ "error": err.to_string(), "fields": fields });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        SagaError::MultiRestaurantOrder => plain_error(StatusCode::CONFLICT, err.to_string()),
        SagaError::CustomerNotFound(_)
        | SagaError::RestaurantNotFound(_)
        | SagaError::ItemNotFound { .. } => plain_error(StatusCode::NOT_FOUND, err.to_string()),
        // Upstream data was malformed or the gateway refused the intent;
        // neither is the caller's fault.
        SagaError::InvalidAmount { .. } | SagaError::PaymentRejected { .. } => {
            plain_error(StatusCode::BAD_GATEWAY, err.to_string())
        }
        SagaError::Unavailable { .. } => {
            plain_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        SagaError::Store(OrderStoreError::DuplicateReference(_)) => {
            plain_error(StatusCode::CONFLICT, err.to_string())
        }
        SagaError::Store(OrderStoreError::NotFound(_)) => {
            plain_error(StatusCode::NOT_FOUND, err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "order placement failed unexpectedly");
            plain_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}
