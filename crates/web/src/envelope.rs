use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use records::InventoryError;
use serde::Serialize;
use serde_json::Value;

/// Every response body has this shape, success or not.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: Value,
}

impl Envelope {
    pub fn ok(code: StatusCode, message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            status_code: code.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: code.as_u16(),
            message: message.into(),
            data: Value::Null,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, Json(self)).into_response()
    }
}

/// A failed call: the status and the message safe to show the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub code: StatusCode,
    pub message: String,
}

impl ApiFailure {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Logs `detail` and hands back the generic failure message.
    pub fn opaque(detail: impl std::fmt::Display) -> Self {
        tracing::error!("Error handling request: {detail}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, records::OPAQUE_FAILURE)
    }
}

impl From<InventoryError> for ApiFailure {
    fn from(e: InventoryError) -> Self {
        let code = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if code.is_client_error() {
            tracing::info!("Rejected request: {e}");
        }
        Self::new(code, e.public_message())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        Envelope::failure(self.code, self.message).into_response()
    }
}
