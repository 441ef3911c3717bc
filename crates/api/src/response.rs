//! Response envelope types.
//!
//! Every JSON response carries a boolean `success`. Successful responses add
//! `data`, or a `message` and optionally the new `id`; failures add `error`.
//! Use these types instead of ad-hoc `serde_json::json!` bodies.

use axum::response::{IntoResponse, Response};
use axum::Json;
use grocerific_core::types::DbId;
use serde::Serialize;

/// `{ "success": true, "data": T }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `{ "success": true, "message": ..., "id"?: ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            id: None,
        }
    }

    pub fn with_id(message: &'static str, id: DbId) -> Self {
        Self {
            id: Some(id),
            ..Self::new(message)
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `{ "success": false, "error": ... }`. The status code is set by the
/// caller (see [`crate::error::AppError`]).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_omits_absent_id() {
        let value = serde_json::to_value(MessageResponse::new("Item deleted successfully")).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "message": "Item deleted successfully" })
        );
    }

    #[test]
    fn message_includes_new_id() {
        let value =
            serde_json::to_value(MessageResponse::with_id("Item added successfully", 7)).unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn error_envelope_shape() {
        let value = serde_json::to_value(ErrorResponse::new("Item not found")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "Item not found" }));
    }
}
