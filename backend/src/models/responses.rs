//! # API Response Models
//!
//! Structures for outgoing API response bodies.
//! Every successful response is wrapped in one of two envelopes.
//!
//! ## Single Response
//!
//! ```json
//! {
//!     "success": true,
//!     "data": { "id": 1, "nombre": "Oficinas Centrales XYZ", ... },
//!     "timestamp": 1716470400
//! }
//! ```
//!
//! ## Paginated Response
//!
//! ```json
//! {
//!     "success": true,
//!     "data": [ ... ],
//!     "total_items": 25,
//!     "page": 1,
//!     "page_size": 10,
//!     "total_pages": 3,
//!     "timestamp": 1716470400
//! }
//! ```
//!
//! ## Error Response
//!
//! ```json
//! {
//!     "success": false,
//!     "error": { "code": "NOT_FOUND", "message": "Cliente not found" },
//!     "timestamp": 1716470400
//! }
//! ```
//!
//! `timestamp` is Unix seconds, taken when the envelope is built.

use serde::{Deserialize, Serialize};

use crate::utils::{to_total_pages, unix_timestamp};

/// `{ "message": "..." }`, used for deletes and health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Single-object envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,

    /// The payload. Serialized as `null` when absent.
    pub data: Option<T>,

    /// Unix seconds at construction.
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    /// Wrap an optional payload.
    pub fn wrap(success: bool, data: Option<T>) -> Self {
        Self {
            success,
            data,
            timestamp: unix_timestamp(),
        }
    }

    /// Create a successful response with data.
    pub fn success(data: T) -> Self {
        Self::wrap(true, Some(data))
    }
}

impl ApiResponse<MessageBody> {
    /// Create a successful response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(MessageBody::new(message))
    }
}

/// Payload of a paginated envelope: the page items or a message.
///
/// Serialized untagged, so it is either a JSON array or `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageData<T> {
    Items(Vec<T>),
    Message(MessageBody),
}

/// Paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponsePaginated<T> {
    pub success: bool,
    pub data: Option<PageData<T>>,
    pub total_items: i64,
    pub page: i64,
    pub page_size: i64,
    /// `ceil(total_items / page_size)`, or 1 when there are no items.
    pub total_pages: i64,
    pub timestamp: i64,
}

impl<T> ApiResponsePaginated<T> {
    /// Wrap one page of items, computing `total_pages`.
    ///
    /// `items` must not hold more than `page_size` entries.
    pub fn wrap(success: bool, items: Vec<T>, total_items: i64, page: i64, page_size: i64) -> Self {
        debug_assert!(items.len() as i64 <= page_size, "page holds more items than page_size");
        Self::build(success, Some(PageData::Items(items)), total_items, page, page_size)
    }

    /// Paginated envelope whose `data` is a message instead of items.
    ///
    /// Part of the envelope contract even though no list route answers with
    /// a message today.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn message(message: impl Into<String>, total_items: i64, page: i64, page_size: i64) -> Self {
        Self::build(
            true,
            Some(PageData::Message(MessageBody::new(message))),
            total_items,
            page,
            page_size,
        )
    }

    fn build(success: bool, data: Option<PageData<T>>, total_items: i64, page: i64, page_size: i64) -> Self {
        Self {
            success,
            data,
            total_items,
            page,
            page_size,
            total_pages: to_total_pages(total_items, page_size),
            timestamp: unix_timestamp(),
        }
    }
}

/// Returned by `POST /v1/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub is_admin: bool,
}

/// Error envelope written by `ApiError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    pub timestamp: i64,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
            timestamp: unix_timestamp(),
        }
    }
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// e.g. `NOT_FOUND`
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::db::models::ClienteRecord;

    fn cliente() -> ClienteRecord {
        ClienteRecord {
            id: 1,
            nombre: "Oficinas Centrales XYZ".to_string(),
            direccion: "Av. Libertador 2000".to_string(),
            telefono: Some("099123456".to_string()),
            correo: None,
        }
    }

    #[test]
    fn test_single_envelope_shape() {
        let response = ApiResponse::success(cliente());
        let value = serde_json::to_value(&response).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"]["nombre"], json!("Oficinas Centrales XYZ"));
        assert_eq!(value["data"]["correo"], Value::Null);
        assert!(value["timestamp"].is_i64());
    }

    #[test]
    fn test_single_envelope_round_trip() {
        let response = ApiResponse::success(cliente());
        let text = serde_json::to_string(&response).unwrap();
        let back: ApiResponse<ClienteRecord> = serde_json::from_str(&text).unwrap();

        assert!(back.success);
        assert_eq!(back.data, Some(cliente()));
        assert_eq!(back.timestamp, response.timestamp);
    }

    #[test]
    fn test_message_envelope() {
        let value = serde_json::to_value(ApiResponse::message("Cliente deleted successfully")).unwrap();
        assert_eq!(value["data"], json!({ "message": "Cliente deleted successfully" }));
    }

    #[test]
    fn test_absent_data_is_null() {
        let value = serde_json::to_value(ApiResponse::<ClienteRecord>::wrap(false, None)).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["data"], Value::Null);
    }

    #[test]
    fn test_paginated_first_page() {
        let items = vec![cliente(); 10];
        let response = ApiResponsePaginated::wrap(true, items, 25, 1, 10);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["total_pages"], json!(3));
        assert_eq!(value["total_items"], json!(25));
        assert_eq!(value["page"], json!(1));
        assert_eq!(value["page_size"], json!(10));
        assert_eq!(value["data"].as_array().unwrap().len(), 10);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "page holds more items than page_size")]
    fn test_paginated_rejects_oversized_page() {
        ApiResponsePaginated::wrap(true, vec![cliente(); 11], 25, 1, 10);
    }

    #[test]
    fn test_paginated_empty_collection() {
        let response = ApiResponsePaginated::<ClienteRecord>::wrap(true, Vec::new(), 0, 1, 10);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["total_pages"], json!(1));
        assert_eq!(value["data"], json!([]));
    }

    #[test]
    fn test_paginated_message_payload_round_trips() {
        let response = ApiResponsePaginated::<ClienteRecord>::message("No hay clientes", 0, 1, 10);
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains(r#""data":{"message":"No hay clientes"}"#));

        let back: ApiResponsePaginated<ClienteRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.data, Some(PageData::Message(MessageBody::new("No hay clientes"))));
    }

    #[test]
    fn test_error_envelope_shape() {
        let value = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "Cliente not found")).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!({ "code": "NOT_FOUND", "message": "Cliente not found" }));
        assert!(value.get("data").is_none());
    }
}
