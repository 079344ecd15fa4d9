use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::app::errors;

/// Decode a JSON body into a typed request.
///
/// Handlers extract `serde_json::Value` first so malformed identifiers or emails
/// come back as `400 invalid_body` instead of the extractor's own rejection.
pub fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, axum::response::Response> {
    serde_json::from_value(body)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.to_string()))
}
