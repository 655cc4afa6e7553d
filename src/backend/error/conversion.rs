/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers and middleware.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 403
 * }
 * ```
 *
 * Rate-limit rejections are the exception: the message is sent as a
 * plain-text body, with a `Retry-After` header.
 */

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            // Rate-limit rejections are plain text
            BackendError::RateLimited { message, retry_after_secs } => {
                let mut response = (status, message).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            other => {
                let body = serde_json::json!({
                    "error": other.message(),
                    "status": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}
