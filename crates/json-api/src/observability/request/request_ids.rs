//! Request ID resolution and response header helpers.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's request id when it sent a non-blank one.
pub(super) fn resolve_request_id(incoming: Option<String>) -> String {
    match incoming {
        Some(id) if !id.trim().is_empty() => id,
        _ => Uuid::now_v7().to_string(),
    }
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => warn!(request_id, "request id is not a valid header value: {source}"),
    }
}

/// Handlers that render without setting a status answer 200.
pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}
