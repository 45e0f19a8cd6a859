//! hashbatch response construction.
//!
//! Successful responses carry a buffered JSON document; failures carry only a
//! status. Both are a [`Full`] body, which is empty for failures.

use bytes::Bytes;
use http::{HeaderValue, StatusCode};
use http_body_util::Full;

use hashbatch_model::{HashBatchError, HealthReport};

/// Response body for every hashbatch response.
pub type HashResponseBody = Full<Bytes>;

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build a response, tagging it with `request_id` when that is a valid header value.
fn tagged_response(
    status: StatusCode,
    body: HashResponseBody,
    request_id: &str,
) -> http::Response<HashResponseBody> {
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    if let Ok(hv) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, hv);
    }
    response
}

/// Convert a `HashBatchError` into a complete HTTP error response.
///
/// Failures carry no payload: the status is the only signal, and every error
/// code produces the same response.
#[must_use]
pub fn error_to_response(
    error: &HashBatchError,
    request_id: &str,
) -> http::Response<HashResponseBody> {
    tagged_response(error.status_code, Full::default(), request_id)
}

/// Build a success response from JSON bytes.
#[must_use]
pub fn json_response(json: Bytes, request_id: &str) -> http::Response<HashResponseBody> {
    let mut response = tagged_response(StatusCode::OK, Full::new(json), request_id);
    response
        .headers_mut()
        .insert(http::header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
    response
}

/// Build the health endpoint response.
#[must_use]
pub fn health_response(
    report: &HealthReport,
    request_id: &str,
) -> http::Response<HashResponseBody> {
    match serde_json::to_vec(report) {
        Ok(json) => json_response(Bytes::from(json), request_id),
        Err(e) => error_to_response(&HashBatchError::encode(e), request_id),
    }
}

/// Build a bodiless response with the given status.
#[must_use]
pub fn status_response(status: StatusCode, request_id: &str) -> http::Response<HashResponseBody> {
    let mut response = tagged_response(status, Full::default(), request_id);
    if status == StatusCode::METHOD_NOT_ALLOWED {
        response
            .headers_mut()
            .insert(http::header::ALLOW, HeaderValue::from_static("POST, GET"));
    }
    response
}
