mod error;
mod log;
pub mod midware;
pub mod routes;
pub mod serve;

pub use error::{ClientError, Error, WebResult};
pub use serve::serve;

use axum::http::HeaderMap;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The request id set by `SetRequestIdLayer`, `None` if missing or not visible ASCII.
pub(crate) fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
}
