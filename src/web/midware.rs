use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::web::{log, request_id, Error};

/// Turns a `web::Error` stashed in the response extensions into the client facing response
/// and writes a log line for every request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = request_id(&headers);

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| &**er);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    // Internal details only ever end up in the server logs.
    if let (Some(er), Some((status, _))) = (web_error, &client_status_and_error) {
        if status.is_server_error() {
            tracing::error!("SERVER ERROR: {er:?} ID: {req_id:?}");
        }
    }

    let err_resp = client_status_and_error
        .as_ref()
        .map(|(status, cl_err)| (*status, Json(cl_err.body())).into_response());

    log::log_request(
        req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
