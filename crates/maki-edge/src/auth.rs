//! Session termination and liveness routes served by the edge itself.

use axum::Json;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use maki_core::AUTH_COOKIE_NAME;
use serde_json::json;

use crate::TRACING_TARGET_AUTH;

/// Clears the session cookie on the caller.
///
/// Always succeeds: terminating a session that no longer exists is not an
/// error. The cookie is expired with the same attributes it was set with so
/// the browser actually drops it.
#[tracing::instrument(skip_all)]
pub(crate) async fn logout() -> Response {
    tracing::debug!(target: TRACING_TARGET_AUTH, "clearing session cookie");
    let expired = format!("{AUTH_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly");
    (
        [(header::SET_COOKIE, expired)],
        Json(json!({"message": "Logout successful"})),
    )
        .into_response()
}

/// Liveness probe for the edge process itself.
pub(crate) async fn health() -> Response {
    Json(json!({"status": "ok"})).into_response()
}
