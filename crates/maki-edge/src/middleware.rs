//! Extension trait for `axum::Router` to layer the edge middleware stack.

use axum::Router;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use crate::config::{CorsConfig, create_cors_layer};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] for layering middleware.
pub trait RouterMiddlewareExt<S> {
    /// Layers [`SetRequestIdLayer`], [`TraceLayer`] and [`PropagateRequestIdLayer`].
    ///
    /// Every request gets a UUID `x-request-id` which is echoed back on the
    /// response; `Authorization` and `Cookie` are redacted from trace output.
    fn with_observability_layer(self) -> Self;

    /// Layers CORS for the configured console origins.
    fn with_cors_layer(self, config: &CorsConfig) -> Self;
}

impl<S> RouterMiddlewareExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability_layer(self) -> Self {
        // Apply layers in reverse order (last layer wraps first)
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
    }

    fn with_cors_layer(self, config: &CorsConfig) -> Self {
        self.layer(create_cors_layer(config))
    }
}
