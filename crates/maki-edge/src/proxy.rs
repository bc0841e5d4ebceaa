//! The wildcard forwarding handler.
//!
//! The proxy is a transparent tunnel with one added header: whatever the
//! backend answers is relayed byte-for-byte — status, headers and body
//! stream — with no reinterpretation. Per request the decision tree is
//! terminal at the first matching branch:
//!
//! 1. No session cookie: 401, the backend is never contacted.
//! 2. Forwarding fails at the transport level: generic 500.
//! 3. Otherwise: the backend's response, relayed as-is.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use maki_core::AUTH_COOKIE_NAME;

use crate::TRACING_TARGET_PROXY;
use crate::error::ErrorKind;
use crate::state::ProxyState;

/// Local path prefix under which the proxy is mounted.
const API_PREFIX: &str = "/api";

/// Forwards one request to the backend.
///
/// All methods are routed through this handler; GET and HEAD forward
/// without a body, everything else streams the incoming body through while
/// it is still being received.
#[tracing::instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub(crate) async fn forward(
    State(state): State<ProxyState>,
    jar: CookieJar,
    request: Request,
) -> Response {
    let Some(cookie) = jar.get(AUTH_COOKIE_NAME) else {
        tracing::debug!(
            target: TRACING_TARGET_PROXY,
            path = %request.uri().path(),
            "rejecting request without session cookie"
        );
        return ErrorKind::Unauthorized.into_response();
    };

    let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", cookie.value())) else {
        return ErrorKind::Unauthorized.into_response();
    };

    let target = target_url(&state, request.uri().path(), request.uri().query());
    let method = request.method().clone();

    // The backend must see its own host, not the edge's. Content-Length is
    // recomputed by the outbound client when the body is streamed.
    let mut headers = request.headers().clone();
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(header::AUTHORIZATION, bearer);

    let mut outbound = state
        .http()
        .request(method.clone(), &target)
        .headers(headers);
    if method != Method::GET && method != Method::HEAD {
        let body = request.into_body().into_data_stream();
        outbound = outbound.body(reqwest::Body::wrap_stream(body));
    }

    match outbound.send().await {
        Ok(upstream) => relay(upstream),
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_PROXY,
                target_url = %target,
                error = %error,
                "failed to forward request to backend"
            );
            ErrorKind::UpstreamFailure.into_response()
        }
    }
}

/// Builds the backend URL: local prefix stripped, query preserved verbatim.
fn target_url(state: &ProxyState, path: &str, query: Option<&str>) -> String {
    let stripped = path.strip_prefix(API_PREFIX).unwrap_or(path);
    let base = state.backend_url().as_str().trim_end_matches('/');
    match query {
        Some(query) => format!("{base}{stripped}?{query}"),
        None => format!("{base}{stripped}"),
    }
}

/// Relays the backend response unchanged: status, headers, body stream.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    // Framing is re-established by the server leg.
    headers.remove(header::TRANSFER_ENCODING);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::{Query, State as AxumState};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use url::Url;

    use crate::config::ProxyConfig;
    use crate::routes::routes;
    use crate::state::ProxyState;

    #[derive(Clone, Default)]
    struct UpstreamProbe {
        hits: Arc<AtomicUsize>,
        seen_headers: Arc<Mutex<Option<HeaderMap>>>,
    }

    async fn spawn_upstream(probe: UpstreamProbe) -> anyhow::Result<SocketAddr> {
        async fn list_customers(
            AxumState(probe): AxumState<UpstreamProbe>,
            headers: HeaderMap,
        ) -> impl axum::response::IntoResponse {
            probe.hits.fetch_add(1, Ordering::SeqCst);
            *probe.seen_headers.lock().unwrap() = Some(headers);
            (
                StatusCode::CREATED,
                [("x-upstream", "maki-backend")],
                axum::Json(json!({"id": 1, "nombre": "Acme"})),
            )
        }

        async fn echo_query(
            Query(params): Query<std::collections::HashMap<String, String>>,
        ) -> impl axum::response::IntoResponse {
            axum::Json(json!(params))
        }

        async fn echo_body(body: String) -> impl axum::response::IntoResponse {
            (StatusCode::CREATED, body)
        }

        let router = Router::new()
            .route("/clientes", get(list_customers))
            .route("/clientes", post(echo_body))
            .route("/contadores", get(echo_query))
            .with_state(probe);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok(addr)
    }

    fn edge_for(addr: SocketAddr) -> anyhow::Result<TestServer> {
        let config = ProxyConfig {
            backend_url: Url::parse(&format!("http://{addr}"))?,
            timeout: 5,
        };
        let state = ProxyState::from_config(&config)?;
        Ok(TestServer::new(routes(state))?)
    }

    #[tokio::test]
    async fn missing_cookie_is_rejected_without_contacting_backend() -> anyhow::Result<()> {
        let probe = UpstreamProbe::default();
        let server = edge_for(spawn_upstream(probe.clone()).await?)?;

        let response = server.get("/api/clientes").await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({"message": "No autorizado"}));

        assert_eq!(probe.hits.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn backend_response_is_relayed_byte_for_byte() -> anyhow::Result<()> {
        let probe = UpstreamProbe::default();
        let server = edge_for(spawn_upstream(probe.clone()).await?)?;

        let response = server
            .get("/api/clientes")
            .add_header("Cookie", "auth-token=tok-123")
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            response.headers().get("x-upstream").map(|v| v.to_str().unwrap()),
            Some("maki-backend")
        );
        response.assert_json(&json!({"id": 1, "nombre": "Acme"}));
        Ok(())
    }

    #[tokio::test]
    async fn bearer_is_injected_and_host_is_not_leaked() -> anyhow::Result<()> {
        let probe = UpstreamProbe::default();
        let addr = spawn_upstream(probe.clone()).await?;
        let server = edge_for(addr)?;

        server
            .get("/api/clientes")
            .add_header("Cookie", "auth-token=tok-123")
            .add_header("Host", "panel.makicontrol.com")
            .await
            .assert_status(StatusCode::CREATED);

        let seen = probe.seen_headers.lock().unwrap().clone().expect("backend hit");
        assert_eq!(
            seen.get("authorization").map(|v| v.to_str().unwrap()),
            Some("Bearer tok-123")
        );
        // The backend sees its own host, never the edge's public one.
        assert_ne!(
            seen.get("host").map(|v| v.to_str().unwrap()),
            Some("panel.makicontrol.com")
        );
        Ok(())
    }

    #[tokio::test]
    async fn query_string_is_preserved_verbatim() -> anyhow::Result<()> {
        let probe = UpstreamProbe::default();
        let server = edge_for(spawn_upstream(probe).await?)?;

        let response = server
            .get("/api/contadores?mes=07&anio=2026")
            .add_header("Cookie", "auth-token=tok-123")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"mes": "07", "anio": "2026"}));
        Ok(())
    }

    #[tokio::test]
    async fn request_body_is_streamed_through_unmodified() -> anyhow::Result<()> {
        let probe = UpstreamProbe::default();
        let server = edge_for(spawn_upstream(probe).await?)?;

        let payload = json!({"nombre": "Acme", "ruc": "20481234567"});
        let response = server
            .post("/api/clientes")
            .add_header("Cookie", "auth-token=tok-123")
            .json(&payload)
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            serde_json::from_str::<Value>(&response.text())?,
            payload
        );
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_yields_generic_500() -> anyhow::Result<()> {
        // Bind then drop to get a port nothing is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let dead = listener.local_addr()?;
        drop(listener);

        let server = edge_for(dead)?;
        let response = server
            .get("/api/clientes")
            .add_header("Cookie", "auth-token=tok-123")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "message": "Error interno en el servidor. Intente de nuevo más tarde."
        }));
        Ok(())
    }
}
