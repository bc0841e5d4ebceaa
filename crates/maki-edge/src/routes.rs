//! Router assembly for the edge proxy.

use axum::Router;
use axum::routing::{any, get, post};

use crate::state::ProxyState;
use crate::{auth, proxy};

/// Builds the edge router.
///
/// The logout and health routes are handled by the edge itself; everything
/// else under `/api` is tunneled to the backend. Exact routes take
/// precedence over the wildcard.
pub fn routes(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(auth::health))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/{*path}", any(proxy::forward))
        .with_state(state)
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde_json::json;
    use url::Url;

    use super::routes;
    use crate::config::ProxyConfig;
    use crate::state::ProxyState;

    async fn spawn_upstream(hits: Arc<AtomicUsize>) -> anyhow::Result<SocketAddr> {
        let router = Router::new().route(
            "/auth/logout",
            post(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async { "never" }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok(addr)
    }

    #[tokio::test]
    async fn logout_route_wins_over_the_wildcard() -> anyhow::Result<()> {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = spawn_upstream(Arc::clone(&hits)).await?;

        let config = ProxyConfig {
            backend_url: Url::parse(&format!("http://{addr}"))?,
            timeout: 5,
        };
        let server = TestServer::new(routes(ProxyState::from_config(&config)?))?;

        let response = server
            .post("/api/auth/logout")
            .add_header("Cookie", "auth-token=tok-123")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"message": "Logout successful"}));
        // Handled locally; the backend logout endpoint is never hit.
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        Ok(())
    }
}
