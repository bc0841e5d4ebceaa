//! Full-chain integration tests: console client -> edge proxy -> backend.
//!
//! Both the edge and the mock backend run on real sockets so every hop
//! goes over HTTP, exactly as deployed.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use maki_client::api::customers;
use maki_client::{Gateway, GatewayConfig, Navigator, Outcome};
use maki_core::{CredentialPersistence, MemoryCredentialSlot, SessionStore};
use maki_edge::{ProxyConfig, ProxyState, routes};
use serde_json::{Value, json};
use url::Url;

fn encode_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

fn admin_token() -> String {
    encode_token(&json!({
        "sub": "admin",
        "role": "admin",
        "iat": 1_700_000_000,
        "exp": 4_102_444_800i64,
    }))
}

async fn serve(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(addr)
}

async fn spawn_backend() -> anyhow::Result<SocketAddr> {
    async fn create_customer(body: String) -> impl axum::response::IntoResponse {
        // Echo-free fixed response; the body must still be valid JSON.
        assert!(serde_json::from_str::<Value>(&body).is_ok());
        (StatusCode::CREATED, axum::Json(json!({"id": 1, "nombre": "Acme"})))
    }

    async fn forbidden() -> impl axum::response::IntoResponse {
        (StatusCode::FORBIDDEN, axum::Json(json!({"message": "Sesión expirada"})))
    }

    async fn logout() -> impl axum::response::IntoResponse {
        axum::Json(json!({"message": "ok"}))
    }

    let router = Router::new()
        .route("/clientes", post(create_customer))
        .route("/contratos", get(forbidden))
        .route("/auth/logout", post(logout));
    serve(router).await
}

async fn spawn_edge(backend: SocketAddr) -> anyhow::Result<SocketAddr> {
    let config = ProxyConfig {
        backend_url: Url::parse(&format!("http://{backend}"))?,
        timeout: 5,
    };
    let state = ProxyState::from_config(&config)?;
    serve(routes(state)).await
}

fn credentials() -> CredentialPersistence {
    CredentialPersistence::new(MemoryCredentialSlot::new(), SessionStore::in_memory())
}

#[derive(Debug, Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_owned());
    }
}

/// Orphan-rule-safe handle: `Arc<RecordingNavigator>` cannot implement the
/// foreign `Navigator` trait here, so a local newtype forwards to it.
struct SharedNavigator(Arc<RecordingNavigator>);

impl Navigator for SharedNavigator {
    fn navigate(&self, path: &str) {
        self.0.navigate(path);
    }
}

#[tokio::test]
async fn create_customer_through_the_full_chain() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let edge = spawn_edge(backend).await?;

    let credentials = credentials();
    credentials.set_token(&admin_token())?;
    let config = GatewayConfig::new(Url::parse(&format!("http://{edge}"))?);
    let gateway = Gateway::new(config, credentials)?;

    let outcome =
        customers::create_customer(&gateway, json!({"nombre": "Acme", "ruc": "20481234567"}))
            .await;

    let envelope = outcome.into_completed().expect("no redirect expected");
    assert!(envelope.success);
    assert_eq!(envelope.message, "Operación exitosa");
    assert_eq!(envelope.data, Some(json!({"id": 1, "nombre": "Acme"})));
    assert_eq!(envelope.error, Value::String(String::new()));
    Ok(())
}

#[tokio::test]
async fn missing_session_is_stopped_at_the_edge() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let edge = spawn_edge(backend).await?;

    // No token stored, so the gateway sends no cookie and the edge answers
    // 401, which the gateway treats as session expiry.
    let config = GatewayConfig::new(Url::parse(&format!("http://{edge}"))?);
    let navigator = Arc::new(RecordingNavigator::default());
    let gateway =
        Gateway::with_navigator(config, credentials(), SharedNavigator(Arc::clone(&navigator)))?;

    let outcome = customers::list_customers(&gateway).await;
    assert!(matches!(outcome, Outcome::Redirecting));
    assert_eq!(*navigator.paths.lock().unwrap(), vec!["/login".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn backend_forbidden_relayed_by_the_edge_logs_the_session_out() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let edge = spawn_edge(backend).await?;

    let credentials = credentials();
    credentials.set_token(&admin_token())?;
    let config = GatewayConfig::new(Url::parse(&format!("http://{edge}"))?);
    let navigator = Arc::new(RecordingNavigator::default());
    let gateway = Gateway::with_navigator(
        config,
        credentials.clone(),
        SharedNavigator(Arc::clone(&navigator)),
    )?;

    let outcome = maki_client::api::contracts::list_contracts(&gateway).await;
    assert!(outcome.is_redirecting());

    // Both halves of the credential pair are cleared.
    assert_eq!(credentials.get_token()?, None);
    assert!(!credentials.session().is_authenticated());
    assert_eq!(*navigator.paths.lock().unwrap(), vec!["/login".to_owned()]);
    Ok(())
}
