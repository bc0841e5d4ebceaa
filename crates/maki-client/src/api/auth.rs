//! Authentication endpoints: login and logout.
//!
//! Login is the one call that bypasses the edge proxy by design: it goes
//! straight to the backend, and the token it returns is what the proxy
//! requires of every subsequent call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome, TRACING_TARGET};

/// Credentials submitted at login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account username.
    #[validate(length(min = 1, message = "usuario requerido"))]
    pub username: String,
    /// Account password.
    #[validate(length(min = 1, message = "contraseña requerida"))]
    pub password: String,
}

/// Logs in against the backend and stores the issued token.
///
/// Field validation runs before anything touches the network; invalid
/// credentials shapes are recovered locally into a failure envelope. On a
/// successful response the token is written to the credential slot and the
/// session store as one paired write, so the caller's next gateway call is
/// already authenticated.
pub async fn login(gateway: &Gateway, request: &LoginRequest) -> ApiEnvelope<Value> {
    if let Err(errors) = request.validate() {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .find_map(|error| error.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "credenciales incompletas".to_owned());
        return ApiEnvelope::failure(message, Value::String("ValidationError".to_owned()));
    }

    let url = gateway.config().auth_url("/auth/login");
    let response = match gateway.http().post(url).json(request).send().await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "login transport failure"
            );
            return ApiEnvelope::network_error();
        }
    };

    let status = response.status();
    let body = match response.json::<Value>().await {
        Ok(body) => body,
        Err(_) => {
            return ApiEnvelope::failure(
                "invalid server response",
                Value::String("ParseError".to_owned()),
            );
        }
    };

    if !status.is_success() {
        return ApiEnvelope::from_failure_body(&body);
    }

    let Some(token) = body.get("token").and_then(Value::as_str) else {
        return ApiEnvelope::failure(
            "invalid server response",
            Value::String("ParseError".to_owned()),
        );
    };

    match gateway.credentials().set_token(token) {
        Ok(stored) => {
            tracing::info!(
                target: TRACING_TARGET,
                subject = %stored.claims.subject,
                "login successful"
            );
            ApiEnvelope::success("Operación exitosa", body)
        }
        Err(error) => ApiEnvelope::failure(error.to_string(), Value::String("TokenError".to_owned())),
    }
}

/// Logs out: tells the edge to drop the session cookie, then clears the
/// local stores regardless of the server's answer.
pub async fn logout(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    let outcome = gateway.call(ApiRequest::post("/auth/logout", Value::Null)).await;
    if let Err(error) = gateway.credentials().remove_token() {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "failed to clear local credential"
        );
    }
    outcome
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use maki_core::{CredentialPersistence, MemoryCredentialSlot, SessionStore};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::config::GatewayConfig;

    fn mint_token(subject: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            json!({ "sub": subject, "iat": 1_700_000_000, "exp": 4_102_444_800_i64 }).to_string(),
        );
        format!("{header}.{payload}.sig")
    }

    async fn spawn_backend(router: Router) -> anyhow::Result<SocketAddr> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok(addr)
    }

    fn gateway_at(addr: SocketAddr) -> anyhow::Result<Gateway> {
        let credentials =
            CredentialPersistence::new(MemoryCredentialSlot::new(), SessionStore::in_memory());
        let config = GatewayConfig::new(Url::parse(&format!("http://{addr}"))?);
        Ok(Gateway::new(config, credentials)?)
    }

    #[tokio::test]
    async fn login_stores_token_in_both_slots() -> anyhow::Result<()> {
        let token = mint_token("admin@makicontrol.com");
        let issued = token.clone();
        let router = Router::new().route(
            "/auth/login",
            post(move || {
                let token = issued.clone();
                async move { axum::Json(json!({ "token": token })) }
            }),
        );
        let gateway = gateway_at(spawn_backend(router).await?)?;

        let envelope = login(
            &gateway,
            &LoginRequest {
                username: "admin".to_owned(),
                password: "secreta".to_owned(),
            },
        )
        .await;

        assert!(envelope.success);
        assert_eq!(gateway.credentials().get_token()?.as_deref(), Some(token.as_str()));
        assert!(gateway.credentials().session().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn login_validation_never_touches_the_network() -> anyhow::Result<()> {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/auth/login",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    axum::Json(json!({}))
                }),
            )
            .with_state(Arc::clone(&hits));
        let gateway = gateway_at(spawn_backend(router).await?)?;

        let envelope = login(
            &gateway,
            &LoginRequest {
                username: String::new(),
                password: "secreta".to_owned(),
            },
        )
        .await;

        assert!(!envelope.success);
        assert_eq!(envelope.message, "usuario requerido");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn login_failure_surfaces_backend_message() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/auth/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({"message": "credenciales inválidas"})),
                )
            }),
        );
        let gateway = gateway_at(spawn_backend(router).await?)?;

        let envelope = login(
            &gateway,
            &LoginRequest {
                username: "admin".to_owned(),
                password: "mala".to_owned(),
            },
        )
        .await;

        assert!(!envelope.success);
        assert_eq!(envelope.message, "credenciales inválidas");
        assert!(!gateway.credentials().session().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_local_state() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/api/auth/logout",
            post(|| async { axum::Json(json!({"message": "Logout successful"})) }),
        );
        let gateway = gateway_at(spawn_backend(router).await?)?;
        gateway.credentials().set_token(&mint_token("admin@makicontrol.com"))?;

        let outcome = logout(&gateway).await;
        let envelope = outcome.into_completed().expect("logout completed");

        assert!(envelope.success);
        assert_eq!(envelope.message, "Logout successful");
        assert!(!gateway.credentials().session().is_authenticated());
        assert_eq!(gateway.credentials().get_token()?, None);
        Ok(())
    }
}
