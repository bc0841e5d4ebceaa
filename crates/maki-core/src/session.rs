//! Session store: the single source of truth for "is there a logged-in
//! user, and who".
//!
//! The store is an explicitly constructed, cloneable handle meant to be
//! dependency-injected into whatever needs it, not a process-wide global.
//! Exactly two operations mutate it: [`SessionStore::set_token`] and
//! [`SessionStore::logout`]. Each mutation updates identity, raw token and
//! the authenticated flag under a single lock acquisition, so callers never
//! observe an intermediate state, and each mutation is written through to
//! the durable backend so the session survives process restarts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_SESSION;
use crate::error::{Error, Result};
use crate::token::TokenClaims;

/// Namespace under which the session snapshot is persisted.
const STORAGE_NAMESPACE: &str = "auth-storage";

/// Durable storage slot for the serialized session snapshot.
///
/// Implementations only need to store one opaque string per namespace.
pub trait SessionBackend: Send + Sync {
    /// Reads the persisted value for a namespace, if any.
    fn load(&self, namespace: &str) -> Result<Option<String>>;

    /// Writes the value for a namespace, replacing any previous value.
    fn save(&self, namespace: &str, value: &str) -> Result<()>;

    /// Deletes the value for a namespace. Deleting an absent value is a no-op.
    fn clear(&self, namespace: &str) -> Result<()>;
}

/// In-memory [`SessionBackend`].
///
/// The default backend for tests and for deployments that accept losing the
/// session on restart.
#[derive(Debug, Default)]
pub struct MemorySessionBackend {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySessionBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemorySessionBackend {
    fn load(&self, namespace: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| poisoned())?;
        Ok(slots.get(namespace).cloned())
    }

    fn save(&self, namespace: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| poisoned())?;
        slots.insert(namespace.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| poisoned())?;
        slots.remove(namespace);
        Ok(())
    }
}

fn poisoned() -> Error {
    Error::session("session backend lock poisoned")
}

/// Point-in-time view of the session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Decoded identity, absent when logged out.
    pub user: Option<TokenClaims>,
    /// Raw credential token, absent when logged out.
    pub token: Option<String>,
    /// Whether a login is currently active.
    pub is_authenticated: bool,
}

struct SessionStoreInner {
    state: Mutex<SessionSnapshot>,
    backend: Box<dyn SessionBackend>,
}

/// Cloneable handle to the session state.
///
/// At most one credential token is live at any time: storing a new one
/// replaces the decoded identity, the raw token and the authenticated flag
/// together.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a store rehydrated from the given backend.
    ///
    /// A missing or unreadable snapshot yields a logged-out store; a
    /// corrupted snapshot is discarded rather than propagated, since the
    /// persisted copy is merely a cache of a state this process can rebuild
    /// by logging in again.
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        let state = match backend.load(STORAGE_NAMESPACE) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionSnapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_SESSION,
                        error = %error,
                        "discarding corrupted session snapshot"
                    );
                    SessionSnapshot::default()
                }
            },
            Ok(None) => SessionSnapshot::default(),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_SESSION,
                    error = %error,
                    "session backend unreadable, starting logged out"
                );
                SessionSnapshot::default()
            }
        };

        Self {
            inner: Arc::new(SessionStoreInner {
                state: Mutex::new(state),
                backend: Box::new(backend),
            }),
        }
    }

    /// Creates a store with an in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionBackend::new())
    }

    /// Stores a new token, replacing any previous session.
    ///
    /// The claims are decoded without signature verification; trust comes
    /// from the token having been received from the login endpoint or
    /// rehydrated from storage this process wrote.
    ///
    /// # Errors
    ///
    /// Returns a token error when the token cannot be decoded. The session
    /// state is left untouched in that case.
    pub fn set_token(&self, token: &str) -> Result<TokenClaims> {
        let claims = TokenClaims::decode(token)?;

        let snapshot = SessionSnapshot {
            user: Some(claims.clone()),
            token: Some(token.to_owned()),
            is_authenticated: true,
        };
        self.replace(snapshot);

        tracing::debug!(
            target: TRACING_TARGET_SESSION,
            subject = %claims.subject,
            "session established"
        );
        Ok(claims)
    }

    /// Clears the session. Idempotent: logging out twice leaves the same
    /// state as logging out once.
    pub fn logout(&self) {
        self.replace(SessionSnapshot::default());
        tracing::debug!(target: TRACING_TARGET_SESSION, "session cleared");
    }

    /// Returns a copy of the current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_state().clone()
    }

    /// Returns the raw token, if a session is active.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock_state().token.clone()
    }

    /// Returns the decoded identity, if a session is active.
    #[must_use]
    pub fn user(&self) -> Option<TokenClaims> {
        self.lock_state().user.clone()
    }

    /// Whether a login is currently active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().is_authenticated
    }

    /// Swaps in a new snapshot and writes it through to the backend.
    ///
    /// Persistence failures are logged but do not fail the mutation: the
    /// in-memory state is authoritative for the lifetime of the process.
    fn replace(&self, snapshot: SessionSnapshot) {
        let serialized = serde_json::to_string(&snapshot);

        let mut state = self.lock_state();
        *state = snapshot;
        drop(state);

        let result = match serialized {
            Ok(raw) => self.inner.backend.save(STORAGE_NAMESPACE, &raw),
            Err(error) => Err(Error::session("snapshot not serializable").with_source(error)),
        };
        if let Err(error) = result {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                error = %error,
                "failed to persist session snapshot"
            );
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionSnapshot> {
        // A poisoned lock means another holder panicked mid-clone; the
        // snapshot itself is always left consistent by `replace`.
        self.inner
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;
    use crate::error::ErrorKind;

    fn mint_token(subject: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "sub": subject,
                "role": "admin",
                "iat": 1_700_000_000,
                "exp": 4_102_444_800_i64,
            })
            .to_string(),
        );
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn set_token_establishes_session() -> anyhow::Result<()> {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        let token = mint_token("admin@makicontrol.com");
        let claims = store.set_token(&token)?;

        assert_eq!(claims.subject, "admin@makicontrol.com");
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some(token.as_str()));
        assert_eq!(store.user(), Some(claims));
        Ok(())
    }

    #[test]
    fn logout_is_idempotent() -> anyhow::Result<()> {
        let store = SessionStore::in_memory();
        store.set_token(&mint_token("admin@makicontrol.com"))?;

        store.logout();
        let once = store.snapshot();
        store.logout();
        let twice = store.snapshot();

        assert_eq!(once, twice);
        assert_eq!(once, SessionSnapshot::default());
        Ok(())
    }

    #[test]
    fn malformed_token_leaves_state_untouched() -> anyhow::Result<()> {
        let store = SessionStore::in_memory();
        store.set_token(&mint_token("admin@makicontrol.com"))?;

        let error = store.set_token("garbage").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Token);
        assert!(store.is_authenticated());
        Ok(())
    }

    #[test]
    fn new_token_replaces_previous_session() -> anyhow::Result<()> {
        let store = SessionStore::in_memory();
        store.set_token(&mint_token("first@makicontrol.com"))?;
        store.set_token(&mint_token("second@makicontrol.com"))?;

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.user.map(|user| user.subject).as_deref(),
            Some("second@makicontrol.com")
        );
        Ok(())
    }

    #[test]
    fn session_survives_rehydration() -> anyhow::Result<()> {
        let backend = Arc::new(MemorySessionBackend::new());

        struct Shared(Arc<MemorySessionBackend>);
        impl SessionBackend for Shared {
            fn load(&self, namespace: &str) -> crate::Result<Option<String>> {
                self.0.load(namespace)
            }
            fn save(&self, namespace: &str, value: &str) -> crate::Result<()> {
                self.0.save(namespace, value)
            }
            fn clear(&self, namespace: &str) -> crate::Result<()> {
                self.0.clear(namespace)
            }
        }

        let token = mint_token("admin@makicontrol.com");
        let store = SessionStore::new(Shared(Arc::clone(&backend)));
        store.set_token(&token)?;

        let rehydrated = SessionStore::new(Shared(backend));
        assert!(rehydrated.is_authenticated());
        assert_eq!(rehydrated.token().as_deref(), Some(token.as_str()));
        Ok(())
    }

    #[test]
    fn corrupted_snapshot_starts_logged_out() -> anyhow::Result<()> {
        let backend = MemorySessionBackend::new();
        backend.save(STORAGE_NAMESPACE, "{not json")?;

        let store = SessionStore::new(backend);
        assert!(!store.is_authenticated());
        Ok(())
    }
}
