//! The uniform response envelope every gateway call resolves to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default message for successful calls whose body carries none.
pub(crate) const SUCCESS_MESSAGE: &str = "Operación exitosa";

/// Message used when transport fails before a response arrives.
pub(crate) const NETWORK_ERROR_MESSAGE: &str = "network or server error";

/// Error tag used when transport fails before a response arrives.
pub(crate) const NETWORK_ERROR_TAG: &str = "NetworkError";

/// Fallback when a failure body carries no usable message or payload.
pub(crate) const UNKNOWN_ERROR: &str = "Unknown error";

/// Uniform result of a gateway call.
///
/// Successful calls carry a non-empty `message`, the parsed body as `data`
/// and an empty-string `error`. Failures carry a non-empty `message` and a
/// non-null `error`; `data` is absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// Parsed response body, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error payload, the empty string on success.
    pub error: Value,
}

impl<T> ApiEnvelope<T> {
    /// Builds a success envelope.
    pub(crate) fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: Value::String(String::new()),
        }
    }

    /// Builds a failure envelope.
    pub(crate) fn failure(message: impl Into<String>, error: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }

    /// Builds the failure envelope for a transport-level error.
    pub(crate) fn network_error() -> Self {
        Self::failure(
            NETWORK_ERROR_MESSAGE,
            Value::String(NETWORK_ERROR_TAG.to_owned()),
        )
    }

    /// Builds a failure envelope out of a non-2xx response body.
    pub(crate) fn from_failure_body(body: &Value) -> Self {
        Self::failure(failure_message(body), failure_payload(body))
    }
}

/// Extracts the most specific message a failure body offers.
///
/// Preference order: a non-empty `message` field, then the first entry of a
/// non-empty `errors` array, then the generic fallback. The array is checked
/// before indexing; backends are free to omit it entirely.
fn failure_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str)
        && !message.is_empty()
    {
        return message.to_owned();
    }

    if let Some(first) = body.get("errors").and_then(Value::as_array).and_then(|errors| errors.first()) {
        return match first.as_str() {
            Some(text) => text.to_owned(),
            None => first.to_string(),
        };
    }

    UNKNOWN_ERROR.to_owned()
}

/// Extracts the error payload of a failure body.
fn failure_payload(body: &Value) -> Value {
    if let Some(errors) = body.get("errors")
        && !errors.is_null()
    {
        return errors.clone();
    }
    if body.is_object() && body.as_object().is_some_and(|map| !map.is_empty()) {
        return body.clone();
    }
    Value::String(UNKNOWN_ERROR.to_owned())
}
