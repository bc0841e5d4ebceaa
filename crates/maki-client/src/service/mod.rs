//! Translation layer between gateway envelopes and the shape UI code
//! consumes.
//!
//! UI pages never read [`ApiEnvelope`] directly: they get a
//! [`ServiceResult`] instead. The double normalization is a deliberate
//! seam — the backend contract can change shape behind the gateway without
//! rewriting page code.

pub mod contracts;
pub mod counters;
pub mod customers;
pub mod printers;
pub mod reports;

use serde::{Deserialize, Serialize};

use crate::envelope::ApiEnvelope;

/// Result shape consumed by UI pages and forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResult<T> {
    /// Whether the operation succeeded.
    pub status: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// Payload; the type's default when the operation failed.
    pub data: T,
}

impl<T: Default> ServiceResult<T> {
    /// Folds a gateway envelope into the UI shape.
    #[must_use]
    pub fn from_envelope(envelope: ApiEnvelope<T>) -> Self {
        Self {
            status: envelope.success,
            message: envelope.message,
            data: envelope.data.unwrap_or_default(),
        }
    }
}
