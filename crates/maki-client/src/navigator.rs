//! Navigation seam for the session-expiry redirect.

/// Receives the "leave this page now" signal when a session expires.
///
/// The gateway never retries or surfaces an expiry inline; it signals the
/// navigator once and returns [`Outcome::Redirecting`](crate::Outcome).
/// Hosts embed whatever navigation primitive they have behind this trait.
pub trait Navigator: Send + Sync {
    /// Navigates to the given path, discarding the current page.
    fn navigate(&self, path: &str);
}

/// Default [`Navigator`] that only records the intent in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(
            target: crate::gateway::TRACING_TARGET,
            path = %path,
            "navigation requested"
        );
    }
}
