//! Security alert bus.
//!
//! Alerts are used to notify interested parties (operator logging, audit
//! sinks, pager integrations) about security-relevant authentication state.
//! Handler failures are reported to the emitter but never change the outcome
//! of the authentication attempt that produced the alert.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AlertError;

/// Security events emitted by the authentication path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlertEvent {
    /// Emitted on every failed login attempt.
    LoginFailed {
        /// Calling address the attempt came from
        address: String,
        /// The username that was attempted (may not exist)
        username: String,
        /// Consecutive failures recorded for this address
        failed_attempts: u32,
        /// When the attempt occurred
        timestamp: DateTime<Utc>,
    },

    /// Emitted exactly once per address, at the moment its failure count
    /// reaches the ban threshold. Addresses in this state stay blocked for
    /// the life of the process.
    AddressBlocked {
        /// The address that was blocked
        address: String,
        /// The failure count that triggered the block
        failed_attempts: u32,
        /// When the block was triggered
        timestamp: DateTime<Utc>,
    },
}

/// A sink for [`AlertEvent`]s.
///
/// Implementors can be registered with the [`AlertBus`] to receive every
/// alert emitted by the authentication services.
#[async_trait]
pub trait AlertHandler: Send + Sync + 'static {
    async fn handle_alert(&self, event: &AlertEvent) -> Result<(), AlertError>;
}

/// Alert bus that fans alerts out to registered handlers.
#[derive(Clone)]
pub struct AlertBus {
    handlers: Arc<RwLock<Vec<Arc<dyn AlertHandler>>>>,
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an alert handler with the bus.
    pub async fn register(&self, handler: Arc<dyn AlertHandler>) {
        self.handlers.write().await.push(handler);
    }

    /// Emit an alert to all registered handlers.
    ///
    /// Returns the first handler error, after all handlers have been given
    /// the event.
    pub async fn emit(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let mut first_error = None;

        for handler in self.handlers.read().await.iter() {
            if let Err(e) = handler.handle_alert(event).await {
                tracing::warn!(error = %e, "alert handler failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AlertHandler for CountingHandler {
        async fn handle_alert(&self, _event: &AlertEvent) -> Result<(), AlertError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ErroringHandler;

    #[async_trait]
    impl AlertHandler for ErroringHandler {
        async fn handle_alert(&self, _event: &AlertEvent) -> Result<(), AlertError> {
            Err(AlertError::Handler("test error".into()))
        }
    }

    fn blocked_event() -> AlertEvent {
        AlertEvent::AddressBlocked {
            address: "10.0.0.1".to_string(),
            failed_attempts: 10,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_emit_with_no_handlers() {
        let bus = AlertBus::default();
        bus.emit(&blocked_event()).await.expect("emit should succeed");
    }

    #[tokio::test]
    async fn test_emit_reaches_all_handlers() {
        let bus = AlertBus::default();
        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        bus.register(Arc::new(CountingHandler {
            count: count1.clone(),
        }))
        .await;
        bus.register(Arc::new(CountingHandler {
            count: count2.clone(),
        }))
        .await;

        bus.emit(&blocked_event()).await.expect("emit should succeed");

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_erroring_handler_does_not_starve_others() {
        let bus = AlertBus::default();
        let count = Arc::new(AtomicUsize::new(0));

        bus.register(Arc::new(ErroringHandler)).await;
        bus.register(Arc::new(CountingHandler {
            count: count.clone(),
        }))
        .await;

        let result = bus.emit(&blocked_event()).await;
        assert!(matches!(result, Err(AlertError::Handler(_))));

        // Later handlers still saw the event
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
