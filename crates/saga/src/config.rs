//! Saga configuration.
//!
//! Collaborator endpoints behave differently per deployment, so timeouts
//! and topic names are explicit constructor input rather than ambient
//! state.

use std::time::Duration;

/// Configuration for the order-placement saga.
#[derive(Debug, Clone)]
pub struct SagaConfig {
    /// Timeout for customer directory lookups.
    pub customer_timeout: Duration,

    /// Timeout for restaurant reservation/pricing calls.
    pub reservation_timeout: Duration,

    /// Timeout for payment intent requests.
    pub payment_timeout: Duration,

    /// Timeout for confirmation publishes.
    pub publish_timeout: Duration,

    /// Topic the order confirmation is published to.
    pub confirmation_topic: String,

    /// Topic payment outcomes are consumed from.
    pub payment_outcome_topic: String,

    /// Age past which a still-`PENDING` order is reported by the
    /// recovery sweep.
    pub stale_pending_after: Duration,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            customer_timeout: Duration::from_secs(5),
            reservation_timeout: Duration::from_secs(5),
            payment_timeout: Duration::from_secs(5),
            publish_timeout: Duration::from_secs(5),
            confirmation_topic: "order-topic".to_string(),
            payment_outcome_topic: "payment-topic".to_string(),
            stale_pending_after: Duration::from_secs(15 * 60),
        }
    }
}
