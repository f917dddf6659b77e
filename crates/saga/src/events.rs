//! Order events: the outbound confirmation and the inbound payment
//! outcome.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderReference;
use domain::{Money, OrderLine, OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::CustomerSnapshot;

/// Published after an order is persisted and its payment intent accepted,
/// for any consumer that reacts to "an order has been placed".
///
/// Independent of the final payment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_reference: OrderReference,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub customer: CustomerSnapshot,
    pub restaurant_name: String,
    pub lines: Vec<OrderLine>,
}

/// Settlement result carried by a payment-outcome event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    Confirmed,
    Failed,
}

impl PaymentOutcome {
    /// Returns the terminal order status this outcome settles into.
    pub fn as_status(&self) -> OrderStatus {
        match self {
            PaymentOutcome::Confirmed => OrderStatus::Confirmed,
            PaymentOutcome::Failed => OrderStatus::Failed,
        }
    }
}

/// Inbound event: the asynchronous settlement of a payment, correlated to
/// its order by reference. Delivery is at-least-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcomeEvent {
    pub order_reference: OrderReference,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentOutcome,
}

/// Error from the event transport.
#[derive(Debug, Error)]
#[error("confirmation publish failed: {0}")]
pub struct PublishError(pub String);

/// Publishes order confirmations.
///
/// Fire-and-forget from the saga's point of view: a publish failure is
/// logged and surfaced as a warning, never as an order failure.
#[async_trait]
pub trait ConfirmationPublisher: Send + Sync {
    /// Publishes an order confirmation.
    async fn publish(&self, confirmation: &OrderConfirmation) -> Result<(), PublishError>;
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    published: Vec<OrderConfirmation>,
    fail: bool,
}

/// In-memory confirmation publisher for testing; captures what would have
/// gone onto the broker topic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfirmationPublisher {
    topic: String,
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryConfirmationPublisher {
    /// Creates a publisher bound to the given topic name.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            state: Arc::default(),
        }
    }

    /// Configures the publisher to fail every publish.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Returns the number of published confirmations.
    pub fn published_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }

    /// Returns the captured confirmations.
    pub fn published(&self) -> Vec<OrderConfirmation> {
        self.state.read().unwrap().published.clone()
    }
}

#[async_trait]
impl ConfirmationPublisher for InMemoryConfirmationPublisher {
    async fn publish(&self, confirmation: &OrderConfirmation) -> Result<(), PublishError> {
        let mut state = self.state.write().unwrap();

        if state.fail {
            return Err(PublishError(format!("broker unreachable ({})", self.topic)));
        }

        tracing::debug!(
            topic = %self.topic,
            reference = %confirmation.order_reference,
            "order confirmation published"
        );
        state.published.push(confirmation.clone());
        Ok(())
    }
}
