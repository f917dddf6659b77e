//! Payment-outcome reconciliation.
//!
//! The only path that ever moves an order out of `PENDING`. Settlement is
//! asynchronous: "payment accepted for processing" (the orchestrator's
//! synchronous acknowledgment) and "payment settled" (this component) are
//! deliberately decoupled, matching gateways where settlement arrives
//! later on a separate channel.

use domain::OrderStatus;
use order_store::{OrderStore, OrderStoreError, StatusTransition};
use tokio::sync::mpsc;

use crate::config::SagaConfig;
use crate::error::{Result, SagaError};
use crate::events::PaymentOutcomeEvent;

/// What an outcome delivery did to the stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The order was `PENDING` and is now settled.
    Applied(OrderStatus),

    /// The order had already been settled; the delivery was a duplicate
    /// and changed nothing.
    Duplicate(OrderStatus),

    /// No order with this reference is known here. At-least-once delivery
    /// makes this non-fatal: logged and discarded.
    UnknownOrder,
}

/// Consumes payment-outcome events and settles the stored orders they
/// reference.
pub struct PaymentReconciler<S> {
    store: S,
    topic: String,
}

impl<S: OrderStore> PaymentReconciler<S> {
    /// Creates a reconciler reading from the configured outcome topic.
    pub fn new(store: S, config: &SagaConfig) -> Self {
        Self {
            store,
            topic: config.payment_outcome_topic.clone(),
        }
    }

    /// Applies one payment-outcome event, idempotently.
    ///
    /// The underlying settle is a compare-and-set conditioned on the
    /// current status, so concurrent duplicate deliveries for one
    /// reference serialize to exactly one transition. Different
    /// references are independent.
    #[tracing::instrument(skip(self, event), fields(topic = %self.topic, reference = %event.order_reference))]
    pub async fn apply(&self, event: &PaymentOutcomeEvent) -> Result<Reconciliation> {
        metrics::counter!("payment_outcomes_total").increment(1);
        let target = event.status.as_status();

        match self.store.settle(event.order_reference, target).await {
            Ok(StatusTransition::Applied) => {
                metrics::counter!("orders_settled_total", "status" => target.as_str()).increment(1);
                tracing::info!(status = %target, "payment outcome applied");
                Ok(Reconciliation::Applied(target))
            }
            Ok(StatusTransition::AlreadySettled(current)) => {
                metrics::counter!("payment_outcome_duplicates_total").increment(1);
                tracing::info!(status = %current, "duplicate payment outcome discarded");
                Ok(Reconciliation::Duplicate(current))
            }
            Err(OrderStoreError::NotFound(reference)) => {
                metrics::counter!("payment_outcome_unknown_total").increment(1);
                tracing::warn!(%reference, "payment outcome for unknown order discarded");
                Ok(Reconciliation::UnknownOrder)
            }
            Err(e) => Err(SagaError::Store(e)),
        }
    }

    /// Runs the consumer loop until the sender side of the subscription
    /// channel closes.
    ///
    /// Store errors are logged and the loop keeps going; the event will
    /// be redelivered by the at-least-once transport.
    pub async fn run(self, mut outcomes: mpsc::Receiver<PaymentOutcomeEvent>) {
        tracing::info!(topic = %self.topic, "payment outcome consumer started");

        while let Some(event) = outcomes.recv().await {
            if let Err(e) = self.apply(&event).await {
                tracing::error!(
                    reference = %event.order_reference,
                    error = %e,
                    "payment outcome reconciliation failed"
                );
            }
        }

        tracing::info!(topic = %self.topic, "payment outcome consumer stopped");
    }
}
