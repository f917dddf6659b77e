//! Payment requestor contract and in-memory implementation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::OrderReference;
use domain::{Money, PaymentMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::customer::CustomerSnapshot;

/// A payment intent for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_reference: OrderReference,
    pub amount: Money,
    pub method: PaymentMethod,
    pub customer: CustomerSnapshot,
}

/// Errors from the payment service.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The gateway synchronously refused the request (bad request,
    /// declined intent). The final settlement never starts.
    #[error("payment request rejected: {0}")]
    Rejected(String),

    /// Transport failure or timeout; the outcome is unknown.
    #[error("payment service unavailable: {0}")]
    Unavailable(String),
}

/// Submits a payment intent for an order.
///
/// Acceptance is only a synchronous acknowledgment that the intent was
/// created; settlement arrives later as a payment-outcome event carrying
/// the same order reference.
#[async_trait]
pub trait PaymentRequestor: Send + Sync {
    /// Requests payment of the given amount against the order reference.
    async fn request_payment(&self, request: &PaymentRequest) -> Result<(), PaymentError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    requests: Vec<PaymentRequest>,
    reject: bool,
    unavailable: bool,
    latency: Option<Duration>,
}

/// In-memory payment requestor for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRequestor {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentRequestor {
    /// Creates a new in-memory payment requestor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the requestor to synchronously reject requests.
    pub fn set_reject(&self, reject: bool) {
        self.state.write().unwrap().reject = reject;
    }

    /// Configures the requestor to fail requests as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Delays every request by the given duration, for timeout tests.
    pub fn set_latency(&self, latency: Duration) {
        self.state.write().unwrap().latency = Some(latency);
    }

    /// Returns the number of accepted payment requests.
    pub fn request_count(&self) -> usize {
        self.state.read().unwrap().requests.len()
    }

    /// Returns the most recent accepted payment request.
    pub fn last_request(&self) -> Option<PaymentRequest> {
        self.state.read().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl PaymentRequestor for InMemoryPaymentRequestor {
    async fn request_payment(&self, request: &PaymentRequest) -> Result<(), PaymentError> {
        let latency = self.state.read().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().unwrap();

        if state.unavailable {
            return Err(PaymentError::Unavailable("connection refused".to_string()));
        }
        if state.reject {
            return Err(PaymentError::Rejected("intent declined".to_string()));
        }

        state.requests.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::CustomerId;

    fn request() -> PaymentRequest {
        PaymentRequest {
            order_reference: OrderReference::new(),
            amount: Money::from_cents(2500),
            method: PaymentMethod::CreditCard,
            customer: CustomerSnapshot {
                id: CustomerId::new(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                address: "12 Analytical Way".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn accepts_and_records_requests() {
        let payments = InMemoryPaymentRequestor::new();
        let req = request();

        payments.request_payment(&req).await.unwrap();

        assert_eq!(payments.request_count(), 1);
        let last = payments.last_request().unwrap();
        assert_eq!(last.order_reference, req.order_reference);
        assert_eq!(last.amount.cents(), 2500);
    }

    #[tokio::test]
    async fn rejection_records_nothing() {
        let payments = InMemoryPaymentRequestor::new();
        payments.set_reject(true);

        let result = payments.request_payment(&request()).await;
        assert!(matches!(result, Err(PaymentError::Rejected(_))));
        assert_eq!(payments.request_count(), 0);
    }

    #[tokio::test]
    async fn unavailability_records_nothing() {
        let payments = InMemoryPaymentRequestor::new();
        payments.set_unavailable(true);

        let result = payments.request_payment(&request()).await;
        assert!(matches!(result, Err(PaymentError::Unavailable(_))));
        assert_eq!(payments.request_count(), 0);
    }
}
