//! Order aggregate root.

use chrono::{DateTime, Utc};
use common::OrderReference;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::OrderStatus;
use crate::value_objects::{CustomerId, Money, OrderLine, PaymentMethod, RestaurantId};

/// Errors that can occur on the order aggregate.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An order must purchase at least one line.
    #[error("order has no lines")]
    NoLines,

    /// The computed total must be strictly positive before payment is
    /// requested; anything else means the reservation response was
    /// malformed.
    #[error("order total {total} is not positive")]
    NonPositiveTotal { total: Money },

    /// Settlement targets must be terminal statuses.
    #[error("cannot settle an order into {status}")]
    NotASettlement { status: OrderStatus },

    /// The order already reached a terminal status.
    #[error("order already settled as {current}")]
    AlreadySettled { current: OrderStatus },
}

/// The order aggregate: one customer's priced purchase from one restaurant.
///
/// Built exactly once from the restaurant's authoritative reservation
/// response, persisted as `PENDING` before payment is requested, and
/// settled at most once by a payment outcome. The total always equals the
/// sum of line totals; the lines are frozen after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    reference: OrderReference,
    customer_id: CustomerId,
    restaurant_id: RestaurantId,
    status: OrderStatus,
    payment_method: PaymentMethod,
    total_amount: Money,
    lines: Vec<OrderLine>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl Order {
    /// Materializes a `PENDING` order from priced lines.
    ///
    /// The total is computed as the sum of line totals and must be
    /// strictly positive.
    pub fn new(
        reference: OrderReference,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        payment_method: PaymentMethod,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::NoLines);
        }

        let total_amount: Money = lines.iter().map(|line| line.line_total).sum();
        if !total_amount.is_positive() {
            return Err(OrderError::NonPositiveTotal {
                total: total_amount,
            });
        }

        let now = Utc::now();
        Ok(Self {
            reference,
            customer_id,
            restaurant_id,
            status: OrderStatus::Pending,
            payment_method,
            total_amount,
            lines,
            created_at: now,
            last_modified_at: now,
        })
    }

    /// Rehydrates an order from stored state.
    ///
    /// Only for storage implementations; trusts that the stored state
    /// satisfied the construction invariants when it was written.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        reference: OrderReference,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        status: OrderStatus,
        payment_method: PaymentMethod,
        total_amount: Money,
        lines: Vec<OrderLine>,
        created_at: DateTime<Utc>,
        last_modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reference,
            customer_id,
            restaurant_id,
            status,
            payment_method,
            total_amount,
            lines,
            created_at,
            last_modified_at,
        }
    }

    /// Applies a payment outcome, moving the order into a terminal status.
    ///
    /// Transitions are monotonic: settling an already-settled order is
    /// rejected so duplicate deliveries cannot re-trigger side effects.
    pub fn settle(&mut self, status: OrderStatus) -> Result<(), OrderError> {
        if !status.is_terminal() {
            return Err(OrderError::NotASettlement { status });
        }
        if self.status.is_terminal() {
            return Err(OrderError::AlreadySettled {
                current: self.status,
            });
        }

        self.status = status;
        self.last_modified_at = Utc::now();
        Ok(())
    }
}

// Query methods
impl Order {
    /// Returns the order reference.
    pub fn reference(&self) -> OrderReference {
        self.reference
    }

    /// Returns the customer who placed the order.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the restaurant all lines purchase from.
    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Returns the total amount (sum of line totals).
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the order lines.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Returns when the order was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the order was last modified.
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<OrderLine> {
        vec![
            OrderLine::new("margherita", "Pizza Margherita", Money::from_cents(1000), 2),
            OrderLine::new("tiramisu", "Tiramisu", Money::from_cents(500), 1),
        ]
    }

    fn pending_order() -> Order {
        Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::CreditCard,
            sample_lines(),
        )
        .unwrap()
    }

    #[test]
    fn new_order_is_pending_with_summed_total() {
        let order = pending_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total_amount().cents(), 2500);
        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.created_at(), order.last_modified_at());
    }

    #[test]
    fn total_always_equals_sum_of_line_totals() {
        let order = pending_order();
        let summed: Money = order.lines().iter().map(|l| l.line_total).sum();
        assert_eq!(order.total_amount(), summed);
    }

    #[test]
    fn total_for_a_two_line_reservation() {
        let order = Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::DebitCard,
            vec![
                OrderLine::new("item-a", "Item A", Money::from_cents(500), 2),
                OrderLine::new("item-b", "Item B", Money::from_cents(300), 1),
            ],
        )
        .unwrap();

        assert_eq!(order.total_amount().cents(), 1300);
    }

    #[test]
    fn new_order_without_lines_is_rejected() {
        let result = Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::Paypal,
            vec![],
        );
        assert!(matches!(result, Err(OrderError::NoLines)));
    }

    #[test]
    fn new_order_with_zero_total_is_rejected() {
        let result = Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::Paypal,
            vec![OrderLine::new("freebie", "Freebie", Money::zero(), 3)],
        );
        assert!(matches!(result, Err(OrderError::NonPositiveTotal { .. })));
    }

    #[test]
    fn settle_confirms_a_pending_order() {
        let mut order = pending_order();
        order.settle(OrderStatus::Confirmed).unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert!(order.last_modified_at() >= order.created_at());
    }

    #[test]
    fn settle_fails_a_pending_order() {
        let mut order = pending_order();
        order.settle(OrderStatus::Failed).unwrap();
        assert_eq!(order.status(), OrderStatus::Failed);
    }

    #[test]
    fn settle_is_monotonic() {
        let mut order = pending_order();
        order.settle(OrderStatus::Confirmed).unwrap();

        let result = order.settle(OrderStatus::Failed);
        assert!(matches!(
            result,
            Err(OrderError::AlreadySettled {
                current: OrderStatus::Confirmed
            })
        ));
        assert_eq!(order.status(), OrderStatus::Confirmed);
    }

    #[test]
    fn settle_rejects_pending_as_target() {
        let mut order = pending_order();
        let result = order.settle(OrderStatus::Pending);
        assert!(matches!(result, Err(OrderError::NotASettlement { .. })));
    }

    #[test]
    fn serialization_roundtrip() {
        let order = pending_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
