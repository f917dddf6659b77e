//! Saga error taxonomy.
//!
//! Validation, not-found, and conflict errors happen before any side
//! effect and are safe to surface directly. `Unavailable` means the
//! outcome of a collaborator call is unknown (timeout or transport
//! failure), which is deliberately distinct from a definite failure: an
//! order must never be marked `FAILED` on the strength of a timeout.

use domain::{CustomerId, FieldError, MenuItemId, Money, OrderRequestError, RestaurantId};
use order_store::OrderStoreError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The request is malformed or incomplete; no side effects.
    #[error("invalid order request ({} field error(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// The purchase lines span more than one restaurant; no side effects.
    #[error("order spans multiple restaurants")]
    MultiRestaurantOrder,

    /// The customer does not exist.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The restaurant does not exist.
    #[error("restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),

    /// A requested item does not exist or belongs to another restaurant.
    #[error("menu item '{item_id}' not found at restaurant {restaurant_id}")]
    ItemNotFound {
        restaurant_id: RestaurantId,
        item_id: MenuItemId,
    },

    /// The reservation priced to a non-positive total; the upstream
    /// response was malformed.
    #[error("computed order total {total} is not positive")]
    InvalidAmount { total: Money },

    /// The payment gateway synchronously refused the intent. The order
    /// stays `PENDING`; settlement may still be retried out-of-band
    /// under the same reference.
    #[error("payment request rejected: {reason}")]
    PaymentRejected { reason: String },

    /// A collaborator timed out or failed in transport; the outcome of
    /// the call is unknown.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },

    /// Order store error.
    #[error("order store error: {0}")]
    Store(#[from] OrderStoreError),

    /// A defect in the saga itself (task failure, impossible state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<OrderRequestError> for SagaError {
    fn from(e: OrderRequestError) -> Self {
        match e {
            OrderRequestError::Invalid(errors) => SagaError::Validation(errors),
            OrderRequestError::MultiRestaurant { .. } => SagaError::MultiRestaurantOrder,
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
