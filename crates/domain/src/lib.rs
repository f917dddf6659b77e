//! Domain layer for the order-placement saga.
//!
//! This crate provides the order aggregate and everything needed to build
//! one from a validated request and an authoritative reservation response:
//! - value objects (identifiers, money, payment method, order lines)
//! - the order status state machine
//! - the `Order` aggregate root with its invariants
//! - typed request validation with field-level errors

pub mod order;
pub mod request;
pub mod status;
pub mod value_objects;

pub use order::{Order, OrderError};
pub use request::{
    FieldError, ItemQuantity, OrderRequestError, PlaceOrderRequest, PurchaseLine, ValidatedOrder,
};
pub use status::OrderStatus;
pub use value_objects::{CustomerId, MenuItemId, Money, OrderLine, PaymentMethod, RestaurantId};
