//! Typed order request and its validation.
//!
//! The inbound request is validated before any collaborator is called.
//! Malformed fields are reported together as a structured list; the
//! multi-restaurant case is a distinct conflict so callers can tell a
//! bad request from a business-rule rejection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{CustomerId, MenuItemId, PaymentMethod, RestaurantId};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The offending request field.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a request failed validation.
#[derive(Debug, Error)]
pub enum OrderRequestError {
    /// One or more fields are malformed or missing.
    #[error("invalid order request ({} field error(s))", .0.len())]
    Invalid(Vec<FieldError>),

    /// The purchase lines span more than one restaurant.
    #[error("order spans multiple restaurants ({first} and {other})")]
    MultiRestaurant {
        first: RestaurantId,
        other: RestaurantId,
    },
}

/// One requested purchase line: a quantity of one restaurant's menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub restaurant_id: RestaurantId,
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// An (item, quantity) pair as sent to the restaurant catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// The inbound order request, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    /// The customer placing the order. Required.
    pub customer_id: Option<CustomerId>,

    /// How the customer will pay.
    pub payment_method: PaymentMethod,

    /// The requested purchase lines. Must be non-empty and all for the
    /// same restaurant.
    pub lines: Vec<PurchaseLine>,
}

/// A request that passed validation: customer present, at least one line,
/// positive quantities, a single restaurant.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub customer_id: CustomerId,
    pub payment_method: PaymentMethod,
    pub restaurant_id: RestaurantId,
    pub items: Vec<ItemQuantity>,
}

impl PlaceOrderRequest {
    /// Validates the request, collecting every field error before the
    /// single-restaurant check.
    pub fn validate(self) -> Result<ValidatedOrder, OrderRequestError> {
        let mut errors = Vec::new();

        if self.customer_id.is_none() {
            errors.push(FieldError::new("customer_id", "customer is required"));
        }

        if self.lines.is_empty() {
            errors.push(FieldError::new(
                "lines",
                "at least one purchase line is required",
            ));
        }

        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity == 0 {
                errors.push(FieldError::new(
                    format!("lines[{index}].quantity"),
                    "quantity must be positive",
                ));
            }
        }

        let Some(customer_id) = self.customer_id else {
            return Err(OrderRequestError::Invalid(errors));
        };
        if !errors.is_empty() {
            return Err(OrderRequestError::Invalid(errors));
        }

        let restaurant_id = self.lines[0].restaurant_id;
        if let Some(line) = self
            .lines
            .iter()
            .find(|line| line.restaurant_id != restaurant_id)
        {
            return Err(OrderRequestError::MultiRestaurant {
                first: restaurant_id,
                other: line.restaurant_id,
            });
        }

        let items = self
            .lines
            .into_iter()
            .map(|line| ItemQuantity {
                item_id: line.item_id,
                quantity: line.quantity,
            })
            .collect();

        Ok(ValidatedOrder {
            customer_id,
            payment_method: self.payment_method,
            restaurant_id,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(restaurant_id: RestaurantId, item: &str, quantity: u32) -> PurchaseLine {
        PurchaseLine {
            restaurant_id,
            item_id: MenuItemId::new(item),
            quantity,
        }
    }

    #[test]
    fn valid_request_passes() {
        let restaurant_id = RestaurantId::new();
        let customer_id = CustomerId::new();
        let request = PlaceOrderRequest {
            customer_id: Some(customer_id),
            payment_method: PaymentMethod::CreditCard,
            lines: vec![
                line(restaurant_id, "margherita", 2),
                line(restaurant_id, "tiramisu", 1),
            ],
        };

        let validated = request.validate().unwrap();
        assert_eq!(validated.customer_id, customer_id);
        assert_eq!(validated.restaurant_id, restaurant_id);
        assert_eq!(validated.items.len(), 2);
    }

    #[test]
    fn missing_customer_is_a_field_error() {
        let restaurant_id = RestaurantId::new();
        let request = PlaceOrderRequest {
            customer_id: None,
            payment_method: PaymentMethod::Paypal,
            lines: vec![line(restaurant_id, "margherita", 1)],
        };

        match request.validate() {
            Err(OrderRequestError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "customer_id");
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn empty_lines_is_a_field_error() {
        let request = PlaceOrderRequest {
            customer_id: Some(CustomerId::new()),
            payment_method: PaymentMethod::Paypal,
            lines: vec![],
        };

        match request.validate() {
            Err(OrderRequestError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "lines");
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_is_a_field_error() {
        let restaurant_id = RestaurantId::new();
        let request = PlaceOrderRequest {
            customer_id: Some(CustomerId::new()),
            payment_method: PaymentMethod::Paypal,
            lines: vec![
                line(restaurant_id, "margherita", 0),
                line(restaurant_id, "tiramisu", 1),
            ],
        };

        match request.validate() {
            Err(OrderRequestError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "lines[0].quantity");
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn field_errors_are_collected_together() {
        let request = PlaceOrderRequest {
            customer_id: None,
            payment_method: PaymentMethod::Paypal,
            lines: vec![],
        };

        match request.validate() {
            Err(OrderRequestError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn multi_restaurant_is_a_distinct_conflict() {
        let first = RestaurantId::new();
        let other = RestaurantId::new();
        let request = PlaceOrderRequest {
            customer_id: Some(CustomerId::new()),
            payment_method: PaymentMethod::CreditCard,
            lines: vec![line(first, "margherita", 1), line(other, "ramen", 1)],
        };

        assert!(matches!(
            request.validate(),
            Err(OrderRequestError::MultiRestaurant { .. })
        ));
    }
}
