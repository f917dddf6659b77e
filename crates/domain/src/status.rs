//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle status of an order.
///
/// Transitions:
/// ```text
/// PENDING ──(payment outcome = success)──► CONFIRMED
///    │
///    └─────(payment outcome = failure)──► FAILED
/// ```
///
/// `CONFIRMED` and `FAILED` are terminal: no event moves an order out of
/// them. An outcome delivered for an already-settled order is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Persisted, payment outcome not yet known.
    #[default]
    Pending,

    /// Payment settled successfully (terminal).
    Confirmed,

    /// Payment definitively failed (terminal).
    Failed,
}

impl OrderStatus {
    /// Returns true if the order is still awaiting a payment outcome.
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Failed)
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Failed => "FAILED",
        }
    }

    /// Parses a wire name back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "FAILED" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
