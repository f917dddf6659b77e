use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique reference for an order, minted once at creation.
///
/// The reference is the correlation key threaded through every downstream
/// call and event: the payment request, the confirmation event, and the
/// payment-outcome event all carry it. It is never reused across orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(Uuid);

impl OrderReference {
    /// Mints a new random order reference.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an order reference from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderReference {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrderReference {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<OrderReference> for Uuid {
    fn from(reference: OrderReference) -> Self {
        reference.0
    }
}
