//! Customer directory contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::CustomerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A customer profile as resolved at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Errors from the customer directory.
#[derive(Debug, Error)]
pub enum CustomerLookupError {
    /// No customer profile exists for this identifier.
    #[error("customer not found: {0}")]
    NotFound(CustomerId),

    /// Transport failure or timeout; the outcome is unknown.
    #[error("customer directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of a customer profile.
///
/// Pure read: safe to call repeatedly. Every call is treated as
/// authoritative at call time; the saga imposes no caching.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Resolves a customer profile by identifier.
    async fn find_customer(&self, id: CustomerId) -> Result<CustomerSnapshot, CustomerLookupError>;
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    customers: HashMap<CustomerId, CustomerSnapshot>,
    lookups: u32,
    unavailable: bool,
}

/// In-memory customer directory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

impl InMemoryCustomerDirectory {
    /// Creates a new in-memory customer directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a customer profile.
    pub fn register(&self, snapshot: CustomerSnapshot) {
        self.state
            .write()
            .unwrap()
            .customers
            .insert(snapshot.id, snapshot);
    }

    /// Configures the directory to fail every lookup as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Returns the number of lookups served (including failures).
    pub fn lookup_count(&self) -> u32 {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn find_customer(&self, id: CustomerId) -> Result<CustomerSnapshot, CustomerLookupError> {
        let mut state = self.state.write().unwrap();
        state.lookups += 1;

        if state.unavailable {
            return Err(CustomerLookupError::Unavailable(
                "connection refused".to_string(),
            ));
        }

        state
            .customers
            .get(&id)
            .cloned()
            .ok_or(CustomerLookupError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: CustomerId) -> CustomerSnapshot {
        CustomerSnapshot {
            id,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Way".to_string(),
        }
    }

    #[tokio::test]
    async fn finds_registered_customer() {
        let directory = InMemoryCustomerDirectory::new();
        let id = CustomerId::new();
        directory.register(snapshot(id));

        let found = directory.find_customer(id).await.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Ada Lovelace");
        assert_eq!(directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let directory = InMemoryCustomerDirectory::new();
        let id = CustomerId::new();

        let result = directory.find_customer(id).await;
        assert!(matches!(result, Err(CustomerLookupError::NotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn unavailable_directory_fails_lookups() {
        let directory = InMemoryCustomerDirectory::new();
        let id = CustomerId::new();
        directory.register(snapshot(id));
        directory.set_unavailable(true);

        let result = directory.find_customer(id).await;
        assert!(matches!(result, Err(CustomerLookupError::Unavailable(_))));
    }
}
