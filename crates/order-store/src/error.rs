use common::OrderReference;
use domain::OrderError;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order with this reference already exists. References are minted
    /// once per order, so this indicates a duplicate insert.
    #[error("order already exists: {0}")]
    DuplicateReference(OrderReference),

    /// No order with this reference exists.
    #[error("order not found: {0}")]
    NotFound(OrderReference),

    /// The aggregate rejected the operation.
    #[error("order error: {0}")]
    Domain(#[from] OrderError),

    /// A stored row could not be mapped back onto the aggregate.
    #[error("corrupt order row: {0}")]
    Corrupt(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
