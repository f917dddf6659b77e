use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderReference;
use domain::{Order, OrderStatus};

use crate::Result;

/// Outcome of a compare-and-set status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// The order was `PENDING` and is now in the requested terminal status.
    Applied,

    /// The order had already reached a terminal status; nothing changed.
    /// Carries the status it was found in.
    AlreadySettled(OrderStatus),
}

/// Core trait for order store implementations.
///
/// A single order row is never written concurrently by two `insert`
/// callers (references are minted per request), but the reconciler can
/// race a duplicate outcome delivery against itself: `settle` must be a
/// compare-and-set conditioned on the current status so exactly one of
/// two concurrent deliveries transitions the order. Updates to different
/// references are independent.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order.
    ///
    /// Fails with `DuplicateReference` if an order with the same
    /// reference already exists.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Loads an order by reference.
    ///
    /// Returns None if no such order exists.
    async fn get(&self, reference: OrderReference) -> Result<Option<Order>>;

    /// Moves an order from `PENDING` into the given terminal status.
    ///
    /// Compare-and-set semantics: the update applies only if the order is
    /// still `PENDING` at write time. An order already in a terminal
    /// status yields `AlreadySettled` without touching the row. Fails
    /// with `NotFound` if the reference is unknown.
    async fn settle(
        &self,
        reference: OrderReference,
        status: OrderStatus,
    ) -> Result<StatusTransition>;

    /// Returns `PENDING` orders created before the cutoff, oldest first.
    ///
    /// Feeds the recovery sweep for orders whose payment request was
    /// issued (or lost) but whose outcome never arrived.
    async fn pending_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>>;
}
