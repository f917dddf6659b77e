use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderReference;
use domain::{Order, OrderError, OrderStatus};
use tokio::sync::RwLock;

use crate::{
    OrderStoreError, Result,
    store::{OrderStore, StatusTransition},
};

/// In-memory order store for tests and the demo server.
///
/// Provides the same interface and compare-and-set semantics as the
/// PostgreSQL implementation; the write lock serializes settles on the
/// same reference.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderReference, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.reference()) {
            return Err(OrderStoreError::DuplicateReference(order.reference()));
        }
        orders.insert(order.reference(), order.clone());
        Ok(())
    }

    async fn get(&self, reference: OrderReference) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&reference).cloned())
    }

    async fn settle(
        &self,
        reference: OrderReference,
        status: OrderStatus,
    ) -> Result<StatusTransition> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&reference)
            .ok_or(OrderStoreError::NotFound(reference))?;

        match order.settle(status) {
            Ok(()) => Ok(StatusTransition::Applied),
            Err(OrderError::AlreadySettled { current }) => {
                Ok(StatusTransition::AlreadySettled(current))
            }
            Err(e) => Err(OrderStoreError::Domain(e)),
        }
    }

    async fn pending_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut stale: Vec<Order> = orders
            .values()
            .filter(|order| order.status().is_pending() && order.created_at() < cutoff)
            .cloned()
            .collect();
        stale.sort_by_key(|order| order.created_at());
        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::{CustomerId, Money, OrderLine, PaymentMethod, RestaurantId};

    fn test_order() -> Order {
        Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::CreditCard,
            vec![OrderLine::new(
                "margherita",
                "Pizza Margherita",
                Money::from_cents(1000),
                2,
            )],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let store = InMemoryOrderStore::new();
        let order = test_order();

        store.insert(&order).await.unwrap();
        assert_eq!(store.order_count().await, 1);

        let loaded = store.get(order.reference()).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn get_unknown_reference_returns_none() {
        let store = InMemoryOrderStore::new();
        let result = store.get(OrderReference::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryOrderStore::new();
        let order = test_order();

        store.insert(&order).await.unwrap();
        let result = store.insert(&order).await;

        assert!(matches!(
            result,
            Err(OrderStoreError::DuplicateReference(_))
        ));
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn settle_applies_once() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        store.insert(&order).await.unwrap();

        let first = store
            .settle(order.reference(), OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(first, StatusTransition::Applied);

        let second = store
            .settle(order.reference(), OrderStatus::Failed)
            .await
            .unwrap();
        assert_eq!(
            second,
            StatusTransition::AlreadySettled(OrderStatus::Confirmed)
        );

        let loaded = store.get(order.reference()).await.unwrap().unwrap();
        assert_eq!(loaded.status(), OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn settle_unknown_reference_is_not_found() {
        let store = InMemoryOrderStore::new();
        let result = store
            .settle(OrderReference::new(), OrderStatus::Failed)
            .await;
        assert!(matches!(result, Err(OrderStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn settle_rejects_non_terminal_target() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        store.insert(&order).await.unwrap();

        let result = store.settle(order.reference(), OrderStatus::Pending).await;
        assert!(matches!(result, Err(OrderStoreError::Domain(_))));
    }

    #[tokio::test]
    async fn concurrent_settles_apply_exactly_once() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        store.insert(&order).await.unwrap();

        let (a, b) = tokio::join!(
            store.settle(order.reference(), OrderStatus::Confirmed),
            store.settle(order.reference(), OrderStatus::Confirmed),
        );

        let applied = [a.unwrap(), b.unwrap()]
            .into_iter()
            .filter(|t| *t == StatusTransition::Applied)
            .count();
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn pending_older_than_filters_by_status_and_age() {
        let store = InMemoryOrderStore::new();

        let settled = test_order();
        store.insert(&settled).await.unwrap();
        store
            .settle(settled.reference(), OrderStatus::Confirmed)
            .await
            .unwrap();

        let pending = test_order();
        store.insert(&pending).await.unwrap();

        // Everything so far was created "now"; a future cutoff sees only
        // the still-pending order.
        let cutoff = Utc::now() + Duration::seconds(60);
        let stale = store.pending_older_than(cutoff).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].reference(), pending.reference());

        // A cutoff in the past sees nothing.
        let cutoff = Utc::now() - Duration::seconds(60);
        let stale = store.pending_older_than(cutoff).await.unwrap();
        assert!(stale.is_empty());
    }
}
