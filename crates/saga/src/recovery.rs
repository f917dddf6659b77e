//! Recovery sweep for orders stuck in `PENDING`.
//!
//! An order can stay `PENDING` indefinitely when the payment request was
//! lost or its outcome never arrived. Nothing is rolled back
//! automatically, since the reservation the restaurant made is not ours
//! to undo; the sweep reports stale orders for an operator or a recovery
//! job to retry or cancel out-of-band.

use chrono::{TimeDelta, Utc};
use domain::Order;
use order_store::OrderStore;

use crate::config::SagaConfig;
use crate::error::Result;

/// Scans for `PENDING` orders older than the configured threshold.
pub struct PendingSweeper<S> {
    store: S,
    stale_after: TimeDelta,
}

impl<S: OrderStore> PendingSweeper<S> {
    /// Creates a sweeper using the configured staleness threshold.
    pub fn new(store: S, config: &SagaConfig) -> Self {
        Self {
            store,
            stale_after: TimeDelta::from_std(config.stale_pending_after)
                .unwrap_or(TimeDelta::MAX),
        }
    }

    /// Returns stale `PENDING` orders, oldest first, logging each one.
    ///
    /// Pure read: safe to run repeatedly and concurrently with the
    /// reconciler.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self) -> Result<Vec<Order>> {
        let cutoff = Utc::now() - self.stale_after;
        let stale = self.store.pending_older_than(cutoff).await?;

        for order in &stale {
            tracing::warn!(
                reference = %order.reference(),
                created_at = %order.created_at(),
                total = %order.total_amount(),
                "order still PENDING past threshold"
            );
        }
        metrics::gauge!("stale_pending_orders").set(stale.len() as f64);

        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderReference;
    use domain::{CustomerId, Money, OrderLine, OrderStatus, PaymentMethod, RestaurantId};
    use order_store::InMemoryOrderStore;
    use std::time::Duration;

    fn pending_order() -> Order {
        Order::new(
            OrderReference::new(),
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethod::CreditCard,
            vec![OrderLine::new(
                "margherita",
                "Pizza Margherita",
                Money::from_cents(1000),
                1,
            )],
        )
        .unwrap()
    }

    fn config_with_threshold(stale_pending_after: Duration) -> SagaConfig {
        SagaConfig {
            stale_pending_after,
            ..SagaConfig::default()
        }
    }

    #[tokio::test]
    async fn finds_pending_orders_past_the_threshold() {
        let store = InMemoryOrderStore::new();
        let order = pending_order();
        store.insert(&order).await.unwrap();

        // Zero threshold: anything created before "now" is stale.
        let sweeper = PendingSweeper::new(store, &config_with_threshold(Duration::ZERO));
        let stale = sweeper.sweep().await.unwrap();

        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].reference(), order.reference());
    }

    #[tokio::test]
    async fn ignores_settled_and_fresh_orders() {
        let store = InMemoryOrderStore::new();

        let settled = pending_order();
        store.insert(&settled).await.unwrap();
        store
            .settle(settled.reference(), OrderStatus::Failed)
            .await
            .unwrap();

        let fresh = pending_order();
        store.insert(&fresh).await.unwrap();

        // A one-hour threshold sees neither the settled order nor the
        // just-created pending one.
        let sweeper = PendingSweeper::new(store, &config_with_threshold(Duration::from_secs(3600)));
        let stale = sweeper.sweep().await.unwrap();

        assert!(stale.is_empty());
    }
}
