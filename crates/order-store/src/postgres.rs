use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderReference;
use domain::{Order, OrderLine, OrderStatus, PaymentMethod};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    OrderStoreError, Result,
    store::{OrderStore, StatusTransition},
};

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let reference = OrderReference::from_uuid(row.try_get::<Uuid, _>("reference")?);

        let status_raw: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_raw).ok_or_else(|| {
            OrderStoreError::Corrupt(format!("unknown status '{status_raw}' for {reference}"))
        })?;

        let method_raw: String = row.try_get("payment_method")?;
        let payment_method = PaymentMethod::parse(&method_raw).ok_or_else(|| {
            OrderStoreError::Corrupt(format!(
                "unknown payment method '{method_raw}' for {reference}"
            ))
        })?;

        let lines_json: serde_json::Value = row.try_get("lines")?;
        let lines: Vec<OrderLine> = serde_json::from_value(lines_json)?;

        Ok(Order::from_parts(
            reference,
            row.try_get::<Uuid, _>("customer_id")?.into(),
            row.try_get::<Uuid, _>("restaurant_id")?.into(),
            status,
            payment_method,
            domain::Money::from_cents(row.try_get("total_cents")?),
            lines,
            row.try_get::<DateTime<Utc>, _>("created_at")?,
            row.try_get::<DateTime<Utc>, _>("last_modified_at")?,
        ))
    }
}

const SELECT_ORDER: &str = "SELECT reference, customer_id, restaurant_id, status, \
     payment_method, total_cents, lines, created_at, last_modified_at FROM orders";

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let lines_json = serde_json::to_value(order.lines())?;

        sqlx::query(
            r#"
            INSERT INTO orders (reference, customer_id, restaurant_id, status,
                                payment_method, total_cents, lines, created_at, last_modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.reference().as_uuid())
        .bind(order.customer_id().as_uuid())
        .bind(order.restaurant_id().as_uuid())
        .bind(order.status().as_str())
        .bind(order.payment_method().as_str())
        .bind(order.total_amount().cents())
        .bind(lines_json)
        .bind(order.created_at())
        .bind(order.last_modified_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return OrderStoreError::DuplicateReference(order.reference());
            }
            OrderStoreError::Database(e)
        })?;

        Ok(())
    }

    async fn get(&self, reference: OrderReference) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("{SELECT_ORDER} WHERE reference = $1"))
            .bind(reference.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn settle(
        &self,
        reference: OrderReference,
        status: OrderStatus,
    ) -> Result<StatusTransition> {
        if !status.is_terminal() {
            return Err(OrderStoreError::Domain(
                domain::OrderError::NotASettlement { status },
            ));
        }

        // Conditioned UPDATE is the compare-and-set: only a still-PENDING
        // row is touched, so one of two racing settles wins and the other
        // observes the terminal status on the follow-up read.
        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2, last_modified_at = $3
            WHERE reference = $1 AND status = $4
            "#,
        )
        .bind(reference.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(OrderStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(StatusTransition::Applied);
        }

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE reference = $1")
                .bind(reference.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match current {
            None => Err(OrderStoreError::NotFound(reference)),
            Some(raw) => {
                let current = OrderStatus::parse(&raw).ok_or_else(|| {
                    OrderStoreError::Corrupt(format!("unknown status '{raw}' for {reference}"))
                })?;
                Ok(StatusTransition::AlreadySettled(current))
            }
        }
    }

    async fn pending_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE status = $1 AND created_at < $2 ORDER BY created_at ASC"
        ))
        .bind(OrderStatus::Pending.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
