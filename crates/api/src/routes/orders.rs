//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::OrderReference;
use domain::{Order, PlaceOrderRequest};
use order_store::OrderStore;
use saga::{
    InMemoryConfirmationPublisher, InMemoryCustomerDirectory, InMemoryPaymentRequestor,
    InMemoryRestaurantCatalog, PaymentReconciler, SagaOrchestrator,
};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub orchestrator: SagaOrchestrator<
        S,
        InMemoryCustomerDirectory,
        InMemoryRestaurantCatalog,
        InMemoryPaymentRequestor,
        InMemoryConfirmationPublisher,
    >,
    pub reconciler: PaymentReconciler<S>,
    pub store: S,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderPlacedResponse {
    pub order_reference: String,
    pub confirmation_published: bool,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub item_id: String,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub line_total_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_reference: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub status: String,
    pub payment_method: String,
    pub total_cents: i64,
    pub lines: Vec<OrderLineResponse>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let lines = order
            .lines()
            .iter()
            .map(|line| OrderLineResponse {
                item_id: line.item_id.to_string(),
                item_name: line.item_name.clone(),
                unit_price_cents: line.unit_price.cents(),
                quantity: line.quantity,
                line_total_cents: line.line_total.cents(),
            })
            .collect();

        Self {
            order_reference: order.reference().to_string(),
            customer_id: order.customer_id().to_string(),
            restaurant_id: order.restaurant_id().to_string(),
            status: order.status().to_string(),
            payment_method: order.payment_method().to_string(),
            total_cents: order.total_amount().cents(),
            lines,
            created_at: order.created_at(),
            last_modified_at: order.last_modified_at(),
        }
    }
}

// -- Handlers --

/// POST /orders — place an order through the saga.
#[tracing::instrument(skip(state, request))]
pub async fn place<S: OrderStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let placed = state.orchestrator.place_order(request).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(OrderPlacedResponse {
            order_reference: placed.reference.to_string(),
            confirmation_published: placed.confirmation_published,
        }),
    ))
}

/// GET /orders/{reference} — load an order by its reference.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(reference): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let reference = parse_reference(&reference)?;

    let order = state
        .store
        .get(reference)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Order {reference} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

pub(crate) fn parse_reference(raw: &str) -> Result<OrderReference, ApiError> {
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order reference: {e}")))?;
    Ok(OrderReference::from(uuid))
}
