//! Payment-outcome hook.
//!
//! Invoked by the transport layer whenever a payment-outcome event is
//! received. Reconciliation is idempotent, so at-least-once delivery can
//! safely re-invoke it.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use order_store::OrderStore;
use saga::{PaymentOutcomeEvent, Reconciliation};
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct OutcomeResponse {
    /// What the delivery did: `APPLIED`, `DUPLICATE`, or `UNKNOWN_ORDER`.
    pub result: &'static str,
    /// The order's status after reconciliation, when known.
    pub status: Option<String>,
}

/// POST /payments/outcome — reconcile a payment outcome onto its order.
#[tracing::instrument(skip(state, event), fields(reference = %event.order_reference))]
pub async fn outcome<S: OrderStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(event): Json<PaymentOutcomeEvent>,
) -> Result<Json<OutcomeResponse>, ApiError> {
    let reconciliation = state.reconciler.apply(&event).await?;

    let response = match reconciliation {
        Reconciliation::Applied(status) => OutcomeResponse {
            result: "APPLIED",
            status: Some(status.to_string()),
        },
        Reconciliation::Duplicate(status) => OutcomeResponse {
            result: "DUPLICATE",
            status: Some(status.to_string()),
        },
        Reconciliation::UnknownOrder => OutcomeResponse {
            result: "UNKNOWN_ORDER",
            status: None,
        },
    };

    Ok(Json(response))
}
