//! HTTP surface for the order-placement saga.
//!
//! Exposes order placement, order lookup, and the payment-outcome hook,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use saga::{
    InMemoryConfirmationPublisher, InMemoryCustomerDirectory, InMemoryPaymentRequestor,
    InMemoryRestaurantCatalog, PaymentReconciler, SagaConfig, SagaOrchestrator,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// The collaborator doubles behind a default state, handed back so the
/// caller can seed customers and menus.
#[derive(Clone)]
pub struct Collaborators {
    pub customers: InMemoryCustomerDirectory,
    pub restaurants: InMemoryRestaurantCatalog,
    pub payments: InMemoryPaymentRequestor,
    pub publisher: InMemoryConfirmationPublisher,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Clone + Send + Sync + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::place::<S>))
        .route("/orders/{reference}", get(routes::orders::get::<S>))
        .route("/payments/outcome", post(routes::payments::outcome::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given store with in-memory
/// collaborator doubles.
pub fn create_default_state<S: OrderStore + Clone + Send + Sync + 'static>(
    store: S,
    saga_config: SagaConfig,
) -> (Arc<AppState<S>>, Collaborators) {
    let customers = InMemoryCustomerDirectory::new();
    let restaurants = InMemoryRestaurantCatalog::new();
    let payments = InMemoryPaymentRequestor::new();
    let publisher = InMemoryConfirmationPublisher::new(saga_config.confirmation_topic.clone());

    let orchestrator = SagaOrchestrator::new(
        store.clone(),
        customers.clone(),
        restaurants.clone(),
        payments.clone(),
        publisher.clone(),
        saga_config.clone(),
    );
    let reconciler = PaymentReconciler::new(store.clone(), &saga_config);

    let state = Arc::new(AppState {
        orchestrator,
        reconciler,
        store,
    });

    let collaborators = Collaborators {
        customers,
        restaurants,
        payments,
        publisher,
    };

    (state, collaborators)
}
