//! API server entry point.

use domain::{MenuItemId, Money};
use order_store::InMemoryOrderStore;
use saga::{CustomerSnapshot, SagaConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Seeds a demo customer and restaurant so orders can be placed against
/// the in-memory collaborators, and logs their identifiers.
fn seed_demo_data(collaborators: &api::Collaborators) {
    let customer_id = domain::CustomerId::new();
    collaborators.customers.register(CustomerSnapshot {
        id: customer_id,
        name: "Demo Customer".to_string(),
        email: "demo@example.com".to_string(),
        address: "1 Demo Street".to_string(),
    });

    let restaurant_id = collaborators.restaurants.register(
        "Demo Pizzeria",
        vec![
            (
                MenuItemId::new("margherita"),
                "Pizza Margherita".to_string(),
                Money::from_cents(1050),
            ),
            (
                MenuItemId::new("calzone"),
                "Calzone".to_string(),
                Money::from_cents(1250),
            ),
            (
                MenuItemId::new("tiramisu"),
                "Tiramisu".to_string(),
                Money::from_cents(550),
            ),
        ],
    );

    tracing::info!(%customer_id, %restaurant_id, "seeded demo customer and restaurant");
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Create the store and application state
    let store = InMemoryOrderStore::new();
    let (state, collaborators) = api::create_default_state(store, SagaConfig::default());
    seed_demo_data(&collaborators);

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let config = api::config::Config::from_env();
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
