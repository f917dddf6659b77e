//! Order-placement saga.
//!
//! The orchestrator drives the end-to-end create-order workflow:
//! 1. Validate the request (typed field errors, single-restaurant rule)
//! 2. Resolve the customer and reserve/price the items (concurrently)
//! 3. Materialize the order aggregate from the authoritative pricing
//! 4. Persist the order as `PENDING`, the durability checkpoint
//! 5. Request payment (synchronous acknowledgment only)
//! 6. Publish the confirmation event (fire-and-forget)
//!
//! Settlement is asynchronous: a separate reconciler consumes
//! payment-outcome events and moves the stored order into its terminal
//! status, idempotently. A recovery sweeper reports `PENDING` orders
//! whose outcome never arrived.

pub mod config;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod reconciler;
pub mod recovery;
pub mod services;

pub use config::SagaConfig;
pub use error::SagaError;
pub use events::{
    ConfirmationPublisher, InMemoryConfirmationPublisher, OrderConfirmation, PaymentOutcome,
    PaymentOutcomeEvent, PublishError,
};
pub use orchestrator::{PlacedOrder, SagaOrchestrator};
pub use reconciler::{PaymentReconciler, Reconciliation};
pub use recovery::PendingSweeper;
pub use services::{
    CustomerDirectory, CustomerLookupError, CustomerSnapshot, InMemoryCustomerDirectory,
    InMemoryPaymentRequestor, InMemoryRestaurantCatalog, PaymentError, PaymentRequest,
    PaymentRequestor, Reservation, ReservationError, ReservedItem, RestaurantCatalog,
};
