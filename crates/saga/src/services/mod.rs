//! Collaborator contracts consumed by the saga, with in-memory
//! implementations for tests and the demo server.

pub mod customer;
pub mod payment;
pub mod restaurant;

pub use customer::{
    CustomerDirectory, CustomerLookupError, CustomerSnapshot, InMemoryCustomerDirectory,
};
pub use payment::{InMemoryPaymentRequestor, PaymentError, PaymentRequest, PaymentRequestor};
pub use restaurant::{
    InMemoryRestaurantCatalog, Reservation, ReservationError, ReservedItem, RestaurantCatalog,
};
