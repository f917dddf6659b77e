//! Saga orchestrator for the create-order workflow.

use std::future::Future;
use std::time::Duration;

use common::OrderReference;
use domain::{
    CustomerId, ItemQuantity, Order, OrderError, OrderLine, PlaceOrderRequest, RestaurantId,
};
use order_store::OrderStore;
use tokio::time::timeout;

use crate::config::SagaConfig;
use crate::error::{Result, SagaError};
use crate::events::{ConfirmationPublisher, OrderConfirmation};
use crate::services::customer::{CustomerDirectory, CustomerLookupError, CustomerSnapshot};
use crate::services::payment::{PaymentError, PaymentRequest, PaymentRequestor};
use crate::services::restaurant::{Reservation, ReservationError, RestaurantCatalog};

const CUSTOMER_DIRECTORY: &str = "customer directory";
const RESTAURANT_CATALOG: &str = "restaurant catalog";
const PAYMENT_SERVICE: &str = "payment service";

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    /// The order's public handle, used to correlate every later event.
    pub reference: OrderReference,

    /// False when the confirmation event could not be published. The
    /// order and the payment request stand regardless.
    pub confirmation_published: bool,
}

/// Drives the end-to-end create-order workflow.
///
/// Ordering is deliberate: the order is persisted as `PENDING` *before*
/// payment is requested, so a crash or failure after that point leaves a
/// recoverable record instead of losing the fact that a restaurant
/// already reserved items. Nothing past the persistence checkpoint is
/// rolled back here; compensating the restaurant reservation or the
/// payment intent belongs to the services that own them.
#[derive(Clone)]
pub struct SagaOrchestrator<S, C, R, P, N>
where
    S: OrderStore,
    C: CustomerDirectory,
    R: RestaurantCatalog,
    P: PaymentRequestor,
    N: ConfirmationPublisher,
{
    store: S,
    customers: C,
    restaurants: R,
    payments: P,
    publisher: N,
    config: SagaConfig,
}

impl<S, C, R, P, N> SagaOrchestrator<S, C, R, P, N>
where
    S: OrderStore + Clone + Send + Sync + 'static,
    C: CustomerDirectory + Clone + Send + Sync + 'static,
    R: RestaurantCatalog + Clone + Send + Sync + 'static,
    P: PaymentRequestor + Clone + Send + Sync + 'static,
    N: ConfirmationPublisher + Clone + Send + Sync + 'static,
{
    /// Creates a new orchestrator.
    pub fn new(
        store: S,
        customers: C,
        restaurants: R,
        payments: P,
        publisher: N,
        config: SagaConfig,
    ) -> Self {
        Self {
            store,
            customers,
            restaurants,
            payments,
            publisher,
            config,
        }
    }

    /// Places an order, returning its reference as the public handle.
    ///
    /// Any failure before persistence is a clean abort with no stored
    /// artifact and is safe to retry by calling again. A failure at or
    /// after the payment request leaves a `PENDING` order to be settled
    /// by the payment-outcome reconciler or picked up by the recovery
    /// sweep.
    #[tracing::instrument(skip(self, request))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlacedOrder> {
        metrics::counter!("order_placements_total").increment(1);
        let started = std::time::Instant::now();

        let result = self.run_placement(request).await;

        metrics::histogram!("order_placement_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        if result.is_err() {
            metrics::counter!("order_placement_failures_total").increment(1);
        }
        result
    }

    async fn run_placement(&self, request: PlaceOrderRequest) -> Result<PlacedOrder> {
        let order_request = request.validate()?;

        // Customer lookup and reservation are independent of each other;
        // run them concurrently. The customer result is examined first so
        // a missing customer is reported even if the reservation failed
        // too.
        let (customer, reservation) = tokio::join!(
            self.resolve_customer(order_request.customer_id),
            self.reserve_items(order_request.restaurant_id, &order_request.items),
        );
        let customer = customer?;
        let reservation = reservation?;

        let reference = OrderReference::new();
        let lines: Vec<OrderLine> = reservation
            .items
            .iter()
            .map(|item| {
                OrderLine::new(
                    item.item_id.clone(),
                    item.name.clone(),
                    item.unit_price,
                    item.quantity,
                )
            })
            .collect();

        let order = Order::new(
            reference,
            customer.id,
            reservation.restaurant_id,
            order_request.payment_method,
            lines,
        )
        .map_err(|e| match e {
            OrderError::NonPositiveTotal { total } => SagaError::InvalidAmount { total },
            other => SagaError::Internal(other.to_string()),
        })?;

        // Durability checkpoint: persist before requesting payment, so
        // the PENDING row survives anything that goes wrong after this.
        self.store.insert(&order).await?;
        tracing::info!(
            %reference,
            customer = %customer.id,
            total = %order.total_amount(),
            "order persisted as PENDING"
        );

        let confirmation = OrderConfirmation {
            order_reference: reference,
            total_amount: order.total_amount(),
            payment_method: order.payment_method(),
            customer: customer.clone(),
            restaurant_name: reservation.restaurant_name,
            lines: order.lines().to_vec(),
        };
        let payment = PaymentRequest {
            order_reference: reference,
            amount: order.total_amount(),
            method: order.payment_method(),
            customer,
        };

        // Detached task: a dropped caller (client disconnect) must not
        // cancel the workflow between the checkpoint and the payment
        // request. The task runs to completion either way.
        let saga = self.clone();
        let confirmation_published = tokio::spawn(async move {
            saga.request_payment_and_publish(payment, confirmation).await
        })
        .await
        .map_err(|e| SagaError::Internal(format!("placement task failed: {e}")))??;

        Ok(PlacedOrder {
            reference,
            confirmation_published,
        })
    }

    async fn resolve_customer(&self, id: CustomerId) -> Result<CustomerSnapshot> {
        let lookup = self.guarded(
            CUSTOMER_DIRECTORY,
            self.config.customer_timeout,
            self.customers.find_customer(id),
        );
        match lookup.await? {
            Ok(snapshot) => Ok(snapshot),
            Err(CustomerLookupError::NotFound(id)) => Err(SagaError::CustomerNotFound(id)),
            Err(CustomerLookupError::Unavailable(reason)) => Err(SagaError::Unavailable {
                service: CUSTOMER_DIRECTORY,
                reason,
            }),
        }
    }

    async fn reserve_items(
        &self,
        restaurant_id: RestaurantId,
        items: &[ItemQuantity],
    ) -> Result<Reservation> {
        let reserve = self.guarded(
            RESTAURANT_CATALOG,
            self.config.reservation_timeout,
            self.restaurants.reserve_purchase(restaurant_id, items),
        );
        match reserve.await? {
            Ok(reservation) => Ok(reservation),
            Err(ReservationError::RestaurantNotFound(id)) => Err(SagaError::RestaurantNotFound(id)),
            Err(ReservationError::ItemNotFound {
                restaurant_id,
                item_id,
            }) => Err(SagaError::ItemNotFound {
                restaurant_id,
                item_id,
            }),
            Err(ReservationError::Unavailable(reason)) => Err(SagaError::Unavailable {
                service: RESTAURANT_CATALOG,
                reason,
            }),
        }
    }

    /// Steps 5 and 6: payment request, then the confirmation publish.
    ///
    /// Returns whether the confirmation went out. On payment failure the
    /// order stays `PENDING` in both branches: `FAILED` is reserved for
    /// an explicit outcome event, and a rejected intent can still be
    /// retried out-of-band under the same reference.
    async fn request_payment_and_publish(
        &self,
        payment: PaymentRequest,
        confirmation: OrderConfirmation,
    ) -> Result<bool> {
        let request = self.guarded(
            PAYMENT_SERVICE,
            self.config.payment_timeout,
            self.payments.request_payment(&payment),
        );
        match request.await? {
            Ok(()) => {}
            Err(PaymentError::Rejected(reason)) => {
                return Err(SagaError::PaymentRejected { reason });
            }
            Err(PaymentError::Unavailable(reason)) => {
                return Err(SagaError::Unavailable {
                    service: PAYMENT_SERVICE,
                    reason,
                });
            }
        }
        tracing::info!(
            reference = %payment.order_reference,
            amount = %payment.amount,
            "payment intent accepted"
        );

        // Publish failure never rolls back the persisted order or the
        // issued payment request; neither is this component's to undo.
        let publish = timeout(
            self.config.publish_timeout,
            self.publisher.publish(&confirmation),
        );
        let published = match publish.await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!(
                    reference = %confirmation.order_reference,
                    error = %e,
                    "confirmation publish failed"
                );
                false
            }
            Err(_) => {
                tracing::warn!(
                    reference = %confirmation.order_reference,
                    "confirmation publish timed out"
                );
                false
            }
        };
        if !published {
            metrics::counter!("confirmation_publish_failures_total").increment(1);
        }

        Ok(published)
    }

    /// Wraps a collaborator call in its timeout; elapsing means the
    /// outcome is unknown, which is `Unavailable`, never a failure.
    async fn guarded<T, E>(
        &self,
        service: &'static str,
        limit: Duration,
        call: impl Future<Output = std::result::Result<T, E>>,
    ) -> Result<std::result::Result<T, E>> {
        timeout(limit, call).await.map_err(|_| SagaError::Unavailable {
            service,
            reason: format!("no response within {}ms", limit.as_millis()),
        })
    }
}
