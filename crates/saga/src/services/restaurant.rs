//! Restaurant catalog contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{ItemQuantity, MenuItemId, Money, RestaurantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One reserved line: the authoritative price and resolved name for a
/// requested (item, quantity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedItem {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// A successful reservation: every requested line priced and held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub items: Vec<ReservedItem>,
}

/// Errors from the restaurant catalog.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The restaurant does not exist.
    #[error("restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),

    /// A requested item does not exist or does not belong to the
    /// restaurant.
    #[error("menu item '{item_id}' not found at restaurant {restaurant_id}")]
    ItemNotFound {
        restaurant_id: RestaurantId,
        item_id: MenuItemId,
    },

    /// Transport failure or timeout; the outcome is unknown.
    #[error("restaurant catalog unavailable: {0}")]
    Unavailable(String),
}

/// Validates a restaurant, prices the requested items, and reserves them
/// for purchase.
///
/// The call is atomic from the saga's point of view: either every
/// requested line comes back priced, or the call fails as a whole.
/// Partial success is not part of the contract. Pricing is authoritative;
/// caller-supplied prices are never trusted.
#[async_trait]
pub trait RestaurantCatalog: Send + Sync {
    /// Reserves and prices the requested items at one restaurant.
    async fn reserve_purchase(
        &self,
        restaurant_id: RestaurantId,
        items: &[ItemQuantity],
    ) -> Result<Reservation, ReservationError>;
}

#[derive(Debug)]
struct MenuEntry {
    name: String,
    items: HashMap<MenuItemId, (String, Money)>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    restaurants: HashMap<RestaurantId, MenuEntry>,
    reservations: u32,
    unavailable: bool,
}

/// In-memory restaurant catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRestaurantCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryRestaurantCatalog {
    /// Creates a new in-memory restaurant catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a restaurant with its menu, returning its ID.
    pub fn register(
        &self,
        name: impl Into<String>,
        menu: Vec<(MenuItemId, String, Money)>,
    ) -> RestaurantId {
        let restaurant_id = RestaurantId::new();
        let items = menu
            .into_iter()
            .map(|(item_id, item_name, price)| (item_id, (item_name, price)))
            .collect();

        self.state.write().unwrap().restaurants.insert(
            restaurant_id,
            MenuEntry {
                name: name.into(),
                items,
            },
        );
        restaurant_id
    }

    /// Configures the catalog to fail every reservation as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Returns the number of successful reservations.
    pub fn reservation_count(&self) -> u32 {
        self.state.read().unwrap().reservations
    }
}

#[async_trait]
impl RestaurantCatalog for InMemoryRestaurantCatalog {
    async fn reserve_purchase(
        &self,
        restaurant_id: RestaurantId,
        items: &[ItemQuantity],
    ) -> Result<Reservation, ReservationError> {
        let mut state = self.state.write().unwrap();

        if state.unavailable {
            return Err(ReservationError::Unavailable(
                "connection refused".to_string(),
            ));
        }

        let entry = state
            .restaurants
            .get(&restaurant_id)
            .ok_or(ReservationError::RestaurantNotFound(restaurant_id))?;

        // Validate every line before pricing any, so the reservation is
        // all-or-nothing.
        for requested in items {
            if !entry.items.contains_key(&requested.item_id) {
                return Err(ReservationError::ItemNotFound {
                    restaurant_id,
                    item_id: requested.item_id.clone(),
                });
            }
        }

        let reserved = items
            .iter()
            .map(|requested| {
                let (name, unit_price) = &entry.items[&requested.item_id];
                ReservedItem {
                    item_id: requested.item_id.clone(),
                    name: name.clone(),
                    unit_price: *unit_price,
                    quantity: requested.quantity,
                    line_total: unit_price.multiply(requested.quantity),
                }
            })
            .collect();

        let reservation = Reservation {
            restaurant_id,
            restaurant_name: entry.name.clone(),
            items: reserved,
        };

        state.reservations += 1;
        Ok(reservation)
    }
}
