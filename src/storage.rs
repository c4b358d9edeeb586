//! Cart persistence
//!
//! The cart is mirrored into a single named slot as a JSON array of line
//! items, each carrying the product fields plus its quantity.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError, CartLineItem},
    fixtures::products::major_to_minor,
    money::minor_to_major,
    products::{Product, ProductId},
};

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached (e.g. storage disabled in the browser).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the slot failed.
    #[error("storage operation failed: {0}")]
    Backend(String),

    /// Encoding the cart failed.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a stored cart could not be restored.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The slot could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The slot does not hold a JSON line-item array.
    #[error("stored cart is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored price cannot be represented in minor units.
    #[error("stored price for product {0} is out of range")]
    Price(ProductId),

    /// The stored line items break a cart invariant.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A single named-slot key/value store.
pub trait CartStorage {
    /// Read the slot, returning `None` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used by tests and headless callers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with one slot pre-filled.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }

    /// Raw slot content.
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Wire form of a line item.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLineItem {
    id: ProductId,
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    image: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    quantity: u32,
}

impl From<&CartLineItem> for StoredLineItem {
    fn from(item: &CartLineItem) -> Self {
        let product = item.product();

        Self {
            id: product.id,
            name: product.name.clone(),
            price: minor_to_major(product.price.to_minor_units()),
            image: product.image.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            quantity: item.quantity(),
        }
    }
}

impl StoredLineItem {
    fn into_line_item(self, currency: &'static Currency) -> Result<CartLineItem, RestoreError> {
        let minor_units = major_to_minor(self.price)
            .filter(|minor| *minor >= 0)
            .ok_or(RestoreError::Price(self.id))?;

        let product = Product {
            id: self.id,
            name: self.name,
            price: Money::from_minor(minor_units, currency),
            image: self.image,
            description: self.description,
            category: self.category,
        };

        Ok(CartLineItem::new(product, self.quantity)?)
    }
}

/// Serialize a cart into its stored JSON form.
///
/// # Errors
///
/// Returns a `serde_json::Error` if encoding fails.
pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    let stored: Vec<StoredLineItem> = cart.items().iter().map(StoredLineItem::from).collect();

    serde_json::to_string(&stored)
}

/// Parse a stored JSON cart, checking the cart invariants.
///
/// # Errors
///
/// Returns a `RestoreError` if the JSON is malformed or breaks a cart invariant.
pub fn decode_cart(json: &str, currency: &'static Currency) -> Result<Cart, RestoreError> {
    let stored: Vec<StoredLineItem> = serde_json::from_str(json)?;

    let items = stored
        .into_iter()
        .map(|item| item.into_line_item(currency))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cart::with_items(items, currency)?)
}

/// Write the full cart into the slot.
///
/// # Errors
///
/// Returns a `StorageError` if encoding or writing fails.
pub fn persist<S: CartStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    cart: &Cart,
) -> Result<(), StorageError> {
    let json = encode_cart(cart)?;

    storage.save(key, &json)?;

    debug!(key, line_items = cart.len(), "persisted cart");

    Ok(())
}

/// Read the slot, returning `None` when it is absent.
///
/// # Errors
///
/// Returns a `RestoreError` if the slot is unreadable or its content is malformed.
pub fn try_restore<S: CartStorage + ?Sized>(
    storage: &S,
    key: &str,
    currency: &'static Currency,
) -> Result<Option<Cart>, RestoreError> {
    storage
        .load(key)?
        .map(|json| decode_cart(&json, currency))
        .transpose()
}

/// Read the slot, falling back to an empty cart when it is absent or malformed.
pub fn restore<S: CartStorage + ?Sized>(
    storage: &S,
    key: &str,
    currency: &'static Currency,
) -> Cart {
    match try_restore(storage, key, currency) {
        Ok(Some(cart)) => {
            debug!(key, line_items = cart.len(), "restored cart");
            cart
        }
        Ok(None) => Cart::new(currency),
        Err(error) => {
            warn!(key, %error, "discarding unreadable stored cart");
            Cart::new(currency)
        }
    }
}
