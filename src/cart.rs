//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A line item would be held with quantity zero.
    #[error("Product {0} has a zero quantity")]
    ZeroQuantity(ProductId),

    /// Two line items reference the same product.
    #[error("Product {0} appears in more than one line item")]
    DuplicateProduct(ProductId),
}

/// A product together with how many of it are in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    product: Product,
    quantity: u32,
}

impl CartLineItem {
    /// Creates a line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] when `quantity` is zero.
    pub fn new(product: Product, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product.id));
        }

        Ok(Self { product, quantity })
    }

    /// The product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// How many units are in the cart, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total in minor units (`price × quantity`).
    pub fn line_total_minor(&self) -> i64 {
        self.product
            .price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Result of a quantity change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line item now holds this quantity.
    Updated(u32),

    /// The clamped quantity was zero, so the line item was deleted.
    Removed,

    /// No line item exists for the product.
    Missing,
}

/// Cart
///
/// An ordered list of line items with at most one line per product.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart from existing line items, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a product appears twice or a currency differs.
    pub fn with_items(
        items: impl Into<Vec<CartLineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        for (position, item) in items.iter().enumerate() {
            let product = item.product();
            let item_currency = product.price.currency();

            if item_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    product.id,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if items
                .iter()
                .take(position)
                .any(|earlier| earlier.product().id == product.id)
            {
                return Err(CartError::DuplicateProduct(product.id));
            }
        }

        Ok(Cart { items, currency })
    }

    /// Add one unit of a product, returning the resulting line quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] when the product is priced in another currency.
    pub fn add(&mut self, product: &Product) -> Result<u32, CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(item) = self.line_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);

            return Ok(item.quantity);
        }

        self.items.push(CartLineItem {
            product: product.clone(),
            quantity: 1,
        });

        Ok(1)
    }

    /// Delete the line item for a product, if present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLineItem> {
        let position = self.items.iter().position(|item| item.product.id == id)?;

        Some(self.items.remove(position))
    }

    /// Set a line quantity, clamping negative requests to zero.
    ///
    /// A clamped quantity of zero deletes the line item.
    pub fn set_quantity(&mut self, id: ProductId, requested: i64) -> QuantityChange {
        let Some(item) = self.line_mut(id) else {
            return QuantityChange::Missing;
        };

        let clamped = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);

        if clamped == 0 {
            self.remove(id);

            return QuantityChange::Removed;
        }

        item.quantity = clamped;

        QuantityChange::Updated(clamped)
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price × quantity` across line items.
    pub fn total(&self) -> Money<'static, Currency> {
        let minor_units = self
            .items
            .iter()
            .map(CartLineItem::line_total_minor)
            .fold(0_i64, i64::saturating_add);

        Money::from_minor(minor_units, self.currency)
    }

    /// Sum of quantities across line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Line item for a product.
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Get the number of line items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.product.id == id)
    }
}
