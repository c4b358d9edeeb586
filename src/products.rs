//! Products

use std::{fmt, num::NonZeroU32};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Product identifier, unique and positive within a catalog.
///
/// Deserializing rejects zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(NonZeroU32);

impl ProductId {
    /// Creates a product id, returning `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Returns the raw id value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Image URL
    pub image: String,

    /// Product description
    pub description: String,

    /// Optional collection the product belongs to
    pub category: Option<String>,
}

/// A static set of products sharing one currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    pub(crate) fn from_parts(products: Vec<Product>, currency: &'static Currency) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();

        Self {
            products,
            index,
            currency,
        }
    }

    /// Looks up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|position| self.products.get(*position))
    }

    /// Iterates products in fixture order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Groups products by category, keeping the order each category is first seen.
    ///
    /// Products without a category are grouped under `None`.
    pub fn collections(&self) -> Vec<(Option<&str>, Vec<&Product>)> {
        let mut groups: Vec<(Option<&str>, Vec<&Product>)> = Vec::new();

        for product in &self.products {
            let category = product.category.as_deref();

            match groups.iter_mut().find(|(existing, _)| *existing == category) {
                Some((_, members)) => members.push(product),
                None => groups.push((category, vec![product])),
            }
        }

        groups
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency shared by every product.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
