//! Fixtures

use std::{fs, path::Path};

use thiserror::Error;

use crate::products::{Catalog, ProductId};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency without two decimal places
    #[error("Unsupported currency {0}: prices must have two decimal places")]
    UnsupportedCurrency(String),

    /// Product ids must be positive
    #[error("Product '{0}' has id 0; ids must be positive")]
    InvalidProductId(String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products in the fixture
    #[error("No products found in fixture")]
    NoProducts,
}

/// Parse a catalog from YAML fixture content.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price or currency is invalid,
/// ids are zero or duplicated, or the catalog is empty.
pub fn load_catalog(yaml: &str) -> Result<Catalog, FixtureError> {
    let fixture: products::ProductsFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}

/// Read and parse a catalog fixture file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`load_catalog`] fails.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    load_catalog(&contents)
}
