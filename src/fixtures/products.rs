//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use rusty_money::{Findable, Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    money::has_two_decimal_places,
    products::{Catalog, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Product price (e.g., "350.00 PHP")
    pub price: String,

    /// Image URL
    pub image: String,

    /// Product description
    pub description: String,

    /// Optional collection name
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        let id =
            ProductId::new(fixture.id).ok_or_else(|| FixtureError::InvalidProductId(fixture.name.clone()))?;

        Ok(Product {
            id,
            name: fixture.name,
            price: Money::from_minor(minor_units, currency),
            image: fixture.image,
            description: fixture.description,
            category: fixture.category,
        })
    }
}

impl TryFrom<ProductsFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: ProductsFixture) -> Result<Self, Self::Error> {
        let mut seen: FxHashSet<ProductId> = FxHashSet::default();
        let mut currency: Option<&'static Currency> = None;
        let mut products = Vec::with_capacity(fixture.products.len());

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;
            let product_currency = product.price.currency();

            if let Some(existing_currency) = currency
                && existing_currency != product_currency
            {
                return Err(FixtureError::CurrencyMismatch(
                    existing_currency.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            currency = Some(product_currency);

            if !seen.insert(product.id) {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            products.push(product);
        }

        let currency = currency.ok_or(FixtureError::NoProducts)?;

        Ok(Catalog::from_parts(products, currency))
    }
}

/// Parse price string (e.g., "350.00 PHP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized or does not have two decimal places.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = Currency::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    if !has_two_decimal_places(currency) {
        return Err(FixtureError::UnsupportedCurrency((*currency_code).to_string()));
    }

    let minor_units = major_to_minor(amount).ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Convert a major-unit amount to minor units, rounding to the nearest minor unit.
pub(crate) fn major_to_minor(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
}
