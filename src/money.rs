//! Money formatting

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

/// Decimal places of every currency a storefront can price in.
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Whether amounts in `currency` have exactly [`MINOR_UNIT_DIGITS`] decimal places.
///
/// Minor-unit formatting and the stored major-unit prices both depend on it.
pub fn has_two_decimal_places(currency: &Currency) -> bool {
    currency.exponent == MINOR_UNIT_DIGITS
}

/// Format a minor-unit amount as a plain two-decimal string (e.g. `"700.00"`).
pub fn format_amount(minor_units: i64) -> String {
    let abs_minor = minor_units.unsigned_abs();
    let major_units = abs_minor / 100;
    let fractional = abs_minor % 100;
    let sign = if minor_units < 0 { "-" } else { "" };

    format!("{sign}{major_units}.{fractional:02}")
}

/// Format money with a currency symbol prefix (e.g. `"₱350.00"`).
///
/// Falls back to the currency's own symbol when no override is given.
pub fn format_price(money: &Money<'_, Currency>, symbol: Option<&str>) -> String {
    let minor_units = money.to_minor_units();
    let symbol = symbol.unwrap_or(money.currency().symbol);
    let amount = format_amount(minor_units);

    match amount.strip_prefix('-') {
        Some(unsigned) => format!("-{symbol}{unsigned}"),
        None => format!("{symbol}{amount}"),
    }
}

/// Convert minor units into a major-unit decimal (e.g. `35000` into `350.00`).
pub(crate) fn minor_to_major(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, MINOR_UNIT_DIGITS)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;

    use super::*;

    #[test]
    fn format_amount_pads_fraction() {
        assert_eq!(format_amount(70_000), "700.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(-1_250), "-12.50");
    }

    #[test]
    fn format_price_uses_override_symbol() {
        let money = Money::from_minor(35_000, iso::PHP);

        assert_eq!(format_price(&money, Some("₱")), "₱350.00");
        assert_eq!(format_price(&money, Some("$")), "$350.00");
    }

    #[test]
    fn format_price_uses_currency_symbol_by_default() {
        let money = Money::from_minor(999, iso::USD);

        assert_eq!(format_price(&money, None), "$9.99");
    }

    #[test]
    fn format_price_places_sign_before_symbol() {
        let money = Money::from_minor(-250, iso::GBP);

        assert_eq!(format_price(&money, None), "-£2.50");
    }

    #[test]
    fn only_two_place_currencies_are_supported() {
        assert!(has_two_decimal_places(iso::PHP));
        assert!(has_two_decimal_places(iso::USD));
        assert!(!has_two_decimal_places(iso::JPY));
        assert!(!has_two_decimal_places(iso::BHD));
    }

    #[test]
    fn minor_to_major_keeps_two_places() {
        assert_eq!(minor_to_major(35_000).to_string(), "350.00");
    }
}
