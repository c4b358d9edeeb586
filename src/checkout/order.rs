//! Order submissions

use jiff::{Zoned, fmt::strtime};

use crate::{
    cart::Cart,
    checkout::{CheckoutForm, SubmissionError},
    config::{CartConfig, EndpointConfig},
    money::format_amount,
};

/// Snapshot of an order taken at checkout time. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    /// Student number
    pub student_number: String,

    /// Student name
    pub student_name: String,

    /// Section
    pub section: String,

    /// Contact email
    pub email: String,

    /// Payment mode label as submitted
    pub payment_mode: String,

    /// Payment reference, empty for cash
    pub payment_reference: String,

    /// Flattened line items, e.g. `"V1.1 T-Shirt (2x), Sticker Set A (1x)"`
    pub items: String,

    /// Two-decimal total, e.g. `"700.00"`
    pub total: String,

    /// Formatted order timestamp
    pub order_date: String,
}

impl OrderSubmission {
    /// Build a snapshot from the form, the cart and the time the order was placed.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingPaymentMode`] if no payment mode was chosen, or
    /// [`SubmissionError::Timestamp`] if the timestamp format is invalid.
    pub fn build(
        form: &CheckoutForm,
        cart: &Cart,
        config: &CartConfig,
        placed_at: &Zoned,
    ) -> Result<Self, SubmissionError> {
        let mode = form
            .payment_mode
            .ok_or(SubmissionError::MissingPaymentMode)?;

        let order_date = strtime::format(&config.timestamp_format, placed_at)?;

        Ok(Self {
            student_number: form.student_number.trim().to_string(),
            student_name: form.student_name.trim().to_string(),
            section: form.section.trim().to_string(),
            email: form.email.trim().to_string(),
            payment_mode: config.payment_label(mode).to_string(),
            payment_reference: form.payment_reference.trim().to_string(),
            items: describe_items(cart),
            total: format_amount(cart.total().to_minor_units()),
            order_date,
        })
    }

    /// Map the snapshot onto the endpoint's field identifiers.
    pub fn to_form(&self, endpoint: &EndpointConfig) -> OrderForm {
        let fields = &endpoint.fields;

        OrderForm {
            action: endpoint.url.clone(),
            fields: vec![
                (fields.student_number.clone(), self.student_number.clone()),
                (fields.student_name.clone(), self.student_name.clone()),
                (fields.section.clone(), self.section.clone()),
                (fields.email.clone(), self.email.clone()),
                (fields.items.clone(), self.items.clone()),
                (fields.total.clone(), self.total.clone()),
                (fields.order_date.clone(), self.order_date.clone()),
                (fields.payment_mode.clone(), self.payment_mode.clone()),
                (fields.payment_reference.clone(), self.payment_reference.clone()),
            ],
        }
    }
}

/// A form post ready to be sent: the target URL and its named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    /// Target URL
    pub action: String,

    /// Field name/value pairs in submission order
    pub fields: Vec<(String, String)>,
}

impl OrderForm {
    /// HTTP method used for the post.
    pub const METHOD: &'static str = "POST";

    /// Value of a named field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Flatten line items into `"Name (Nx), Name (Nx)"`.
pub fn describe_items(cart: &Cart) -> String {
    cart.items()
        .iter()
        .map(|item| format!("{} ({}x)", item.product().name, item.quantity()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        checkout::PaymentMode,
        products::{Product, ProductId},
    };

    use super::*;

    fn product(id: u32, name: &str, price_minor: i64) -> TestResult<Product> {
        Ok(Product {
            id: ProductId::new(id).ok_or("zero id")?,
            name: name.to_string(),
            price: Money::from_minor(price_minor, iso::PHP),
            image: String::new(),
            description: String::new(),
            category: None,
        })
    }

    fn form(mode: PaymentMode, reference: &str) -> CheckoutForm {
        CheckoutForm {
            student_number: " 2024-00123 ".to_string(),
            student_name: "Juan Dela Cruz".to_string(),
            section: "BSCS 2A".to_string(),
            email: "juan@example.edu.ph".to_string(),
            payment_mode: Some(mode),
            payment_reference: reference.to_string(),
        }
    }

    fn cart() -> TestResult<Cart> {
        let mut cart = Cart::new(iso::PHP);
        let shirt = product(1, "V1.1 T-Shirt", 35_000)?;

        cart.add(&shirt)?;
        cart.add(&shirt)?;
        cart.add(&product(8, "Sticker Set A", 8_000)?)?;

        Ok(cart)
    }

    #[test]
    fn build_flattens_cart_and_formats_values() -> TestResult {
        let placed_at: Zoned = "2026-10-19T15:04:05[UTC]".parse()?;

        let order = OrderSubmission::build(
            &form(PaymentMode::MobileWallet, "REF-77"),
            &cart()?,
            &CartConfig::default(),
            &placed_at,
        )?;

        assert_eq!(order.student_number, "2024-00123");
        assert_eq!(order.items, "V1.1 T-Shirt (2x), Sticker Set A (1x)");
        assert_eq!(order.total, "780.00");
        assert_eq!(order.payment_mode, "Gcash");
        assert_eq!(order.payment_reference, "REF-77");
        assert_eq!(order.order_date, "10/19/2026, 3:04:05 PM");

        Ok(())
    }

    #[test]
    fn build_requires_payment_mode() -> TestResult {
        let placed_at: Zoned = "2026-10-19T09:00:00[UTC]".parse()?;
        let mut incomplete = form(PaymentMode::Cash, "");
        incomplete.payment_mode = None;

        let result = OrderSubmission::build(&incomplete, &cart()?, &CartConfig::default(), &placed_at);

        assert!(matches!(result, Err(SubmissionError::MissingPaymentMode)));

        Ok(())
    }

    #[test]
    fn to_form_uses_field_mapping_in_order() -> TestResult {
        let placed_at: Zoned = "2026-01-02T08:30:00[UTC]".parse()?;
        let config = CartConfig::default();

        let order = OrderSubmission::build(&form(PaymentMode::Cash, ""), &cart()?, &config, &placed_at)?;
        let post = order.to_form(&config.endpoint);

        let names: Vec<&str> = post.fields.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(post.action, config.endpoint.url);
        assert_eq!(
            names,
            vec![
                "entry.1011423076",
                "entry.84552753",
                "entry.964847782",
                "entry.135040288",
                "entry.859203702",
                "entry.494570708",
                "entry.735505920",
                "entry.308295728",
                "entry.123456789",
            ]
        );
        assert_eq!(post.field("entry.494570708"), Some("780.00"));
        assert_eq!(post.field("entry.308295728"), Some("Cash"));
        assert_eq!(post.field("entry.735505920"), Some("1/2/2026, 8:30:00 AM"));
        assert_eq!(post.field("entry.123456789"), Some(""));

        Ok(())
    }

    #[test]
    fn describe_items_is_empty_for_empty_cart() {
        assert_eq!(describe_items(&Cart::new(iso::PHP)), "");
    }
}
