//! Checkout form validation

use std::fmt;

use thiserror::Error;

use crate::{checkout::PaymentMode, config::CartConfig};

/// Number of digits in a mobile-wallet number.
pub const WALLET_NUMBER_DIGITS: usize = 11;

/// Values entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Student number
    pub student_number: String,

    /// Student name
    pub student_name: String,

    /// Section
    pub section: String,

    /// Contact email
    pub email: String,

    /// Selected payment mode
    pub payment_mode: Option<PaymentMode>,

    /// Mobile-wallet reference or number
    pub payment_reference: String,
}

/// Checkout form fields, used to point at the field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Student number
    StudentNumber,
    /// Student name
    StudentName,
    /// Section
    Section,
    /// Email
    Email,
    /// Payment mode selector
    PaymentMode,
    /// Payment reference
    PaymentReference,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::StudentNumber => "Student number",
            FormField::StudentName => "Student name",
            FormField::Section => "Section",
            FormField::Email => "Email",
            FormField::PaymentMode => "Payment mode",
            FormField::PaymentReference => "Payment reference",
        };

        f.write_str(label)
    }
}

/// Form constraint failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("{0} is required")]
    Required(FormField),

    /// The email address is malformed
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// The chosen payment mode is not offered
    #[error("{0:?} payment is not available")]
    UnsupportedPaymentMode(PaymentMode),

    /// The wallet number is not an 11-digit number
    #[error("Please enter a valid 11-digit wallet number")]
    InvalidWalletNumber,
}

impl ValidationError {
    /// The field the error refers to.
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::InvalidEmail => FormField::Email,
            ValidationError::UnsupportedPaymentMode(_) => FormField::PaymentMode,
            ValidationError::InvalidWalletNumber => FormField::PaymentReference,
        }
    }
}

impl CheckoutForm {
    /// Check the form against its constraints, reporting the first failure in form order.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self, config: &CartConfig) -> Result<PaymentMode, ValidationError> {
        let required = [
            (FormField::StudentNumber, &self.student_number),
            (FormField::StudentName, &self.student_name),
            (FormField::Section, &self.section),
            (FormField::Email, &self.email),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::Required(*field));
        }

        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }

        let mode = self
            .payment_mode
            .ok_or(ValidationError::Required(FormField::PaymentMode))?;

        if !config.accepts(mode) {
            return Err(ValidationError::UnsupportedPaymentMode(mode));
        }

        if mode == PaymentMode::MobileWallet {
            let reference = self.payment_reference.trim();

            if reference.is_empty() {
                return Err(ValidationError::Required(FormField::PaymentReference));
            }

            if config.verification.wallet_number_pattern && !is_wallet_number(reference) {
                return Err(ValidationError::InvalidWalletNumber);
            }
        }

        Ok(mode)
    }

    /// The reference that needs verifying, if any.
    pub(crate) fn reference_to_verify(&self, config: &CartConfig) -> Option<String> {
        let reference = self.payment_reference.trim();

        (config.verification.required
            && self.payment_mode == Some(PaymentMode::MobileWallet)
            && !reference.is_empty())
        .then(|| reference.to_string())
    }
}

/// Email check following the HTML `type=email` rules.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c));

    local_ok && !domain.is_empty() && domain.split('.').all(is_valid_domain_label)
}

fn is_valid_domain_label(label: &str) -> bool {
    let bytes = label.as_bytes();

    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= 63
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

/// Whether a value is an 11-digit wallet number.
pub fn is_wallet_number(value: &str) -> bool {
    value.len() == WALLET_NUMBER_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}
