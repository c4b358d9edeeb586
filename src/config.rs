//! Storefront configuration
//!
//! One configuration covers both storefront variants: currency, the enabled
//! payment modes, whether a mobile-wallet reference is verified, and how order
//! fields map onto the external form endpoint.

use std::{fs, path::Path, time::Duration};

use rusty_money::{Findable, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{checkout::PaymentMode, money::has_two_decimal_places};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency without two decimal places
    #[error("Unsupported currency {0}: prices must have two decimal places")]
    UnsupportedCurrency(String),

    /// No payment modes enabled
    #[error("At least one payment mode must be enabled")]
    NoPaymentModes,

    /// A payment mode is listed more than once
    #[error("Payment mode {0:?} is listed more than once")]
    DuplicatePaymentMode(PaymentMode),

    /// The submission endpoint URL is empty
    #[error("The order endpoint URL must not be empty")]
    MissingEndpoint,
}

/// A payment mode offered on the checkout form and the label submitted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentModeOption {
    /// Mode
    pub mode: PaymentMode,

    /// Label shown and submitted (e.g. `"Gcash"`)
    pub label: String,
}

/// Mobile-wallet verification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationConfig {
    /// Whether a mobile-wallet reference goes through the verification step
    pub required: bool,

    /// Simulated verification delay in milliseconds
    pub delay_ms: u64,

    /// Require the wallet reference to be an 11-digit number
    pub wallet_number_pattern: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            required: true,
            delay_ms: 2_000,
            wallet_number_pattern: false,
        }
    }
}

/// External field identifiers for each order field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionFields {
    /// Student number field
    pub student_number: String,
    /// Student name field
    pub student_name: String,
    /// Section field
    pub section: String,
    /// Email field
    pub email: String,
    /// Items description field
    pub items: String,
    /// Two-decimal total field
    pub total: String,
    /// Order timestamp field
    pub order_date: String,
    /// Payment mode field
    pub payment_mode: String,
    /// Payment reference field
    pub payment_reference: String,
}

impl Default for SubmissionFields {
    fn default() -> Self {
        Self {
            student_number: "entry.1011423076".to_string(),
            student_name: "entry.84552753".to_string(),
            section: "entry.964847782".to_string(),
            email: "entry.135040288".to_string(),
            items: "entry.859203702".to_string(),
            total: "entry.494570708".to_string(),
            order_date: "entry.735505920".to_string(),
            payment_mode: "entry.308295728".to_string(),
            payment_reference: "entry.123456789".to_string(),
        }
    }
}

/// Order endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    /// Form-post URL
    pub url: String,

    /// Field identifier mapping
    pub fields: SubmissionFields,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "https://docs.google.com/forms/d/e/1FAIpQLSe4grnNLFBLZ-1toQsjUpBdMGZCT6iXo25Qr5_NGm6ma174Vw/formResponse".to_string(),
            fields: SubmissionFields::default(),
        }
    }
}

/// Confirm-control labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Idle label
    pub confirm: String,

    /// Label while verification runs
    pub verifying: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            confirm: "Confirm Order".to_string(),
            verifying: "Verifying Payment...".to_string(),
        }
    }
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CartConfig {
    /// Storage slot holding the cart
    pub storage_key: String,

    /// ISO currency code
    pub currency: String,

    /// Symbol override used when displaying prices
    pub currency_symbol: Option<String>,

    /// Enabled payment modes, in display order
    pub payment_modes: SmallVec<[PaymentModeOption; 2]>,

    /// Mobile-wallet verification
    pub verification: VerificationConfig,

    /// Order endpoint
    pub endpoint: EndpointConfig,

    /// Re-render the cart detail view after a removal
    pub rerender_on_remove: bool,

    /// How long notifications stay on screen, in milliseconds
    pub notification_ms: u64,

    /// Delay before the synthesized submission form is removed, in milliseconds
    pub submission_cleanup_ms: u64,

    /// strftime format for the order timestamp
    pub timestamp_format: String,

    /// Confirm-control labels
    pub labels: Labels,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: "cart".to_string(),
            currency: "PHP".to_string(),
            currency_symbol: Some("₱".to_string()),
            payment_modes: smallvec![
                PaymentModeOption {
                    mode: PaymentMode::Cash,
                    label: "Cash".to_string(),
                },
                PaymentModeOption {
                    mode: PaymentMode::MobileWallet,
                    label: "Gcash".to_string(),
                },
            ],
            verification: VerificationConfig::default(),
            endpoint: EndpointConfig::default(),
            rerender_on_remove: true,
            notification_ms: 2_000,
            submission_cleanup_ms: 1_000,
            timestamp_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            labels: Labels::default(),
        }
    }
}

impl CartConfig {
    /// Parse and validate configuration from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the configuration is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(yaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`CartConfig::from_yaml`] fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve_currency()?;

        if self.payment_modes.is_empty() {
            return Err(ConfigError::NoPaymentModes);
        }

        for (position, option) in self.payment_modes.iter().enumerate() {
            if self
                .payment_modes
                .iter()
                .take(position)
                .any(|earlier| earlier.mode == option.mode)
            {
                return Err(ConfigError::DuplicatePaymentMode(option.mode));
            }
        }

        if self.endpoint.url.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        Ok(())
    }

    /// Resolve the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unrecognised codes and
    /// [`ConfigError::UnsupportedCurrency`] for currencies without two decimal places.
    pub fn resolve_currency(&self) -> Result<&'static Currency, ConfigError> {
        let currency = Currency::find(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))?;

        if !has_two_decimal_places(currency) {
            return Err(ConfigError::UnsupportedCurrency(self.currency.clone()));
        }

        Ok(currency)
    }

    /// Whether a payment mode is enabled.
    pub fn accepts(&self, mode: PaymentMode) -> bool {
        self.payment_modes.iter().any(|option| option.mode == mode)
    }

    /// Label for a payment mode, falling back to its default name.
    pub fn payment_label(&self, mode: PaymentMode) -> &str {
        self.payment_modes
            .iter()
            .find(|option| option.mode == mode)
            .map_or_else(|| mode.default_label(), |option| option.label.as_str())
    }

    /// Payment mode whose label matches, ignoring ASCII case.
    pub fn mode_for_label(&self, label: &str) -> Option<PaymentMode> {
        self.payment_modes
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(label))
            .map(|option| option.mode)
    }

    /// Symbol override for displayed prices.
    pub fn symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }

    /// How long notifications stay visible.
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Delay before the synthesized submission element is removed.
    pub fn submission_cleanup(&self) -> Duration {
        Duration::from_millis(self.submission_cleanup_ms)
    }

    /// Simulated verification delay.
    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification.delay_ms)
    }
}
