//! Checkout
//!
//! The checkout flow moves through `Idle → FormOpen → Verifying → Submitting`
//! and back to `Idle` on success. Verification applies to mobile-wallet
//! payments only; a failed verification or submission returns to `FormOpen`
//! with the entered data intact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod form;
pub mod order;
pub mod submit;
pub mod verify;

pub use form::{CheckoutForm, FormField, ValidationError};
pub use order::{OrderForm, OrderSubmission};
pub use submit::{OrderSink, SubmissionError};
pub use verify::{Delay, PaymentVerifier, SimulatedVerifier, VerificationError};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash on pickup
    Cash,

    /// Mobile wallet transfer identified by a reference number
    MobileWallet,
}

impl PaymentMode {
    /// Name used when the configuration gives no label.
    pub fn default_label(self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::MobileWallet => "Mobile wallet",
        }
    }
}

/// Where the checkout flow currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No checkout in progress
    #[default]
    Idle,

    /// The checkout form is shown and accepts confirmation
    FormOpen,

    /// A mobile-wallet reference is being verified
    Verifying,

    /// The order is being built and posted
    Submitting,
}

/// What the caller must do after a confirmation is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Verify the payment reference, then report the result.
    Verify {
        /// Reference entered on the form
        reference: String,
    },

    /// Submit the order straight away.
    Submit,
}

/// Checkout failures. None of them are fatal; the flow can always be retried.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no line items
    #[error("Your cart is empty!")]
    EmptyCart,

    /// The step does not apply in the current checkout state
    #[error("checkout cannot proceed from {0:?}")]
    InvalidState(CheckoutState),

    /// The form failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Payment verification failed
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Building or posting the order failed
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
