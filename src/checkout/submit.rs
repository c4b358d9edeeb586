//! Order delivery

use thiserror::Error;

use crate::checkout::OrderForm;

/// Errors building or dispatching an order.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// No payment mode was chosen
    #[error("no payment mode selected")]
    MissingPaymentMode,

    /// The order timestamp could not be formatted
    #[error("failed to format order timestamp: {0}")]
    Timestamp(#[from] jiff::Error),

    /// The sink could not dispatch the post
    #[error("failed to dispatch order: {0}")]
    Dispatch(String),
}

/// Best-effort order delivery.
///
/// `Ok` means the post was handed off, never that the endpoint recorded it.
/// Responses are not inspected.
#[cfg_attr(test, mockall::automock)]
pub trait OrderSink {
    /// Dispatch the form post.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Dispatch`] if the post could not be handed off.
    fn submit(&self, order: &OrderForm) -> Result<(), SubmissionError>;
}

impl<T: OrderSink + ?Sized> OrderSink for &T {
    fn submit(&self, order: &OrderForm) -> Result<(), SubmissionError> {
        (**self).submit(order)
    }
}
