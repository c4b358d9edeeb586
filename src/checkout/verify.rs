//! Payment verification

use std::{future::Future, time::Duration};

use thiserror::Error;
use tracing::debug;

/// Verification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The reference was checked and not accepted
    #[error("Payment verification failed. Please check your reference number and try again.")]
    Rejected,

    /// The verifier could not complete the check
    #[error("Payment verification failed. Please try again. ({0})")]
    Unavailable(String),
}

/// Checks a mobile-wallet payment reference.
pub trait PaymentVerifier {
    /// Verify a reference.
    ///
    /// # Errors
    ///
    /// Returns a `VerificationError` if the payment cannot be confirmed.
    fn verify(&self, reference: &str) -> impl Future<Output = Result<(), VerificationError>>;
}

/// A timer the verifier can wait on.
pub trait Delay {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Stand-in verifier: waits a fixed delay, then answers with a fixed outcome.
///
/// Accepts every reference unless built with [`SimulatedVerifier::rejecting`].
#[derive(Debug, Clone)]
pub struct SimulatedVerifier<D> {
    delay: D,
    duration: Duration,
    accept: bool,
}

impl<D: Delay> SimulatedVerifier<D> {
    /// A verifier that accepts after `duration`.
    pub fn new(delay: D, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            accept: true,
        }
    }

    /// A verifier that rejects after `duration`.
    pub fn rejecting(delay: D, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            accept: false,
        }
    }
}

impl<D: Delay> PaymentVerifier for SimulatedVerifier<D> {
    async fn verify(&self, reference: &str) -> Result<(), VerificationError> {
        debug!(reference, delay_ms = self.duration.as_millis(), "simulating payment verification");

        self.delay.sleep(self.duration).await;

        if self.accept {
            Ok(())
        } else {
            Err(VerificationError::Rejected)
        }
    }
}
