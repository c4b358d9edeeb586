//! HTTP order sink

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use reqwest::Client;
use storefront::checkout::{Delay, OrderForm, OrderSink, SubmissionError};
use tokio::{runtime::Handle, task::JoinSet};
use tracing::{debug, info, warn};

/// Posts orders as url-encoded forms on background tasks.
///
/// `submit` only dispatches; call [`HttpFormSink::drain`] before the runtime
/// shuts down so in-flight posts get a chance to finish.
#[derive(Debug)]
pub(crate) struct HttpFormSink {
    client: Client,
    pending: Mutex<JoinSet<()>>,
}

impl HttpFormSink {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            pending: Mutex::new(JoinSet::new()),
        }
    }

    /// Wait for every dispatched post.
    pub(crate) async fn drain(&self) {
        let mut pending = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );

        while let Some(joined) = pending.join_next().await {
            if let Err(error) = joined {
                warn!(%error, "order post task failed");
            }
        }
    }
}

impl OrderSink for HttpFormSink {
    fn submit(&self, order: &OrderForm) -> Result<(), SubmissionError> {
        let handle = Handle::try_current()
            .map_err(|error| SubmissionError::Dispatch(error.to_string()))?;

        let request = self
            .client
            .post(&order.action)
            .form(&order.fields);

        debug!(method = OrderForm::METHOD, action = %order.action, fields = order.fields.len(), "dispatching order");

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn_on(
                async move {
                    match request.send().await {
                        Ok(response) => info!(status = %response.status(), "order posted"),
                        Err(error) => warn!(%error, "order post failed"),
                    }
                },
                &handle,
            );

        Ok(())
    }
}

/// Tokio timer for the simulated verifier.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn order() -> OrderForm {
        OrderForm {
            action: "http://127.0.0.1:9/formResponse".to_string(),
            fields: vec![("entry.1".to_string(), "value".to_string())],
        }
    }

    #[test]
    fn submit_outside_a_runtime_fails_to_dispatch() {
        let sink = HttpFormSink::new(Client::new());

        assert!(matches!(
            sink.submit(&order()),
            Err(SubmissionError::Dispatch(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_still_counts_as_dispatched() -> TestResult {
        let sink = HttpFormSink::new(Client::new());

        sink.submit(&order())?;
        sink.drain().await;

        Ok(())
    }
}
