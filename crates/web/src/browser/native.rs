use std::time::Duration;

use leptos::task;
use storefront::{
    checkout::{OrderForm, OrderSink, SubmissionError},
    storage::{CartStorage, MemoryStorage, StorageError},
};

/// In-memory slot standing in for `localStorage`.
#[derive(Debug, Default)]
pub(crate) struct BrowserStorage {
    memory: MemoryStorage,
}

impl BrowserStorage {
    pub(crate) fn open() -> Self {
        Self::default()
    }
}

impl CartStorage for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.memory.load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.memory.save(key, value)
    }
}

/// Form posts need a document; off the browser every dispatch fails.
#[derive(Debug)]
pub(crate) struct FormPostSink {
    _cleanup: Duration,
}

impl FormPostSink {
    pub(crate) fn new(cleanup: Duration) -> Self {
        Self { _cleanup: cleanup }
    }
}

impl OrderSink for FormPostSink {
    fn submit(&self, _order: &OrderForm) -> Result<(), SubmissionError> {
        Err(SubmissionError::Dispatch(
            "form posts require a browser document".to_string(),
        ))
    }
}

pub(crate) async fn wait_for_timeout(_delay_ms: i32) {
    task::tick().await;
}
