use std::time::Duration;

use js_sys::{Function, Promise};
use leptos::task;
use storefront::{
    checkout::{OrderForm, OrderSink, SubmissionError},
    storage::{CartStorage, StorageError},
};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlFormElement, HtmlInputElement, Storage};

use super::timeout_ms;

fn js_value_message(error: &JsValue, fallback: &str) -> String {
    error.as_string().unwrap_or_else(|| fallback.to_string())
}

/// The page's `localStorage`.
#[derive(Debug, Default)]
pub(crate) struct BrowserStorage {
    storage: Option<Storage>,
}

impl BrowserStorage {
    /// Open `localStorage`; a disabled or missing store leaves the cart in memory only.
    pub(crate) fn open() -> Self {
        let storage = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(error) => {
                warn!(
                    error = %js_value_message(&error, "access denied"),
                    "localStorage unavailable"
                );
                None
            }
        });

        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl CartStorage for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|error| StorageError::Backend(js_value_message(&error, "getItem failed")))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|error| StorageError::Backend(js_value_message(&error, "setItem failed")))
    }
}

/// Posts orders by submitting a hidden form into a new tab.
///
/// The form is removed from the document after the cleanup delay. The
/// endpoint's response is never observed.
#[derive(Debug)]
pub(crate) struct FormPostSink {
    cleanup: Duration,
}

impl FormPostSink {
    pub(crate) fn new(cleanup: Duration) -> Self {
        Self { cleanup }
    }
}

fn dispatch_error(error: &JsValue, fallback: &str) -> SubmissionError {
    SubmissionError::Dispatch(js_value_message(error, fallback))
}

fn hidden_input(document: &Document, name: &str, value: &str) -> Result<HtmlInputElement, SubmissionError> {
    let input: HtmlInputElement = document
        .create_element("input")
        .map_err(|error| dispatch_error(&error, "Failed to create form field"))?
        .dyn_into()
        .map_err(|_element| SubmissionError::Dispatch("Failed to prepare form field".to_string()))?;

    input.set_type("hidden");
    input.set_name(name);
    input.set_value(value);

    Ok(input)
}

impl OrderSink for FormPostSink {
    fn submit(&self, order: &OrderForm) -> Result<(), SubmissionError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| SubmissionError::Dispatch("Document is unavailable".to_string()))?;

        let body = document
            .body()
            .ok_or_else(|| SubmissionError::Dispatch("Document body is unavailable".to_string()))?;

        let form: HtmlFormElement = document
            .create_element("form")
            .map_err(|error| dispatch_error(&error, "Failed to create form"))?
            .dyn_into()
            .map_err(|_element| SubmissionError::Dispatch("Failed to prepare form".to_string()))?;

        form.set_method(OrderForm::METHOD);
        form.set_action(&order.action);
        form.set_target("_blank");

        for (name, value) in &order.fields {
            let input = hidden_input(&document, name, value)?;

            form.append_child(&input)
                .map_err(|error| dispatch_error(&error, "Failed to add form field"))?;
        }

        body.append_child(&form)
            .map_err(|error| dispatch_error(&error, "Failed to attach form"))?;

        if let Err(error) = form.submit() {
            form.remove();
            return Err(dispatch_error(&error, "Failed to submit form"));
        }

        debug!(action = %order.action, "order form submitted");

        let cleanup = timeout_ms(self.cleanup);

        task::spawn_local(async move {
            wait_for_timeout(cleanup).await;
            form.remove();
        });

        Ok(())
    }
}

pub(crate) async fn wait_for_timeout(delay_ms: i32) {
    let mut executor = move |resolve: Function, _reject: Function| {
        let Some(window) = web_sys::window() else {
            if let Err(error) = resolve.call0(&JsValue::NULL) {
                warn!(error = %js_value_message(&error, "resolve failed"), "timer");
            }
            return;
        };

        let callback = Closure::once_into_js(move || {
            if let Err(error) = resolve.call0(&JsValue::NULL) {
                warn!(error = %js_value_message(&error, "resolve failed"), "timer");
            }
        });

        if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        ) {
            warn!(error = %js_value_message(&error, "setTimeout failed"), "timer");
        }
    };

    let promise = Promise::new(&mut executor);

    if let Err(error) = JsFuture::from(promise).await {
        warn!(error = %js_value_message(&error, "timer rejected"), "timer");
    }
}
