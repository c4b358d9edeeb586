//! Leptos Storefront Application

use std::sync::Arc;

use leptos::prelude::*;
use storefront::{
    config::CartConfig,
    fixtures::load_catalog,
    manager::CartManager,
    products::Catalog,
};

mod browser;
mod cart;
mod checkout;
mod products;
mod surface;

use crate::{
    browser::BrowserStorage,
    surface::{SignalSurface, SurfaceSignals},
};

const PRODUCTS_FIXTURE_YAML: &str = include_str!("../../../fixtures/products/merch.yml");
const CONFIG_FIXTURE_YAML: &str = include_str!("../../../fixtures/config/storefront.yml");

type Manager = CartManager<BrowserStorage, SignalSurface>;

/// Page-wide handles shared by every component.
#[derive(Debug, Clone, Copy)]
struct Shop {
    /// The one cart manager for this page session.
    manager: StoredValue<Manager, LocalStorage>,

    /// Signals the manager writes into.
    signals: SurfaceSignals,
}

impl Shop {
    fn start() -> Result<(Arc<Catalog>, Self), String> {
        let config = CartConfig::from_yaml(CONFIG_FIXTURE_YAML)
            .map_err(|error| format!("Failed to load storefront configuration: {error}"))?;

        let catalog = load_catalog(PRODUCTS_FIXTURE_YAML)
            .map_err(|error| format!("Failed to load products: {error}"))?;

        let signals = SurfaceSignals::new(&config.labels);

        let manager = CartManager::new(config, BrowserStorage::open(), SignalSurface::new(signals))
            .map_err(|error| format!("Invalid storefront configuration: {error}"))?;

        Ok((
            Arc::new(catalog),
            Self {
                manager: StoredValue::new_local(manager),
                signals,
            },
        ))
    }
}

#[component]
fn Notifications(shop: Shop) -> impl IntoView {
    view! {
        <div class="notification-area" role="status" aria-live="polite" aria-atomic="true">
            {move || {
                shop.signals
                    .toasts
                    .get()
                    .into_iter()
                    .map(|toast| view! { <div class="notification">{toast.message}</div> })
                    .collect_view()
            }}
        </div>
    }
}

/// Storefront app shell.
#[component]
fn App() -> impl IntoView {
    match Shop::start() {
        Ok((catalog, shop)) => view! {
            <header class="site-header">
                <h1 class="site-title">"Merch Store"</h1>
                <cart::CartButton shop=shop />
            </header>
            <main class="storefront">
                <products::ProductCollections catalog=catalog shop=shop />
            </main>
            <cart::CartDialog shop=shop />
            <checkout::CheckoutDialog shop=shop />
            <Notifications shop=shop />
        }
        .into_any(),
        Err(error_message) => view! {
            <main class="storefront">
                <h1 class="site-title">"Merch Store"</h1>
                <div class="load-error">
                    <p>{error_message}</p>
                </div>
            </main>
        }
        .into_any(),
    }
}

/// Main entry point
fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}
