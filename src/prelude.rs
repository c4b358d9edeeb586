//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLineItem, QuantityChange},
    checkout::{
        CheckoutError, CheckoutForm, CheckoutState, CheckoutStep, Delay, FormField, OrderForm,
        OrderSink, OrderSubmission, PaymentMode, PaymentVerifier, SimulatedVerifier,
        SubmissionError, ValidationError, VerificationError,
    },
    config::{CartConfig, ConfigError, EndpointConfig, Labels, PaymentModeOption},
    fixtures::{FixtureError, load_catalog, load_catalog_file},
    manager::CartManager,
    money::{format_amount, format_price},
    products::{Catalog, Product, ProductId},
    storage::{CartStorage, MemoryStorage, RestoreError, StorageError},
    surface::{
        Badge, CartLineView, CartSurface, CartView, ConfirmControl, Dialog, HeadlessSurface,
        Notification, Step, SurfaceEvent,
    },
};
