//! UI surface
//!
//! Everything the cart manager shows goes through [`CartSurface`]: the badge,
//! transient notifications, the cart detail view, the two dialogs, the
//! confirm control and the checkout form. Front-ends implement it over the DOM,
//! a terminal, or a recording double in tests.

use std::time::Duration;

use rusty_money::Money;

use crate::{
    cart::Cart,
    checkout::ValidationError,
    money::{format_amount, format_price},
    products::ProductId,
};

mod headless;

pub use headless::{HeadlessSurface, SurfaceEvent};

/// Notification shown after an item is added.
pub const ITEM_ADDED: &str = "Item added to cart!";

/// Notification shown after an item is removed.
pub const ITEM_REMOVED: &str = "Item removed from cart!";

/// Notification shown when checking out an empty cart.
pub const CART_EMPTY: &str = "Your cart is empty!";

/// Notification shown after an order is handed off.
pub const ORDER_RECEIVED: &str = "Thank you for your purchase! Your order has been received.";

/// Notification shown when an order could not be handed off.
pub const ORDER_FAILED: &str = "There was an error processing your order. Please try again.";

/// Item-count badge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Total item count
    pub count: u64,
}

impl Badge {
    /// The badge is hidden while the cart is empty.
    pub fn visible(self) -> bool {
        self.count > 0
    }
}

/// A transient, auto-dismissing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Message text
    pub message: String,

    /// How long it stays on screen
    pub duration: Duration,
}

/// The modal dialogs the manager opens and closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// Cart detail dialog
    Cart,

    /// Checkout form dialog
    Checkout,
}

/// State of the confirm-checkout control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmControl {
    /// Whether the control accepts clicks
    pub enabled: bool,

    /// Control label
    pub label: String,
}

/// Quantity stepper direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Add one
    Increment,

    /// Take one away; at one this removes the line
    Decrement,
}

/// Render model for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Product id the stepper and remove controls act on
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Image URL
    pub image: String,

    /// Unit price
    pub price: String,

    /// Quantity
    pub quantity: u32,

    /// `price × quantity`
    pub line_total: String,
}

/// Render model for the cart detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Lines in cart order
    pub lines: Vec<CartLineView>,

    /// Cart total, with currency symbol
    pub total: String,

    /// Cart total as a plain two-decimal amount
    pub total_amount: String,

    /// Total item count
    pub item_count: u64,
}

impl CartView {
    /// Build the render model for a cart.
    pub fn build(cart: &Cart, symbol: Option<&str>) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| {
                let product = item.product();
                let line_total = Money::from_minor(item.line_total_minor(), cart.currency());

                CartLineView {
                    id: product.id,
                    name: product.name.clone(),
                    image: product.image.clone(),
                    price: format_price(&product.price, symbol),
                    quantity: item.quantity(),
                    line_total: format_price(&line_total, symbol),
                }
            })
            .collect();

        let total = cart.total();

        CartView {
            lines,
            total: format_price(&total, symbol),
            total_amount: format_amount(total.to_minor_units()),
            item_count: cart.item_count(),
        }
    }

    /// Check if the view has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Output side of the storefront page.
pub trait CartSurface {
    /// Write the item count into the badge; hide it when the count is zero.
    fn update_badge(&mut self, badge: Badge);

    /// Show a transient notification. Notifications are not queued and may overlap.
    fn notify(&mut self, notification: Notification);

    /// Whether the cart detail container exists on the page.
    fn has_cart_detail(&self) -> bool;

    /// Replace the cart detail view, discarding the previous markup and its handlers.
    fn render_cart_detail(&mut self, view: &CartView);

    /// Show a dialog, creating it on first use.
    fn show_dialog(&mut self, dialog: Dialog);

    /// Hide a dialog.
    fn hide_dialog(&mut self, dialog: Dialog);

    /// Update the confirm-checkout control.
    fn set_confirm_control(&mut self, control: &ConfirmControl);

    /// Surface a validation failure through the form's own validation UI.
    fn report_validation(&mut self, error: &ValidationError);

    /// Clear the checkout form fields.
    fn reset_checkout_form(&mut self);
}
