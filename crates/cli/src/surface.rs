//! Terminal surface

use std::{fmt, io};

use storefront::{
    checkout::ValidationError,
    surface::{Badge, CartSurface, CartView, ConfirmControl, Dialog, Notification},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use tracing::{debug, warn};

/// Writes the cart's output as plain lines and tables.
#[derive(Debug)]
pub(crate) struct TerminalSurface<W> {
    out: W,
    show_badge: bool,
}

impl<W: io::Write> TerminalSurface<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            show_badge: false,
        }
    }

    /// Start printing badge updates; the badge set while restoring is skipped.
    pub(crate) fn show_badge(&mut self) {
        self.show_badge = true;
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(error) = writeln!(self.out, "{args}") {
            warn!(%error, "failed to write to terminal");
        }
    }
}

/// Lay out the cart as a table followed by its total.
pub(crate) fn cart_table(view: &CartView) -> String {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Price", "Qty", "Subtotal"]);

    for line in &view.lines {
        builder.push_record([
            line.id.to_string(),
            line.name.clone(),
            line.price.clone(),
            line.quantity.to_string(),
            line.line_total.clone(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    format!("{table}\nTotal: {}", view.total)
}

impl<W: io::Write> CartSurface for TerminalSurface<W> {
    fn update_badge(&mut self, badge: Badge) {
        if !self.show_badge {
            return;
        }

        if badge.visible() {
            self.line(format_args!("Cart: {} item(s)", badge.count));
        } else {
            self.line(format_args!("Cart is empty"));
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.line(format_args!("» {}", notification.message));
    }

    fn has_cart_detail(&self) -> bool {
        true
    }

    fn render_cart_detail(&mut self, view: &CartView) {
        if view.is_empty() {
            self.line(format_args!("Your cart is empty."));
            return;
        }

        let table = cart_table(view);

        self.line(format_args!("{table}"));
    }

    fn show_dialog(&mut self, dialog: Dialog) {
        debug!(?dialog, "show dialog");
    }

    fn hide_dialog(&mut self, dialog: Dialog) {
        debug!(?dialog, "hide dialog");
    }

    fn set_confirm_control(&mut self, control: &ConfirmControl) {
        if !control.enabled {
            self.line(format_args!("{}", control.label));
        }
    }

    fn report_validation(&mut self, error: &ValidationError) {
        self.line(format_args!("error: {error}"));
    }

    fn reset_checkout_form(&mut self) {
        debug!("checkout form reset");
    }
}
