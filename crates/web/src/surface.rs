//! Reactive surface
//!
//! The manager writes into signals; components read them.

use leptos::{prelude::*, task};
use storefront::{
    checkout::{FormField, ValidationError},
    config::Labels,
    surface::{Badge, CartSurface, CartView, ConfirmControl, Dialog, Notification},
};

use crate::browser::{timeout_ms, wait_for_timeout};

/// A notification on screen. Each one is dismissed by its own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) id: u64,
    pub(crate) message: String,
}

/// Checkout form field values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FormSignals {
    pub(crate) student_number: RwSignal<String>,
    pub(crate) student_name: RwSignal<String>,
    pub(crate) section: RwSignal<String>,
    pub(crate) email: RwSignal<String>,
    pub(crate) payment_label: RwSignal<String>,
    pub(crate) payment_reference: RwSignal<String>,
}

impl FormSignals {
    fn new() -> Self {
        Self {
            student_number: RwSignal::new(String::new()),
            student_name: RwSignal::new(String::new()),
            section: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            payment_label: RwSignal::new(String::new()),
            payment_reference: RwSignal::new(String::new()),
        }
    }

    fn reset(self) {
        for field in [
            self.student_number,
            self.student_name,
            self.section,
            self.email,
            self.payment_label,
            self.payment_reference,
        ] {
            field.set(String::new());
        }
    }
}

/// Everything the page renders from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfaceSignals {
    pub(crate) badge: RwSignal<Badge>,
    pub(crate) toasts: RwSignal<Vec<Toast>>,
    pub(crate) cart_view: RwSignal<Option<CartView>>,
    pub(crate) dialog: RwSignal<Option<Dialog>>,
    pub(crate) confirm: RwSignal<ConfirmControl>,
    pub(crate) invalid: RwSignal<Option<(FormField, String)>>,
    pub(crate) form: FormSignals,
}

impl SurfaceSignals {
    pub(crate) fn new(labels: &Labels) -> Self {
        Self {
            badge: RwSignal::new(Badge { count: 0 }),
            toasts: RwSignal::new(Vec::new()),
            cart_view: RwSignal::new(None),
            dialog: RwSignal::new(None),
            confirm: RwSignal::new(ConfirmControl {
                enabled: true,
                label: labels.confirm.clone(),
            }),
            invalid: RwSignal::new(None),
            form: FormSignals::new(),
        }
    }
}

/// [`CartSurface`] over [`SurfaceSignals`].
#[derive(Debug)]
pub(crate) struct SignalSurface {
    signals: SurfaceSignals,
    next_toast: u64,
}

impl SignalSurface {
    pub(crate) fn new(signals: SurfaceSignals) -> Self {
        Self {
            signals,
            next_toast: 0,
        }
    }

    /// Show a notification next to any already on screen.
    fn push_toast(&mut self, message: String) -> u64 {
        self.next_toast = self.next_toast.wrapping_add(1);

        let id = self.next_toast;

        self.signals
            .toasts
            .update(|toasts| toasts.push(Toast { id, message }));

        id
    }
}

fn dismiss_toast(toasts: RwSignal<Vec<Toast>>, id: u64) {
    toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
}

impl CartSurface for SignalSurface {
    fn update_badge(&mut self, badge: Badge) {
        self.signals.badge.set(badge);
    }

    fn notify(&mut self, notification: Notification) {
        let delay = timeout_ms(notification.duration);
        let id = self.push_toast(notification.message);
        let toasts = self.signals.toasts;

        task::spawn_local(async move {
            wait_for_timeout(delay).await;

            dismiss_toast(toasts, id);
        });
    }

    fn has_cart_detail(&self) -> bool {
        true
    }

    fn render_cart_detail(&mut self, view: &CartView) {
        self.signals.cart_view.set(Some(view.clone()));
    }

    fn show_dialog(&mut self, dialog: Dialog) {
        self.signals.invalid.set(None);
        self.signals.dialog.set(Some(dialog));
    }

    fn hide_dialog(&mut self, dialog: Dialog) {
        self.signals.dialog.update(|open| {
            if *open == Some(dialog) {
                *open = None;
            }
        });
    }

    fn set_confirm_control(&mut self, control: &ConfirmControl) {
        self.signals.confirm.set(control.clone());
    }

    fn report_validation(&mut self, error: &ValidationError) {
        self.signals
            .invalid
            .set(Some((error.field(), error.to_string())));
    }

    fn reset_checkout_form(&mut self) {
        self.signals.invalid.set(None);
        self.signals.form.reset();
    }
}

#[cfg(test)]
mod tests {
    use storefront::config::CartConfig;
    use testresult::TestResult;

    use super::*;

    fn surface() -> (SurfaceSignals, SignalSurface) {
        let signals = SurfaceSignals::new(&CartConfig::default().labels);

        (signals, SignalSurface::new(signals))
    }

    #[test]
    fn hiding_a_closed_dialog_keeps_the_open_one() {
        let owner = Owner::new();

        owner.with(|| {
            let (signals, mut surface) = surface();

            surface.show_dialog(Dialog::Checkout);
            surface.hide_dialog(Dialog::Cart);

            assert_eq!(signals.dialog.get_untracked(), Some(Dialog::Checkout));

            surface.hide_dialog(Dialog::Checkout);

            assert_eq!(signals.dialog.get_untracked(), None);
        });
    }

    #[test]
    fn validation_is_cleared_by_form_reset() -> TestResult {
        let owner = Owner::new();

        owner.with(|| {
            let (signals, mut surface) = surface();

            signals.form.email.set("juan@".to_string());
            surface.report_validation(&ValidationError::InvalidEmail);

            let (field, _) = signals.invalid.get_untracked().ok_or("expected a validation error")?;

            assert_eq!(field, FormField::Email);

            surface.reset_checkout_form();

            assert_eq!(signals.invalid.get_untracked(), None);
            assert!(signals.form.email.get_untracked().is_empty());

            Ok(())
        })
    }

    #[test]
    fn notifications_overlap_and_dismiss_independently() {
        let owner = Owner::new();

        owner.with(|| {
            let (signals, mut surface) = surface();

            let added = surface.push_toast("Item added to cart!".to_string());
            let removed = surface.push_toast("Item removed from cart!".to_string());

            assert_eq!(signals.toasts.get_untracked().len(), 2);

            dismiss_toast(signals.toasts, added);

            let remaining: Vec<u64> = signals
                .toasts
                .get_untracked()
                .iter()
                .map(|toast| toast.id)
                .collect();

            assert_eq!(remaining, vec![removed]);
        });
    }

    #[test]
    fn confirm_control_starts_enabled() {
        let owner = Owner::new();

        owner.with(|| {
            let (signals, mut surface) = surface();

            assert!(signals.confirm.get_untracked().enabled);

            surface.set_confirm_control(&ConfirmControl {
                enabled: false,
                label: "Verifying Payment...".to_string(),
            });

            assert_eq!(signals.confirm.get_untracked().label, "Verifying Payment...");
        });
    }
}
