use crate::checkout::ValidationError;

use super::{Badge, CartSurface, CartView, ConfirmControl, Dialog, Notification};

/// Something the manager asked the surface to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Badge updated
    Badge(Badge),
    /// Notification shown
    Notify(Notification),
    /// Cart detail rendered
    Render(CartView),
    /// Dialog shown
    Show(Dialog),
    /// Dialog hidden
    Hide(Dialog),
    /// Confirm control changed
    Confirm(ConfirmControl),
    /// Validation failure reported
    Validation(ValidationError),
    /// Checkout form cleared
    ResetForm,
}

/// A surface with no display that records every call in order.
///
/// Used for headless callers and for asserting on manager behaviour.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    events: Vec<SurfaceEvent>,
    cart_detail: bool,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    /// A surface whose page has a cart detail container.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cart_detail: true,
        }
    }

    /// A surface whose page has no cart detail container.
    pub fn without_cart_detail() -> Self {
        Self {
            events: Vec::new(),
            cart_detail: false,
        }
    }

    /// Every recorded event.
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Notification messages in the order shown.
    pub fn notifications(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Notify(notification) => Some(notification.message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent badge state.
    pub fn badge(&self) -> Option<Badge> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Badge(badge) => Some(*badge),
            _ => None,
        })
    }

    /// Most recent cart detail render.
    pub fn last_render(&self) -> Option<&CartView> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Render(view) => Some(view),
            _ => None,
        })
    }

    /// Number of cart detail renders.
    pub fn render_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SurfaceEvent::Render(_)))
            .count()
    }

    /// Confirm control states in the order set.
    pub fn confirm_history(&self) -> Vec<&ConfirmControl> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Confirm(control) => Some(control),
                _ => None,
            })
            .collect()
    }
}

impl CartSurface for HeadlessSurface {
    fn update_badge(&mut self, badge: Badge) {
        self.events.push(SurfaceEvent::Badge(badge));
    }

    fn notify(&mut self, notification: Notification) {
        self.events.push(SurfaceEvent::Notify(notification));
    }

    fn has_cart_detail(&self) -> bool {
        self.cart_detail
    }

    fn render_cart_detail(&mut self, view: &CartView) {
        self.events.push(SurfaceEvent::Render(view.clone()));
    }

    fn show_dialog(&mut self, dialog: Dialog) {
        self.events.push(SurfaceEvent::Show(dialog));
    }

    fn hide_dialog(&mut self, dialog: Dialog) {
        self.events.push(SurfaceEvent::Hide(dialog));
    }

    fn set_confirm_control(&mut self, control: &ConfirmControl) {
        self.events.push(SurfaceEvent::Confirm(control.clone()));
    }

    fn report_validation(&mut self, error: &ValidationError) {
        self.events.push(SurfaceEvent::Validation(error.clone()));
    }

    fn reset_checkout_form(&mut self) {
        self.events.push(SurfaceEvent::ResetForm);
    }
}
