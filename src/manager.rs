//! Cart manager
//!
//! Owns the page session's single cart, mirrors it to storage after every
//! mutation, keeps the surface in sync, and drives the checkout flow.

use jiff::Zoned;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, error, info, warn};

use crate::{
    cart::{Cart, QuantityChange},
    checkout::{
        CheckoutError, CheckoutForm, CheckoutState, CheckoutStep, OrderSink, OrderSubmission,
        PaymentVerifier, VerificationError,
    },
    config::{CartConfig, ConfigError},
    products::{Product, ProductId},
    storage::{self, CartStorage, StorageError},
    surface::{
        Badge, CART_EMPTY, CartSurface, CartView, ConfirmControl, Dialog, ITEM_ADDED,
        ITEM_REMOVED, Notification, ORDER_FAILED, ORDER_RECEIVED, Step,
    },
};

/// Cart manager
#[derive(Debug)]
pub struct CartManager<S, U> {
    config: CartConfig,
    currency: &'static Currency,
    cart: Cart,
    storage: S,
    surface: U,
    state: CheckoutState,
    open_dialog: Option<Dialog>,
}

impl<S: CartStorage, U: CartSurface> CartManager<S, U> {
    /// Restore the cart from storage and show its item count.
    ///
    /// Absent or malformed stored data yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is invalid.
    pub fn new(config: CartConfig, storage: S, surface: U) -> Result<Self, ConfigError> {
        config.validate()?;

        let currency = config.resolve_currency()?;
        let cart = storage::restore(&storage, &config.storage_key, currency);

        let mut manager = Self {
            config,
            currency,
            cart,
            storage,
            surface,
            state: CheckoutState::Idle,
            open_dialog: None,
        };

        manager.update_cart_icon();

        Ok(manager)
    }

    /// Add one unit of a product and tell the customer.
    pub fn add_item(&mut self, product: &Product) {
        match self.cart.add(product) {
            Ok(quantity) => {
                debug!(product = %product.id, quantity, "added item");
            }
            Err(error) => {
                warn!(product = %product.id, %error, "refusing to add item");
                return;
            }
        }

        self.save_cart();
        self.update_cart_icon();
        self.show_notification(ITEM_ADDED);
    }

    /// Delete a product's line item. Does nothing if the product is not in the cart.
    ///
    /// Re-renders the cart detail view unless `rerender_on_remove` is off.
    pub fn remove_item(&mut self, id: ProductId) {
        if self.cart.remove(id).is_none() {
            debug!(product = %id, "nothing to remove");
            return;
        }

        debug!(product = %id, "removed item");

        self.save_cart();
        self.update_cart_icon();
        self.show_notification(ITEM_REMOVED);

        if self.config.rerender_on_remove {
            self.render_cart();
        }
    }

    /// Set a line quantity. Requests at or below zero remove the line.
    ///
    /// Does not re-render the cart detail view; callers showing it must call
    /// [`CartManager::render_cart`] themselves.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if self.cart.get(id).is_none() {
            debug!(product = %id, "no line item to update");
            return;
        }

        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let QuantityChange::Updated(quantity) = self.cart.set_quantity(id, quantity) {
            debug!(product = %id, quantity, "updated quantity");

            self.save_cart();
            self.update_cart_icon();
        }
    }

    /// Add-to-cart button handler: add one unit, then refresh the detail view
    /// in case it is open.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.add_item(product);
        self.render_cart();
    }

    /// Stepper control handler: move a quantity by one, then re-render.
    pub fn step_quantity(&mut self, id: ProductId, step: Step) {
        let Some(current) = self.cart.get(id).map(|item| i64::from(item.quantity())) else {
            return;
        };

        let requested = match step {
            Step::Increment => current.saturating_add(1),
            Step::Decrement => current.saturating_sub(1),
        };

        self.update_quantity(id, requested);
        self.render_cart();
    }

    /// Sum of `price × quantity`.
    pub fn total(&self) -> Money<'static, Currency> {
        self.cart.total()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Write the cart into storage.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if encoding or writing fails.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        storage::persist(&mut self.storage, &self.config.storage_key, &self.cart)
    }

    /// Write the current item count into the badge.
    pub fn update_cart_icon(&mut self) {
        self.surface.update_badge(Badge {
            count: self.cart.item_count(),
        });
    }

    /// Show a transient notification.
    pub fn show_notification(&mut self, message: impl Into<String>) {
        self.surface.notify(Notification {
            message: message.into(),
            duration: self.config.notification_duration(),
        });
    }

    /// Rebuild the cart detail view. Does nothing if the page has no detail container.
    pub fn render_cart(&mut self) {
        if !self.surface.has_cart_detail() {
            return;
        }

        let view = CartView::build(&self.cart, self.config.symbol());

        self.surface.render_cart_detail(&view);
    }

    /// Cart icon handler: render the detail view and open the cart dialog.
    pub fn open_cart(&mut self) {
        self.render_cart();
        self.show(Dialog::Cart);
    }

    /// Close a dialog the customer dismissed.
    pub fn close_dialog(&mut self, dialog: Dialog) {
        self.hide(dialog);

        if dialog == Dialog::Checkout && self.state == CheckoutState::FormOpen {
            self.state = CheckoutState::Idle;
        }
    }

    /// Open the checkout form, closing the cart dialog first.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] after notifying the customer when the cart is empty.
    pub fn checkout(&mut self) -> Result<(), CheckoutError> {
        if self.cart.is_empty() {
            self.show_notification(CART_EMPTY);
            return Err(CheckoutError::EmptyCart);
        }

        self.hide(Dialog::Cart);
        self.show(Dialog::Checkout);

        if self.state == CheckoutState::Idle {
            self.state = CheckoutState::FormOpen;
        }

        debug!(state = ?self.state, "checkout form open");

        Ok(())
    }

    /// Confirm-control handler: validate the form and start the checkout.
    ///
    /// A mobile-wallet reference moves the flow to `Verifying` and disables the
    /// confirm control; the caller verifies it and reports back through
    /// [`CartManager::finish_verification`]. Otherwise the flow moves straight
    /// to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] without changing state when the form
    /// is invalid, [`CheckoutError::EmptyCart`] when there is nothing to order, or
    /// [`CheckoutError::InvalidState`] while a previous confirmation is still running.
    pub fn confirm_checkout(&mut self, form: &CheckoutForm) -> Result<CheckoutStep, CheckoutError> {
        if matches!(
            self.state,
            CheckoutState::Verifying | CheckoutState::Submitting
        ) {
            return Err(CheckoutError::InvalidState(self.state));
        }

        if self.cart.is_empty() {
            self.show_notification(CART_EMPTY);
            return Err(CheckoutError::EmptyCart);
        }

        if let Err(error) = form.validate(&self.config) {
            debug!(%error, "checkout form invalid");
            self.surface.report_validation(&error);
            return Err(error.into());
        }

        if let Some(reference) = form.reference_to_verify(&self.config) {
            self.surface.set_confirm_control(&ConfirmControl {
                enabled: false,
                label: self.config.labels.verifying.clone(),
            });
            self.state = CheckoutState::Verifying;

            info!("verifying mobile-wallet payment");

            return Ok(CheckoutStep::Verify { reference });
        }

        self.state = CheckoutState::Submitting;

        Ok(CheckoutStep::Submit)
    }

    /// Report the verification result.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Verification`] after notifying the customer and
    /// re-enabling the confirm control, or [`CheckoutError::InvalidState`] when
    /// no verification is running.
    pub fn finish_verification(
        &mut self,
        result: Result<(), VerificationError>,
    ) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::Verifying {
            return Err(CheckoutError::InvalidState(self.state));
        }

        match result {
            Ok(()) => {
                info!("payment verified");
                self.state = CheckoutState::Submitting;

                Ok(())
            }
            Err(error) => {
                error!(%error, "payment verification failed");
                self.show_notification(error.to_string());
                self.restore_confirm_control();
                self.state = CheckoutState::FormOpen;

                Err(error.into())
            }
        }
    }

    /// Build the order and hand it to the sink.
    ///
    /// On success the cart is cleared, the checkout dialog closed and the form
    /// reset. Delivery is best effort; the endpoint's response is never seen.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Submission`] after notifying the customer, leaving
    /// the cart untouched, or [`CheckoutError::InvalidState`] when the flow is not
    /// ready to submit.
    pub fn submit_order<O: OrderSink + ?Sized>(
        &mut self,
        form: &CheckoutForm,
        sink: &O,
        placed_at: &Zoned,
    ) -> Result<OrderSubmission, CheckoutError> {
        if self.state != CheckoutState::Submitting {
            return Err(CheckoutError::InvalidState(self.state));
        }

        let dispatched = OrderSubmission::build(form, &self.cart, &self.config, placed_at)
            .and_then(|order| {
                sink.submit(&order.to_form(&self.config.endpoint))?;
                Ok(order)
            });

        let order = match dispatched {
            Ok(order) => order,
            Err(error) => {
                error!(%error, "order submission failed");
                self.show_notification(ORDER_FAILED);
                self.restore_confirm_control();
                self.state = CheckoutState::FormOpen;

                return Err(error.into());
            }
        };

        info!(total = %order.total, items = %order.items, "order dispatched");

        self.show_notification(ORDER_RECEIVED);

        self.cart.clear();
        self.save_cart();
        self.update_cart_icon();
        self.render_cart();

        self.hide(Dialog::Checkout);
        self.surface.reset_checkout_form();
        self.restore_confirm_control();
        self.state = CheckoutState::Idle;

        Ok(order)
    }

    /// Run the whole confirmation: validate, verify if needed, then submit.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] raised by a step.
    pub async fn process_checkout<V, O>(
        &mut self,
        form: &CheckoutForm,
        verifier: &V,
        sink: &O,
    ) -> Result<OrderSubmission, CheckoutError>
    where
        V: PaymentVerifier + ?Sized,
        O: OrderSink + ?Sized,
    {
        if let CheckoutStep::Verify { reference } = self.confirm_checkout(form)? {
            let result = verifier.verify(&reference).await;
            self.finish_verification(result)?;
        }

        self.submit_order(form, sink, &Zoned::now())
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current checkout state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Dialog currently open, if any.
    pub fn open_dialog(&self) -> Option<Dialog> {
        self.open_dialog
    }

    /// Active configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The surface.
    pub fn surface(&self) -> &U {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    fn save_cart(&mut self) {
        if let Err(error) = self.persist() {
            warn!(%error, "failed to persist cart");
        }
    }

    fn restore_confirm_control(&mut self) {
        self.surface.set_confirm_control(&ConfirmControl {
            enabled: true,
            label: self.config.labels.confirm.clone(),
        });
    }

    fn show(&mut self, dialog: Dialog) {
        self.surface.show_dialog(dialog);
        self.open_dialog = Some(dialog);
    }

    fn hide(&mut self, dialog: Dialog) {
        if self.open_dialog == Some(dialog) {
            self.surface.hide_dialog(dialog);
            self.open_dialog = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::always;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        checkout::{PaymentMode, SubmissionError, submit::MockOrderSink},
        storage::MemoryStorage,
        surface::{HeadlessSurface, SurfaceEvent},
    };

    use super::*;

    type TestManager = CartManager<MemoryStorage, HeadlessSurface>;

    fn product(id: u32, name: &str, price_minor: i64) -> TestResult<Product> {
        Ok(Product {
            id: ProductId::new(id).ok_or("zero id")?,
            name: name.to_string(),
            price: Money::from_minor(price_minor, iso::PHP),
            image: format!("{id}.png"),
            description: String::new(),
            category: None,
        })
    }

    fn id(value: u32) -> TestResult<ProductId> {
        Ok(ProductId::new(value).ok_or("zero id")?)
    }

    fn manager() -> TestResult<TestManager> {
        Ok(CartManager::new(
            CartConfig::default(),
            MemoryStorage::new(),
            HeadlessSurface::new(),
        )?)
    }

    fn cash_form() -> CheckoutForm {
        CheckoutForm {
            student_number: "2024-00123".to_string(),
            student_name: "Juan Dela Cruz".to_string(),
            section: "BSCS 2A".to_string(),
            email: "juan@example.edu.ph".to_string(),
            payment_mode: Some(PaymentMode::Cash),
            payment_reference: String::new(),
        }
    }

    fn placed_at() -> TestResult<Zoned> {
        Ok("2026-10-19T15:04:05[Asia/Manila]".parse()?)
    }

    #[test]
    fn new_restores_and_shows_badge() -> TestResult {
        let storage = MemoryStorage::with_slot(
            "cart",
            r#"[{"id":1,"name":"Shirt","price":350,"image":"","description":"","quantity":3}]"#,
        );

        let manager = CartManager::new(CartConfig::default(), storage, HeadlessSurface::new())?;

        assert_eq!(manager.item_count(), 3);
        assert_eq!(manager.surface().badge(), Some(Badge { count: 3 }));

        Ok(())
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = CartConfig {
            currency: "NOPE".to_string(),
            ..CartConfig::default()
        };

        let result = CartManager::new(config, MemoryStorage::new(), HeadlessSurface::new());

        assert!(matches!(result, Err(ConfigError::UnknownCurrency(_))));
    }

    #[test]
    fn new_rejects_currency_without_cents() {
        let config = CartConfig {
            currency: "JPY".to_string(),
            ..CartConfig::default()
        };

        let result = CartManager::new(config, MemoryStorage::new(), HeadlessSurface::new());

        assert!(matches!(result, Err(ConfigError::UnsupportedCurrency(code)) if code == "JPY"));
    }

    #[test]
    fn add_item_persists_badges_and_notifies() -> TestResult {
        let mut manager = manager()?;
        let shirt = product(1, "V1.1 T-Shirt", 35_000)?;

        manager.add_item(&shirt);
        manager.add_item(&shirt);

        assert_eq!(manager.cart().len(), 1);
        assert_eq!(manager.item_count(), 2);
        assert_eq!(manager.total(), Money::from_minor(70_000, iso::PHP));
        assert_eq!(manager.surface().badge(), Some(Badge { count: 2 }));
        assert_eq!(manager.surface().notifications(), vec![ITEM_ADDED, ITEM_ADDED]);

        let stored = storage::try_restore(manager.storage(), "cart", iso::PHP)?;

        assert_eq!(stored.as_ref(), Some(manager.cart()));

        Ok(())
    }

    #[test]
    fn remove_item_rerenders_by_default() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.surface_mut().take_events();

        manager.remove_item(id(1)?);

        let events = manager.surface().events();

        assert!(manager.cart().is_empty());
        assert_eq!(manager.surface().badge(), Some(Badge { count: 0 }));
        assert_eq!(manager.surface().notifications(), vec![ITEM_REMOVED]);
        assert!(matches!(events.last(), Some(SurfaceEvent::Render(view)) if view.is_empty()));

        Ok(())
    }

    #[test]
    fn remove_item_can_skip_rerender() -> TestResult {
        let config = CartConfig {
            rerender_on_remove: false,
            ..CartConfig::default()
        };
        let mut manager = CartManager::new(config, MemoryStorage::new(), HeadlessSurface::new())?;
        manager.add_item(&product(1, "Shirt", 35_000)?);

        manager.remove_item(id(1)?);

        assert_eq!(manager.surface().render_count(), 0);

        Ok(())
    }

    #[test]
    fn remove_missing_item_is_silent() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        let before = manager.cart().clone();
        manager.surface_mut().take_events();

        manager.remove_item(id(99)?);

        assert_eq!(manager.cart(), &before);
        assert!(manager.surface().events().is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_does_not_rerender() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.surface_mut().take_events();

        manager.update_quantity(id(1)?, 4);

        assert_eq!(manager.item_count(), 4);
        assert_eq!(manager.surface().badge(), Some(Badge { count: 4 }));
        assert_eq!(manager.surface().render_count(), 0);

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_or_below_removes() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.add_item(&product(2, "Other", 35_000)?);

        manager.update_quantity(id(1)?, 0);
        manager.update_quantity(id(2)?, -5);

        assert!(manager.cart().is_empty());
        assert_eq!(
            manager.surface().notifications().last(),
            Some(&ITEM_REMOVED)
        );

        Ok(())
    }

    #[test]
    fn step_quantity_rerenders() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(5, "Sticker", 3_000)?);
        manager.surface_mut().take_events();

        manager.step_quantity(id(5)?, Step::Increment);

        let view = manager.surface().last_render().ok_or("expected a render")?;

        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "₱60.00");

        manager.step_quantity(id(5)?, Step::Decrement);
        manager.step_quantity(id(5)?, Step::Decrement);

        assert!(manager.cart().is_empty());

        Ok(())
    }

    #[test]
    fn render_without_container_is_a_no_op() -> TestResult {
        let mut manager = CartManager::new(
            CartConfig::default(),
            MemoryStorage::new(),
            HeadlessSurface::without_cart_detail(),
        )?;
        manager.add_item(&product(1, "Shirt", 35_000)?);

        manager.render_cart();
        manager.remove_item(id(1)?);

        assert_eq!(manager.surface().render_count(), 0);

        Ok(())
    }

    #[test]
    fn checkout_with_empty_cart_notifies() -> TestResult {
        let mut manager = manager()?;

        let result = manager.checkout();

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert_eq!(manager.surface().notifications(), vec![CART_EMPTY]);
        assert_eq!(manager.open_dialog(), None);
        assert_eq!(manager.state(), CheckoutState::Idle);

        Ok(())
    }

    #[test]
    fn checkout_swaps_cart_dialog_for_checkout_dialog() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.open_cart();
        manager.surface_mut().take_events();

        manager.checkout()?;

        assert_eq!(
            manager.surface().events(),
            &[
                SurfaceEvent::Hide(Dialog::Cart),
                SurfaceEvent::Show(Dialog::Checkout)
            ]
        );
        assert_eq!(manager.open_dialog(), Some(Dialog::Checkout));
        assert_eq!(manager.state(), CheckoutState::FormOpen);

        Ok(())
    }

    #[test]
    fn closing_checkout_dialog_returns_to_idle() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.checkout()?;

        manager.close_dialog(Dialog::Checkout);

        assert_eq!(manager.state(), CheckoutState::Idle);
        assert_eq!(manager.open_dialog(), None);

        Ok(())
    }

    #[test]
    fn invalid_form_halts_without_state_change() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.checkout()?;

        let mut form = cash_form();
        form.email = "not-an-email".to_string();

        let result = manager.confirm_checkout(&form);

        assert!(matches!(result, Err(CheckoutError::Validation(_))));
        assert_eq!(manager.state(), CheckoutState::FormOpen);
        assert!(
            manager
                .surface()
                .events()
                .iter()
                .any(|event| matches!(event, SurfaceEvent::Validation(_)))
        );

        Ok(())
    }

    #[test]
    fn cash_checkout_submits_and_clears() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "V1.1 T-Shirt", 35_000)?);
        manager.checkout()?;

        let mut sink = MockOrderSink::new();
        sink.expect_submit()
            .with(always())
            .times(1)
            .returning(|order| {
                assert_eq!(order.field("entry.494570708"), Some("350.00"));
                assert_eq!(order.field("entry.859203702"), Some("V1.1 T-Shirt (1x)"));
                Ok(())
            });

        let step = manager.confirm_checkout(&cash_form())?;

        assert_eq!(step, CheckoutStep::Submit);

        let order = manager.submit_order(&cash_form(), &sink, &placed_at()?)?;

        assert_eq!(order.payment_mode, "Cash");
        assert!(manager.cart().is_empty());
        assert_eq!(manager.surface().badge(), Some(Badge { count: 0 }));
        assert_eq!(manager.state(), CheckoutState::Idle);
        assert_eq!(manager.open_dialog(), None);
        assert!(manager.surface().events().contains(&SurfaceEvent::ResetForm));
        assert_eq!(
            manager.surface().notifications().last(),
            Some(&ORDER_RECEIVED)
        );
        assert_eq!(manager.storage().slot("cart"), Some("[]"));

        Ok(())
    }

    #[test]
    fn failed_dispatch_keeps_cart() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.checkout()?;

        let mut sink = MockOrderSink::new();
        sink.expect_submit()
            .times(1)
            .returning(|_| Err(SubmissionError::Dispatch("offline".to_string())));

        manager.confirm_checkout(&cash_form())?;
        let result = manager.submit_order(&cash_form(), &sink, &placed_at()?);

        assert!(matches!(result, Err(CheckoutError::Submission(_))));
        assert_eq!(manager.item_count(), 1);
        assert_eq!(manager.state(), CheckoutState::FormOpen);
        assert_eq!(manager.surface().notifications().last(), Some(&ORDER_FAILED));

        let control = manager
            .surface()
            .confirm_history()
            .last()
            .copied()
            .cloned()
            .ok_or("expected confirm control update")?;

        assert!(control.enabled);
        assert_eq!(control.label, "Confirm Order");

        Ok(())
    }

    #[test]
    fn wallet_checkout_disables_confirm_until_verified() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        manager.checkout()?;

        let form = CheckoutForm {
            payment_mode: Some(PaymentMode::MobileWallet),
            payment_reference: "REF-123".to_string(),
            ..cash_form()
        };

        let step = manager.confirm_checkout(&form)?;

        assert_eq!(
            step,
            CheckoutStep::Verify {
                reference: "REF-123".to_string()
            }
        );
        assert_eq!(manager.state(), CheckoutState::Verifying);
        assert_eq!(
            manager.surface().confirm_history(),
            vec![&ConfirmControl {
                enabled: false,
                label: "Verifying Payment...".to_string()
            }]
        );

        assert!(matches!(
            manager.confirm_checkout(&form),
            Err(CheckoutError::InvalidState(CheckoutState::Verifying))
        ));

        let result = manager.finish_verification(Err(VerificationError::Rejected));

        assert!(matches!(result, Err(CheckoutError::Verification(_))));
        assert_eq!(manager.state(), CheckoutState::FormOpen);
        assert_eq!(manager.item_count(), 1);
        assert_eq!(
            manager.surface().notifications().last(),
            Some(&"Payment verification failed. Please check your reference number and try again.")
        );

        let restored = manager
            .surface()
            .confirm_history()
            .last()
            .map(|control| control.enabled);

        assert_eq!(restored, Some(true));

        Ok(())
    }

    #[test]
    fn submit_requires_submitting_state() -> TestResult {
        let mut manager = manager()?;
        manager.add_item(&product(1, "Shirt", 35_000)?);
        let sink = MockOrderSink::new();

        let result = manager.submit_order(&cash_form(), &sink, &placed_at()?);

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidState(CheckoutState::Idle))
        ));
        assert_eq!(manager.item_count(), 1);

        Ok(())
    }
}
