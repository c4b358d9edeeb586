//! Integration tests for the checkout flow

use std::{cell::RefCell, future, time::Duration};

use testresult::TestResult;

use storefront::{
    checkout::{
        CheckoutError, CheckoutForm, CheckoutState, Delay, OrderForm, OrderSink, PaymentMode,
        SimulatedVerifier, SubmissionError, ValidationError,
    },
    config::{CartConfig, VerificationConfig},
    fixtures::load_catalog,
    manager::CartManager,
    products::ProductId,
    storage::MemoryStorage,
    surface::{
        Badge, CART_EMPTY, ConfirmControl, Dialog, HeadlessSurface, ORDER_FAILED, ORDER_RECEIVED,
        SurfaceEvent,
    },
};

const MERCH: &str = include_str!("../fixtures/products/merch.yml");

type Manager = CartManager<MemoryStorage, HeadlessSurface>;

#[derive(Debug, Default)]
struct RecordingSink {
    posted: RefCell<Vec<OrderForm>>,
    offline: bool,
}

impl OrderSink for RecordingSink {
    fn submit(&self, order: &OrderForm) -> Result<(), SubmissionError> {
        if self.offline {
            return Err(SubmissionError::Dispatch("network unreachable".to_string()));
        }

        self.posted.borrow_mut().push(order.clone());

        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingDelay {
    waits: RefCell<Vec<Duration>>,
}

impl Delay for &RecordingDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.waits.borrow_mut().push(duration);
        future::ready(())
    }
}

fn manager_with(config: CartConfig) -> TestResult<Manager> {
    Ok(CartManager::new(
        config,
        MemoryStorage::new(),
        HeadlessSurface::new(),
    )?)
}

fn stocked(config: CartConfig) -> TestResult<Manager> {
    let catalog = load_catalog(MERCH)?;
    let mut manager = manager_with(config)?;

    for id in [1, 1, 5] {
        let id = ProductId::new(id).ok_or("zero id")?;
        manager.add_item(catalog.get(id).ok_or("missing product")?);
    }

    manager.checkout()?;
    manager.surface_mut().take_events();

    Ok(manager)
}

fn form(payment_mode: PaymentMode, payment_reference: &str) -> CheckoutForm {
    CheckoutForm {
        student_number: "2024-00123".to_string(),
        student_name: "Juan Dela Cruz".to_string(),
        section: "BSCS 2A".to_string(),
        email: "juan@example.edu.ph".to_string(),
        payment_mode: Some(payment_mode),
        payment_reference: payment_reference.to_string(),
    }
}

fn disabled() -> ConfirmControl {
    ConfirmControl {
        enabled: false,
        label: "Verifying Payment...".to_string(),
    }
}

fn enabled() -> ConfirmControl {
    ConfirmControl {
        enabled: true,
        label: "Confirm Order".to_string(),
    }
}

#[test]
fn empty_cart_checkout_only_notifies() -> TestResult {
    let mut manager = manager_with(CartConfig::default())?;

    let result = manager.checkout();

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert_eq!(manager.surface().notifications(), vec![CART_EMPTY]);
    assert!(
        !manager
            .surface()
            .events()
            .iter()
            .any(|event| matches!(event, SurfaceEvent::Show(_)))
    );
    assert_eq!(manager.state(), CheckoutState::Idle);

    Ok(())
}

#[tokio::test]
async fn cash_checkout_skips_verification_and_clears_cart() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    let order = manager
        .process_checkout(&form(PaymentMode::Cash, ""), &verifier, &sink)
        .await?;

    assert!(delay.waits.borrow().is_empty());
    assert_eq!(order.items, "V1.1 T-Shirt (2x), Hirono Uniform Sticker (1x)");
    assert_eq!(order.total, "730.00");
    assert_eq!(order.payment_mode, "Cash");

    let posted = sink.posted.borrow();
    let post = posted.first().ok_or("expected a post")?;

    assert_eq!(posted.len(), 1);
    assert_eq!(OrderForm::METHOD, "POST");
    assert!(post.action.starts_with("https://docs.google.com/forms/"));
    assert_eq!(post.field("entry.494570708"), Some("730.00"));

    assert!(manager.cart().is_empty());
    assert_eq!(manager.surface().badge(), Some(Badge { count: 0 }));
    assert_eq!(manager.surface().notifications(), vec![ORDER_RECEIVED]);
    assert_eq!(manager.state(), CheckoutState::Idle);
    assert!(
        manager
            .surface()
            .events()
            .contains(&SurfaceEvent::Hide(Dialog::Checkout))
    );

    Ok(())
}

#[tokio::test]
async fn wallet_checkout_disables_confirm_during_verification() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    let order = manager
        .process_checkout(&form(PaymentMode::MobileWallet, "1234567890"), &verifier, &sink)
        .await?;

    assert_eq!(*delay.waits.borrow(), vec![Duration::from_secs(2)]);
    assert_eq!(order.payment_mode, "Gcash");
    assert_eq!(order.payment_reference, "1234567890");
    assert_eq!(sink.posted.borrow().len(), 1);
    assert_eq!(
        manager.surface().confirm_history(),
        vec![&disabled(), &enabled()]
    );
    assert!(manager.cart().is_empty());

    Ok(())
}

#[tokio::test]
async fn rejected_wallet_payment_reenables_confirm_and_keeps_cart() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::rejecting(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    let result = manager
        .process_checkout(&form(PaymentMode::MobileWallet, "1234567890"), &verifier, &sink)
        .await;

    assert!(matches!(result, Err(CheckoutError::Verification(_))));
    assert!(sink.posted.borrow().is_empty());
    assert_eq!(
        manager.surface().confirm_history(),
        vec![&disabled(), &enabled()]
    );
    assert_eq!(manager.item_count(), 3);
    assert_eq!(manager.state(), CheckoutState::FormOpen);
    assert_eq!(manager.open_dialog(), Some(Dialog::Checkout));

    Ok(())
}

#[tokio::test]
async fn wallet_checkout_without_verification_submits_directly() -> TestResult {
    let config = CartConfig {
        verification: VerificationConfig {
            required: false,
            ..VerificationConfig::default()
        },
        ..CartConfig::default()
    };
    let mut manager = stocked(config)?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    manager
        .process_checkout(&form(PaymentMode::MobileWallet, "REF-9"), &verifier, &sink)
        .await?;

    assert!(delay.waits.borrow().is_empty());
    assert_eq!(manager.surface().confirm_history(), vec![&enabled()]);

    Ok(())
}

#[tokio::test]
async fn wallet_checkout_requires_a_reference() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    let result = manager
        .process_checkout(&form(PaymentMode::MobileWallet, "   "), &verifier, &sink)
        .await;

    assert!(matches!(result, Err(CheckoutError::Validation(_))));
    assert!(delay.waits.borrow().is_empty());
    assert_eq!(manager.state(), CheckoutState::FormOpen);

    Ok(())
}

#[tokio::test]
async fn missing_required_field_is_reported() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let sink = RecordingSink::default();

    let mut incomplete = form(PaymentMode::Cash, "");
    incomplete.section = String::new();

    let result = manager.process_checkout(&incomplete, &verifier, &sink).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::Required(_)))
    ));
    assert!(
        manager
            .surface()
            .events()
            .iter()
            .any(|event| matches!(event, SurfaceEvent::Validation(_)))
    );
    assert!(sink.posted.borrow().is_empty());

    Ok(())
}

#[tokio::test]
async fn offline_endpoint_keeps_cart_for_retry() -> TestResult {
    let mut manager = stocked(CartConfig::default())?;
    let delay = RecordingDelay::default();
    let verifier = SimulatedVerifier::new(&delay, Duration::from_secs(2));
    let offline = RecordingSink {
        offline: true,
        ..RecordingSink::default()
    };

    let result = manager
        .process_checkout(&form(PaymentMode::Cash, ""), &verifier, &offline)
        .await;

    assert!(matches!(result, Err(CheckoutError::Submission(_))));
    assert_eq!(manager.item_count(), 3);
    assert_eq!(manager.surface().notifications(), vec![ORDER_FAILED]);
    assert_eq!(manager.state(), CheckoutState::FormOpen);

    let online = RecordingSink::default();

    manager
        .process_checkout(&form(PaymentMode::Cash, ""), &verifier, &online)
        .await?;

    assert_eq!(online.posted.borrow().len(), 1);
    assert!(manager.cart().is_empty());

    Ok(())
}
