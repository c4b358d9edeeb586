//! Checkout dialog and the confirm flow.

use jiff::Zoned;
use leptos::{ev::SubmitEvent, prelude::*, task};
use storefront::{
    checkout::{
        CheckoutForm, CheckoutStep, FormField, PaymentMode, PaymentVerifier, SimulatedVerifier,
    },
    config::PaymentModeOption,
    surface::Dialog,
};
use tracing::{debug, info, warn};

use crate::{
    Shop,
    browser::{FormPostSink, TimeoutDelay},
};

fn read_form(shop: Shop) -> CheckoutForm {
    let fields = shop.signals.form;
    let label = fields.payment_label.get_untracked();
    let payment_mode = shop
        .manager
        .with_value(|manager| manager.config().mode_for_label(&label));

    CheckoutForm {
        student_number: fields.student_number.get_untracked(),
        student_name: fields.student_name.get_untracked(),
        section: fields.section.get_untracked(),
        email: fields.email.get_untracked(),
        payment_mode,
        payment_reference: fields.payment_reference.get_untracked(),
    }
}

fn submit(shop: Shop, form: &CheckoutForm) {
    let cleanup = shop
        .manager
        .with_value(|manager| manager.config().submission_cleanup());
    let sink = FormPostSink::new(cleanup);
    let placed_at = Zoned::now();

    match shop
        .manager
        .try_update_value(|manager| manager.submit_order(form, &sink, &placed_at))
    {
        Some(Ok(order)) => info!(total = %order.total, "order submitted"),
        Some(Err(error)) => warn!(%error, "order not submitted"),
        None => warn!("cart manager disposed before submission"),
    }
}

fn confirm(shop: Shop) {
    let form = read_form(shop);

    let step = shop
        .manager
        .try_update_value(|manager| manager.confirm_checkout(&form));

    match step {
        Some(Ok(CheckoutStep::Submit)) => submit(shop, &form),
        Some(Ok(CheckoutStep::Verify { reference })) => {
            let delay = shop
                .manager
                .with_value(|manager| manager.config().verification_delay());
            let verifier = SimulatedVerifier::new(TimeoutDelay, delay);

            task::spawn_local(async move {
                let result = verifier.verify(&reference).await;

                let verified = shop
                    .manager
                    .try_update_value(|manager| manager.finish_verification(result));

                if matches!(verified, Some(Ok(()))) {
                    submit(shop, &form);
                }
            });
        }
        Some(Err(error)) => debug!(%error, "confirmation halted"),
        None => warn!("cart manager disposed before confirmation"),
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    field: FormField,
    value: RwSignal<String>,
    shop: Shop,
    #[prop(default = "text")] kind: &'static str,
) -> impl IntoView {
    let invalid = shop.signals.invalid;

    view! {
        <div class="form-group">
            <label for=id>{label}</label>
            <input
                id=id
                name=id
                type=kind
                required=true
                prop:value=move || value.get()
                on:input=move |event| value.set(event_target_value(&event))
                aria-invalid=move || {
                    invalid.get().is_some_and(|(invalid_field, _)| invalid_field == field).to_string()
                }
            />
            {move || {
                invalid
                    .get()
                    .filter(|(invalid_field, _)| *invalid_field == field)
                    .map(|(_, message)| view! { <p class="field-error">{message}</p> })
            }}
        </div>
    }
}

#[component]
fn PaymentSelect(options: Vec<PaymentModeOption>, shop: Shop) -> impl IntoView {
    let fields = shop.signals.form;
    let invalid = shop.signals.invalid;

    view! {
        <div class="form-group">
            <label for="paymentMode">"Payment Mode"</label>
            <select
                id="paymentMode"
                name="paymentMode"
                required=true
                prop:value=move || fields.payment_label.get()
                on:change=move |event| fields.payment_label.set(event_target_value(&event))
            >
                <option value="">"Select payment mode"</option>
                {options
                    .into_iter()
                    .map(|option| view! { <option value=option.label.clone()>{option.label.clone()}</option> })
                    .collect_view()}
            </select>
            {move || {
                invalid
                    .get()
                    .filter(|(field, _)| *field == FormField::PaymentMode)
                    .map(|(_, message)| view! { <p class="field-error">{message}</p> })
            }}
        </div>
    }
}

/// Checkout form dialog.
#[component]
pub(crate) fn CheckoutDialog(shop: Shop) -> impl IntoView {
    let signals = shop.signals;
    let fields = signals.form;
    let confirm_control = signals.confirm;

    let options: Vec<PaymentModeOption> = shop
        .manager
        .with_value(|manager| manager.config().payment_modes.to_vec());

    let wallet_selected = move || {
        let label = fields.payment_label.get();

        shop.manager.with_value(|manager| {
            manager.config().mode_for_label(&label) == Some(PaymentMode::MobileWallet)
        })
    };

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();

        if confirm_control.get_untracked().enabled {
            confirm(shop);
        }
    };

    view! {
        <Show when=move || signals.dialog.get() == Some(Dialog::Checkout)>
            <div class="modal" role="dialog" aria-modal="true" aria-labelledby="checkout-title">
                <div class="modal-content">
                    <div class="modal-header">
                        <h2 id="checkout-title">"Checkout"</h2>
                        <button
                            type="button"
                            class="close"
                            aria-label="Close checkout"
                            on:click=move |_| {
                                shop.manager.update_value(|manager| manager.close_dialog(Dialog::Checkout));
                            }
                        >
                            "×"
                        </button>
                    </div>
                    <form id="checkoutForm" novalidate=true on:submit=on_submit>
                        <TextField
                            id="studentNumber"
                            label="Student Number"
                            field=FormField::StudentNumber
                            value=fields.student_number
                            shop=shop
                        />
                        <TextField
                            id="studentName"
                            label="Full Name"
                            field=FormField::StudentName
                            value=fields.student_name
                            shop=shop
                        />
                        <TextField
                            id="section"
                            label="Section"
                            field=FormField::Section
                            value=fields.section
                            shop=shop
                        />
                        <TextField
                            id="email"
                            label="Email"
                            field=FormField::Email
                            value=fields.email
                            shop=shop
                            kind="email"
                        />
                        <PaymentSelect options=options.clone() shop=shop />
                        <Show when=wallet_selected>
                            <TextField
                                id="paymentReference"
                                label="Reference Number"
                                field=FormField::PaymentReference
                                value=fields.payment_reference
                                shop=shop
                            />
                        </Show>
                        <button
                            type="submit"
                            class="confirm-order"
                            disabled=move || !confirm_control.get().enabled
                        >
                            {move || confirm_control.get().label}
                        </button>
                    </form>
                </div>
            </div>
        </Show>
    }
}
