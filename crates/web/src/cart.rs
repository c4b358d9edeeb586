use leptos::prelude::*;
use storefront::surface::{CartLineView, Dialog, Step};
use tracing::debug;

use crate::Shop;

/// Cart icon with the item-count badge.
#[component]
pub(crate) fn CartButton(shop: Shop) -> impl IntoView {
    let badge = shop.signals.badge;

    view! {
        <button
            type="button"
            class="cart-icon"
            aria-label=move || format!("Open cart ({} items)", badge.get().count)
            on:click=move |_| shop.manager.update_value(|manager| manager.open_cart())
        >
            <svg
                xmlns="http://www.w3.org/2000/svg"
                width="24"
                height="24"
                viewBox="0 0 24 24"
                fill="none"
                stroke="currentColor"
                stroke-width="2"
                stroke-linecap="round"
                stroke-linejoin="round"
                aria-hidden="true"
            >
                <circle cx="8" cy="21" r="1"></circle>
                <circle cx="19" cy="21" r="1"></circle>
                <path d="M2.05 2.05h2l2.66 12.42a2 2 0 0 0 2 1.58h9.78a2 2 0 0 0 1.95-1.57l1.65-7.43H5.12"></path>
            </svg>
            <span class="cart-count" class:hidden=move || !badge.get().visible()>
                {move || badge.get().count}
            </span>
        </button>
    }
}

#[component]
fn CartLine(line: CartLineView, shop: Shop) -> impl IntoView {
    let id = line.id;
    let remove_label = format!("Remove {} from cart", line.name);

    view! {
        <li class="cart-item">
            <img class="cart-item-image" src=line.image alt=line.name.clone() />
            <div class="cart-item-details">
                <h4>{line.name}</h4>
                <p class="cart-item-price">{line.price}</p>
                <div class="quantity-controls">
                    <button
                        type="button"
                        aria-label="Decrease quantity"
                        on:click=move |_| {
                            shop.manager.update_value(|manager| manager.step_quantity(id, Step::Decrement));
                        }
                    >
                        "-"
                    </button>
                    <span class="quantity">{line.quantity}</span>
                    <button
                        type="button"
                        aria-label="Increase quantity"
                        on:click=move |_| {
                            shop.manager.update_value(|manager| manager.step_quantity(id, Step::Increment));
                        }
                    >
                        "+"
                    </button>
                </div>
            </div>
            <p class="cart-item-total">{line.line_total}</p>
            <button
                type="button"
                class="remove-item"
                aria-label=remove_label
                on:click=move |_| shop.manager.update_value(|manager| manager.remove_item(id))
            >
                "Remove"
            </button>
        </li>
    }
}

/// Cart detail dialog.
#[component]
pub(crate) fn CartDialog(shop: Shop) -> impl IntoView {
    let signals = shop.signals;

    let body = move || {
        let Some(cart_view) = signals.cart_view.get() else {
            return ().into_any();
        };

        if cart_view.is_empty() {
            return view! { <p class="cart-empty">"Your cart is empty."</p> }.into_any();
        }

        let total = cart_view.total.clone();

        view! {
            <ul class="cart-items">
                {cart_view
                    .lines
                    .into_iter()
                    .map(|line| view! { <CartLine line=line shop=shop /> })
                    .collect_view()}
            </ul>
            <p class="cart-total">"Total: " <span>{total}</span></p>
            <button
                type="button"
                class="checkout-button"
                on:click=move |_| {
                    shop.manager.update_value(|manager| {
                        if let Err(error) = manager.checkout() {
                            debug!(%error, "checkout not opened");
                        }
                    });
                }
            >
                "Checkout"
            </button>
        }
        .into_any()
    };

    view! {
        <Show when=move || signals.dialog.get() == Some(Dialog::Cart)>
            <div class="modal" role="dialog" aria-modal="true" aria-labelledby="cart-title">
                <div class="modal-content">
                    <div class="modal-header">
                        <h2 id="cart-title">"Your Cart"</h2>
                        <button
                            type="button"
                            class="close"
                            aria-label="Close cart"
                            on:click=move |_| {
                                shop.manager.update_value(|manager| manager.close_dialog(Dialog::Cart));
                            }
                        >
                            "×"
                        </button>
                    </div>
                    {body}
                </div>
            </div>
        </Show>
    }
}
