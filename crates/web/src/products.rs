use std::sync::Arc;

use leptos::prelude::*;
use storefront::{
    money::format_price,
    products::{Catalog, Product},
};

use crate::Shop;

#[component]
fn ProductCard(product: Product, price: String, shop: Shop) -> impl IntoView {
    let name = product.name.clone();
    let image = product.image.clone();
    let description = product.description.clone();
    let add_label = format!("Add {name} to cart");

    view! {
        <article class="product-card">
            <img class="product-image" src=image alt=name.clone() />
            <div class="product-body">
                <h3 class="product-name">{name}</h3>
                <p class="product-description">{description}</p>
                <p class="product-price">{price}</p>
                <button
                    type="button"
                    class="add-to-cart"
                    aria-label=add_label
                    on:click=move |_| {
                        shop.manager.update_value(|manager| manager.add_to_cart(&product));
                    }
                >
                    "Add to Cart"
                </button>
            </div>
        </article>
    }
}

/// Products grouped by collection, in catalog order.
#[component]
pub(crate) fn ProductCollections(catalog: Arc<Catalog>, shop: Shop) -> impl IntoView {
    let symbol = shop
        .manager
        .with_value(|manager| manager.config().currency_symbol.clone());

    catalog
        .collections()
        .into_iter()
        .map(|(collection, products)| {
            let heading = collection.unwrap_or("Products").to_string();

            let cards = products
                .into_iter()
                .map(|product| {
                    let price = format_price(&product.price, symbol.as_deref());

                    view! { <ProductCard product=product.clone() price=price shop=shop /> }
                })
                .collect_view();

            view! {
                <section class="collection">
                    <h2 class="collection-title">{heading}</h2>
                    <div class="product-grid">{cards}</div>
                </section>
            }
        })
        .collect_view()
}
