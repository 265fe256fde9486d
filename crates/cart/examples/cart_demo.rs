//! Minimal stand-in for the storefront UI: exercises the cart against a
//! file-backed store. Run it twice to see the cart hydrate from disk.

use std::sync::Arc;
use std::time::Duration;

use marketplace_cart::{CartError, CartStore, FileStore};
use marketplace_core::{Price, Product, ProductId};
use rust_decimal::Decimal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), CartError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let storage = Arc::new(FileStore::new("marketplace-cart.json"));
    let store = CartStore::activate(storage);
    let cart = store.handle();

    // Let hydration land before reading, the way a first render would not.
    tokio::time::sleep(Duration::from_millis(100)).await;
    info!(items = cart.items()?.len(), "cart after hydration");

    let shirt = Product {
        id: ProductId::from("A"),
        title: "Shirt".to_owned(),
        image_url: "https://cdn.example.com/shirt.png".to_owned(),
        price: Price::new(Decimal::new(10, 0)),
    };

    cart.add_to_cart(shirt.clone())?;
    cart.add_to_cart(shirt)?;
    cart.decrement(&ProductId::from("A"))?;

    for line in cart.items()?.iter() {
        info!(id = %line.id, title = %line.title, quantity = line.quantity, "cart line");
    }

    // Give the persister a beat to flush before exiting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(())
}
