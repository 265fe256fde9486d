//! Consumer-facing cart accessor.

use std::sync::{Arc, Weak};

use marketplace_core::{Product, ProductId};
use tokio::sync::watch;

use crate::error::CartError;
use crate::store::{CartSnapshot, CartStore};

/// Clonable cart accessor handed to UI consumers.
///
/// A handle does not keep the store alive: it holds a weak reference, and
/// every operation fails with [`CartError::NotActivated`] once the owning
/// [`CartStore`] has been dropped. Obtain one via [`CartStore::handle`] and
/// clone it freely into whatever components need the cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Weak<CartStore>,
}

impl CartHandle {
    /// Create a handle for `store`.
    #[must_use]
    pub fn new(store: &Arc<CartStore>) -> Self {
        Self {
            store: Arc::downgrade(store),
        }
    }

    fn store(&self) -> Result<Arc<CartStore>, CartError> {
        self.store.upgrade().ok_or(CartError::NotActivated)
    }

    /// Current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotActivated`] if the store has been dropped.
    pub fn items(&self) -> Result<CartSnapshot, CartError> {
        Ok(self.store()?.items())
    }

    /// Add a product to the cart. See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotActivated`] if the store has been dropped.
    pub fn add_to_cart(&self, product: Product) -> Result<(), CartError> {
        self.store()?.add_to_cart(product);
        Ok(())
    }

    /// Increment the quantity for `id`. See [`CartStore::increment`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotActivated`] if the store has been dropped.
    pub fn increment(&self, id: &ProductId) -> Result<(), CartError> {
        self.store()?.increment(id);
        Ok(())
    }

    /// Decrement the quantity for `id`. See [`CartStore::decrement`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotActivated`] if the store has been dropped.
    pub fn decrement(&self, id: &ProductId) -> Result<(), CartError> {
        self.store()?.decrement(id);
        Ok(())
    }

    /// Subscribe to cart changes. See [`CartStore::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotActivated`] if the store has been dropped.
    pub fn subscribe(&self) -> Result<watch::Receiver<CartSnapshot>, CartError> {
        Ok(self.store()?.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use marketplace_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn shirt() -> Product {
        Product {
            id: ProductId::from("A"),
            title: "Shirt".to_owned(),
            image_url: "https://cdn.example.com/shirt.png".to_owned(),
            price: Price::new(Decimal::new(10, 0)),
        }
    }

    #[tokio::test]
    async fn test_handle_mutates_through_store() {
        let store = CartStore::activate(Arc::new(MemoryStore::new()));
        let cart = store.handle();

        cart.add_to_cart(shirt()).expect("active");
        cart.increment(&ProductId::from("A")).expect("active");

        let items = cart.items().expect("active");
        assert_eq!(items.first().map(|l| l.quantity), Some(2));
    }

    #[tokio::test]
    async fn test_clones_share_one_cart() {
        let store = CartStore::activate(Arc::new(MemoryStore::new()));
        let a = store.handle();
        let b = a.clone();

        a.add_to_cart(shirt()).expect("active");
        assert_eq!(b.items().expect("active").len(), 1);
    }

    #[tokio::test]
    async fn test_stale_handle_fails_with_not_activated() {
        let store = CartStore::activate(Arc::new(MemoryStore::new()));
        let cart = store.handle();
        drop(store);

        assert!(matches!(cart.items(), Err(CartError::NotActivated)));
        assert!(matches!(
            cart.add_to_cart(shirt()),
            Err(CartError::NotActivated)
        ));
        assert!(matches!(
            cart.increment(&ProductId::from("A")),
            Err(CartError::NotActivated)
        ));
    }
}
