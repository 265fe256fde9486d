//! The cart store: in-memory state, change notification, persistence sync.
//!
//! All mutations are synchronous and apply under one mutex, so consumers
//! never observe a torn update. Storage work happens on two background
//! tasks spawned at activation: a one-shot hydration read and a persister
//! that re-writes the full cart after mutations. Neither task can fail a
//! mutation; storage problems are logged and swallowed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use marketplace_core::{LineItem, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::handle::CartHandle;
use crate::storage::KeyValueStore;

/// Namespace key under which the whole cart is persisted as one unit.
pub const CART_STORAGE_KEY: &str = "@Marketplace:product";

/// Immutable cart snapshot handed to consumers.
///
/// A fresh allocation is published after every change, so consumers may use
/// pointer identity for change detection.
pub type CartSnapshot = Arc<[LineItem]>;

struct CartState {
    items: Vec<LineItem>,
    /// Bumped on every mutation. Hydration applies its loaded snapshot only
    /// while this is still 0, so a slow load never clobbers in-session edits.
    version: u64,
}

/// Observable cart store.
///
/// Holds the authoritative in-memory cart, publishes a [`CartSnapshot`] on
/// a watch channel after every change, and keeps the storage backend
/// eventually consistent with in-memory state. Construct with
/// [`CartStore::activate`]; dropping the returned `Arc` deactivates the
/// store and stops both background tasks.
pub struct CartStore {
    state: Mutex<CartState>,
    snapshot_tx: watch::Sender<CartSnapshot>,
    /// Carries the state version; the persister wakes on changes.
    dirty_tx: watch::Sender<u64>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStore {
    /// Activate a cart store over `storage` under the default namespace key.
    ///
    /// Spawns the hydration and persister tasks, so this must be called
    /// within a tokio runtime. Hydration races with early reads: consumers
    /// see the empty cart until the load completes.
    #[must_use]
    pub fn activate(storage: Arc<dyn KeyValueStore>) -> Arc<Self> {
        Self::activate_with_key(storage, CART_STORAGE_KEY)
    }

    /// Activate with a custom namespace key.
    #[must_use]
    pub fn activate_with_key(
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(CartSnapshot::from(Vec::new()));
        let (dirty_tx, dirty_rx) = watch::channel(0u64);

        let store = Arc::new(Self {
            state: Mutex::new(CartState {
                items: Vec::new(),
                version: 0,
            }),
            snapshot_tx,
            dirty_tx,
            storage,
            key: key.into(),
        });

        store.spawn_hydration();
        store.spawn_persister(dirty_rx);
        store
    }

    /// Create a consumer handle for this store.
    ///
    /// Handles are cheap to clone and do not keep the store alive.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> CartHandle {
        CartHandle::new(self)
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn items(&self) -> CartSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver yields a fresh snapshot after every mutation and after
    /// a hydration that replaced state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Add `product` to the cart.
    ///
    /// Inserts a new line with quantity 1, or increments the existing line
    /// for the same id, leaving its descriptive fields untouched.
    pub fn add_to_cart(&self, product: Product) {
        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|l| l.id == product.id) {
                line.quantity += 1;
            } else {
                items.push(LineItem::from_product(product));
            }
            true
        });
    }

    /// Increase the quantity of the line for `id` by one.
    ///
    /// No-op if the id is not in the cart. Quantity has no upper bound.
    pub fn increment(&self, id: &ProductId) {
        self.mutate(|items| match items.iter_mut().find(|l| l.id == *id) {
            Some(line) => {
                line.quantity += 1;
                true
            }
            None => false,
        });
    }

    /// Decrease the quantity of the line for `id` by one.
    ///
    /// At quantity 1 the line is removed entirely; quantity 0 is not a
    /// representable cart state. No-op if the id is not in the cart.
    pub fn decrement(&self, id: &ProductId) {
        self.mutate(|items| {
            let Some(pos) = items.iter().position(|l| l.id == *id) else {
                return false;
            };
            match items.get_mut(pos) {
                Some(line) if line.quantity > 1 => line.quantity -= 1,
                _ => {
                    items.remove(pos);
                }
            }
            true
        });
    }

    /// Apply a mutation under the state lock. `f` returns whether anything
    /// changed; unchanged state publishes nothing and triggers no write.
    fn mutate(&self, f: impl FnOnce(&mut Vec<LineItem>) -> bool) {
        let mut state = self.lock_state();
        if !f(&mut state.items) {
            return;
        }
        state.version += 1;
        // Publish while still holding the lock so snapshot order matches
        // state order. send_replace stores the snapshot even when nobody
        // has subscribed yet; items() reads the same slot.
        self.snapshot_tx
            .send_replace(CartSnapshot::from(state.items.clone()));
        let _ = self.dirty_tx.send(state.version);
    }

    fn lock_state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the one-shot hydration task.
    ///
    /// Best-effort warm start: a missing key, failed read, or malformed
    /// payload all leave the cart empty without surfacing anything.
    fn spawn_hydration(self: &Arc<Self>) {
        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();
        let store = Arc::downgrade(self);

        tokio::spawn(async move {
            let loaded = storage.get(&key).await;
            let Some(store) = store.upgrade() else {
                return;
            };
            match loaded {
                Ok(Some(raw)) => store.apply_hydration(&raw),
                Ok(None) => debug!(key = %store.key, "no persisted cart found"),
                Err(e) => {
                    warn!(error = %e, "cart hydration read failed; starting empty");
                }
            }
        });
    }

    fn apply_hydration(&self, raw: &str) {
        let Ok(items) = serde_json::from_str::<Vec<LineItem>>(raw)
            .inspect_err(|e| warn!(error = %e, "malformed persisted cart; starting empty"))
        else {
            return;
        };

        // One bad line should not cost the user the whole cart: drop
        // quantity-0 entries and keep the rest.
        let items: Vec<LineItem> = items
            .into_iter()
            .filter(|line| {
                if line.quantity == 0 {
                    warn!(id = %line.id, "dropping persisted line with quantity 0");
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut state = self.lock_state();
        if state.version != 0 {
            debug!("cart mutated before hydration completed; keeping in-session state");
            return;
        }
        state.items = items;
        let snapshot = CartSnapshot::from(state.items.clone());
        self.snapshot_tx.send_replace(Arc::clone(&snapshot));
        drop(state);

        info!(items = snapshot.len(), "cart hydrated from storage");
    }

    /// Spawn the persister task.
    ///
    /// Single write slot: each iteration serializes the state current at
    /// write-issue time, so mutations arriving during a write coalesce into
    /// the next one and the final persisted value always reflects the most
    /// recent in-memory state.
    fn spawn_persister(self: &Arc<Self>, mut dirty_rx: watch::Receiver<u64>) {
        let store = Arc::downgrade(self);

        tokio::spawn(async move {
            while dirty_rx.changed().await.is_ok() {
                let version = *dirty_rx.borrow_and_update();
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.persist(version).await;
            }
            debug!("cart store deactivated; persister stopped");
        });
    }

    async fn persist(&self, version: u64) {
        let payload = {
            let state = self.lock_state();
            serde_json::to_string(&state.items)
        };
        let payload = match payload {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "cart serialization failed; skipping write");
                return;
            }
        };

        match self.storage.set(&self.key, payload).await {
            Ok(()) => debug!(version, "cart persisted"),
            Err(e) => {
                // In-memory state stays authoritative; no retry, no rollback.
                warn!(error = %e, version, "cart persistence write failed");
            }
        }
    }
}
