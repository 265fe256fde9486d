//! Marketplace Cart - observable shopping-cart state for the storefront.
//!
//! The cart is a process-wide store mapping product identity to a line item
//! with a quantity. UI consumers mutate it through three operations
//! (add to cart, increment, decrement) and observe it through immutable
//! snapshots published after every change.
//!
//! Durability is best-effort: the store hydrates once from an opaque
//! asynchronous key-value backend at activation and re-persists the full
//! cart in the background after every mutation. Storage failures are logged
//! and never surfaced to consumers; in-memory state is authoritative for the
//! running process.
//!
//! # Modules
//!
//! - [`store`] - The [`CartStore`] itself: state, mutations, background sync
//! - [`handle`] - [`CartHandle`], the clonable accessor handed to consumers
//! - [`storage`] - The [`KeyValueStore`] boundary and shipped backends
//! - [`error`] - Consumer-visible errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod handle;
pub mod storage;
pub mod store;

pub use error::CartError;
pub use handle::CartHandle;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CART_STORAGE_KEY, CartSnapshot, CartStore};
