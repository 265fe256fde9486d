//! Consumer-visible cart errors.
//!
//! Hydration and persistence failures are recovered inside the store and
//! never appear here; the cart favors availability over strict persistence
//! correctness. The only failure a consumer can observe is using a handle
//! outside an active store scope.

use thiserror::Error;

/// Errors surfaced to cart consumers.
#[derive(Debug, Error)]
pub enum CartError {
    /// A [`CartHandle`](crate::CartHandle) was used after its owning
    /// [`CartStore`](crate::CartStore) was deactivated. This is a wiring
    /// error in the calling code, not a recoverable condition.
    #[error("cart handle used outside an active CartStore scope")]
    NotActivated,
}
