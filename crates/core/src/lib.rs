//! Marketplace Core - Shared types library.
//!
//! This crate provides the domain types shared between the Marketplace
//! components:
//! - `cart` - Observable shopping-cart store with durable persistence
//! - the UI layer, which renders products and cart contents
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no async, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identity, prices, catalog products, and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
