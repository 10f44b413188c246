//! Sugarpine Core - Shared types library.
//!
//! This crate provides common types used across all Sugarpine components:
//! - `storefront` - The storefront client library (cart, checkout, catalog)
//! - `integration-tests` - End-to-end checkout flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
