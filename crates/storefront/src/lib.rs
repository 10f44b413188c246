//! Sugarpine storefront library.
//!
//! Headless commerce client for a Saleor-style GraphQL backend: catalog
//! reads, a persistent client-side cart, and the multi-step checkout
//! workflow that turns that cart into an order.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod saleor;
