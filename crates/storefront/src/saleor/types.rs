//! Domain types for the Saleor API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! `graphql_client` generated types.

use serde::{Deserialize, Serialize};
use sugarpine_core::{Money, OrderId, ProductId, VariantId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A catalog product as rendered by listing and detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Saleor global product ID.
    pub id: ProductId,
    /// URL slug used on detail pages.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Raw description, if published.
    pub description: Option<String>,
    /// Thumbnail URL, if any.
    pub thumbnail_url: Option<String>,
    /// Lowest variant price in the channel. Zero when the channel has no
    /// published price (matches how the detail view renders it).
    pub price: Money,
    /// First variant's ID; `None` means the product cannot be added to a
    /// cart.
    pub variant_id: Option<VariantId>,
}

/// One page of a product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page, in catalog order.
    pub products: Vec<Product>,
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// One line of a checkout-session creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineInput {
    /// Variant to purchase.
    pub variant_id: VariantId,
    /// Units of that variant.
    pub quantity: u32,
}

/// Billing address fields submitted during checkout.
#[derive(Debug, Clone, Default)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    /// Two-letter country code (e.g., "US").
    pub country: String,
    /// State / province / region, where applicable.
    pub country_area: Option<String>,
}

/// Reference to a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    /// Saleor global order ID.
    pub id: OrderId,
    /// Human-readable order number shown to the customer.
    pub number: String,
}
