//! Cache value type for product read paths.

use super::types::{Product, ProductPage};

/// Values stored in the client's read cache.
///
/// Only catalog reads are cached; checkout state is always fetched live.
#[derive(Clone)]
pub enum CacheValue {
    /// A single product, keyed by slug.
    Product(Box<Product>),
    /// A listing page, keyed by pagination cursor.
    Products(ProductPage),
}
