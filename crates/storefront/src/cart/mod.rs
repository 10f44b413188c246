//! Client-side shopping cart.
//!
//! The cart is an insertion-ordered list of line items keyed by product ID,
//! owned by [`CartManager`] for the lifetime of the browsing session and
//! mirrored into a [`CartStore`] after every mutation. The checkout session
//! token lives in the same persisted record so clearing the cart drops both
//! atomically.

pub mod store;

pub use store::{CartRecord, CartStore, JsonFileStore, MemoryStore, StoreError};

use serde::{Deserialize, Serialize};
use sugarpine_core::{Money, ProductId, VariantId};
use tracing::warn;

use crate::checkout::session::CheckoutSession;
use crate::saleor::types::{CheckoutLineInput, Product};

/// One product and its quantity/price within the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product this line refers to. At most one line per product ID.
    pub product_id: ProductId,
    /// Variant submitted to the backend when a checkout session is created.
    pub variant_id: VariantId,
    /// Display name, captured at add time.
    pub name: String,
    /// Unit price, captured at add time.
    pub unit_price: Money,
    /// Units of the product; always at least 1.
    pub quantity: u32,
    /// Thumbnail URL for cart rendering.
    pub thumbnail_url: Option<String>,
}

impl CartLineItem {
    /// Build a line item from a catalog product.
    ///
    /// Returns `None` when the product has no purchasable variant.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Option<Self> {
        let variant_id = product.variant_id.clone()?;
        Some(Self {
            product_id: product.id.clone(),
            variant_id,
            name: product.name.clone(),
            unit_price: product.price.clone(),
            quantity,
            thumbnail_url: product.thumbnail_url.clone(),
        })
    }

    /// The line's extended price (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Owner of the cart's line items and the checkout session token.
///
/// Every mutation updates memory first and then mirrors the record into the
/// store; persistence failures are logged, never surfaced, so a flaky disk
/// cannot corrupt the in-memory cart.
pub struct CartManager<S> {
    items: Vec<CartLineItem>,
    session: CheckoutSession,
    store: S,
}

impl<S: CartStore> CartManager<S> {
    /// Load the persisted record from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store holds a record that cannot be read.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let record = store.load()?;
        Ok(Self {
            items: record.items,
            session: CheckoutSession::from_token(record.checkout_token),
            store,
        })
    }

    /// Add an item to the cart.
    ///
    /// A line with the same product ID already in the cart has its quantity
    /// summed instead of a duplicate line being appended.
    pub fn add_item(&mut self, item: CartLineItem) {
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
        self.persist();
    }

    /// Remove the line with the given product ID. Absent IDs are a no-op,
    /// not an error.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.items.retain(|line| &line.product_id != product_id);
        self.persist();
    }

    /// Empty the cart and drop the checkout session token.
    ///
    /// Both fields live in the same record, so the single write makes the
    /// pair atomic.
    pub fn clear(&mut self) {
        self.items.clear();
        self.session.clear();
        self.persist();
    }

    /// Sum of `unit_price * quantity` across all lines, or `None` for an
    /// empty cart.
    ///
    /// Assumes a single-currency cart (the backend channel fixes the
    /// currency); no conversion is attempted. Lines with no published
    /// price carry an empty currency code and are skipped when stamping
    /// the total's currency.
    #[must_use]
    pub fn total(&self) -> Option<Money> {
        let first = self.items.first()?;
        let currency = self
            .items
            .iter()
            .map(|line| line.unit_price.currency.as_str())
            .find(|currency| !currency.is_empty())
            .unwrap_or(first.unit_price.currency.as_str());
        let mut total = Money::zero(currency);
        for line in &self.items {
            total.amount += line.line_total().amount;
        }
        Some(total)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The cart's lines in the shape the checkout-create call expects.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<CheckoutLineInput> {
        self.items
            .iter()
            .map(|line| CheckoutLineInput {
                variant_id: line.variant_id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    /// The checkout session bound to this cart.
    #[must_use]
    pub const fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut CheckoutSession {
        &mut self.session
    }

    /// Mirror the in-memory state into the store. Called strictly after the
    /// in-memory update it reflects.
    fn persist(&self) {
        let record = CartRecord {
            items: self.items.clone(),
            checkout_token: self.session.token().map(str::to_owned),
        };
        if let Err(e) = self.store.save(&record) {
            warn!(error = %e, "failed to persist cart record");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(product_id: &str, quantity: u32, amount: i64) -> CartLineItem {
        CartLineItem {
            product_id: product_id.into(),
            variant_id: format!("{product_id}-v").as_str().into(),
            name: format!("Product {product_id}"),
            unit_price: Money::new(Decimal::from(amount), "USD"),
            quantity,
            thumbnail_url: None,
        }
    }

    fn manager() -> (CartManager<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let observer = store.clone();
        (CartManager::load(store).unwrap(), observer)
    }

    #[test]
    fn test_add_item_merges_by_product_id() {
        let (mut cart, _) = manager();

        cart.add_item(item("P1", 1, 10));
        cart.add_item(item("P2", 1, 5));
        cart.add_item(item("P1", 2, 10));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn test_add_item_preserves_insertion_order() {
        let (mut cart, _) = manager();

        cart.add_item(item("P2", 1, 5));
        cart.add_item(item("P1", 1, 10));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["P2", "P1"]);
    }

    #[test]
    fn test_remove_item_absent_is_noop() {
        let (mut cart, _) = manager();

        cart.add_item(item("P1", 1, 10));
        cart.remove_item(&"P9".into());

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_item_drops_whole_line() {
        let (mut cart, _) = manager();

        cart.add_item(item("P1", 3, 10));
        cart.remove_item(&"P1".into());

        assert!(cart.is_empty());
        assert_eq!(cart.total(), None);
    }

    #[test]
    fn test_total_sums_line_totals() {
        let (mut cart, _) = manager();

        cart.add_item(item("P1", 3, 10));
        cart.add_item(item("P2", 2, 5));

        let total = cart.total().unwrap();
        assert_eq!(total.amount, Decimal::from(40));
        assert_eq!(total.currency, "USD");
    }

    #[test]
    fn test_add_item_saturates_quantity() {
        let (mut cart, _) = manager();

        cart.add_item(item("P1", u32::MAX, 10));
        cart.add_item(item("P1", 2, 10));

        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_total_currency_skips_unpriced_lines() {
        let (mut cart, _) = manager();

        // Unpriced lines carry a zero amount with no currency code
        let mut unpriced = item("P1", 1, 0);
        unpriced.unit_price = Money::zero("");
        cart.add_item(unpriced);
        cart.add_item(item("P2", 2, 5));

        let total = cart.total().unwrap();
        assert_eq!(total.currency, "USD");
        assert_eq!(total.amount, Decimal::from(10));
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (mut cart, store) = manager();

        cart.add_item(item("P1", 1, 10));
        assert_eq!(store.snapshot().unwrap().items.len(), 1);

        cart.add_item(item("P1", 2, 10));
        assert_eq!(store.snapshot().unwrap().items[0].quantity, 3);

        cart.remove_item(&"P1".into());
        assert!(store.snapshot().unwrap().items.is_empty());
    }

    #[test]
    fn test_clear_drops_items_and_token_in_one_record() {
        let store = MemoryStore::new();
        store
            .save(&CartRecord {
                items: vec![item("P1", 1, 10)],
                checkout_token: Some("TOK1".to_string()),
            })
            .unwrap();
        let observer = store.clone();

        let mut cart = CartManager::load(store).unwrap();
        assert_eq!(cart.session().token(), Some("TOK1"));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.session().token(), None);
        assert_eq!(observer.snapshot().unwrap(), CartRecord::default());
    }

    #[test]
    fn test_load_restores_persisted_state() {
        let store = MemoryStore::new();
        {
            let mut cart = CartManager::load(store.clone()).unwrap();
            cart.add_item(item("P1", 2, 10));
        }

        let reloaded = CartManager::load(store).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.items()[0].quantity, 2);
    }

    #[test]
    fn test_from_product_requires_variant() {
        use crate::saleor::types::Product;

        let mut product = Product {
            id: "P1".into(),
            slug: "widget".to_string(),
            name: "Widget".to_string(),
            description: None,
            thumbnail_url: Some("https://cdn.example/widget.jpg".to_string()),
            price: Money::new(Decimal::from(10), "USD"),
            variant_id: Some("V1".into()),
        };

        let line = CartLineItem::from_product(&product, 2).unwrap();
        assert_eq!(line.variant_id.as_str(), "V1");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total().amount, Decimal::from(20));

        product.variant_id = None;
        assert!(CartLineItem::from_product(&product, 1).is_none());
    }
}
