//! Monetary amounts with decimal arithmetic.
//!
//! Amounts use [`rust_decimal::Decimal`] to avoid float rounding in cart
//! totals. The currency code is carried through from the backend verbatim
//! and is never converted; a cart is assumed to be single-currency
//! (documented limitation, matching the backend's channel model).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code, passed through from the backend.
    pub currency: String,
}

impl Money {
    /// Create a new amount.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// A zero amount in the given currency.
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Multiply the amount by a unitless quantity, keeping the currency.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency: self.currency.clone(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}
