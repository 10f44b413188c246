//! Checkout session token with at-most-once creation.

use std::future::Future;

use crate::saleor::SaleorError;

/// Holder of the server-side checkout session token.
///
/// A session is created at most once per cart lifecycle; once set, the
/// token is immutable until [`clear`](Self::clear) - there is no token
/// rotation mid-checkout.
#[derive(Debug, Default)]
pub struct CheckoutSession {
    token: Option<String>,
}

impl CheckoutSession {
    pub(crate) const fn from_token(token: Option<String>) -> Self {
        Self { token }
    }

    /// The active session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Return the held token, creating one via `create` only if none is
    /// held yet.
    ///
    /// An existing token short-circuits: `create` is not invoked, so a
    /// session can never be created twice for the same cart lifecycle. On
    /// creation failure no token is stored.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `create`.
    pub async fn ensure<F, Fut>(&mut self, create: F) -> Result<String, SaleorError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, SaleorError>>,
    {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let token = create().await?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Drop the token.
    pub(crate) fn clear(&mut self) {
        self.token = None;
    }
}
