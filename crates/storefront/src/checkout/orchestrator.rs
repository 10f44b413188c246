//! Checkout orchestration.
//!
//! Sequences the remote calls that turn a checkout session plus form input
//! into a completed order. Single-flight: no two remote calls for the same
//! session are ever in flight at once, and a second invocation while one is
//! pending is rejected with [`CheckoutError::Busy`] rather than queued.

use tracing::{debug, instrument, warn};

use sugarpine_core::ProductId;

use crate::cart::{CartLineItem, CartManager, CartStore, StoreError};
use crate::saleor::types::{CheckoutLineInput, OrderRef};
use crate::saleor::CommerceApi;

use super::{CheckoutError, CheckoutFormInput, CheckoutState, CheckoutStep, StepFailure};

/// Drives the cart and the multi-step checkout workflow.
///
/// Owns the cart (and through it the session token and the persistent
/// store) plus the remote API client. The generic parameters are the two
/// injection seams: a fake `CommerceApi` and an in-memory `CartStore` make
/// the whole workflow testable without network or disk.
pub struct CheckoutOrchestrator<C, S> {
    api: C,
    cart: CartManager<S>,
    state: CheckoutState,
    in_flight: bool,
}

/// Holds the busy flag for the duration of one remote call.
///
/// Clearing happens in `Drop`, so the flag cannot outlive the call that
/// set it even when the caller drops the in-flight future (e.g. a timeout
/// wrapper around a submission).
struct FlightGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> FlightGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

impl<C: CommerceApi, S: CartStore> CheckoutOrchestrator<C, S> {
    /// Load persisted cart state and bind it to the given API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store holds an unreadable record.
    pub fn new(api: C, store: S) -> Result<Self, StoreError> {
        let cart = CartManager::load(store)?;
        let state = if cart.session().token().is_some() {
            CheckoutState::SessionActive
        } else {
            CheckoutState::Idle
        };
        Ok(Self {
            api,
            cart,
            state,
            in_flight: false,
        })
    }

    /// Current position in the checkout lifecycle.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Read access to the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartManager<S> {
        &self.cart
    }

    /// Add an item to the cart, creating the checkout session first if none
    /// exists.
    ///
    /// Session creation and the triggering add are one logical unit: if the
    /// backend rejects the checkout, the item does not appear locally and
    /// the state returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Busy`] while another call is in flight, or
    /// [`CheckoutError::SessionCreate`] when session creation fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub async fn add_to_cart(&mut self, item: CartLineItem) -> Result<(), CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::Busy);
        }

        if self.cart.session().token().is_none() {
            let lines = lines_with(&self.cart.checkout_lines(), &item);

            self.state = CheckoutState::SessionPending;
            let guard = FlightGuard::engage(&mut self.in_flight);
            let api = &self.api;
            let created = self
                .cart
                .session_mut()
                .ensure(|| api.create_checkout(&lines))
                .await;
            drop(guard);

            match created {
                Ok(_) => self.state = CheckoutState::SessionActive,
                Err(e) => {
                    warn!(error = %e, "checkout session creation failed; add rolled back");
                    self.state = CheckoutState::Idle;
                    return Err(CheckoutError::SessionCreate(e));
                }
            }
        }

        // Persisted here together with the token set above, so the stored
        // record never holds a token without the item that created it
        self.cart.add_item(item);
        Ok(())
    }

    /// Remove a line from the cart. Absent IDs are a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.cart.remove_item(product_id);
    }

    /// Empty the cart and drop the checkout session.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Busy`] while a remote call is in flight:
    /// clearing local state under an unresolved completion would lose the
    /// only trace of a possibly-placed order.
    pub fn clear(&mut self) -> Result<(), CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::Busy);
        }
        self.cart.clear();
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// Run the checkout sequence: contact email, billing address, payment,
    /// completion.
    ///
    /// Steps run strictly in order; the first failure halts the sequence
    /// and is recorded in the state. A later call re-enters at the failed
    /// step rather than from the beginning, since the session and any
    /// already-accepted fields persist server-side.
    ///
    /// On success the cart and session are cleared and the order reference
    /// is returned. On completion failure both are left untouched - the
    /// remote outcome is unknown and local state is the user's only trace
    /// of the in-flight order.
    ///
    /// # Errors
    ///
    /// Rejected locally (before any remote call) with `Busy`, `EmptyCart`,
    /// or `NoSession`; remote failures surface as [`CheckoutError::Step`].
    #[instrument(skip(self, input))]
    pub async fn submit_checkout(
        &mut self,
        input: CheckoutFormInput,
    ) -> Result<OrderRef, CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::Busy);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let Some(token) = self.cart.session().token().map(str::to_owned) else {
            return Err(CheckoutError::NoSession);
        };

        let resume = match &self.state {
            CheckoutState::Failed { step, .. } => *step,
            _ => CheckoutStep::Contact,
        };
        debug!(%resume, "starting checkout sequence");

        let guard = FlightGuard::engage(&mut self.in_flight);
        let outcome = Self::run_steps(&self.api, &mut self.state, &token, resume, &input).await;
        drop(guard);

        match outcome {
            Ok(order) => {
                self.cart.clear();
                self.state = CheckoutState::Completed;
                Ok(order)
            }
            Err((step, failure)) => {
                warn!(%step, %failure, "checkout sequence halted");
                self.state = CheckoutState::Failed {
                    step,
                    failure: failure.clone(),
                };
                Err(CheckoutError::Step { step, failure })
            }
        }
    }

    async fn run_steps(
        api: &C,
        state: &mut CheckoutState,
        token: &str,
        resume: CheckoutStep,
        input: &CheckoutFormInput,
    ) -> Result<OrderRef, (CheckoutStep, StepFailure)> {
        if resume <= CheckoutStep::Contact {
            *state = CheckoutState::Submitting(CheckoutStep::Contact);
            api.update_email(token, &input.email)
                .await
                .map_err(|e| (CheckoutStep::Contact, StepFailure::from(e)))?;
        }

        if resume <= CheckoutStep::Address {
            *state = CheckoutState::Submitting(CheckoutStep::Address);
            api.update_billing_address(token, &input.billing_address)
                .await
                .map_err(|e| (CheckoutStep::Address, StepFailure::from(e)))?;
        }

        if resume <= CheckoutStep::Payment {
            *state = CheckoutState::Submitting(CheckoutStep::Payment);
            // The charged amount is the backend's current session total,
            // fetched now rather than echoed from session creation, so cart
            // edits since then cannot produce a stale charge
            let total = api
                .checkout_total(token)
                .await
                .map_err(|e| (CheckoutStep::Payment, StepFailure::from(e)))?;
            api.create_payment(token, &input.payment.gateway, &total, &input.payment.token)
                .await
                .map_err(|e| (CheckoutStep::Payment, StepFailure::from(e)))?;
        }

        *state = CheckoutState::Completing;
        api.complete_checkout(token)
            .await
            .map_err(|e| (CheckoutStep::Complete, StepFailure::from(e)))
    }
}

/// The cart's checkout lines with one more item merged in.
fn lines_with(existing: &[CheckoutLineInput], item: &CartLineItem) -> Vec<CheckoutLineInput> {
    let mut lines = existing.to_vec();
    match lines
        .iter_mut()
        .find(|line| line.variant_id == item.variant_id)
    {
        Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
        None => lines.push(CheckoutLineInput {
            variant_id: item.variant_id.clone(),
            quantity: item.quantity,
        }),
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sugarpine_core::Money;

    use crate::cart::MemoryStore;
    use crate::saleor::types::Address;
    use crate::saleor::SaleorError;

    struct NullApi;

    impl CommerceApi for NullApi {
        async fn create_checkout(
            &self,
            _lines: &[CheckoutLineInput],
        ) -> Result<String, SaleorError> {
            Ok("TOK1".to_string())
        }

        async fn checkout_total(&self, _token: &str) -> Result<Money, SaleorError> {
            Ok(Money::new(Decimal::from(10), "USD"))
        }

        async fn update_email(&self, _token: &str, _email: &str) -> Result<(), SaleorError> {
            Ok(())
        }

        async fn update_billing_address(
            &self,
            _token: &str,
            _address: &Address,
        ) -> Result<(), SaleorError> {
            Ok(())
        }

        async fn create_payment(
            &self,
            _token: &str,
            _gateway: &str,
            _amount: &Money,
            _payment_token: &str,
        ) -> Result<(), SaleorError> {
            Ok(())
        }

        async fn complete_checkout(&self, _token: &str) -> Result<OrderRef, SaleorError> {
            Ok(OrderRef {
                id: "O1".into(),
                number: "1001".to_string(),
            })
        }
    }

    fn item(product_id: &str, variant_id: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: product_id.into(),
            variant_id: variant_id.into(),
            name: product_id.to_string(),
            unit_price: Money::new(Decimal::from(10), "USD"),
            quantity,
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_lines_with_appends_new_variant() {
        let existing = vec![CheckoutLineInput {
            variant_id: "V1".into(),
            quantity: 1,
        }];
        let lines = lines_with(&existing, &item("P2", "V2", 2));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].variant_id.as_str(), "V2");
        assert_eq!(lines[1].quantity, 2);
    }

    #[test]
    fn test_lines_with_merges_same_variant() {
        let existing = vec![CheckoutLineInput {
            variant_id: "V1".into(),
            quantity: 1,
        }];
        let lines = lines_with(&existing, &item("P1", "V1", 2));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
    }

    #[test]
    fn test_lines_with_saturates_quantity() {
        let existing = vec![CheckoutLineInput {
            variant_id: "V1".into(),
            quantity: u32::MAX,
        }];
        let lines = lines_with(&existing, &item("P1", "V1", 2));
        assert_eq!(lines[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_in_flight_rejects_new_calls() {
        let mut orchestrator =
            CheckoutOrchestrator::new(NullApi, MemoryStore::new()).unwrap();
        orchestrator.add_to_cart(item("P1", "V1", 1)).await.unwrap();

        orchestrator.in_flight = true;

        assert!(matches!(
            orchestrator.add_to_cart(item("P2", "V2", 1)).await,
            Err(CheckoutError::Busy)
        ));
        assert!(matches!(
            orchestrator.submit_checkout(CheckoutFormInput::default()).await,
            Err(CheckoutError::Busy)
        ));
        assert!(matches!(orchestrator.clear(), Err(CheckoutError::Busy)));

        // Rejections leave the cart untouched
        assert_eq!(orchestrator.cart().len(), 1);

        orchestrator.in_flight = false;
        orchestrator.clear().unwrap();
        assert_eq!(orchestrator.state(), &CheckoutState::Idle);
    }

    #[test]
    fn test_lines_with_from_empty_cart() {
        let lines = lines_with(&[], &item("P1", "V1", 1));
        assert_eq!(
            lines,
            vec![CheckoutLineInput {
                variant_id: "V1".into(),
                quantity: 1,
            }]
        );
    }
}
