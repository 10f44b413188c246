//! Test support for exercising the checkout workflow end to end.
//!
//! The orchestrator talks to the backend only through the `CommerceApi`
//! trait, so a scripted in-process implementation plus an in-memory cart
//! store covers the whole workflow without a running Saleor instance.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sugarpine-integration-tests
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use rust_decimal::Decimal;

use sugarpine_core::Money;
use sugarpine_storefront::saleor::types::{Address, CheckoutLineInput, OrderRef};
use sugarpine_storefront::saleor::{CommerceApi, SaleorError};

/// One recorded API invocation, with the arguments the orchestrator passed.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateCheckout(Vec<CheckoutLineInput>),
    CheckoutTotal(String),
    UpdateEmail { token: String, email: String },
    UpdateBillingAddress { token: String },
    CreatePayment { token: String, gateway: String, amount: Money },
    CompleteCheckout(String),
}

impl ApiCall {
    /// Short name for call-sequence assertions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateCheckout(_) => "create_checkout",
            Self::CheckoutTotal(_) => "checkout_total",
            Self::UpdateEmail { .. } => "update_email",
            Self::UpdateBillingAddress { .. } => "update_billing_address",
            Self::CreatePayment { .. } => "create_payment",
            Self::CompleteCheckout(_) => "complete_checkout",
        }
    }
}

#[derive(Default)]
struct Script {
    calls: Vec<ApiCall>,
    create_checkout: VecDeque<Result<String, SaleorError>>,
    checkout_total: VecDeque<Result<Money, SaleorError>>,
    update_email: VecDeque<Result<(), SaleorError>>,
    update_billing_address: VecDeque<Result<(), SaleorError>>,
    create_payment: VecDeque<Result<(), SaleorError>>,
    complete_checkout: VecDeque<Result<OrderRef, SaleorError>>,
}

/// Scripted `CommerceApi` implementation.
///
/// Each operation pops the next scripted result for that operation, or
/// falls back to a fixed success (token `TOK1`, total `30.00 USD`, order
/// `O1`/`1001`) when nothing is scripted. Every invocation is recorded in
/// order and retrievable via [`calls`](Self::calls). Cloning shares the
/// script and the call log, so a test can hand one clone to the
/// orchestrator and keep the other for assertions.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next `create_checkout` call.
    pub fn script_create_checkout(&self, result: Result<String, SaleorError>) {
        self.lock().create_checkout.push_back(result);
    }

    /// Queue a result for the next `checkout_total` call.
    pub fn script_checkout_total(&self, result: Result<Money, SaleorError>) {
        self.lock().checkout_total.push_back(result);
    }

    /// Queue a result for the next `update_email` call.
    pub fn script_update_email(&self, result: Result<(), SaleorError>) {
        self.lock().update_email.push_back(result);
    }

    /// Queue a result for the next `update_billing_address` call.
    pub fn script_update_billing_address(&self, result: Result<(), SaleorError>) {
        self.lock().update_billing_address.push_back(result);
    }

    /// Queue a result for the next `create_payment` call.
    pub fn script_create_payment(&self, result: Result<(), SaleorError>) {
        self.lock().create_payment.push_back(result);
    }

    /// Queue a result for the next `complete_checkout` call.
    pub fn script_complete_checkout(&self, result: Result<OrderRef, SaleorError>) {
        self.lock().complete_checkout.push_back(result);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Call names made so far, in order.
    #[must_use]
    pub fn call_names(&self) -> Vec<&'static str> {
        self.lock().calls.iter().map(ApiCall::name).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("script mutex poisoned")
    }
}

impl CommerceApi for ScriptedApi {
    async fn create_checkout(&self, lines: &[CheckoutLineInput]) -> Result<String, SaleorError> {
        let mut script = self.lock();
        script.calls.push(ApiCall::CreateCheckout(lines.to_vec()));
        script
            .create_checkout
            .pop_front()
            .unwrap_or_else(|| Ok("TOK1".to_string()))
    }

    async fn checkout_total(&self, token: &str) -> Result<Money, SaleorError> {
        let mut script = self.lock();
        script.calls.push(ApiCall::CheckoutTotal(token.to_string()));
        script
            .checkout_total
            .pop_front()
            .unwrap_or_else(|| Ok(Money::new(Decimal::from(30), "USD")))
    }

    async fn update_email(&self, token: &str, email: &str) -> Result<(), SaleorError> {
        let mut script = self.lock();
        script.calls.push(ApiCall::UpdateEmail {
            token: token.to_string(),
            email: email.to_string(),
        });
        script.update_email.pop_front().unwrap_or(Ok(()))
    }

    async fn update_billing_address(
        &self,
        token: &str,
        _address: &Address,
    ) -> Result<(), SaleorError> {
        let mut script = self.lock();
        script.calls.push(ApiCall::UpdateBillingAddress {
            token: token.to_string(),
        });
        script.update_billing_address.pop_front().unwrap_or(Ok(()))
    }

    async fn create_payment(
        &self,
        token: &str,
        gateway: &str,
        amount: &Money,
        _payment_token: &str,
    ) -> Result<(), SaleorError> {
        let mut script = self.lock();
        script.calls.push(ApiCall::CreatePayment {
            token: token.to_string(),
            gateway: gateway.to_string(),
            amount: amount.clone(),
        });
        script.create_payment.pop_front().unwrap_or(Ok(()))
    }

    async fn complete_checkout(&self, token: &str) -> Result<OrderRef, SaleorError> {
        let mut script = self.lock();
        script
            .calls
            .push(ApiCall::CompleteCheckout(token.to_string()));
        script.complete_checkout.pop_front().unwrap_or_else(|| {
            Ok(OrderRef {
                id: "O1".into(),
                number: "1001".to_string(),
            })
        })
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default so test output stays readable.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
