//! Checkout session and orchestration.
//!
//! Checkout is a strictly ordered chain of remote calls driven by
//! [`CheckoutOrchestrator`]: contact email, billing address, payment,
//! completion. The orchestrator owns the cart, enforces the ordering,
//! and exposes its position in the sequence as a [`CheckoutState`] so the
//! presentation layer can render progress and failures without any
//! knowledge of the remote protocol.

pub mod orchestrator;
pub mod session;

pub use orchestrator::CheckoutOrchestrator;
pub use session::CheckoutSession;

use thiserror::Error;

use crate::saleor::{Address, FieldError, SaleorError};

/// Remote steps of the checkout sequence, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutStep {
    /// Contact email submission.
    Contact,
    /// Billing address submission.
    Address,
    /// Payment registration.
    Payment,
    /// Checkout completion.
    Complete,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Contact => "contact",
            Self::Address => "address",
            Self::Payment => "payment",
            Self::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Why a checkout step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// The backend rejected specific input fields. The session stays
    /// active; the user corrects the input and retries the step.
    Validation(Vec<FieldError>),
    /// Any non-validation remote failure. Retrying the same step is safe.
    Transport(String),
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                let rendered = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "{rendered}")
            }
            Self::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl From<SaleorError> for StepFailure {
    fn from(err: SaleorError) -> Self {
        match err {
            SaleorError::Validation(errors) => Self::Validation(errors),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Where the orchestrator currently is in the checkout lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// No session; cart is empty.
    Idle,
    /// Session creation (bundled with the first cart add) is in flight.
    SessionPending,
    /// A session exists; no submission in flight.
    SessionActive,
    /// The given step's remote call is in flight.
    Submitting(CheckoutStep),
    /// Completion is in flight.
    Completing,
    /// Terminal: the order exists and local state has been cleared.
    Completed,
    /// A step failed; a retry re-enters the sequence at that step.
    Failed {
        step: CheckoutStep,
        failure: StepFailure,
    },
}

/// Transient form input for a checkout submission.
///
/// Never persisted; discarded after submission regardless of outcome.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFormInput {
    /// Contact email.
    pub email: String,
    /// Billing address.
    pub billing_address: Address,
    /// Payment instrument to charge.
    pub payment: PaymentMethod,
}

/// Payment instrument reference passed through to the backend gateway.
#[derive(Debug, Clone)]
pub struct PaymentMethod {
    /// Gateway identifier as configured in the backend.
    pub gateway: String,
    /// Gateway-specific instrument token.
    pub token: String,
}

impl Default for PaymentMethod {
    /// The backend's sandbox gateway, used in development channels.
    fn default() -> Self {
        Self {
            gateway: "dummy".to_string(),
            token: "dummy-token".to_string(),
        }
    }
}

/// Errors surfaced by the checkout orchestrator.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A remote call for this session is already in flight; the new
    /// invocation is rejected, not queued.
    #[error("another checkout call is already in flight")]
    Busy,

    /// Submission rejected locally: nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Submission rejected locally: no checkout session exists.
    #[error("no active checkout session")]
    NoSession,

    /// Session creation failed; the triggering cart add was rolled back.
    #[error("could not create checkout session: {0}")]
    SessionCreate(SaleorError),

    /// A checkout step failed; the sequence halted at that step.
    #[error("checkout failed at the {step} step: {failure}")]
    Step {
        step: CheckoutStep,
        failure: StepFailure,
    },
}
