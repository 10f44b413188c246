//! Saleor GraphQL API client.
//!
//! # Architecture
//!
//! - Uses `graphql-client` crate for type-safe GraphQL queries against a
//!   checked-in subset of the Saleor schema
//! - Saleor is source of truth for pricing and totals - NO local
//!   recomputation at payment time, direct API calls
//! - In-memory caching via `moka` for product reads (5 minute TTL);
//!   checkout mutations are never cached
//!
//! # Checkout contract
//!
//! The [`CommerceApi`] trait is the seam consumed by the checkout
//! orchestrator. Every mutation returns either success, a list of
//! [`FieldError`]s (backend validation, recoverable), or a transport-level
//! [`SaleorError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sugarpine_storefront::saleor::{CommerceApi, SaleorClient};
//!
//! let client = SaleorClient::new(&config);
//!
//! // Read paths
//! let product = client.product_by_slug("alpine-mug").await?;
//!
//! // Checkout session
//! let token = client.create_checkout(&lines).await?;
//! client.update_email(&token, "customer@example.com").await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod queries;
pub mod types;

pub use client::SaleorClient;
pub use types::*;

use sugarpine_core::Money;
use thiserror::Error;

/// Errors that can occur when talking to the Saleor API.
#[derive(Debug, Error)]
pub enum SaleorError {
    /// HTTP request failed (transport failure; safe to retry the same step).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The GraphQL layer itself rejected the request.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend validation rejected specific input fields.
    #[error("Validation errors: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Response payload did not match the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A top-level GraphQL error (query-level, not field validation).
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Dotted path to the error in the response, when provided.
    pub path: Option<String>,
}

/// A validation failure tied to a specific input field.
///
/// Saleor returns these alongside (not instead of) a structured response;
/// they do not invalidate the checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The input field the error refers to, when the backend names one.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| match &e.path {
            Some(path) if !e.message.is_empty() => format!("{} (path: {path})", e.message),
            Some(path) => format!("(path: {path})"),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_field_errors(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The remote commerce operations the checkout orchestrator depends on.
///
/// All mutations address the checkout session by its token. Implementations
/// must map backend field errors to [`SaleorError::Validation`] so callers
/// can distinguish recoverable input problems from transport failures.
#[allow(async_fn_in_trait)]
pub trait CommerceApi {
    /// Create a checkout session for the given lines, returning its token.
    async fn create_checkout(&self, lines: &[CheckoutLineInput]) -> Result<String, SaleorError>;

    /// Fetch the session's current total as computed by the backend.
    async fn checkout_total(&self, token: &str) -> Result<Money, SaleorError>;

    /// Attach the contact email to the session.
    async fn update_email(&self, token: &str, email: &str) -> Result<(), SaleorError>;

    /// Attach the billing address to the session.
    async fn update_billing_address(
        &self,
        token: &str,
        address: &Address,
    ) -> Result<(), SaleorError>;

    /// Register a payment against the session for the given amount.
    async fn create_payment(
        &self,
        token: &str,
        gateway: &str,
        amount: &Money,
        payment_token: &str,
    ) -> Result<(), SaleorError>;

    /// Complete the checkout, turning the session into an order.
    async fn complete_checkout(&self, token: &str) -> Result<OrderRef, SaleorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saleor_error_display() {
        let err = SaleorError::NotFound("product: alpine-mug".to_string());
        assert_eq!(err.to_string(), "Not found: product: alpine-mug");
    }

    #[test]
    fn test_field_error_display_with_field() {
        let err = FieldError {
            field: Some("postalCode".to_string()),
            message: "invalid".to_string(),
        };
        assert_eq!(err.to_string(), "postalCode: invalid");
    }

    #[test]
    fn test_field_error_display_without_field() {
        let err = FieldError {
            field: None,
            message: "insufficient stock".to_string(),
        };
        assert_eq!(err.to_string(), "insufficient stock");
    }

    #[test]
    fn test_validation_error_formatting() {
        let err = SaleorError::Validation(vec![
            FieldError {
                field: Some("email".to_string()),
                message: "invalid email".to_string(),
            },
            FieldError {
                field: None,
                message: "checkout expired".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation errors: email: invalid email; checkout expired"
        );
    }

    #[test]
    fn test_validation_error_empty_vec() {
        let err = SaleorError::Validation(vec![]);
        assert_eq!(
            err.to_string(),
            "Validation errors: (no error details provided)"
        );
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = SaleorError::GraphQL(vec![
            GraphQLError {
                message: "Field not found".to_string(),
                path: None,
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                path: Some("checkout.token".to_string()),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID (path: checkout.token)"
        );
    }
}
