//! Saleor API client implementation.
//!
//! Uses `graphql_client` for type-safe queries with `reqwest` 0.13 for HTTP.
//! Caches product reads using `moka` (5-minute TTL); checkout operations hit
//! the backend directly.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, PathFragment, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use sugarpine_core::Money;
use tracing::{debug, instrument};

use crate::config::StorefrontConfig;

use super::cache::CacheValue;
use super::conversions::{
    convert_address_errors, convert_checkout_total, convert_complete_errors,
    convert_create_errors, convert_email_errors, convert_order, convert_payment_errors,
    convert_product, convert_product_page,
};
use super::queries::{
    CompleteCheckout, CreateCheckout, CreateCheckoutPayment, GetCheckout, GetProductBySlug,
    GetProducts, UpdateCheckoutBillingAddress, UpdateCheckoutEmail, complete_checkout,
    create_checkout, create_checkout_payment, get_checkout, get_product_by_slug, get_products,
    update_checkout_billing_address, update_checkout_email,
};
use super::types::{Address, CheckoutLineInput, OrderRef, Product, ProductPage};
use super::{CommerceApi, GraphQLError, SaleorError};

// =============================================================================
// SaleorClient
// =============================================================================

/// Client for the Saleor GraphQL API.
///
/// Provides type-safe access to products and checkout operations. Product
/// reads are cached for 5 minutes; the channel is fixed at construction.
#[derive(Clone)]
pub struct SaleorClient {
    inner: Arc<SaleorClientInner>,
}

struct SaleorClientInner {
    client: reqwest::Client,
    endpoint: String,
    channel: String,
    app_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl SaleorClient {
    /// Create a new Saleor API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(SaleorClientInner {
                client: reqwest::Client::new(),
                endpoint: config.api_url.to_string(),
                channel: config.channel.clone(),
                app_token: config
                    .app_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, SaleorError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body);

        // App tokens are only needed for privileged operations; public
        // storefront reads work unauthenticated
        if let Some(token) = &self.inner.app_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Saleor API returned non-success status"
            );
            return Err(SaleorError::GraphQL(vec![GraphQLError {
                message: format!("HTTP {status}: {}", truncate(&response_text, 200)),
                path: None,
            }]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Saleor GraphQL response"
                );
                return Err(SaleorError::Parse(e));
            }
        };

        // Top-level GraphQL errors (malformed query, auth) are distinct from
        // the per-mutation `errors` lists handled by the callers
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(SaleorError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path.map(|p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    PathFragment::Key(key) => key,
                                    PathFragment::Index(index) => index.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text, 500),
                "Saleor GraphQL response has no data and no errors"
            );
            SaleorError::Malformed("no data in response".to_string())
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, SaleorError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product_by_slug::Variables {
            slug: slug.to_string(),
            channel: self.inner.channel.clone(),
        };

        let data = self.execute::<GetProductBySlug>(variables).await?;

        let product_data = data
            .product
            .ok_or_else(|| SaleorError::NotFound(format!("Product not found: {slug}")))?;

        let product = convert_product(product_data)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated page of the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        first: i64,
        after: Option<String>,
    ) -> Result<ProductPage, SaleorError> {
        let cache_key = format!("products:{first}:{}", after.as_deref().unwrap_or(""));

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let variables = get_products::Variables {
            first,
            after,
            channel: self.inner.channel.clone(),
        };

        let data = self.execute::<GetProducts>(variables).await?;

        let connection = data
            .products
            .ok_or_else(|| SaleorError::Malformed("products connection missing".to_string()))?;

        let page = convert_product_page(connection)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, slug: &str) {
        let cache_key = format!("product:{slug}");
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Checkout Operations (not cached - mutable state)
// =============================================================================

impl CommerceApi for SaleorClient {
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn create_checkout(&self, lines: &[CheckoutLineInput]) -> Result<String, SaleorError> {
        let variables = create_checkout::Variables {
            input: create_checkout::CheckoutCreateInput {
                channel: self.inner.channel.clone(),
                lines: lines
                    .iter()
                    .map(|line| create_checkout::CheckoutLineInput {
                        variant_id: line.variant_id.as_str().to_string(),
                        quantity: i64::from(line.quantity),
                    })
                    .collect(),
            },
        };

        let data = self.execute::<CreateCheckout>(variables).await?;

        if let Some(result) = data.checkout_create {
            if !result.errors.is_empty() {
                return Err(SaleorError::Validation(convert_create_errors(result.errors)));
            }

            if let Some(checkout) = result.checkout {
                return Ok(checkout.token);
            }
        }

        Err(SaleorError::Malformed(
            "checkoutCreate returned no checkout".to_string(),
        ))
    }

    #[instrument(skip(self, token))]
    async fn checkout_total(&self, token: &str) -> Result<Money, SaleorError> {
        let variables = get_checkout::Variables {
            token: token.to_string(),
        };

        let data = self.execute::<GetCheckout>(variables).await?;

        let checkout = data
            .checkout
            .ok_or_else(|| SaleorError::NotFound("Checkout session not found".to_string()))?;

        convert_checkout_total(checkout)
    }

    #[instrument(skip(self, token, email))]
    async fn update_email(&self, token: &str, email: &str) -> Result<(), SaleorError> {
        let variables = update_checkout_email::Variables {
            token: token.to_string(),
            email: email.to_string(),
        };

        let data = self.execute::<UpdateCheckoutEmail>(variables).await?;

        let result = data.checkout_email_update.ok_or_else(|| {
            SaleorError::Malformed("checkoutEmailUpdate returned no payload".to_string())
        })?;

        if result.errors.is_empty() {
            Ok(())
        } else {
            Err(SaleorError::Validation(convert_email_errors(result.errors)))
        }
    }

    #[instrument(skip(self, token, address))]
    async fn update_billing_address(
        &self,
        token: &str,
        address: &Address,
    ) -> Result<(), SaleorError> {
        let variables = update_checkout_billing_address::Variables {
            token: token.to_string(),
            billing_address: update_checkout_billing_address::AddressInput {
                first_name: address.first_name.clone(),
                last_name: address.last_name.clone(),
                street_address1: address.street_address.clone(),
                city: address.city.clone(),
                postal_code: address.postal_code.clone(),
                country: address.country.clone(),
                country_area: address.country_area.clone(),
            },
        };

        let data = self.execute::<UpdateCheckoutBillingAddress>(variables).await?;

        let result = data.checkout_billing_address_update.ok_or_else(|| {
            SaleorError::Malformed("checkoutBillingAddressUpdate returned no payload".to_string())
        })?;

        if result.errors.is_empty() {
            Ok(())
        } else {
            Err(SaleorError::Validation(convert_address_errors(
                result.errors,
            )))
        }
    }

    #[instrument(skip(self, token, payment_token), fields(gateway = %gateway, amount = %amount))]
    async fn create_payment(
        &self,
        token: &str,
        gateway: &str,
        amount: &Money,
        payment_token: &str,
    ) -> Result<(), SaleorError> {
        let variables = create_checkout_payment::Variables {
            token: token.to_string(),
            input: create_checkout_payment::PaymentInput {
                gateway: gateway.to_string(),
                token: payment_token.to_string(),
                amount: amount.amount.to_string(),
            },
        };

        let data = self.execute::<CreateCheckoutPayment>(variables).await?;

        let result = data.checkout_payment_create.ok_or_else(|| {
            SaleorError::Malformed("checkoutPaymentCreate returned no payload".to_string())
        })?;

        if result.errors.is_empty() {
            Ok(())
        } else {
            Err(SaleorError::Validation(convert_payment_errors(
                result.errors,
            )))
        }
    }

    #[instrument(skip(self, token))]
    async fn complete_checkout(&self, token: &str) -> Result<OrderRef, SaleorError> {
        let variables = complete_checkout::Variables {
            token: token.to_string(),
        };

        let data = self.execute::<CompleteCheckout>(variables).await?;

        if let Some(result) = data.checkout_complete {
            if !result.errors.is_empty() {
                return Err(SaleorError::Validation(convert_complete_errors(
                    result.errors,
                )));
            }

            if let Some(order) = result.order {
                return Ok(convert_order(order));
            }
        }

        Err(SaleorError::Malformed(
            "checkoutComplete returned no order".to_string(),
        ))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
