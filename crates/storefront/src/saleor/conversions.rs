//! Conversions from `graphql_client` generated types to domain types.
//!
//! Decimal amounts travel as strings on the wire and are parsed here; a
//! value the backend emits that does not parse is reported as
//! [`SaleorError::Malformed`] rather than silently zeroed.

use sugarpine_core::{Money, OrderId, ProductId, VariantId};

use super::queries::{complete_checkout, get_checkout, get_product_by_slug, get_products};
use super::types::{OrderRef, Product, ProductPage};
use super::{FieldError, SaleorError};

/// Parse a wire-format decimal amount into a typed [`Money`].
pub fn parse_money(amount: &str, currency: &str) -> Result<Money, SaleorError> {
    let amount = amount.parse().map_err(|e| {
        SaleorError::Malformed(format!("invalid decimal amount {amount:?}: {e}"))
    })?;
    Ok(Money::new(amount, currency))
}

// =============================================================================
// Product Conversions
// =============================================================================

pub fn convert_product(
    product: get_product_by_slug::GetProductBySlugProduct,
) -> Result<Product, SaleorError> {
    // Channels without a published price render the product at zero,
    // matching the detail view's behavior.
    let price = product
        .pricing
        .and_then(|pricing| pricing.price_range)
        .and_then(|range| range.start)
        .map(|start| parse_money(&start.gross.amount, &start.gross.currency))
        .transpose()?
        .unwrap_or_else(|| Money::zero(""));

    Ok(Product {
        id: ProductId::new(product.id),
        slug: product.slug,
        name: product.name,
        description: product.description,
        thumbnail_url: product.thumbnail.map(|t| t.url),
        price,
        variant_id: product
            .variants
            .and_then(|variants| variants.into_iter().next())
            .map(|v| VariantId::new(v.id)),
    })
}

pub fn convert_product_page(
    connection: get_products::GetProductsProducts,
) -> Result<ProductPage, SaleorError> {
    let products = connection
        .edges
        .into_iter()
        .map(|edge| convert_listing_product(edge.node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProductPage {
        products,
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor,
    })
}

fn convert_listing_product(
    node: get_products::GetProductsProductsEdgesNode,
) -> Result<Product, SaleorError> {
    let price = node
        .pricing
        .and_then(|pricing| pricing.price_range)
        .and_then(|range| range.start)
        .map(|start| parse_money(&start.gross.amount, &start.gross.currency))
        .transpose()?
        .unwrap_or_else(|| Money::zero(""));

    Ok(Product {
        id: ProductId::new(node.id),
        slug: node.slug,
        name: node.name,
        description: node.description,
        thumbnail_url: node.thumbnail.map(|t| t.url),
        price,
        variant_id: node
            .variants
            .and_then(|variants| variants.into_iter().next())
            .map(|v| VariantId::new(v.id)),
    })
}

// =============================================================================
// Checkout Conversions
// =============================================================================

pub fn convert_checkout_total(
    checkout: get_checkout::GetCheckoutCheckout,
) -> Result<Money, SaleorError> {
    parse_money(
        &checkout.total_price.gross.amount,
        &checkout.total_price.gross.currency,
    )
}

pub fn convert_order(order: complete_checkout::CompleteCheckoutCheckoutCompleteOrder) -> OrderRef {
    OrderRef {
        id: OrderId::new(order.id),
        number: order.number.unwrap_or_default(),
    }
}

// =============================================================================
// Field Error Conversions
// =============================================================================
//
// Each mutation's error list is a distinct generated type; the mapping is
// the same field/message pair in every case.

macro_rules! convert_field_errors {
    ($fn_name:ident, $ty:ty) => {
        pub fn $fn_name(errors: Vec<$ty>) -> Vec<FieldError> {
            errors
                .into_iter()
                .map(|e| FieldError {
                    field: e.field,
                    message: e.message.unwrap_or_else(|| "unknown error".to_string()),
                })
                .collect()
        }
    };
}

convert_field_errors!(
    convert_create_errors,
    super::queries::create_checkout::CreateCheckoutCheckoutCreateErrors
);
convert_field_errors!(
    convert_email_errors,
    super::queries::update_checkout_email::UpdateCheckoutEmailCheckoutEmailUpdateErrors
);
convert_field_errors!(
    convert_address_errors,
    super::queries::update_checkout_billing_address::UpdateCheckoutBillingAddressCheckoutBillingAddressUpdateErrors
);
convert_field_errors!(
    convert_payment_errors,
    super::queries::create_checkout_payment::CreateCheckoutPaymentCheckoutPaymentCreateErrors
);
convert_field_errors!(
    convert_complete_errors,
    super::queries::complete_checkout::CompleteCheckoutCheckoutCompleteErrors
);
