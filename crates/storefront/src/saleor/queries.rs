//! GraphQL query definitions for the Saleor API.

use graphql_client::GraphQLQuery;

// Scalar types for the Saleor GraphQL schema
// Must be defined in the same module where GraphQLQuery derive is used
// Note: These MUST match the GraphQL schema scalar names exactly (uppercase)
#[allow(clippy::upper_case_acronyms)]
type UUID = String;
type Decimal = String;

// Product queries
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductBySlug;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProducts;

// Checkout session query and mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCheckout;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateCheckout;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateCheckoutEmail;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateCheckoutBillingAddress;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateCheckoutPayment;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CompleteCheckout;
