//! Storefront API client implementation.
//!
//! Uses the `graphql_client` envelope with `reqwest` 0.13 for HTTP. Response
//! data is validated with `jsonschema` before it is converted.

mod conversions;
pub mod queries;
mod schema;

use std::num::NonZeroU32;
use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use kiosk_core::{Handle, ProductId};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::Product;
use crate::shopify::{GraphQLError, ShopifyError};

use conversions::{
    ProductByHandleData, ProductRecommendationsData, ProductsData, convert_product,
    convert_products, decode,
};
use queries::{
    GetProductByHandle, GetProductRecommendations, GetProducts, get_product_by_handle,
    get_product_recommendations, get_products,
};
use schema::{ResponseSchema, ResponseSchemas};

/// Number of products listed when the caller does not ask for a limit.
pub const DEFAULT_PRODUCT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";
const BUYER_IP_HEADER: &str = "Shopify-Storefront-Buyer-IP";

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to products. Every call goes to the network; there
/// is no caching, retrying or request de-duplication.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    schemas: ResponseSchemas,
}

impl StorefrontClient {
    /// Create a new Storefront API client for the configured shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a response
    /// schema fails to compile.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        Self::with_endpoint(config, config.graphql_endpoint())
    }

    /// Create a client that posts to an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a response
    /// schema fails to compile.
    pub fn with_endpoint(
        config: &ShopifyStorefrontConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kiosk-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: endpoint.into(),
                access_token: config.storefront_private_token.clone(),
                schemas: ResponseSchemas::compile()?,
            }),
        })
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query and return its raw `data` object.
    async fn execute<Q>(
        &self,
        variables: Q::Variables,
        buyer_ip: Option<&str>,
    ) -> Result<Value, ShopifyError>
    where
        Q: GraphQLQuery<ResponseData = Value>,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(PRIVATE_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body);

        match buyer_ip.filter(|ip| !ip.is_empty()) {
            Some(ip) => request = request.header(BUYER_IP_HEADER, ip),
            None => warn!(
                operation = request_body.operation_name,
                "No buyer IP provided; pass the buyer IP when making a server-side Storefront request"
            ),
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::Transport {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let response: Response<Value> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %excerpt(&response_text),
                    "Failed to parse Storefront GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::query(
                errors.into_iter().map(GraphQLError::from).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %excerpt(&response_text),
                "Storefront GraphQL response has no data and no errors"
            );
            ShopifyError::schema("/", "response has neither data nor errors")
        })
    }

    /// Execute a query, then check its data against `schema`.
    async fn execute_checked<Q>(
        &self,
        variables: Q::Variables,
        buyer_ip: Option<&str>,
        schema: &ResponseSchema,
    ) -> Result<Value, ShopifyError>
    where
        Q: GraphQLQuery<ResponseData = Value>,
    {
        let data = self.execute::<Q>(variables, buyer_ip).await?;
        schema.check(&data)?;
        Ok(data)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products, at most `limit` of them (default 10).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::EmptyResult`] if the shop returns no product
    /// list at all, or any request, query or schema error.
    #[instrument(skip(self, buyer_ip), fields(has_buyer_ip = buyer_ip.is_some()))]
    pub async fn get_products(
        &self,
        limit: Option<NonZeroU32>,
        buyer_ip: Option<&str>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let variables = get_products::Variables {
            first: limit.unwrap_or(DEFAULT_PRODUCT_LIMIT).get(),
        };

        let data = self
            .execute_checked::<GetProducts>(variables, buyer_ip, &self.inner.schemas.products)
            .await?;

        let connection = decode::<ProductsData>(data)?
            .products
            .ok_or_else(|| ShopifyError::EmptyResult("No products found".to_string()))?;

        let products = connection
            .edges
            .into_iter()
            .enumerate()
            .map(|(i, edge)| convert_product(edge.node, &format!("/products/edges/{i}/node")))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Get a product by its handle.
    ///
    /// Returns `Ok(None)` when no product has this handle.
    ///
    /// # Errors
    ///
    /// Returns any request, query or schema error.
    #[instrument(
        skip(self, handle, buyer_ip),
        fields(handle = %handle, has_buyer_ip = buyer_ip.is_some())
    )]
    pub async fn get_product_by_handle(
        &self,
        handle: &Handle,
        buyer_ip: Option<&str>,
    ) -> Result<Option<Product>, ShopifyError> {
        let variables = get_product_by_handle::Variables {
            handle: handle.as_str().to_string(),
        };

        let data = self
            .execute_checked::<GetProductByHandle>(
                variables,
                buyer_ip,
                &self.inner.schemas.product_by_handle,
            )
            .await?;

        let Some(node) = decode::<ProductByHandleData>(data)?.product else {
            debug!("Product not found");
            return Ok(None);
        };

        convert_product(node, "/product").map(Some)
    }

    /// Get recommendations for a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Schema`] if the recommendation list is null, or
    /// any request or query error.
    #[instrument(
        skip(self, product_id, buyer_ip),
        fields(product_id = %product_id, has_buyer_ip = buyer_ip.is_some())
    )]
    pub async fn get_product_recommendations(
        &self,
        product_id: &ProductId,
        buyer_ip: Option<&str>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let variables = get_product_recommendations::Variables {
            product_id: product_id.as_str().to_string(),
        };

        let data = self
            .execute_checked::<GetProductRecommendations>(
                variables,
                buyer_ip,
                &self.inner.schemas.product_recommendations,
            )
            .await?;

        let nodes = decode::<ProductRecommendationsData>(data)?.product_recommendations;

        let products = convert_products(nodes, "/productRecommendations")?;
        debug!(count = products.len(), "Fetched product recommendations");
        Ok(products)
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}
