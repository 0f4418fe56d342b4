//! Catalog queries against the Storefront API.

use std::net::IpAddr;
use std::num::NonZeroU32;

use kiosk_core::{Handle, ProductId};
use kiosk_storefront::shopify::StorefrontClient;
use tracing::info;

use super::{CommandError, print_json};

/// List products.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn products(
    client: &StorefrontClient,
    limit: Option<NonZeroU32>,
    buyer_ip: Option<IpAddr>,
) -> Result<(), CommandError> {
    let buyer_ip = buyer_ip.map(|ip| ip.to_string());
    let products = client.get_products(limit, buyer_ip.as_deref()).await?;

    info!(count = products.len(), "Listed products");
    print_json(&products)
}

/// Show a single product.
///
/// # Errors
///
/// Returns [`CommandError::ProductNotFound`] if no product has the handle, or
/// an error if the request fails.
pub async fn product(
    client: &StorefrontClient,
    handle: &Handle,
    buyer_ip: Option<IpAddr>,
) -> Result<(), CommandError> {
    let buyer_ip = buyer_ip.map(|ip| ip.to_string());
    let product = client
        .get_product_by_handle(handle, buyer_ip.as_deref())
        .await?
        .ok_or_else(|| CommandError::ProductNotFound(handle.to_string()))?;

    if let Some(variant) = product.first_variant() {
        info!(
            title = %product.title,
            price = %variant.price.format(true),
            available = product.is_available(),
            "Found product"
        );
    }
    print_json(&product)
}

/// List recommendations for a product.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn recommendations(
    client: &StorefrontClient,
    product_id: ProductId,
    buyer_ip: Option<IpAddr>,
) -> Result<(), CommandError> {
    let buyer_ip = buyer_ip.map(|ip| ip.to_string());
    let products = client
        .get_product_recommendations(&product_id, buyer_ip.as_deref())
        .await?;

    info!(count = products.len(), "Listed recommendations");
    print_json(&products)
}
