//! Product type conversion functions.

use kiosk_core::{Handle, Money, ProductId, VariantId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::shopify::ShopifyError;
use crate::shopify::types::{Image, Product, ProductVariant};

// =============================================================================
// Wire types
// =============================================================================

/// `data` of the `GetProducts` query.
#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Option<ProductConnection>,
}

#[derive(Debug, Deserialize)]
pub struct ProductConnection {
    pub edges: Vec<ProductEdge>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEdge {
    pub node: ProductNode,
}

/// `data` of the `GetProductByHandle` query.
#[derive(Debug, Deserialize)]
pub struct ProductByHandleData {
    pub product: Option<ProductNode>,
}

/// `data` of the `GetProductRecommendations` query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationsData {
    pub product_recommendations: Vec<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub images: Nodes<Option<ImageNode>>,
    pub variants: Nodes<VariantNode>,
    pub featured_image: Option<ImageNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub quantity_available: i64,
    pub price: MoneyNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: String,
    pub currency_code: String,
}

/// Decode schema-checked response data into its wire type.
///
/// # Errors
///
/// Returns [`ShopifyError::Schema`] if the data still does not fit the wire
/// type (e.g., an integer too large for its field).
pub fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ShopifyError> {
    serde_json::from_value(data).map_err(|e| ShopifyError::schema("/", e.to_string()))
}

// =============================================================================
// Conversions
// =============================================================================

fn convert_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn convert_money(money: MoneyNode, pointer: &str) -> Result<Money, ShopifyError> {
    Money::parse(&money.amount, &money.currency_code)
        .map_err(|e| ShopifyError::schema(pointer, e.to_string()))
}

fn convert_variant(variant: VariantNode, pointer: &str) -> Result<ProductVariant, ShopifyError> {
    Ok(ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        quantity_available: variant.quantity_available,
        price: convert_money(variant.price, &format!("{pointer}/price"))?,
    })
}

/// Convert a product node into a [`Product`].
///
/// `pointer` locates the node in the response data and prefixes the path of
/// any error.
///
/// # Errors
///
/// Returns [`ShopifyError::Schema`] if the handle or a price fails domain
/// validation.
pub fn convert_product(node: ProductNode, pointer: &str) -> Result<Product, ShopifyError> {
    let handle = Handle::parse(&node.handle)
        .map_err(|e| ShopifyError::schema(format!("{pointer}/handle"), e.to_string()))?;

    let variants = node
        .variants
        .nodes
        .into_iter()
        .enumerate()
        .map(|(i, variant)| convert_variant(variant, &format!("{pointer}/variants/nodes/{i}")))
        .collect::<Result<Vec<_>, _>>()?;

    if variants.is_empty() {
        return Err(ShopifyError::schema(
            format!("{pointer}/variants/nodes"),
            "product has no variants",
        ));
    }

    Ok(Product {
        id: ProductId::new(node.id),
        title: node.title,
        handle,
        // Null gallery entries are skipped.
        images: node
            .images
            .nodes
            .into_iter()
            .flatten()
            .map(convert_image)
            .collect(),
        variants,
        featured_image: node.featured_image.map(convert_image),
    })
}

/// Convert a list of product nodes, failing on the first invalid product.
///
/// # Errors
///
/// Returns the first conversion error.
pub fn convert_products<I>(nodes: I, pointer: &str) -> Result<Vec<Product>, ShopifyError>
where
    I: IntoIterator<Item = ProductNode>,
{
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| convert_product(node, &format!("{pointer}/{i}")))
        .collect()
}
