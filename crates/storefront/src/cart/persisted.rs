//! The persisted cart format.
//!
//! The cart is stored as the JSON object the Storefront API returns for a
//! cart query, so a server snapshot can be written as-is:
//!
//! ```json
//! {
//!   "id": "gid://shopify/Cart/c1",
//!   "checkoutUrl": "https://kiosk.myshopify.com/cart/c/c1",
//!   "totalQuantity": 1,
//!   "cost": { "totalAmount": { "amount": "19.9", "currencyCode": "USD" } },
//!   "lines": { "nodes": [ ... ] }
//! }
//! ```
//!
//! The empty cart stores an empty amount and currency code.

use kiosk_core::{CartId, CartLineId, Handle, HandleError, Money, MoneyError, VariantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shopify::types::{Cart, CartLine, CartLineCost, CartMerchandise, Image};

/// Errors decoding a persisted cart.
#[derive(Debug, Error)]
pub enum PersistedCartError {
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid money in cart: {0}")]
    Money(#[from] MoneyError),
    #[error("invalid product handle in cart: {0}")]
    Handle(#[from] HandleError),
    #[error("cart line {0} has zero quantity")]
    ZeroQuantity(String),
    #[error("image {0} has a zero dimension")]
    ZeroDimension(String),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    id: String,
    checkout_url: String,
    total_quantity: u32,
    cost: PersistedCartCost,
    lines: PersistedLines,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCartCost {
    total_amount: PersistedMoney,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedMoney {
    amount: String,
    currency_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedLines {
    nodes: Vec<PersistedLine>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedLine {
    id: String,
    quantity: u32,
    cost: PersistedLineCost,
    merchandise: PersistedMerchandise,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedLineCost {
    amount_per_quantity: PersistedMoney,
    subtotal_amount: PersistedMoney,
    total_amount: PersistedMoney,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedMerchandise {
    id: String,
    title: String,
    product: PersistedProductRef,
    #[serde(default)]
    image: Option<PersistedImage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedProductRef {
    title: String,
    handle: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedImage {
    #[serde(default)]
    alt_text: Option<String>,
    url: String,
    width: u32,
    height: u32,
}

// =============================================================================
// Validation
// =============================================================================

fn check_quantity(line_id: &str, quantity: u32) -> Result<(), PersistedCartError> {
    if quantity == 0 {
        return Err(PersistedCartError::ZeroQuantity(line_id.to_string()));
    }
    Ok(())
}

fn check_dimensions(url: &str, width: u32, height: u32) -> Result<(), PersistedCartError> {
    if width == 0 || height == 0 {
        return Err(PersistedCartError::ZeroDimension(url.to_string()));
    }
    Ok(())
}

/// Check that `cart` would survive an encode and decode.
///
/// # Errors
///
/// Returns the error [`decode`] would report for the encoded cart.
pub fn validate(cart: &Cart) -> Result<(), PersistedCartError> {
    for line in &cart.lines {
        check_quantity(line.id.as_str(), line.quantity)?;
        if let Some(image) = &line.merchandise.image {
            check_dimensions(&image.url, image.width, image.height)?;
        }
    }
    Ok(())
}

// =============================================================================
// Encoding
// =============================================================================

fn encode_money(money: &Money) -> PersistedMoney {
    PersistedMoney {
        amount: money.amount_string(),
        currency_code: money.currency_code().to_string(),
    }
}

fn encode_image(image: &Image) -> PersistedImage {
    PersistedImage {
        alt_text: image.alt_text.clone(),
        url: image.url.clone(),
        width: image.width,
        height: image.height,
    }
}

fn encode_line(line: &CartLine) -> PersistedLine {
    PersistedLine {
        id: line.id.to_string(),
        quantity: line.quantity,
        cost: PersistedLineCost {
            amount_per_quantity: encode_money(&line.cost.amount_per_quantity),
            subtotal_amount: encode_money(&line.cost.subtotal_amount),
            total_amount: encode_money(&line.cost.total_amount),
        },
        merchandise: PersistedMerchandise {
            id: line.merchandise.id.to_string(),
            title: line.merchandise.title.clone(),
            product: PersistedProductRef {
                title: line.merchandise.product_title.clone(),
                handle: line.merchandise.product_handle.to_string(),
            },
            image: line.merchandise.image.as_ref().map(encode_image),
        },
    }
}

/// Encode a cart in the persisted format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    let persisted = PersistedCart {
        id: cart.id.to_string(),
        checkout_url: cart.checkout_url.clone(),
        total_quantity: cart.total_quantity,
        cost: PersistedCartCost {
            total_amount: cart.total_cost.as_ref().map_or_else(
                || PersistedMoney {
                    amount: String::new(),
                    currency_code: String::new(),
                },
                encode_money,
            ),
        },
        lines: PersistedLines {
            nodes: cart.lines.iter().map(encode_line).collect(),
        },
    };
    serde_json::to_string(&persisted)
}

// =============================================================================
// Decoding
// =============================================================================

fn decode_money(money: PersistedMoney) -> Result<Money, MoneyError> {
    Money::parse(&money.amount, &money.currency_code)
}

fn decode_image(image: PersistedImage) -> Result<Image, PersistedCartError> {
    check_dimensions(&image.url, image.width, image.height)?;
    Ok(Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    })
}

fn decode_line(line: PersistedLine) -> Result<CartLine, PersistedCartError> {
    check_quantity(&line.id, line.quantity)?;
    Ok(CartLine {
        id: CartLineId::new(line.id),
        quantity: line.quantity,
        cost: CartLineCost {
            amount_per_quantity: decode_money(line.cost.amount_per_quantity)?,
            subtotal_amount: decode_money(line.cost.subtotal_amount)?,
            total_amount: decode_money(line.cost.total_amount)?,
        },
        merchandise: CartMerchandise {
            id: VariantId::new(line.merchandise.id),
            title: line.merchandise.title,
            product_title: line.merchandise.product.title,
            product_handle: Handle::parse(&line.merchandise.product.handle)?,
            image: line.merchandise.image.map(decode_image).transpose()?,
        },
    })
}

/// Decode a cart from the persisted format.
///
/// # Errors
///
/// Returns an error if the JSON does not have the persisted shape or a value
/// fails domain validation.
pub fn decode(json: &str) -> Result<Cart, PersistedCartError> {
    let persisted: PersistedCart = serde_json::from_str(json)?;

    let total = persisted.cost.total_amount;
    let total_cost = if total.amount.is_empty() && total.currency_code.is_empty() {
        None
    } else {
        Some(decode_money(total)?)
    };

    Ok(Cart {
        id: CartId::new(persisted.id),
        checkout_url: persisted.checkout_url,
        total_quantity: persisted.total_quantity,
        total_cost,
        lines: persisted
            .lines
            .nodes
            .into_iter()
            .map(decode_line)
            .collect::<Result<_, _>>()?,
    })
}
