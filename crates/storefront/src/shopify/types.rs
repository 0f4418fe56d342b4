//! Domain types for the Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! shapes in `storefront::conversions`. Every value here has already passed
//! response validation.

use kiosk_core::{CartId, CartLineId, Handle, Money, ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Image Types
// =============================================================================

/// Widths offered in a responsive `srcset`, in pixels.
pub const SRCSET_WIDTHS: [u32; 13] = [
    50, 100, 200, 450, 600, 750, 900, 1000, 1250, 1500, 1750, 2000, 2500,
];

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels (positive).
    pub width: u32,
    /// Image height in pixels (positive).
    pub height: u32,
}

impl Image {
    /// Build a `srcset` attribute value for this image.
    ///
    /// Every width in [`SRCSET_WIDTHS`] below the image's own width becomes a
    /// CDN-resized candidate; the original URL is always the last candidate.
    ///
    /// ```
    /// use kiosk_storefront::shopify::Image;
    ///
    /// let image = Image {
    ///     url: "https://cdn.shopify.com/tote.jpg?v=1".to_string(),
    ///     alt_text: None,
    ///     width: 120,
    ///     height: 80,
    /// };
    /// assert_eq!(
    ///     image.srcset(),
    ///     "https://cdn.shopify.com/tote.jpg?v=1&width=50&height= 50w, \
    ///      https://cdn.shopify.com/tote.jpg?v=1&width=100&height= 100w, \
    ///      https://cdn.shopify.com/tote.jpg?v=1 120w"
    /// );
    /// ```
    #[must_use]
    pub fn srcset(&self) -> String {
        let resized_base = self.url.replacen(".webp", "", 1);

        SRCSET_WIDTHS
            .iter()
            .filter(|&&width| width < self.width)
            .map(|width| format!("{resized_base}&width={width}&height= {width}w"))
            .chain(std::iter::once(format!("{} {}w", self.url, self.width)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Alt text, falling back to the given label when absent.
    #[must_use]
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alt_text.as_deref().unwrap_or(fallback)
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (e.g., "Small / Blue").
    pub title: String,
    /// Whether the variant can be purchased.
    pub available_for_sale: bool,
    /// Inventory count reported by the shop.
    pub quantity_available: i64,
    /// Current price.
    pub price: Money,
}

/// A product with its images and variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL slug.
    pub handle: Handle,
    /// Gallery images in display order.
    pub images: Vec<Image>,
    /// Variants in display order (never empty).
    pub variants: Vec<ProductVariant>,
    /// Featured image.
    pub featured_image: Option<Image>,
}

impl Product {
    /// The variant selected by default.
    #[must_use]
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Whether any variant can be purchased.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// The shopping cart as last reported by the shop.
///
/// The empty cart (see [`Cart::empty`]) has no ID, no checkout URL and no
/// total cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID (empty for the empty cart).
    pub id: CartId,
    /// URL to the hosted checkout.
    pub checkout_url: String,
    /// Sum of line quantities.
    pub total_quantity: u32,
    /// Total cost, absent for the empty cart.
    pub total_cost: Option<Money>,
    /// Lines in display order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// The cart a device starts with.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line holding the given variant, if any.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| &line.merchandise.id == variant_id)
    }

    /// Whether the cart already holds every available unit of a variant.
    #[must_use]
    pub fn has_no_quantity_left(&self, variant_id: &VariantId, quantity_available: i64) -> bool {
        self.line_for_variant(variant_id)
            .is_some_and(|line| i64::from(line.quantity) >= quantity_available)
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line ID, unique within the cart.
    pub id: CartLineId,
    /// Quantity (positive).
    pub quantity: u32,
    /// Line costs.
    pub cost: CartLineCost,
    /// The variant this line holds.
    pub merchandise: CartMerchandise,
}

/// Costs for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Price of a single unit.
    pub amount_per_quantity: Money,
    /// Cost before discounts.
    pub subtotal_amount: Money,
    /// Cost after discounts.
    pub total_amount: Money,
}

/// Variant reference carried by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Title of the owning product.
    pub product_title: String,
    /// Handle of the owning product.
    pub product_handle: Handle,
    /// Variant image.
    pub image: Option<Image>,
}
