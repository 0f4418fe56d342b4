//! Type conversion functions for Storefront API responses.
//!
//! Response data is validated against its schema first, then decoded into
//! the wire structs here, then converted into domain types.

pub mod products;

pub use products::{
    ProductByHandleData, ProductRecommendationsData, ProductsData, convert_product,
    convert_products, decode,
};
