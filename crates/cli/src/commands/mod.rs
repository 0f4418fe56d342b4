//! Command implementations.

pub mod cart;
pub mod catalog;

use kiosk_storefront::cart::{CartStoreError, PersistedCartError};
use kiosk_storefront::shopify::ShopifyError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront API request failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// No product has the requested handle.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Writing the cart failed.
    #[error(transparent)]
    CartStore(#[from] CartStoreError),

    /// A cart snapshot file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadSnapshot {
        path: String,
        source: std::io::Error,
    },

    /// A cart snapshot file is not a valid cart.
    #[error("Invalid cart snapshot in {path}: {source}")]
    InvalidSnapshot {
        path: String,
        source: PersistedCartError,
    },

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Write a value to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
