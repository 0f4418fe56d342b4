//! Persisted cart management.

use std::path::Path;

use kiosk_storefront::cart::{CartStorage, CartStore, persisted};
use tracing::info;

use super::{CommandError, print_json};

/// Print the persisted cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded.
pub fn show<S: CartStorage>(store: &CartStore<S>) -> Result<(), CommandError> {
    let cart = store.read();
    info!(
        lines = cart.lines.len(),
        total_quantity = cart.total_quantity,
        total = %cart
            .total_cost
            .as_ref()
            .map_or_else(String::new, |total| total.format(true)),
        "Current cart"
    );
    print_json(&cart)
}

/// Reset the persisted cart to empty.
///
/// # Errors
///
/// Returns an error if the empty cart cannot be persisted.
pub fn reset<S: CartStorage>(store: &CartStore<S>) -> Result<(), CommandError> {
    store.reset()?;
    info!("Cart reset");
    Ok(())
}

/// Replace the persisted cart with a snapshot read from `file`.
///
/// The snapshot uses the same JSON shape the cart is persisted in.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, or the cart
/// cannot be persisted.
pub fn import<S: CartStorage>(store: &CartStore<S>, file: &Path) -> Result<(), CommandError> {
    let path = file.display().to_string();
    let json = std::fs::read_to_string(file).map_err(|source| CommandError::ReadSnapshot {
        path: path.clone(),
        source,
    })?;
    let cart = persisted::decode(&json)
        .map_err(|source| CommandError::InvalidSnapshot { path, source })?;

    let _subscription = store.subscribe(|cart| {
        info!(
            cart_id = %cart.id,
            total_quantity = cart.total_quantity,
            "Cart changed"
        );
    });

    store.set_updating(true);
    let result = store.replace(cart);
    store.set_updating(false);
    result?;

    print_json(&store.read())
}
