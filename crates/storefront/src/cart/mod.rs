//! Reactive cart store.
//!
//! Holds the device's cart snapshot plus two transient UI flags. The cart is
//! persisted under [`CART_STORAGE_KEY`] on every replacement and restored on
//! load; the flags live in memory only.
//!
//! # Example
//!
//! ```
//! use kiosk_storefront::cart::{CartStore, MemoryStorage};
//!
//! let store = CartStore::load(MemoryStorage::new());
//! let _subscription = store.subscribe(|cart| {
//!     tracing::debug!(total_quantity = cart.total_quantity, "Cart changed");
//! });
//! assert!(store.read().is_empty());
//! ```

mod observable;
pub mod persisted;
mod storage;

pub use observable::{Observable, Subscription};
pub use persisted::PersistedCartError;
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::shopify::types::Cart;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors from [`CartStore`] writes.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The cart would not survive being persisted and restored.
    #[error("invalid cart: {0}")]
    Invalid(#[from] PersistedCartError),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The storage backend rejected the write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The device's cart and cart UI state.
///
/// Single-threaded: listeners run synchronously on the thread that changes
/// the value.
pub struct CartStore<S: CartStorage> {
    storage: S,
    cart: Observable<Cart>,
    updating: Observable<bool>,
    drawer_open: Observable<bool>,
}

impl<S: CartStorage> CartStore<S> {
    /// Restore the cart from `storage`.
    ///
    /// A missing, unreadable or undecodable persisted cart yields the empty
    /// cart.
    pub fn load(storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(json)) => persisted::decode(&json).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable persisted cart");
                Cart::empty()
            }),
            Ok(None) => Cart::empty(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart");
                Cart::empty()
            }
        };

        debug!(
            total_quantity = cart.total_quantity,
            lines = cart.lines.len(),
            "Cart restored"
        );

        Self {
            storage,
            cart: Observable::new(cart),
            updating: Observable::new(false),
            drawer_open: Observable::new(false),
        }
    }

    /// The storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Current cart snapshot.
    #[must_use]
    pub fn read(&self) -> Cart {
        self.cart.get()
    }

    /// Listen for cart changes, starting with the current cart.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Cart) + 'static) -> Subscription {
        self.cart.subscribe(callback)
    }

    /// Replace the cart with a new snapshot.
    ///
    /// The in-memory cart is swapped first, then persisted, then listeners
    /// are notified. Listeners are notified even when persisting fails.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Invalid`] without touching the current cart
    /// if `cart` breaks a rule the persisted format enforces on load. Returns
    /// a storage or encoding error if the cart could not be persisted; the
    /// in-memory cart has been replaced regardless.
    pub fn replace(&self, cart: Cart) -> Result<(), CartStoreError> {
        persisted::validate(&cart)?;

        self.cart.set_with(cart, |cart| {
            let persisted = persisted::encode(cart)
                .map_err(CartStoreError::from)
                .and_then(|json| Ok(self.storage.set(CART_STORAGE_KEY, &json)?));

            if let Err(e) = &persisted {
                warn!(error = %e, "Failed to persist cart");
            }
            persisted
        })
    }

    /// Replace the cart with the empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn reset(&self) -> Result<(), CartStoreError> {
        self.replace(Cart::empty())
    }

    // =========================================================================
    // UI flags
    // =========================================================================

    /// Whether a cart request is in flight.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.updating.get()
    }

    /// Mark a cart request as started or finished.
    pub fn set_updating(&self, updating: bool) {
        if self.updating.get() != updating {
            self.updating.set(updating);
        }
    }

    /// Listen for changes of the updating flag.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_updating(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.updating.subscribe(callback)
    }

    /// Whether the cart drawer is shown.
    #[must_use]
    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open.get()
    }

    /// Show or hide the cart drawer.
    pub fn set_drawer_open(&self, open: bool) {
        if self.drawer_open.get() != open {
            self.drawer_open.set(open);
        }
    }

    /// Listen for changes of the drawer flag.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_drawer_open(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.drawer_open.subscribe(callback)
    }
}

impl<S: CartStorage + std::fmt::Debug> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("cart", &self.cart.get())
            .field("updating", &self.updating.get())
            .field("drawer_open", &self.drawer_open.get())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use kiosk_core::{CartId, CartLineId, Handle, Money, VariantId};

    use super::*;
    use crate::shopify::types::{CartLine, CartLineCost, CartMerchandise};

    fn cart(id: &str, quantity: u32) -> Cart {
        Cart {
            id: CartId::new(id),
            checkout_url: format!("https://kiosk.myshopify.com/cart/c/{id}"),
            total_quantity: quantity,
            total_cost: Some(Money::parse("19.90", "USD").unwrap()),
            lines: vec![],
        }
    }

    fn line(quantity: u32) -> CartLine {
        let price = Money::parse("19.90", "USD").unwrap();
        CartLine {
            id: CartLineId::new("gid://shopify/CartLine/1"),
            quantity,
            cost: CartLineCost {
                amount_per_quantity: price.clone(),
                subtotal_amount: price.clone(),
                total_amount: price,
            },
            merchandise: CartMerchandise {
                id: VariantId::new("gid://shopify/ProductVariant/1"),
                title: "Default Title".to_string(),
                product_title: "Linen Tote".to_string(),
                product_handle: Handle::parse("linen-tote").unwrap(),
                image: None,
            },
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn test_load_without_persisted_cart_is_empty() {
        let store = CartStore::load(MemoryStorage::new());
        assert_eq!(store.read(), Cart::empty());
        assert!(!store.is_updating());
        assert!(!store.is_drawer_open());
    }

    #[test]
    fn test_load_corrupt_cart_is_empty() {
        let storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();

        let store = CartStore::load(storage);
        assert_eq!(store.read(), Cart::empty());
    }

    #[test]
    fn test_replace_persists_and_restores() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(storage.clone());

        store.replace(cart("c1", 3)).unwrap();
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_some());

        let restored = CartStore::load(storage);
        assert_eq!(restored.read(), cart("c1", 3));
    }

    #[test]
    fn test_subscriber_sees_same_value_as_read() {
        let store = Rc::new(CartStore::load(MemoryStorage::new()));
        let consistent = Rc::new(Cell::new(true));
        let calls = Rc::new(Cell::new(0));

        let store_in = Rc::clone(&store);
        let consistent_in = Rc::clone(&consistent);
        let calls_in = Rc::clone(&calls);
        let _sub = store.subscribe(move |cart| {
            calls_in.set(calls_in.get() + 1);
            if store_in.read() != *cart {
                consistent_in.set(false);
            }
        });

        store.replace(cart("c1", 1)).unwrap();
        store.replace(cart("c2", 2)).unwrap();

        assert_eq!(calls.get(), 3);
        assert!(consistent.get());
    }

    #[test]
    fn test_replace_from_listener_keeps_listeners_consistent() {
        let storage = MemoryStorage::new();
        let store = Rc::new(CartStore::load(storage.clone()));

        let store_in = Rc::clone(&store);
        let _a = store.subscribe(move |current| {
            if current.id.as_str() == "c1" {
                store_in.replace(cart("c2", 1)).unwrap();
            }
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let store_in = Rc::clone(&store);
        let seen_in = Rc::clone(&seen);
        let _b = store.subscribe(move |cart| {
            assert_eq!(store_in.read(), *cart);
            seen_in.borrow_mut().push(cart.id.to_string());
        });

        store.replace(cart("c1", 1)).unwrap();

        assert_eq!(store.read().id.as_str(), "c2");
        assert_eq!(*seen.borrow(), vec![String::new(), "c2".to_string()]);
        assert_eq!(CartStore::load(storage).read().id.as_str(), "c2");
    }

    #[test]
    fn test_replace_rejects_cart_that_would_not_restore() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(storage.clone());
        store.replace(cart("c1", 1)).unwrap();
        let notified = Rc::new(Cell::new(0));
        let notified_in = Rc::clone(&notified);
        let _sub = store.subscribe(move |_| notified_in.set(notified_in.get() + 1));

        let mut invalid = cart("c2", 0);
        invalid.lines.push(line(0));
        let result = store.replace(invalid);

        assert!(matches!(
            result,
            Err(CartStoreError::Invalid(PersistedCartError::ZeroQuantity(_)))
        ));
        assert_eq!(store.read(), cart("c1", 1));
        assert_eq!(notified.get(), 1);
        assert_eq!(CartStore::load(storage).read(), cart("c1", 1));
    }

    #[test]
    fn test_unsubscribe_is_independent() {
        let store = CartStore::load(MemoryStorage::new());
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let a_in = Rc::clone(&seen_a);
        let a = store.subscribe(move |cart| a_in.borrow_mut().push(cart.total_quantity));
        let b_in = Rc::clone(&seen_b);
        let _b = store.subscribe(move |cart| b_in.borrow_mut().push(cart.total_quantity));

        a.unsubscribe();
        store.replace(cart("c1", 4)).unwrap();

        assert_eq!(*seen_a.borrow(), vec![0]);
        assert_eq!(*seen_b.borrow(), vec![0, 4]);
    }

    #[test]
    fn test_failed_persist_still_updates_and_notifies() {
        let store = CartStore::load(ReadOnlyStorage);
        let notified = Rc::new(Cell::new(0));

        let notified_in = Rc::clone(&notified);
        let _sub = store.subscribe(move |_| notified_in.set(notified_in.get() + 1));

        let result = store.replace(cart("c1", 1));

        assert!(matches!(result, Err(CartStoreError::Storage(_))));
        assert_eq!(store.read(), cart("c1", 1));
        assert_eq!(notified.get(), 2);
    }

    #[test]
    fn test_reset_empties_cart() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(storage.clone());
        store.replace(cart("c1", 1)).unwrap();

        store.reset().unwrap();

        assert!(store.read().is_empty());
        assert_eq!(CartStore::load(storage).read(), Cart::empty());
    }

    #[test]
    fn test_flags_notify_on_change_only_and_are_not_persisted() {
        let storage = MemoryStorage::new();
        let store = CartStore::load(storage.clone());
        let changes = Rc::new(RefCell::new(Vec::new()));

        let changes_in = Rc::clone(&changes);
        let _sub = store.subscribe_drawer_open(move |open| changes_in.borrow_mut().push(*open));

        store.set_drawer_open(true);
        store.set_drawer_open(true);
        store.set_drawer_open(false);
        store.set_updating(true);

        assert_eq!(*changes.borrow(), vec![false, true, false]);
        assert!(store.is_updating());
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
        assert!(!CartStore::load(storage).is_updating());
    }
}
