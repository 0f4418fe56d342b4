//! Newtype IDs for Shopify global IDs.
//!
//! Use the `define_gid!` macro to create type-safe wrappers that prevent
//! accidentally passing a cart line ID where a variant ID is expected.

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`, `resource_id()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use kiosk_core::define_gid;
/// define_gid!(OrderGid);
/// define_gid!(ShopGid);
///
/// let order = OrderGid::new("gid://shopify/Order/1");
/// assert_eq!(order.resource_id(), Some("1"));
///
/// // These are different types, so this won't compile:
/// // let _: ShopGid = order;
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Default,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a GID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying GID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the GID string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns the trailing resource segment of the GID
            /// (`"123"` for `gid://shopify/Product/123`), if any.
            #[must_use]
            pub fn resource_id(&self) -> Option<&str> {
                self.0
                    .rsplit('/')
                    .next()
                    .map(|segment| segment.split('?').next().unwrap_or(segment))
                    .filter(|segment| !segment.is_empty() && self.0.starts_with("gid://"))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Storefront API entity IDs
define_gid!(ProductId);
define_gid!(VariantId);
define_gid!(CartId);
define_gid!(CartLineId);
