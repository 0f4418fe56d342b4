//! Kiosk Core - Shared domain value types.
//!
//! This crate provides the value types used by every Kiosk component:
//! - `storefront` - Commerce API client and persisted cart store
//! - `cli` - Command-line composition root
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify GIDs, handles and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
