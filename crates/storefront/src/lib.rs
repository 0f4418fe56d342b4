//! Kiosk Storefront library.
//!
//! Commerce core of the Kiosk storefront:
//! - [`shopify`] - typed Storefront API client with response validation
//! - [`cart`] - reactive cart store persisted to key-value storage
//! - [`config`] - eagerly validated configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod shopify;
