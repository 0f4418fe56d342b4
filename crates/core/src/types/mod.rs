//! Core types for Kiosk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod handle;
pub mod id;
pub mod money;

pub use handle::{Handle, HandleError};
pub use id::*;
pub use money::{CurrencyCode, Money, MoneyError};
