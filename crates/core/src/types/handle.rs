//! Product handle type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Handle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The input string is empty.
    #[error("handle cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("handle must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a URL slug.
    #[error("handle contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A product handle: the URL-safe slug that uniquely identifies a product.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - No whitespace, control characters, `/`, `?` or `#`
///
/// ## Examples
///
/// ```
/// use kiosk_core::Handle;
///
/// assert!(Handle::parse("linen-tote-bag").is_ok());
/// assert!(Handle::parse("").is_err());
/// assert!(Handle::parse("tote bag").is_err());
/// assert!(Handle::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Maximum length of a handle (Shopify limit).
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `Handle` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 255 characters,
    /// or contains a character that cannot appear in a URL path segment.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        if s.is_empty() {
            return Err(HandleError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#'))
        {
            return Err(HandleError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Handle` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_handles() {
        assert!(Handle::parse("linen-tote-bag").is_ok());
        assert!(Handle::parse("t-shirt_2024").is_ok());
        assert!(Handle::parse("x").is_ok());
        assert!(Handle::parse("café-crème").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Handle::parse(""), Err(HandleError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(256);
        assert!(matches!(
            Handle::parse(&long),
            Err(HandleError::TooLong { max: 255 })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(
            Handle::parse("tote bag"),
            Err(HandleError::InvalidCharacter(' '))
        );
        assert_eq!(
            Handle::parse("../etc"),
            Err(HandleError::InvalidCharacter('/'))
        );
        assert_eq!(
            Handle::parse("tote?x=1"),
            Err(HandleError::InvalidCharacter('?'))
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let handle = Handle::parse("linen-tote-bag").unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"linen-tote-bag\"");

        let parsed: Handle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, handle);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<Handle>("\"\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let handle: Handle = "linen-tote-bag".parse().unwrap();
        assert_eq!(handle.as_str(), "linen-tote-bag");
    }
}
