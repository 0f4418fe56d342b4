//! Shopify Storefront API client and domain types.
//!
//! # Architecture
//!
//! - Uses the `graphql_client` request/response envelope with `reqwest` 0.13
//! - Shopify is source of truth - NO local sync, NO response caching
//! - Every response is validated against a JSON schema before it is decoded,
//!   so a malformed payload is rejected as a whole instead of being partially
//!   rendered
//!
//! # Example
//!
//! ```rust,ignore
//! use kiosk_storefront::shopify::StorefrontClient;
//!
//! let config = ShopifyStorefrontConfig::from_env()?;
//! let client = StorefrontClient::new(&config)?;
//!
//! let products = client.get_products(None, Some("203.0.113.7")).await?;
//! let product = client.get_product_by_handle(&handle, None).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::{DEFAULT_PRODUCT_LIMIT, StorefrontClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The API answered with a non-success HTTP status.
    #[error("{status} {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The GraphQL response carried one or more errors.
    #[error("GraphQL errors: {message}")]
    Query {
        /// Error messages joined with `"; "`.
        message: String,
        /// The individual errors.
        errors: Vec<GraphQLError>,
    },

    /// The response did not match the expected shape.
    #[error("Schema mismatch at {path}: {message}")]
    Schema {
        /// JSON pointer into the response data (e.g., `/product/handle`).
        path: String,
        /// What was expected versus what was found.
        message: String,
    },

    /// A product list came back null or absent.
    #[error("{0}")]
    EmptyResult(String),

    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A response schema failed to compile.
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),
}

impl ShopifyError {
    pub(crate) fn query(errors: Vec<GraphQLError>) -> Self {
        Self::Query {
            message: format_graphql_errors(&errors),
            errors,
        }
    }

    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A GraphQL error returned by the Storefront API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: error.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str) -> GraphQLError {
        GraphQLError {
            message: message.to_string(),
            locations: vec![],
            path: vec![],
        }
    }

    #[test]
    fn test_transport_error_display() {
        let err = ShopifyError::Transport {
            status: 500,
            body: "server error".to_string(),
        };
        assert_eq!(err.to_string(), "500 server error");
    }

    #[test]
    fn test_query_error_joins_messages() {
        let err = ShopifyError::query(vec![error("Field not found"), error("Invalid ID")]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
        match err {
            ShopifyError::Query { message, errors } => {
                assert_eq!(message, "Field not found; Invalid ID");
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_error_single_message() {
        let err = ShopifyError::query(vec![error("Throttled")]);
        assert!(matches!(err, ShopifyError::Query { ref message, .. } if message == "Throttled"));
    }

    #[test]
    fn test_query_error_includes_path_and_location() {
        let err = ShopifyError::query(vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: products.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = ShopifyError::query(vec![error("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::query(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_schema_error_display() {
        let err = ShopifyError::schema("/product/handle", "null is not of type \"string\"");
        assert_eq!(
            err.to_string(),
            "Schema mismatch at /product/handle: null is not of type \"string\""
        );
    }

    #[test]
    fn test_graphql_error_from_client_error() {
        let raw: graphql_client::Error = serde_json::from_value(serde_json::json!({
            "message": "Throttled",
            "locations": [{"line": 2, "column": 3}],
            "path": ["products", 0]
        }))
        .unwrap_or_else(|e| panic!("valid error payload: {e}"));

        let converted = GraphQLError::from(raw);
        assert_eq!(converted.message, "Throttled");
        assert_eq!(converted.locations.len(), 1);
        assert_eq!(converted.locations[0].line, 2);
        assert_eq!(
            converted.path,
            vec![serde_json::json!("products"), serde_json::json!(0)]
        );
    }
}
