//! JSON schemas for Storefront API response data.
//!
//! Each schema describes the `data` object of one query. Schemas are compiled
//! once when the client is built and checked against every response before it
//! is decoded; the first violation fails the whole response.

use jsonschema::Validator;
use serde_json::{Value, json};

use crate::shopify::ShopifyError;

// =============================================================================
// Schema fragments
// =============================================================================

fn money() -> Value {
    json!({
        "type": "object",
        "required": ["amount", "currencyCode"],
        "properties": {
            "amount": { "type": "string", "pattern": "^[0-9]+(\\.[0-9]+)?$" },
            "currencyCode": { "type": "string", "pattern": "^[A-Z]{3}$" }
        }
    })
}

/// Images are nullable wherever they appear.
fn image() -> Value {
    json!({
        "type": ["object", "null"],
        "required": ["url", "width", "height"],
        "properties": {
            "url": { "type": "string" },
            "width": { "type": "integer", "exclusiveMinimum": 0 },
            "height": { "type": "integer", "exclusiveMinimum": 0 },
            "altText": { "type": ["string", "null"] }
        }
    })
}

fn variant() -> Value {
    json!({
        "type": "object",
        "required": ["id", "title", "availableForSale", "quantityAvailable", "price"],
        "properties": {
            "id": { "type": "string" },
            "title": { "type": "string" },
            "availableForSale": { "type": "boolean" },
            "quantityAvailable": { "type": "integer" },
            "price": money()
        }
    })
}

fn product(nullable: bool) -> Value {
    let kind = if nullable {
        json!(["object", "null"])
    } else {
        json!("object")
    };

    json!({
        "type": kind,
        "required": ["id", "title", "handle", "images", "variants"],
        "properties": {
            "id": { "type": "string" },
            "title": { "type": "string" },
            "handle": { "type": "string", "minLength": 1 },
            "images": {
                "type": "object",
                "required": ["nodes"],
                "properties": {
                    "nodes": { "type": "array", "items": image() }
                }
            },
            "variants": {
                "type": "object",
                "required": ["nodes"],
                "properties": {
                    "nodes": { "type": "array", "minItems": 1, "items": variant() }
                }
            },
            "featuredImage": image()
        }
    })
}

// =============================================================================
// Response schemas
// =============================================================================

fn products_response() -> Value {
    json!({
        "type": "object",
        "properties": {
            "products": {
                "type": ["object", "null"],
                "required": ["edges"],
                "properties": {
                    "edges": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["node"],
                            "properties": { "node": product(false) }
                        }
                    }
                }
            }
        }
    })
}

fn product_by_handle_response() -> Value {
    json!({
        "type": "object",
        "properties": { "product": product(true) }
    })
}

fn product_recommendations_response() -> Value {
    json!({
        "type": "object",
        "required": ["productRecommendations"],
        "properties": {
            "productRecommendations": {
                "type": "array",
                "items": product(false)
            }
        }
    })
}

/// A compiled response schema.
pub struct ResponseSchema {
    validator: Validator,
}

impl ResponseSchema {
    fn compile(schema: &Value) -> Result<Self, ShopifyError> {
        let validator =
            Validator::new(schema).map_err(|e| ShopifyError::InvalidSchema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Check response data against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Schema`] describing the first violation, with a
    /// JSON pointer into `data`.
    pub fn check(&self, data: &Value) -> Result<(), ShopifyError> {
        match self.validator.iter_errors(data).next() {
            None => Ok(()),
            Some(error) => {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "/".to_string() } else { path };
                Err(ShopifyError::schema(path, error.to_string()))
            }
        }
    }
}

/// Schemas for every query the client issues.
pub struct ResponseSchemas {
    pub products: ResponseSchema,
    pub product_by_handle: ResponseSchema,
    pub product_recommendations: ResponseSchema,
}

impl ResponseSchemas {
    /// Compile all response schemas.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidSchema`] if a schema does not compile.
    pub fn compile() -> Result<Self, ShopifyError> {
        Ok(Self {
            products: ResponseSchema::compile(&products_response())?,
            product_by_handle: ResponseSchema::compile(&product_by_handle_response())?,
            product_recommendations: ResponseSchema::compile(
                &product_recommendations_response(),
            )?,
        })
    }
}
