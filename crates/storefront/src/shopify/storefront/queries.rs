//! GraphQL query definitions for the Storefront API.
//!
//! Queries implement [`GraphQLQuery`] by hand: the response data is kept as
//! raw JSON so it can be checked against the response schemas in
//! [`super::schema`] before anything is decoded.

use graphql_client::{GraphQLQuery, QueryBody};

/// Fields selected for every product, shared by all product queries.
macro_rules! product_fragment {
    () => {
        r"
fragment ProductFields on Product {
  id
  title
  handle
  images(first: 10) {
    nodes {
      url(transform: { preferredContentType: WEBP })
      width
      height
      altText
    }
  }
  variants(first: 10) {
    nodes {
      id
      title
      availableForSale
      quantityAvailable
      price {
        amount
        currencyCode
      }
    }
  }
  featuredImage {
    url(transform: { preferredContentType: WEBP })
    width
    height
    altText
  }
}
"
    };
}

/// Implements [`GraphQLQuery`] for a query whose variables live in a module
/// of the same name, mirroring the layout `graphql_client` codegen produces.
macro_rules! storefront_query {
    ($query:ident, $module:ident) => {
        impl GraphQLQuery for $query {
            type Variables = $module::Variables;
            type ResponseData = serde_json::Value;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// Product queries
pub struct GetProducts;

pub mod get_products {
    use serde::Serialize;

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = concat!(
        r"
query GetProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        ...ProductFields
      }
    }
  }
}
",
        product_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: u32,
    }
}

storefront_query!(GetProducts, get_products);

pub struct GetProductByHandle;

pub mod get_product_by_handle {
    use serde::Serialize;

    pub const OPERATION_NAME: &str = "GetProductByHandle";
    pub const QUERY: &str = concat!(
        r"
query GetProductByHandle($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
",
        product_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }
}

storefront_query!(GetProductByHandle, get_product_by_handle);

pub struct GetProductRecommendations;

pub mod get_product_recommendations {
    use serde::Serialize;

    pub const OPERATION_NAME: &str = "GetProductRecommendations";
    pub const QUERY: &str = concat!(
        r"
query GetProductRecommendations($productId: ID!) {
  productRecommendations(productId: $productId) {
    ...ProductFields
  }
}
",
        product_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
    }
}

storefront_query!(GetProductRecommendations, get_product_recommendations);
