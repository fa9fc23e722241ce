//! Product listings from the Shopify Storefront GraphQL API.

use crate::domain::{
    DomainError, DomainResult, Money, PriceRange, Product, ProductImage, ProductVariant, SelectedOption,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Largest page the Storefront API serves in one request.
pub const MAX_PAGE_SIZE: usize = 250;

const PRODUCTS_QUERY: &str = r#"
query GetProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        description
        handle
        priceRange {
          minVariantPrice { amount currencyCode }
          maxVariantPrice { amount currencyCode }
        }
        images(first: 5) {
          edges { node { url altText } }
        }
        variants(first: 10) {
          edges {
            node {
              id
              title
              price { amount currencyCode }
              availableForSale
              selectedOptions { name value }
            }
          }
        }
      }
    }
  }
}
"#;

/// Source of product listings.
pub trait CatalogClient: Send + Sync {
    fn fetch_products(&self, limit: usize) -> DomainResult<Vec<Product>>;
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub store_domain: String,
    pub access_token: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl StorefrontConfig {
    pub fn endpoint(&self) -> String {
        let domain = self
            .store_domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("https://{}/api/{}/graphql.json", domain, self.api_version)
    }
}

pub struct StorefrontClient {
    config: StorefrontConfig,
    http: reqwest::blocking::Client,
}

impl StorefrontClient {
    pub fn new(config: StorefrontConfig) -> DomainResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(upstream)?;
        Ok(Self { config, http })
    }
}

impl CatalogClient for StorefrontClient {
    fn fetch_products(&self, limit: usize) -> DomainResult<Vec<Product>> {
        let first = limit.clamp(1, MAX_PAGE_SIZE);
        let endpoint = self.config.endpoint();
        debug!(%endpoint, first, "fetching products");

        let body = json!({
            "query": PRODUCTS_QUERY,
            "variables": { "first": first },
        });
        let response = self
            .http
            .post(&endpoint)
            .header("X-Shopify-Storefront-Access-Token", &self.config.access_token)
            .json(&body)
            .send()
            .map_err(upstream)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::UpstreamUnavailable(format!(
                "storefront responded with HTTP {}",
                status
            )));
        }

        let text = response.text().map_err(upstream)?;
        let products = parse_products_response(&text)?;
        info!(count = products.len(), "products fetched");
        Ok(products)
    }
}

fn upstream(error: reqwest::Error) -> DomainError {
    DomainError::UpstreamUnavailable(error.to_string())
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ProductsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyNode {
    amount: String,
    currency_code: String,
}

impl MoneyNode {
    fn into_money(self) -> DomainResult<Money> {
        Money::parse(&self.amount, &self.currency_code)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRangeNode {
    min_variant_price: MoneyNode,
    max_variant_price: MoneyNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageNode {
    url: String,
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    title: String,
    price: MoneyNode,
    available_for_sale: bool,
    #[serde(default)]
    selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    handle: String,
    price_range: PriceRangeNode,
    images: Connection<ImageNode>,
    variants: Connection<VariantNode>,
}

impl ProductNode {
    fn into_product(self) -> DomainResult<Product> {
        let variants = self
            .variants
            .edges
            .into_iter()
            .map(|edge| {
                let variant = edge.node;
                Ok(ProductVariant {
                    id: variant.id,
                    title: variant.title,
                    price: variant.price.into_money()?,
                    available_for_sale: variant.available_for_sale,
                    selected_options: variant.selected_options,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Product {
            id: self.id,
            title: self.title,
            description: self.description,
            handle: self.handle,
            images: self
                .images
                .edges
                .into_iter()
                .map(|edge| ProductImage {
                    url: edge.node.url,
                    alt_text: edge.node.alt_text,
                })
                .collect(),
            variants,
            price_range: PriceRange {
                min: self.price_range.min_variant_price.into_money()?,
                max: self.price_range.max_variant_price.into_money()?,
            },
        })
    }
}

/// Turns a `GetProducts` response body into products. Either every
/// product converts or the whole response is rejected.
pub fn parse_products_response(body: &str) -> DomainResult<Vec<Product>> {
    let response: GraphQlResponse = serde_json::from_str(body).map_err(|e| {
        DomainError::UpstreamUnavailable(format!("unexpected storefront response - {}", e))
    })?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DomainError::UpstreamUnavailable(messages.join("; ")));
    }

    let data = response.data.ok_or_else(|| {
        DomainError::UpstreamUnavailable("storefront response carried no data".to_string())
    })?;

    data.products
        .edges
        .into_iter()
        .map(|edge| edge.node.into_product())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
      "data": {
        "products": {
          "edges": [
            {
              "node": {
                "id": "gid://shopify/Product/1",
                "title": "Hydrating Cream",
                "description": "Rich cream with hyaluronic acid",
                "handle": "hydrating-cream",
                "priceRange": {
                  "minVariantPrice": { "amount": "24.0", "currencyCode": "USD" },
                  "maxVariantPrice": { "amount": "30.0", "currencyCode": "USD" }
                },
                "images": {
                  "edges": [
                    { "node": { "url": "https://cdn.example.com/cream.jpg", "altText": null } }
                  ]
                },
                "variants": {
                  "edges": [
                    {
                      "node": {
                        "id": "gid://shopify/ProductVariant/11",
                        "title": "50ml",
                        "price": { "amount": "24.0", "currencyCode": "USD" },
                        "availableForSale": true,
                        "selectedOptions": [ { "name": "Size", "value": "50ml" } ]
                      }
                    }
                  ]
                }
              }
            },
            {
              "node": {
                "id": "gid://shopify/Product/2",
                "title": "Clay Mask",
                "description": "",
                "handle": "clay-mask",
                "priceRange": {
                  "minVariantPrice": { "amount": "18.5", "currencyCode": "USD" },
                  "maxVariantPrice": { "amount": "18.5", "currencyCode": "USD" }
                },
                "images": { "edges": [] },
                "variants": {
                  "edges": [
                    {
                      "node": {
                        "id": "gid://shopify/ProductVariant/21",
                        "title": "Default Title",
                        "price": { "amount": "18.5", "currencyCode": "USD" },
                        "availableForSale": false
                      }
                    }
                  ]
                }
              }
            }
          ]
        }
      }
    }"#;

    #[test]
    fn test_parse_products() {
        let products = parse_products_response(SAMPLE).unwrap();
        assert_eq!(products.len(), 2);

        let cream = &products[0];
        assert_eq!(cream.title, "Hydrating Cream");
        assert_eq!(cream.first_image().unwrap().url, "https://cdn.example.com/cream.jpg");
        assert_eq!(cream.image_alt(), "Hydrating Cream");
        let variant = cream.first_variant().unwrap();
        assert_eq!(variant.id, "gid://shopify/ProductVariant/11");
        assert_eq!(variant.price, Money::new("USD", dec!(24.0)));
        assert_eq!(variant.selected_options[0].value, "50ml");
        assert_eq!(cream.price_range.max.amount, dec!(30));
        assert!(cream.is_available());

        let mask = &products[1];
        assert!(mask.first_image().is_none());
        assert!(!mask.is_available());
        assert!(mask.first_variant().unwrap().selected_options.is_empty());
    }

    #[test]
    fn test_graphql_errors_are_upstream_failures() {
        let body = r#"{ "errors": [ { "message": "Throttled" }, { "message": "Try later" } ] }"#;
        assert_eq!(
            parse_products_response(body),
            Err(DomainError::UpstreamUnavailable("Throttled; Try later".to_string()))
        );
    }

    #[test]
    fn test_garbage_body_is_upstream_failure() {
        assert!(matches!(
            parse_products_response("<html>502</html>"),
            Err(DomainError::UpstreamUnavailable(_))
        ));
        assert!(matches!(
            parse_products_response("{}"),
            Err(DomainError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn test_malformed_price_rejects_whole_response() {
        let body = SAMPLE.replacen("\"18.5\"", "\"eighteen\"", 1);
        assert!(matches!(
            parse_products_response(&body),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_endpoint_normalizes_domain() {
        let config = StorefrontConfig {
            store_domain: "https://glow-shop.myshopify.com/".to_string(),
            access_token: "token".to_string(),
            api_version: "2025-07".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            config.endpoint(),
            "https://glow-shop.myshopify.com/api/2025-07/graphql.json"
        );
    }
}
