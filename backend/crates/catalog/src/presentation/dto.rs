//! API DTOs (Data Transfer Objects)
//!
//! `price` and the stock counts arrive as loose JSON values so that a
//! string such as `"19.90"` from a form field is accepted and a bad value
//! still gets the usual `{message}` error body.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{
    CreateProductInput, ProductWithProvider, ProviderSummary, UpdateProductInput,
};
use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::domain::stock::StockBySize;
use crate::error::{CatalogError, CatalogResult};

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// `stock` and `size` sent by older clients are ignored; both are derived
/// from `stockBySize`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    #[serde(alias = "imageUrl")]
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock_by_size: Option<BTreeMap<String, Value>>,
}

impl TryFrom<ProductRequest> for CreateProductInput {
    type Error = CatalogError;

    fn try_from(req: ProductRequest) -> CatalogResult<Self> {
        Ok(Self {
            name: req.name,
            description: req.description,
            price: req.price.as_ref().map(parse_price).transpose()?,
            image_url: req.image,
            category: req.category,
            stock_by_size: req.stock_by_size.map(parse_stock).transpose()?,
        })
    }
}

impl TryFrom<ProductRequest> for UpdateProductInput {
    type Error = CatalogError;

    fn try_from(req: ProductRequest) -> CatalogResult<Self> {
        Ok(Self {
            name: req.name,
            description: req.description,
            price: req.price.as_ref().map(parse_price).transpose()?,
            image_url: req.image,
            category: req.category,
            stock_by_size: req.stock_by_size.map(parse_stock).transpose()?,
        })
    }
}

fn parse_price(value: &Value) -> CatalogResult<Decimal> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string())),
        Value::String(s) => Decimal::from_str(s.trim()),
        _ => return Err(CatalogError::Validation("Price must be a number".into())),
    };
    Ok(parsed?)
}

fn parse_stock(raw: BTreeMap<String, Value>) -> CatalogResult<BTreeMap<String, i64>> {
    raw.into_iter()
        .map(|(size, value)| {
            let count = match &value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            count.map(|c| (size.clone(), c)).ok_or_else(|| {
                CatalogError::Validation(format!(
                    "Stock for size {size} must be a non-negative integer"
                ))
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductListQuery {
    pub category: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub provider_id: UserId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    /// Stocked sizes, in the category's display order
    pub sizes: Vec<&'static str>,
    pub stock_by_size: StockBySize,
    /// Sum of `stockBySize`
    pub stock: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.product_id,
            provider_id: product.provider_id,
            sizes: product.sizes(),
            stock: product.total_stock(),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image_url,
            category: product.category,
            stock_by_size: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<ProviderSummary> for ProviderResponse {
    fn from(p: ProviderSummary) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
        }
    }
}

/// Administrator listing row: the product plus its provider's contact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub provider: Option<ProviderResponse>,
}

impl From<ProductWithProvider> for AdminProductResponse {
    fn from(row: ProductWithProvider) -> Self {
        Self {
            product: row.product.into(),
            provider: row.provider.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductCreatedResponse {
    pub message: String,
    pub product: ProductResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_accepts_numbers_and_strings() {
        assert_eq!(parse_price(&json!(19.9)).unwrap(), Decimal::from_str("19.9").unwrap());
        assert_eq!(parse_price(&json!("25.50")).unwrap(), Decimal::from_str("25.50").unwrap());
        assert_eq!(parse_price(&json!(30)).unwrap(), Decimal::from(30));
        assert!(parse_price(&json!("abc")).is_err());
        assert!(parse_price(&json!(true)).is_err());
    }

    #[test]
    fn test_stock_counts() {
        let raw = BTreeMap::from([
            ("M".to_string(), json!(3)),
            ("L".to_string(), json!("2")),
        ]);
        let parsed = parse_stock(raw).unwrap();
        assert_eq!(parsed.get("M"), Some(&3));
        assert_eq!(parsed.get("L"), Some(&2));

        let bad = BTreeMap::from([("M".to_string(), json!(1.5))]);
        assert!(parse_stock(bad).is_err());
    }

    #[test]
    fn test_request_accepts_image_alias() {
        let req: ProductRequest =
            serde_json::from_value(json!({"imageUrl": "http://img", "stock": 4})).unwrap();
        assert_eq!(req.image.as_deref(), Some("http://img"));
    }
}
