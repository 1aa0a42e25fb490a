//! Product Entity

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;

use crate::domain::category::Category;
use crate::domain::stock::{StockBySize, StockError};
use crate::error::{CatalogError, CatalogResult};

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5_000;
const MAX_IMAGE_URL_LEN: usize = 2_048;

/// Largest value a `NUMERIC(12, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Descriptive fields checked together on creation.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

impl ProductDetails {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> CatalogResult<Self> {
        Ok(Self {
            name: text_field("Name", name.into(), MAX_NAME_LEN)?,
            description: text_field("Description", description.into(), MAX_DESCRIPTION_LEN)?,
            price: positive_price(price)?,
            image_url: text_field("Image URL", image_url.into(), MAX_IMAGE_URL_LEN)?,
        })
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<Category>,
    pub stock_by_size: Option<BTreeMap<String, i64>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.category.is_none()
            && self.stock_by_size.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: ProductId,
    pub provider_id: UserId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: Category,
    pub stock: StockBySize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        provider_id: UserId,
        details: ProductDetails,
        category: Category,
        stock: StockBySize,
    ) -> Self {
        let now = Utc::now();
        Self {
            product_id: ProductId::new(),
            provider_id,
            name: details.name,
            description: details.description,
            price: details.price,
            image_url: details.image_url,
            category,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of the per-size counts.
    pub fn total_stock(&self) -> u64 {
        self.stock.total()
    }

    /// Stocked sizes in the category's display order.
    pub fn sizes(&self) -> Vec<&'static str> {
        self.category
            .sizes()
            .iter()
            .copied()
            .filter(|size| self.stock.get(size).is_some())
            .collect()
    }

    /// Applies every field of `patch` or none of them. A category change
    /// re-checks the stock map (the new one if given, else the current one).
    pub fn apply(&mut self, patch: ProductPatch) -> CatalogResult<()> {
        let category = patch.category.unwrap_or(self.category);
        let stock = match patch.stock_by_size {
            Some(raw) => StockBySize::new(category, raw)?,
            None => {
                self.stock.validate_for(category)?;
                self.stock.clone()
            }
        };

        let name = patch
            .name
            .map(|n| text_field("Name", n, MAX_NAME_LEN))
            .transpose()?;
        let description = patch
            .description
            .map(|d| text_field("Description", d, MAX_DESCRIPTION_LEN))
            .transpose()?;
        let price = patch.price.map(positive_price).transpose()?;
        let image_url = patch
            .image_url
            .map(|u| text_field("Image URL", u, MAX_IMAGE_URL_LEN))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
        self.category = category;
        self.stock = stock;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// All-or-nothing decrement of this product's stock.
    pub fn decrement_stock(&mut self, demand: &BTreeMap<String, u32>) -> Result<(), StockError> {
        self.stock
            .decrement(demand)
            .map_err(|e| e.in_product(self.product_id, self.name.clone()))?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn text_field(label: &str, value: String, max_len: usize) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{label} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CatalogError::Validation(format!(
            "{label} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Prices are kept to cents, matching the `NUMERIC(12, 2)` column.
fn positive_price(price: Decimal) -> CatalogResult<Decimal> {
    let price = price.round_dp(2);
    if price <= Decimal::ZERO {
        return Err(CatalogError::Validation(
            "Price must be greater than zero".into(),
        ));
    }
    if price > MAX_AMOUNT {
        return Err(CatalogError::Validation(format!(
            "Price must be at most {MAX_AMOUNT}"
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn shirt() -> Product {
        let details =
            ProductDetails::new("Tee", "Cotton tee", Decimal::from_str("19.90").unwrap(), "http://img")
                .unwrap();
        let stock = StockBySize::new(
            Category::Shirts,
            BTreeMap::from([("M".to_string(), 5), ("XS".to_string(), 1)]),
        )
        .unwrap();
        Product::new(UserId::new(), details, Category::Shirts, stock)
    }

    #[test]
    fn test_details_require_every_field() {
        let price = Decimal::from(10);
        assert!(ProductDetails::new(" ", "d", price, "u").is_err());
        assert!(ProductDetails::new("n", "", price, "u").is_err());
        assert!(ProductDetails::new("n", "d", price, "").is_err());
        assert!(ProductDetails::new("n", "d", Decimal::ZERO, "u").is_err());
        assert!(ProductDetails::new("n", "d", Decimal::from(-1), "u").is_err());
        assert!(ProductDetails::new("n", "d", price, "u").is_ok());
    }

    #[test]
    fn test_price_fits_storage_column() {
        assert_eq!(MAX_AMOUNT, Decimal::from_str("9999999999.99").unwrap());
        assert!(ProductDetails::new("n", "d", MAX_AMOUNT, "u").is_ok());
        assert!(matches!(
            ProductDetails::new("n", "d", Decimal::from(10_000_000_000_i64), "u"),
            Err(CatalogError::Validation(_))
        ));

        let mut product = shirt();
        assert!(product
            .apply(ProductPatch {
                price: Some(Decimal::from_str("99999999999").unwrap()),
                ..Default::default()
            })
            .is_err());
        assert_eq!(product.price, Decimal::from_str("19.90").unwrap());
    }

    #[test]
    fn test_sizes_follow_category_order() {
        let product = shirt();
        assert_eq!(product.sizes(), vec!["XS", "M"]);
        assert_eq!(product.total_stock(), 6);
    }

    #[test]
    fn test_category_change_revalidates_current_stock() {
        let mut product = shirt();
        let err = product
            .apply(ProductPatch {
                category: Some(Category::Jeans),
                name: Some("Renamed".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::Stock(StockError::UnknownSize { .. })));
        assert_eq!(product.name, "Tee");
        assert_eq!(product.category, Category::Shirts);

        product
            .apply(ProductPatch {
                category: Some(Category::Hoodies),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.category, Category::Hoodies);
    }

    #[test]
    fn test_category_change_with_new_stock() {
        let mut product = shirt();
        product
            .apply(ProductPatch {
                category: Some(Category::Jeans),
                stock_by_size: Some(BTreeMap::from([("32".to_string(), 4)])),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.category, Category::Jeans);
        assert_eq!(product.total_stock(), 4);
        assert_eq!(product.sizes(), vec!["32"]);
    }

    #[test]
    fn test_patch_rejects_bad_price_without_side_effects() {
        let mut product = shirt();
        let err = product
            .apply(ProductPatch {
                name: Some("New".into()),
                price: Some(Decimal::ZERO),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(product.name, "Tee");
    }

    #[test]
    fn test_decrement_tags_product() {
        let mut product = shirt();
        let err = product
            .decrement_stock(&BTreeMap::from([("M".to_string(), 9)]))
            .unwrap_err();
        match err {
            StockError::InProduct { product_id, .. } => assert_eq!(product_id, product.product_id),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(product.stock.get("M"), Some(5));
    }
}
