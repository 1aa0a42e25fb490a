//! Create Product Use Case

use std::collections::BTreeMap;
use std::sync::Arc;

use auth::Identity;
use rust_decimal::Decimal;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductDetails};
use crate::domain::repository::ProductRepository;
use crate::domain::stock::StockBySize;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default)]
pub struct CreateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_by_size: Option<BTreeMap<String, i64>>,
}

pub struct CreateProductUseCase<P>
where
    P: ProductRepository,
{
    products: Arc<P>,
}

impl<P> CreateProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// The requester becomes the owning provider.
    pub async fn execute(
        &self,
        requester: &Identity,
        input: CreateProductInput,
    ) -> CatalogResult<Product> {
        let (Some(name), Some(description), Some(price), Some(image_url), Some(category), Some(stock)) = (
            input.name,
            input.description,
            input.price,
            input.image_url,
            input.category,
            input.stock_by_size,
        ) else {
            return Err(CatalogError::Validation("All fields are required".into()));
        };

        let category = parse_category(&category)?;
        let details = ProductDetails::new(name, description, price, image_url)?;
        let stock = StockBySize::new(category, stock)?;
        let product = Product::new(requester.user_id, details, category, stock);

        self.products.create(&product).await?;

        tracing::info!(
            product_id = %product.product_id,
            provider_id = %product.provider_id,
            category = %product.category,
            total_stock = product.total_stock(),
            "Product created"
        );

        Ok(product)
    }
}

pub(crate) fn parse_category(raw: &str) -> CatalogResult<Category> {
    raw.parse::<Category>()
        .map_err(|e| CatalogError::Validation(e.to_string()))
}
