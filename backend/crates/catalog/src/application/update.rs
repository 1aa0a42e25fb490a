//! Update Product Use Case

use std::collections::BTreeMap;
use std::sync::Arc;

use auth::Identity;
use kernel::id::ProductId;
use rust_decimal::Decimal;

use crate::application::create::parse_category;
use crate::domain::product::{Product, ProductPatch};
use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_by_size: Option<BTreeMap<String, i64>>,
}

pub struct UpdateProductUseCase<P>
where
    P: ProductRepository,
{
    products: Arc<P>,
}

impl<P> UpdateProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// 404 when absent, 403 unless the requester owns the product or is an
    /// administrator. The patch is applied to the stored row, not to the
    /// copy read for the ownership check.
    pub async fn execute(
        &self,
        requester: &Identity,
        product_id: ProductId,
        input: UpdateProductInput,
    ) -> CatalogResult<Product> {
        let product = self
            .products
            .find_by_id(&product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if !requester.can_act_for(&product.provider_id) {
            tracing::warn!(
                product_id = %product_id,
                requester = %requester.user_id,
                "Update refused"
            );
            return Err(CatalogError::NotOwner);
        }

        let patch = ProductPatch {
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            category: input.category.as_deref().map(parse_category).transpose()?,
            stock_by_size: input.stock_by_size,
        };
        if patch.is_empty() {
            return Ok(product);
        }

        let product = self
            .products
            .apply_patch(&product_id, patch)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        tracing::info!(
            product_id = %product.product_id,
            updated_by = %requester.user_id,
            total_stock = product.total_stock(),
            "Product updated"
        );

        Ok(product)
    }
}
