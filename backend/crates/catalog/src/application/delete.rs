//! Delete Product Use Case

use std::sync::Arc;

use auth::Identity;
use kernel::id::ProductId;

use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct DeleteProductUseCase<P>
where
    P: ProductRepository,
{
    products: Arc<P>,
}

impl<P> DeleteProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// Historical orders keep their lines; only the catalog entry goes.
    pub async fn execute(&self, requester: &Identity, product_id: ProductId) -> CatalogResult<()> {
        let product = self
            .products
            .find_by_id(&product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if !requester.can_act_for(&product.provider_id) {
            tracing::warn!(
                product_id = %product_id,
                requester = %requester.user_id,
                "Delete refused"
            );
            return Err(CatalogError::NotOwner);
        }

        if !self.products.delete(&product_id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        tracing::info!(product_id = %product_id, deleted_by = %requester.user_id, "Product deleted");
        Ok(())
    }
}
