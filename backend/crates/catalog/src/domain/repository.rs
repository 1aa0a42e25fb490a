//! Repository Traits

use kernel::id::{ProductId, UserId};

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPatch};
use crate::error::CatalogResult;

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()>;

    async fn find_by_id(&self, product_id: &ProductId) -> CatalogResult<Option<Product>>;

    /// Products whose id is in `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>>;

    /// Newest first, optionally restricted to one category.
    async fn list(&self, category: Option<Category>) -> CatalogResult<Vec<Product>>;

    async fn list_by_provider(&self, provider_id: &UserId) -> CatalogResult<Vec<Product>>;

    /// Applies `patch` to the stored row under the same lock order completion
    /// takes, so a concurrent stock decrement is never overwritten. `None`
    /// when the product no longer exists.
    async fn apply_patch(
        &self,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> CatalogResult<Option<Product>>;

    /// Returns `false` when no row matched.
    async fn delete(&self, product_id: &ProductId) -> CatalogResult<bool>;

    /// Products with a positive total stock.
    async fn count_in_stock(&self) -> CatalogResult<u64>;
}
