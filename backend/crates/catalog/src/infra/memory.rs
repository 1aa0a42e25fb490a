//! In-memory product repository
//!
//! Used when no database is configured and by the test suites.

use std::collections::BTreeMap;
use std::sync::Arc;

use kernel::id::{ProductId, UserId};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPatch};
use crate::domain::repository::ProductRepository;
use crate::error::CatalogResult;

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to every product, for multi-product stock updates.
    /// Holding the guard blocks all other catalog reads and writes.
    pub async fn lock(&self) -> RwLockWriteGuard<'_, BTreeMap<ProductId, Product>> {
        self.products.write().await
    }
}

fn newest_first(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    products
}

impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()> {
        self.products
            .write()
            .await
            .insert(product.product_id, product.clone());
        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.products.read().await.get(product_id).cloned())
    }

    async fn find_many(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list(&self, category: Option<Category>) -> CatalogResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .await
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        Ok(newest_first(products))
    }

    async fn list_by_provider(&self, provider_id: &UserId) -> CatalogResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .await
            .values()
            .filter(|p| &p.provider_id == provider_id)
            .cloned()
            .collect();
        Ok(newest_first(products))
    }

    async fn apply_patch(
        &self,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> CatalogResult<Option<Product>> {
        let mut products = self.lock().await;
        let Some(stored) = products.get_mut(product_id) else {
            return Ok(None);
        };
        stored.apply(patch)?;
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, product_id: &ProductId) -> CatalogResult<bool> {
        Ok(self.products.write().await.remove(product_id).is_some())
    }

    async fn count_in_stock(&self) -> CatalogResult<u64> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.stock.is_in_stock())
            .count() as u64)
    }
}
