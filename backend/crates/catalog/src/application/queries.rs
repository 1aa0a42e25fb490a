//! Catalog read paths.

use std::collections::HashMap;
use std::sync::Arc;

use auth::{Identity, UserRepository};
use kernel::id::{ProductId, UserId};

use crate::application::create::parse_category;
use crate::domain::product::Product;
use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};

/// Owner details shown in the administrator listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct ProductWithProvider {
    pub product: Product,
    /// `None` once the provider account has been deleted
    pub provider: Option<ProviderSummary>,
}

pub struct ProductQueries<P, U>
where
    P: ProductRepository,
    U: UserRepository,
{
    products: Arc<P>,
    users: Arc<U>,
}

impl<P, U> ProductQueries<P, U>
where
    P: ProductRepository,
    U: UserRepository,
{
    pub fn new(products: Arc<P>, users: Arc<U>) -> Self {
        Self { products, users }
    }

    /// Public listing; a blank filter lists everything.
    pub async fn list(&self, category: Option<&str>) -> CatalogResult<Vec<Product>> {
        let category = match category.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_category(raw)?),
        };
        self.products.list(category).await
    }

    pub async fn get(&self, product_id: &ProductId) -> CatalogResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    pub async fn list_own(&self, requester: &Identity) -> CatalogResult<Vec<Product>> {
        self.products.list_by_provider(&requester.user_id).await
    }

    /// Every product, joined with its provider's name and email.
    pub async fn list_all(&self) -> CatalogResult<Vec<ProductWithProvider>> {
        let products = self.products.list(None).await?;

        let mut provider_ids: Vec<UserId> = products.iter().map(|p| p.provider_id).collect();
        provider_ids.sort();
        provider_ids.dedup();

        let providers: HashMap<UserId, ProviderSummary> = self
            .users
            .find_many(&provider_ids)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.user_id,
                    ProviderSummary {
                        id: u.user_id,
                        name: u.name.as_str().to_string(),
                        email: u.email.as_str().to_string(),
                    },
                )
            })
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let provider = providers.get(&product.provider_id).cloned();
                ProductWithProvider { product, provider }
            })
            .collect())
    }
}
