//! HTTP Handlers

use std::str::FromStr;
use std::sync::Arc;

use auth::presentation::dto::MessageResponse;
use auth::{Identity, UserRepository};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::ProductId;

use crate::application::{
    CreateProductUseCase, DeleteProductUseCase, ProductQueries, UpdateProductUseCase,
};
use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{
    AdminProductResponse, ProductCreatedResponse, ProductListQuery, ProductRequest,
    ProductResponse,
};

/// Shared state for catalog handlers
pub struct CatalogAppState<P, U>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub products: Arc<P>,
    pub users: Arc<U>,
}

impl<P, U> Clone for CatalogAppState<P, U>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            users: self.users.clone(),
        }
    }
}

impl<P, U> CatalogAppState<P, U>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    fn queries(&self) -> ProductQueries<P, U> {
        ProductQueries::new(self.products.clone(), self.users.clone())
    }
}

/// Unparsable ids cannot name a product.
fn parse_product_id(raw: &str) -> CatalogResult<ProductId> {
    ProductId::from_str(raw).map_err(|_| CatalogError::ProductNotFound)
}

/// GET /products?category=
pub async fn list_products<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    Query(query): Query<ProductListQuery>,
) -> CatalogResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let products = state.queries().list(query.category.as_deref()).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{id}
pub async fn get_product<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ProductResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let product = state.queries().get(&parse_product_id(&id)?).await?;
    Ok(Json(product.into()))
}

/// POST /products (provider or administrator)
pub async fn create_product<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    identity: Identity,
    Json(req): Json<ProductRequest>,
) -> CatalogResult<(StatusCode, Json<ProductCreatedResponse>)>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let product = CreateProductUseCase::new(state.products.clone())
        .execute(&identity, req.try_into()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product created successfully".to_string(),
            product: product.into(),
        }),
    ))
}

/// GET /products/provider (provider or administrator)
pub async fn list_own_products<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    identity: Identity,
) -> CatalogResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let products = state.queries().list_own(&identity).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/all (administrator)
pub async fn list_all_products<P, U>(
    State(state): State<CatalogAppState<P, U>>,
) -> CatalogResult<Json<Vec<AdminProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let rows = state.queries().list_all().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// PUT /products/{id} (owner or administrator)
pub async fn update_product<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> CatalogResult<Json<ProductResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = UpdateProductUseCase::new(state.products.clone())
        .execute(&identity, product_id, req.try_into()?)
        .await?;

    Ok(Json(product.into()))
}

/// DELETE /products/{id} (owner or administrator)
pub async fn delete_product<P, U>(
    State(state): State<CatalogAppState<P, U>>,
    identity: Identity,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    DeleteProductUseCase::new(state.products.clone())
        .execute(&identity, parse_product_id(&id)?)
        .await?;

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
