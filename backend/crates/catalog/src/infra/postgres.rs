//! PostgreSQL Repository Implementations
//!
//! `stock_by_size` is a JSONB object; `total_stock` is rewritten from it on
//! every write so the two never disagree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPatch};
use crate::domain::repository::ProductRepository;
use crate::domain::stock::StockBySize;
use crate::error::{CatalogError, CatalogResult};

const PRODUCT_COLUMNS: &str = r#"
    product_id,
    provider_id,
    name,
    description,
    price,
    image_url,
    category,
    stock_by_size,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `SELECT ... FOR UPDATE` on the given products, in id order. The locks
    /// are held until the surrounding transaction ends; missing ids are
    /// absent from the result.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, Product>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ANY($1) ORDER BY product_id FOR UPDATE"
        ))
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter()
            .map(|row| row.into_product().map(|p| (p.product_id, p)))
            .collect()
    }

    /// Writes the stock map (and derived total) of an already locked row.
    pub async fn write_stock(conn: &mut PgConnection, product: &Product) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE products SET
                stock_by_size = $2,
                total_stock = $3,
                updated_at = $4
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(Json(product.stock.as_map()))
        .bind(total_stock_column(product)?)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id,
                provider_id,
                name,
                description,
                price,
                image_url,
                category,
                stock_by_size,
                total_stock,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.provider_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.category.id())
        .bind(Json(product.stock.as_map()))
        .bind(total_stock_column(product)?)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn find_many(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn list(&self, category: Option<Category>) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE ($1::SMALLINT IS NULL OR category = $1)
            ORDER BY created_at DESC, product_id
            "#
        ))
        .bind(category.map(|c| c.id()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn list_by_provider(&self, provider_id: &UserId) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE provider_id = $1 ORDER BY created_at DESC, product_id"
        ))
        .bind(provider_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn apply_patch(
        &self,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> CatalogResult<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        let mut locked = Self::lock_for_update(&mut *tx, &[*product_id]).await?;
        let Some(mut product) = locked.remove(product_id) else {
            return Ok(None);
        };
        product.apply(patch)?;

        sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                description = $3,
                price = $4,
                image_url = $5,
                category = $6,
                stock_by_size = $7,
                total_stock = $8,
                updated_at = $9
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.category.id())
        .bind(Json(product.stock.as_map()))
        .bind(total_stock_column(&product)?)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(product))
    }

    async fn delete(&self, product_id: &ProductId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn count_in_stock(&self) -> CatalogResult<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE total_stock > 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }
}

fn total_stock_column(product: &Product) -> CatalogResult<i64> {
    i64::try_from(product.total_stock())
        .map_err(|_| CatalogError::Internal("total_stock out of range".into()))
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    provider_id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    image_url: String,
    category: i16,
    stock_by_size: Json<BTreeMap<String, i64>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> CatalogResult<Product> {
        let category = Category::from_id(self.category)
            .ok_or_else(|| CatalogError::Internal(format!("Invalid category: {}", self.category)))?;

        let counts = self
            .stock_by_size
            .0
            .into_iter()
            .map(|(size, count)| {
                u32::try_from(count)
                    .map(|count| (size, count))
                    .map_err(|_| CatalogError::Internal(format!("Invalid stock count: {count}")))
            })
            .collect::<CatalogResult<BTreeMap<_, _>>>()?;

        Ok(Product {
            product_id: ProductId::from_uuid(self.product_id),
            provider_id: UserId::from_uuid(self.provider_id),
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            category,
            stock: StockBySize::from_db(counts),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
