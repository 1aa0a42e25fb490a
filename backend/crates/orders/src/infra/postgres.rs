//! PostgreSQL Repository Implementations
//!
//! Orders live in `orders`, their lines in `order_lines`. Product ids on
//! lines carry no foreign key so that deleting a product keeps history.

use std::collections::HashMap;

use catalog::{PgProductRepository, StockDemand, apply_demand};
use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::{Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

const ORDER_COLUMNS: &str = r#"
    o.order_id,
    o.user_id,
    o.total_amount,
    o.order_status,
    o.created_at,
    o.estimated_delivery
"#;

/// PostgreSQL-backed order repository
///
/// Completion also writes `products`, which must live in the same database.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Attach lines to a batch of order rows, preserving row order.
    async fn hydrate(&self, rows: Vec<OrderRow>) -> OrderResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.order_id).collect();
        let line_rows = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT order_id, product_id, provider_id, size, quantity
            FROM order_lines
            WHERE order_id = ANY($1)
            ORDER BY order_id, line_no
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lines: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            let order_id = row.order_id;
            lines.entry(order_id).or_default().push(row.into_line()?);
        }

        rows.into_iter()
            .map(|row| {
                let order_lines = lines.remove(&row.order_id).unwrap_or_default();
                row.into_order(order_lines)
            })
            .collect()
    }

    async fn current_status(&self, order_id: &OrderId) -> OrderResult<Option<OrderStatus>> {
        let status = sqlx::query_scalar::<_, i16>("SELECT order_status FROM orders WHERE order_id = $1")
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        status.map(status_from_id).transpose()
    }
}

impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> OrderResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id,
                user_id,
                total_amount,
                order_status,
                created_at,
                estimated_delivery
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total_amount)
        .bind(order.status.id())
        .bind(order.created_at)
        .bind(order.estimated_delivery)
        .execute(&mut *tx)
        .await?;

        for (line_no, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    order_id,
                    line_no,
                    product_id,
                    provider_id,
                    size,
                    quantity
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order.order_id.as_uuid())
            .bind(i32::try_from(line_no).map_err(|_| OrderError::Internal("Too many lines".into()))?)
            .bind(line.product_id.as_uuid())
            .bind(line.provider_id.as_uuid())
            .bind(&line.size)
            .bind(i32::try_from(line.quantity).map_err(|_| {
                OrderError::Validation(format!("Quantity too large for size {}", line.size))
            })?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, order_id: &OrderId) -> OrderResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.order_id = $1"
        ))
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: &UserId) -> OrderResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.user_id = $1 ORDER BY o.created_at DESC, o.order_id"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn list_by_provider(&self, provider_id: &UserId) -> OrderResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders o
            WHERE EXISTS (
                SELECT 1 FROM order_lines l
                WHERE l.order_id = o.order_id AND l.provider_id = $1
            )
            ORDER BY o.created_at DESC, o.order_id
            "#
        ))
        .bind(provider_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn list_all(&self) -> OrderResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o ORDER BY o.created_at DESC, o.order_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn count_completed(&self, provider_id: Option<&UserId>) -> OrderResult<u64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders o
            WHERE o.order_status = $1
              AND (
                $2::UUID IS NULL OR EXISTS (
                    SELECT 1 FROM order_lines l
                    WHERE l.order_id = o.order_id AND l.provider_id = $2
                )
              )
            "#,
        )
        .bind(OrderStatus::Completed.id())
        .bind(provider_id.map(|id| id.into_uuid()))
        .fetch_one(&self.pool)
        .await?;

        Ok(total.max(0) as u64)
    }

    async fn update_status(&self, order_id: &OrderId, status: OrderStatus) -> OrderResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE orders SET order_status = $2
            WHERE order_id = $1 AND order_status NOT IN ($3, $4)
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(status.id())
        .bind(OrderStatus::Completed.id())
        .bind(OrderStatus::Cancelled.id())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return match self.current_status(order_id).await? {
                Some(current) => Err(OrderError::AlreadyFinal(current)),
                None => Err(OrderError::OrderNotFound),
            };
        }
        Ok(())
    }

    async fn complete(&self, order_id: &OrderId, demand: &StockDemand) -> OrderResult<()> {
        let mut tx = self.pool.begin().await?;

        // The order row lock serializes two completions of the same order.
        let status = sqlx::query_scalar::<_, i16>(
            "SELECT order_status FROM orders WHERE order_id = $1 FOR UPDATE",
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::OrderNotFound)?;

        let status = status_from_id(status)?;
        if status.is_final() {
            return Err(OrderError::AlreadyFinal(status));
        }

        let mut products =
            PgProductRepository::lock_for_update(&mut *tx, &demand.product_ids()).await?;
        let touched = apply_demand(&mut products, demand)?;

        for product_id in &touched {
            if let Some(product) = products.get(product_id) {
                PgProductRepository::write_stock(&mut *tx, product).await?;
            }
        }

        sqlx::query("UPDATE orders SET order_status = $2 WHERE order_id = $1")
            .bind(order_id.as_uuid())
            .bind(OrderStatus::Completed.id())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(order_id = %order_id, products = touched.len(), "Stock decremented");
        Ok(())
    }
}

fn status_from_id(id: i16) -> OrderResult<OrderStatus> {
    OrderStatus::from_id(id).ok_or_else(|| OrderError::Internal(format!("Invalid order_status: {id}")))
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    user_id: Uuid,
    total_amount: Decimal,
    order_status: i16,
    created_at: DateTime<Utc>,
    estimated_delivery: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> OrderResult<Order> {
        Ok(Order {
            order_id: OrderId::from_uuid(self.order_id),
            user_id: UserId::from_uuid(self.user_id),
            lines,
            total_amount: self.total_amount,
            status: status_from_id(self.order_status)?,
            created_at: self.created_at,
            estimated_delivery: self.estimated_delivery,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LineRow {
    order_id: Uuid,
    product_id: Uuid,
    provider_id: Uuid,
    size: String,
    quantity: i32,
}

impl LineRow {
    fn into_line(self) -> OrderResult<OrderLine> {
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| OrderError::Internal(format!("Invalid quantity: {}", self.quantity)))?;

        Ok(OrderLine {
            product_id: ProductId::from_uuid(self.product_id),
            provider_id: UserId::from_uuid(self.provider_id),
            size: self.size,
            quantity,
        })
    }
}
