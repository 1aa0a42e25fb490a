//! Cart checkout validation.
//!
//! Re-prices submitted cart lines from the catalog and reports every line
//! current stock cannot cover. Nothing is reserved.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use catalog::ProductRepository;
use kernel::id::ProductId;
use rust_decimal::Decimal;

use crate::application::create::{OrderItemInput, parse_item};
use crate::domain::cart::{Cart, CartLine};
use crate::error::{OrderError, OrderResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortfallReason {
    ProductMissing,
    SizeNotStocked,
    InsufficientStock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub product_id: ProductId,
    pub size: String,
    pub requested: u32,
    pub available: u32,
    pub reason: ShortfallReason,
}

#[derive(Debug, Clone)]
pub struct CartQuote {
    /// Lines current stock can cover, at current catalog prices
    pub cart: Cart,
    pub shortfalls: Vec<Shortfall>,
}

impl CartQuote {
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn is_valid(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

pub struct ValidateCartUseCase<P>
where
    P: ProductRepository,
{
    products: Arc<P>,
}

impl<P> ValidateCartUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, items: Vec<OrderItemInput>) -> OrderResult<CartQuote> {
        if items.is_empty() {
            return Err(OrderError::Validation("The cart is empty".into()));
        }

        // Same product and size submitted twice counts once, summed.
        let mut wanted: BTreeMap<(ProductId, String), u32> = BTreeMap::new();
        for item in items {
            let (product_id, size, quantity) = parse_item(item)?;
            let slot = wanted.entry((product_id, size)).or_insert(0);
            *slot = slot.saturating_add(quantity);
        }

        let mut ids: Vec<ProductId> = wanted.keys().map(|(id, _)| *id).collect();
        ids.dedup();
        let catalog: HashMap<ProductId, _> = self
            .products
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| (p.product_id, p))
            .collect();

        let mut cart = Cart::new();
        let mut shortfalls = Vec::new();
        for ((product_id, size), requested) in wanted {
            let Some(product) = catalog.get(&product_id) else {
                shortfalls.push(Shortfall {
                    product_id,
                    size,
                    requested,
                    available: 0,
                    reason: ShortfallReason::ProductMissing,
                });
                continue;
            };

            let Some(available) = product.stock.get(&size) else {
                shortfalls.push(Shortfall {
                    product_id,
                    size,
                    requested,
                    available: 0,
                    reason: ShortfallReason::SizeNotStocked,
                });
                continue;
            };

            let line = CartLine {
                product_id,
                provider_id: product.provider_id,
                name: product.name.clone(),
                size: size.clone(),
                quantity: requested,
                unit_price: product.price,
                available,
            };
            if cart.add(line).is_err() {
                shortfalls.push(Shortfall {
                    product_id,
                    size,
                    requested,
                    available,
                    reason: ShortfallReason::InsufficientStock,
                });
            }
        }

        tracing::debug!(
            lines = cart.lines().len(),
            shortfalls = shortfalls.len(),
            "Cart validated"
        );

        Ok(CartQuote { cart, shortfalls })
    }
}
