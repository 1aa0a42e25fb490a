//! Applying an order's stock demand to a set of products.

use std::collections::BTreeMap;

use kernel::id::ProductId;

use crate::domain::product::Product;
use crate::domain::stock::{StockDemand, StockError};

/// Checks every (product, size) of `demand` against `products`, then
/// decrements them. Returns the ids that changed. On error nothing in
/// `products` has been modified.
pub fn apply_demand(
    products: &mut BTreeMap<ProductId, Product>,
    demand: &StockDemand,
) -> Result<Vec<ProductId>, StockError> {
    for (product_id, sizes) in demand.iter() {
        let product = products
            .get(product_id)
            .ok_or(StockError::ProductMissing(*product_id))?;
        product
            .stock
            .check(sizes)
            .map_err(|e| e.in_product(product.product_id, product.name.clone()))?;
    }

    let mut touched = Vec::new();
    for (product_id, sizes) in demand.iter() {
        if let Some(product) = products.get_mut(product_id) {
            product.decrement_stock(sizes)?;
            touched.push(*product_id);
        }
    }
    Ok(touched)
}
