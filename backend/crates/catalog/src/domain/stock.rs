//! Stock-by-size and order demand.
//!
//! [`StockBySize`] is keyed by size label; keys are checked against the
//! product's [`Category`] size list whenever the map or the category
//! changes. Decrements are all-or-nothing: every size is checked before any
//! count moves.

use std::collections::BTreeMap;

use kernel::id::ProductId;
use serde::Serialize;
use thiserror::Error;

use crate::domain::category::{Category, canonical_size};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("Stock by size must list at least one size")]
    Empty,

    #[error("Size {size} is not valid for category {category}")]
    UnknownSize { size: String, category: Category },

    #[error("Size {size} is listed more than once")]
    DuplicateSize { size: String },

    #[error("Stock for size {size} must be a non-negative integer")]
    InvalidCount { size: String },

    #[error("Quantity for size {size} must be a positive integer")]
    InvalidQuantity { size: String },

    #[error("Size {size} has no stock entry")]
    NotStocked { size: String },

    #[error("Insufficient stock for size {size}: requested {requested}, available {available}")]
    Insufficient {
        size: String,
        requested: u32,
        available: u32,
    },

    #[error("Requested quantity for size {size} is too large")]
    Overflow { size: String },

    #[error("Product {0} no longer exists")]
    ProductMissing(ProductId),

    /// A per-size failure, tagged with the product it happened on
    #[error("{name}: {cause}")]
    InProduct {
        product_id: ProductId,
        name: String,
        #[source]
        cause: Box<StockError>,
    },
}

impl StockError {
    pub fn in_product(self, product_id: ProductId, name: impl Into<String>) -> Self {
        StockError::InProduct {
            product_id,
            name: name.into(),
            cause: Box::new(self),
        }
    }
}

/// Count per size, ordered by label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StockBySize(BTreeMap<String, u32>);

impl StockBySize {
    /// Validates raw counts against the category size list. Labels are
    /// compared after [`canonical_size`], so `"M"` and `" M"` collide.
    pub fn new(category: Category, raw: BTreeMap<String, i64>) -> Result<Self, StockError> {
        if raw.is_empty() {
            return Err(StockError::Empty);
        }

        let mut counts = BTreeMap::new();
        for (size, count) in raw {
            let size = canonical_size(&size);
            if !category.accepts_size(&size) {
                return Err(StockError::UnknownSize { size, category });
            }
            let count = u32::try_from(count).map_err(|_| StockError::InvalidCount {
                size: size.clone(),
            })?;
            if counts.contains_key(&size) {
                return Err(StockError::DuplicateSize { size });
            }
            counts.insert(size, count);
        }

        Ok(Self(counts))
    }

    /// Rebuild from storage without re-validating.
    pub fn from_db(counts: BTreeMap<String, u32>) -> Self {
        Self(counts)
    }

    /// Checks every key still belongs to `category`.
    pub fn validate_for(&self, category: Category) -> Result<(), StockError> {
        if self.0.is_empty() {
            return Err(StockError::Empty);
        }
        match self.0.keys().find(|size| !category.accepts_size(size)) {
            Some(size) => Err(StockError::UnknownSize {
                size: size.clone(),
                category,
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, size: &str) -> Option<u32> {
        self.0.get(size).copied()
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|&n| u64::from(n)).sum()
    }

    pub fn is_in_stock(&self) -> bool {
        self.0.values().any(|&n| n > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(size, &n)| (size.as_str(), n))
    }

    pub fn as_map(&self) -> &BTreeMap<String, u32> {
        &self.0
    }

    /// Fails on the first size that cannot cover its request.
    pub fn check(&self, demand: &BTreeMap<String, u32>) -> Result<(), StockError> {
        for (size, &requested) in demand {
            let available = self.get(size).ok_or_else(|| StockError::NotStocked {
                size: size.clone(),
            })?;
            if available < requested {
                return Err(StockError::Insufficient {
                    size: size.clone(),
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Subtracts every requested quantity, or nothing at all.
    pub fn decrement(&mut self, demand: &BTreeMap<String, u32>) -> Result<(), StockError> {
        self.check(demand)?;
        for (size, &requested) in demand {
            if let Some(count) = self.0.get_mut(size) {
                *count -= requested;
            }
        }
        Ok(())
    }
}

/// Requested quantity per (product, size), summed over order lines.
///
/// Iterates products in id order, which is also the row-lock order used when
/// completing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDemand(BTreeMap<ProductId, BTreeMap<String, u32>>);

impl StockDemand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        product_id: ProductId,
        size: impl Into<String>,
        quantity: u32,
    ) -> Result<(), StockError> {
        let size = size.into();
        if quantity == 0 {
            return Err(StockError::InvalidQuantity { size });
        }

        let slot = self.0.entry(product_id).or_default().entry(size.clone()).or_insert(0);
        *slot = slot
            .checked_add(quantity)
            .ok_or(StockError::Overflow { size })?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.0.keys().copied().collect()
    }

    pub fn for_product(&self, product_id: &ProductId) -> Option<&BTreeMap<String, u32>> {
        self.0.get(product_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &BTreeMap<String, u32>)> {
        self.0.iter()
    }
}
