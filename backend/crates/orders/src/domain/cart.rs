//! Shopping cart.
//!
//! The cart lives on the client; the server rebuilds one from the submitted
//! lines to quote and check it. Each line carries a price and a stock
//! snapshot taken from the catalog when it was added.

use kernel::id::{ProductId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Only {available} left in size {size} (requested {requested})")]
    ExceedsStock {
        size: String,
        requested: u32,
        available: u32,
    },

    #[error("Product is not in the cart")]
    NotInCart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub provider_id: UserId,
    pub name: String,
    pub size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Stock for this size when the line was priced
    pub available: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn is_same_item(&self, product_id: &ProductId, size: &str) -> bool {
        &self.product_id == product_id && self.size == size
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, merging it into an existing one with the same product
    /// and size. The merged quantity may not exceed the stock snapshot.
    pub fn add(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match self
            .lines
            .iter_mut()
            .find(|l| l.is_same_item(&line.product_id, &line.size))
        {
            Some(existing) => {
                let requested = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(CartError::InvalidQuantity)?;
                check_stock(&line.size, requested, line.available)?;
                existing.quantity = requested;
                existing.unit_price = line.unit_price;
                existing.available = line.available;
            }
            None => {
                check_stock(&line.size, line.quantity, line.available)?;
                self.lines.push(line);
            }
        }
        Ok(())
    }

    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.is_same_item(product_id, size))
            .ok_or(CartError::NotInCart)?;
        check_stock(size, quantity, line.available)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Returns `false` when the line was not in the cart.
    pub fn remove(&mut self, product_id: &ProductId, size: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.is_same_item(product_id, size));
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn check_stock(size: &str, requested: u32, available: u32) -> Result<(), CartError> {
    if requested > available {
        return Err(CartError::ExceedsStock {
            size: size.to_string(),
            requested,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: ProductId, size: &str, quantity: u32, available: u32) -> CartLine {
        CartLine {
            product_id,
            provider_id: UserId::new(),
            name: "Tee".into(),
            size: size.into(),
            quantity,
            unit_price: Decimal::new(1050, 2),
            available,
        }
    }

    #[test]
    fn test_add_merges_same_product_and_size() {
        let product = ProductId::new();
        let mut cart = Cart::new();
        cart.add(line(product, "M", 1, 5)).unwrap();
        cart.add(line(product, "M", 2, 5)).unwrap();
        cart.add(line(product, "L", 1, 5)).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.total(), Decimal::new(4200, 2));
    }

    #[test]
    fn test_add_respects_stock_snapshot() {
        let product = ProductId::new();
        let mut cart = Cart::new();
        cart.add(line(product, "M", 4, 5)).unwrap();
        assert_eq!(
            cart.add(line(product, "M", 2, 5)),
            Err(CartError::ExceedsStock {
                size: "M".into(),
                requested: 6,
                available: 5
            })
        );
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.add(line(product, "S", 0, 5)), Err(CartError::InvalidQuantity));
    }

    #[test]
    fn test_update_remove_clear() {
        let product = ProductId::new();
        let mut cart = Cart::new();
        cart.add(line(product, "M", 1, 3)).unwrap();

        cart.update_quantity(&product, "M", 3).unwrap();
        assert_eq!(cart.lines()[0].quantity, 3);
        assert!(cart.update_quantity(&product, "M", 4).is_err());
        assert_eq!(
            cart.update_quantity(&product, "L", 1),
            Err(CartError::NotInCart)
        );

        assert!(!cart.remove(&product, "L"));
        assert!(cart.remove(&product, "M"));
        assert!(cart.is_empty());

        cart.add(line(product, "M", 1, 3)).unwrap();
        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
