//! Shopping cart for material orders

use shared::models::{OrderItemInput, Product};
use shared::money;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

impl CartLine {
    pub fn total(&self) -> f64 {
        money::line_total(self.product.price, self.quantity)
    }
}

/// Cart contents plus the delivery fee quoted for the address
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    delivery_fee: f64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn add(&mut self, product: Product, quantity: i32) -> ClientResult<()> {
        if quantity <= 0 {
            return Err(ClientError::Validation(format!(
                "quantity must be positive, got {quantity}"
            )));
        }
        let wanted = self.quantity_of(&product.id) + quantity;
        if !product.in_stock(wanted) {
            return Err(ClientError::Validation(format!(
                "only {} of {} in stock",
                product.stock_quantity, product.name
            )));
        }
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => {
                line.quantity = wanted;
                line.product = product;
            }
            None => self.lines.push(CartLine { product, quantity }),
        }
        Ok(())
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i32) -> ClientResult<()> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product.id == product_id)
            .ok_or_else(|| ClientError::NotFound(format!("product {product_id} not in cart")))?;
        if !line.product.in_stock(quantity) {
            return Err(ClientError::Validation(format!(
                "only {} of {} in stock",
                line.product.stock_quantity, line.product.name
            )));
        }
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.product.id == product_id)?;
        Some(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn set_delivery_fee(&mut self, fee: f64) {
        self.delivery_fee = fee.max(0.0);
    }

    pub fn delivery_fee(&self) -> f64 {
        self.delivery_fee
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> i32 {
        self.lines
            .iter()
            .find(|l| l.product.id == product_id)
            .map_or(0, |l| l.quantity)
    }

    pub fn subtotal(&self) -> f64 {
        money::sum(self.lines.iter().map(CartLine::total))
    }

    pub fn total(&self) -> f64 {
        money::sum([self.subtotal(), self.delivery_fee])
    }

    pub(crate) fn order_items(&self) -> Vec<OrderItemInput> {
        self.lines
            .iter()
            .map(|l| OrderItemInput {
                product_id: l.product.id.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}
