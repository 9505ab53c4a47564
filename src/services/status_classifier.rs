//! Clasificación del estado de stock de las piezas
//!
//! Función pura y total sobre `(stock, min_stock)`.

use crate::models::{Part, PartWithStatus, StockStatus};

/// Clasificar el stock de una pieza.
///
/// - `stock == 0` → `OutOfStock`
/// - `0 < stock <= min_stock` → `LowStock`
/// - `stock > min_stock` → `InStock`
///
/// Un stock negativo no puede persistirse, pero se trata como agotado.
pub fn stock_status(stock: i32, min_stock: i32) -> StockStatus {
    if stock <= 0 {
        StockStatus::OutOfStock
    } else if stock <= min_stock {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

impl Part {
    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.stock, self.min_stock)
    }
}

impl From<Part> for PartWithStatus {
    fn from(part: Part) -> Self {
        let status = part.stock_status();
        Self { part, status }
    }
}
