//! Modelo de Part (pieza de recambio)
//!
//! Inventario de piezas. El estado de stock no se persiste: se deriva
//! de `stock` y `min_stock` en `services::status_classifier`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{impl_text_enum, ParseEnumError};
use crate::utils::validation::{validate_not_blank, REFERENCE_REGEX};

fn default_min_stock() -> i32 {
    5
}

/// Estado derivado del stock de una pieza
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }

    fn parse_str(value: &str) -> Result<Self, ParseEnumError> {
        match value {
            "in_stock" => Ok(StockStatus::InStock),
            "low_stock" => Ok(StockStatus::LowStock),
            "out_of_stock" => Ok(StockStatus::OutOfStock),
            other => Err(ParseEnumError::new("stock status", other)),
        }
    }
}

impl_text_enum!(StockStatus);

/// Pieza - mapea a la tabla parts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: i64,
    pub name: String,
    pub reference: String,
    pub category: String,
    pub stock: i32,
    pub min_stock: i32,
    /// Precio unitario en céntimos
    pub unit_price: i64,
    pub created_at: DateTime<Utc>,
}

/// Pieza con su estado de stock calculado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartWithStatus {
    #[serde(flatten)]
    pub part: Part,
    pub status: StockStatus,
}

/// Request para crear una pieza
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[validate(regex = "REFERENCE_REGEX")]
    pub reference: String,

    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub category: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,

    #[serde(default = "default_min_stock")]
    #[validate(range(min = 0))]
    pub min_stock: i32,

    #[validate(range(min = 0))]
    pub unit_price: i64,
}

/// Request para actualizar una pieza (patch parcial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(regex = "REFERENCE_REGEX")]
    pub reference: Option<String>,

    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub category: Option<String>,

    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,

    #[validate(range(min = 0))]
    pub unit_price: Option<i64>,
}

impl UpdatePartRequest {
    pub fn apply_to(&self, part: &mut Part) {
        if let Some(name) = &self.name {
            part.name = name.clone();
        }
        if let Some(reference) = &self.reference {
            part.reference = reference.clone();
        }
        if let Some(category) = &self.category {
            part.category = category.clone();
        }
        if let Some(stock) = self.stock {
            part.stock = stock;
        }
        if let Some(min_stock) = self.min_stock {
            part.min_stock = min_stock;
        }
        if let Some(unit_price) = self.unit_price {
            part.unit_price = unit_price;
        }
    }
}

/// Filtros para el listado de piezas
#[derive(Debug, Default, Deserialize)]
pub struct PartFilters {
    pub status: Option<StockStatus>,
    pub category: Option<String>,
}

impl PartFilters {
    pub fn matches(&self, part: &PartWithStatus) -> bool {
        let status_ok = self.status.map_or(true, |s| part.status == s);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| part.part.category.eq_ignore_ascii_case(c.trim()));
        status_ok && category_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreatePartRequest = serde_json::from_value(serde_json::json!({
            "name": "Filtre à air",
            "reference": "AIR-005-A",
            "category": "filtres",
            "unitPrice": 1890
        }))
        .unwrap();
        assert_eq!(request.stock, 0);
        assert_eq!(request.min_stock, 5);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let request = UpdatePartRequest {
            stock: Some(-1),
            min_stock: Some(-3),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock"));
        assert!(errors.field_errors().contains_key("min_stock"));
    }

    #[test]
    fn test_part_json_is_camel_case() {
        let part = Part {
            id: 2,
            name: "Plaquettes de frein".to_string(),
            reference: "BRK-002-F".to_string(),
            category: "freinage".to_string(),
            stock: 3,
            min_stock: 5,
            unit_price: 4500,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(PartWithStatus {
            part,
            status: StockStatus::LowStock,
        })
        .unwrap();
        assert_eq!(json["minStock"], 5);
        assert_eq!(json["unitPrice"], 4500);
        assert_eq!(json["status"], "low_stock");
    }
}
