//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product (material)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category_id: Option<String>,
    /// Unit price in dong
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub status: Option<String>,
}

impl Product {
    pub fn in_stock(&self, quantity: i32) -> bool {
        quantity > 0 && self.stock_quantity >= quantity
    }
}

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}
