//! Material Order Model

use serde::{Deserialize, Serialize};

use crate::status::MaterialOrderStatus;

/// Direct catalog purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOrder {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub status: MaterialOrderStatus,
    /// Order total including delivery, in dong
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub user_name: String,
    pub creation_date: Option<String>,
    pub payment_date: Option<String>,
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub order_details: Vec<OrderDetail>,
}

impl MaterialOrder {
    /// Whether the customer has already paid for the order.
    pub fn is_paid(&self) -> bool {
        self.payment_date.is_some()
    }

    pub fn product_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.order_details.len());
        for detail in &self.order_details {
            if !ids.contains(&detail.product_id.as_str()) {
                ids.push(&detail.product_id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOrderCreate {
    pub user_id: String,
    pub address: String,
    pub phone: String,
    pub delivery_fee: f64,
    pub products: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i32,
}
