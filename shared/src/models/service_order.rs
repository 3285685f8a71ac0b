//! Service Order Model

use serde::{Deserialize, Serialize};

use crate::status::ServiceOrderStatus;

/// Service (garden design) order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub status: ServiceOrderStatus,
    /// Design fee in dong
    #[serde(default)]
    pub design_price: f64,
    /// Material cost in dong
    #[serde(default)]
    pub material_price: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub cus_phone: String,
    #[serde(default)]
    pub user_name: String,
    pub creation_date: Option<String>,
    pub payment_date: Option<String>,
    #[serde(rename = "contructionDate")]
    pub construction_date: Option<String>,
    #[serde(rename = "contructionTime")]
    pub construction_time: Option<String>,
    #[serde(default)]
    pub work_tasks: Vec<WorkTask>,
    #[serde(default)]
    pub service_order_details: Vec<ServiceOrderDetail>,
    #[serde(default)]
    pub external_products: Vec<ExternalProduct>,
}

impl ServiceOrder {
    /// Catalog products referenced by the order, deduplicated, first
    /// occurrence first.
    pub fn product_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.service_order_details.len());
        for detail in &self.service_order_details {
            if !ids.contains(&detail.product_id.as_str()) {
                ids.push(&detail.product_id);
            }
        }
        ids
    }

    pub fn latest_work_task(&self) -> Option<&WorkTask> {
        self.work_tasks.last()
    }

    /// Sum of the external (non-catalog) product lines.
    pub fn external_total(&self) -> f64 {
        self.external_products.iter().map(|p| p.total_price).sum()
    }
}

/// Catalog product line on a service order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetail {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// Product bought outside the catalog for this order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProduct {
    pub id: Option<String>,
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total_price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Work task status codes used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkTaskStatus {
    Pending,
    Consulting,
    Design,
    Installing,
    DoneInstalling,
    ReInstall,
    Completed,
}

impl WorkTaskStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Consulting => "Consulting",
            Self::Design => "Design",
            Self::Installing => "Installing",
            Self::DoneInstalling => "DoneInstalling",
            Self::ReInstall => "ReInstall",
            Self::Completed => "Completed",
        }
    }
}

/// Staff task attached to a service order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTask {
    pub id: String,
    pub service_order_id: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: String,
    pub date_work: Option<String>,
    pub reason: Option<String>,
}

impl WorkTask {
    pub fn is(&self, status: WorkTaskStatus) -> bool {
        self.status.eq_ignore_ascii_case(status.as_str())
    }
}

/// Work task update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTaskUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

/// Installation schedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    #[serde(rename = "contructionDate")]
    pub construction_date: String,
    #[serde(rename = "contructionTime")]
    pub construction_time: String,
}
