//! Design contract Model

use serde::{Deserialize, Serialize};

/// Contract attached one-to-one to a service order.
///
/// Created lazily the first time the customer opens it. Signing is
/// terminal: once `signature_url` is set there is no way to re-sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub service_order_id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// Contract document (PDF) URL
    pub contract_url: Option<String>,
    pub signature_url: Option<String>,
    pub status: Option<String>,
    pub creation_date: Option<String>,
}

impl Contract {
    pub fn is_signed(&self) -> bool {
        self.signature_url.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Create contract payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreate {
    pub service_order_id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Sign contract payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSign {
    pub signature_url: String,
}
