//! Wallet Model

use serde::{Deserialize, Serialize};

/// Customer wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    /// Balance in dong
    #[serde(default)]
    pub amount: f64,
}

/// Transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money spent on orders, bills and deposits
    Purchase,
    /// Wallet top-up
    Deposit,
    Refund,
    Other,
}

impl TransactionKind {
    /// Classify a backend transaction type code (case-insensitive).
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "purchase" | "payment" | "bill" | "order" => Self::Purchase,
            "deposit" | "topup" | "top-up" | "recharge" => Self::Deposit,
            "refund" => Self::Refund,
            _ => Self::Other,
        }
    }
}

/// Wallet transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    #[serde(default)]
    pub amount: f64,
    /// Backend type code, see [`TransactionKind::from_code`]
    #[serde(rename = "type", default)]
    pub type_code: String,
    pub description: Option<String>,
    pub order_id: Option<String>,
    pub service_order_id: Option<String>,
    pub creation_date: Option<String>,
}

impl WalletTransaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_code(&self.type_code)
    }
}

/// Deposit and refund percentages configured on the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPercentage {
    pub deposit_percentage: f64,
    pub refund_percentage: f64,
}

/// Bill (wallet payment) payload. Exactly one of the order ids is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub wallet_id: String,
    pub amount: f64,
    pub description: String,
}

/// Refund payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub wallet_id: String,
    pub amount: f64,
    pub description: String,
}

/// VNPay top-up request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub wallet_id: String,
    pub amount: f64,
}

/// VNPay top-up response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpResponse {
    pub payment_url: String,
}
