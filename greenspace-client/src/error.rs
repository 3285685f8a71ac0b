//! Client error types

use shared::status::{MaterialAction, MaterialOrderStatus, OrderAction, ServiceOrderStatus};
use thiserror::Error;

/// Action whose dispatch failed part-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchAction {
    Service(OrderAction),
    Material(MaterialAction),
}

impl From<OrderAction> for DispatchAction {
    fn from(action: OrderAction) -> Self {
        Self::Service(action)
    }
}

impl From<MaterialAction> for DispatchAction {
    fn from(action: MaterialAction) -> Self {
        Self::Material(action)
    }
}

/// One REST call inside a multi-step action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStep {
    SelectRecord,
    UploadSignature,
    SignContract,
    FetchPercentage,
    CheckBalance,
    CreateBill,
    CreateRefund,
    CreateOrder,
    UpdateSchedule,
    UpdateOrderStatus,
    UpdateWorkTask,
}

impl DispatchStep {
    /// Whether the step changes state on the backend.
    pub const fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::UploadSignature | Self::FetchPercentage | Self::CheckBalance
        )
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend rejected the request with a problem body
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The order cannot move to the requested status
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition {
        from: ServiceOrderStatus,
        to: ServiceOrderStatus,
    },

    /// The material order cannot move to the requested status
    #[error("Cannot move material order from {from} to {to}")]
    InvalidMaterialTransition {
        from: MaterialOrderStatus,
        to: MaterialOrderStatus,
    },

    /// A record was already selected for this order
    #[error("A record is already selected: {0}")]
    AlreadySelected(String),

    /// No further redraft phase is allowed
    #[error("Phase limit reached ({0})")]
    PhaseLimitReached(u8),

    /// Contract already carries a signature
    #[error("Contract already signed: {0}")]
    AlreadySigned(String),

    /// Wallet balance does not cover the payment
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: f64, available: f64 },

    /// Image upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Moderation providers could not be reached
    #[error("Moderation failed: {0}")]
    Moderation(String),

    /// A multi-step action failed after some steps had already been applied
    #[error("{action:?} failed at {failed_step:?} after {completed:?}: {source}")]
    PartialDispatch {
        action: DispatchAction,
        failed_step: DispatchStep,
        completed: Vec<DispatchStep>,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Text shown to the customer in the alert dialog.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Http(e) if e.is_timeout() => {
                "Máy chủ phản hồi quá lâu. Vui lòng thử lại sau."
            }
            Self::Http(_) => "Không thể kết nối đến máy chủ. Vui lòng kiểm tra kết nối mạng.",
            Self::Unauthorized => "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại.",
            Self::Forbidden(_) => "Bạn không có quyền thực hiện thao tác này.",
            Self::NotFound(_) => "Không tìm thấy dữ liệu.",
            Self::Validation(_) => "Dữ liệu không hợp lệ. Vui lòng kiểm tra lại.",
            Self::InvalidTransition { .. } | Self::InvalidMaterialTransition { .. } => {
                "Trạng thái đơn hàng đã thay đổi. Vui lòng tải lại trang."
            }
            Self::AlreadySelected(_) => "Bạn đã chọn bản vẽ cho đơn hàng này.",
            Self::PhaseLimitReached(_) => "Bạn đã hết số lần yêu cầu vẽ lại.",
            Self::AlreadySigned(_) => "Hợp đồng đã được ký.",
            Self::InsufficientBalance { .. } => {
                "Số dư ví không đủ. Vui lòng nạp thêm tiền vào ví."
            }
            Self::Upload(_) => "Không thể tải ảnh lên. Vui lòng thử lại.",
            Self::PartialDispatch { .. } => {
                "Thao tác chưa hoàn tất. Vui lòng liên hệ bộ phận hỗ trợ để được giúp đỡ."
            }
            Self::Api { .. }
            | Self::InvalidResponse(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Moderation(_) => "Đã xảy ra lỗi. Vui lòng thử lại sau.",
        }
    }

    /// Whether the failure left remote state partially updated.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialDispatch { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_dispatch_message() {
        let err = ClientError::PartialDispatch {
            action: OrderAction::SignContract.into(),
            failed_step: DispatchStep::CreateBill,
            completed: vec![DispatchStep::UploadSignature, DispatchStep::SignContract],
            source: Box::new(ClientError::Internal("boom".into())),
        };
        assert!(err.is_partial());
        let text = err.to_string();
        assert!(text.contains("SignContract"));
        assert!(text.contains("CreateBill"));
        assert!(text.contains("boom"));
        assert!(err.user_message().contains("hỗ trợ"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = ClientError::InvalidTransition {
            from: ServiceOrderStatus::Pending,
            to: ServiceOrderStatus::DoneDesign,
        };
        assert_eq!(err.to_string(), "Cannot move order from Pending to DoneDesign");
        assert!(!err.is_partial());
    }

    #[test]
    fn test_mutating_steps() {
        assert!(DispatchStep::CreateBill.is_mutation());
        assert!(DispatchStep::UpdateOrderStatus.is_mutation());
        assert!(!DispatchStep::CheckBalance.is_mutation());
        assert!(!DispatchStep::UploadSignature.is_mutation());
    }
}
