//! Material order shipping lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::{UNKNOWN_COLOR, UNKNOWN_LABEL};

/// Material (shop) order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialOrderStatus {
    #[default]
    Pending,
    Processing,
    PickedPackageAndDelivery,
    DeliveryFail,
    ReDelivery,
    DeliveredSuccessfully,
    CompleteOrder,
    Cancelled,
    Refund,
    DoneRefund,
    Unknown,
}

impl MaterialOrderStatus {
    pub const ALL: [Self; 10] = [
        Self::Pending,
        Self::Processing,
        Self::PickedPackageAndDelivery,
        Self::DeliveryFail,
        Self::ReDelivery,
        Self::DeliveredSuccessfully,
        Self::CompleteOrder,
        Self::Cancelled,
        Self::Refund,
        Self::DoneRefund,
    ];

    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(code))
            .unwrap_or(Self::Unknown)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::PickedPackageAndDelivery => "PickedPackageAndDelivery",
            Self::DeliveryFail => "DeliveryFail",
            Self::ReDelivery => "ReDelivery",
            Self::DeliveredSuccessfully => "DeliveredSuccessfully",
            Self::CompleteOrder => "CompleteOrder",
            Self::Cancelled => "Cancelled",
            Self::Refund => "Refund",
            Self::DoneRefund => "DoneRefund",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Chờ xác nhận",
            Self::Processing => "Đang xử lý",
            Self::PickedPackageAndDelivery => "Đang giao hàng",
            Self::DeliveryFail => "Giao hàng thất bại",
            Self::ReDelivery => "Giao hàng lại",
            Self::DeliveredSuccessfully => "Đã giao hàng",
            Self::CompleteOrder => "Hoàn thành",
            Self::Cancelled => "Đã hủy",
            Self::Refund => "Đang hoàn tiền",
            Self::DoneRefund => "Đã hoàn tiền",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    pub const fn color(&self) -> &'static str {
        match self {
            Self::Pending => "#FFA500",
            Self::Processing => "#FF8C00",
            Self::PickedPackageAndDelivery => "#00CED1",
            Self::DeliveryFail => "#DC143C",
            Self::ReDelivery => "#FF7F50",
            Self::DeliveredSuccessfully => "#32CD32",
            Self::CompleteOrder => "#008000",
            Self::Cancelled => "#FF0000",
            Self::Refund => "#FF69B4",
            Self::DoneRefund => "#C71585",
            Self::Unknown => UNKNOWN_COLOR,
        }
    }

    pub const fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::PickedPackageAndDelivery, Self::Cancelled, Self::Refund],
            Self::PickedPackageAndDelivery => &[Self::DeliveredSuccessfully, Self::DeliveryFail],
            Self::DeliveryFail => &[Self::ReDelivery, Self::Refund],
            Self::ReDelivery => &[Self::DeliveredSuccessfully, Self::DeliveryFail],
            Self::DeliveredSuccessfully => &[Self::CompleteOrder, Self::Refund],
            Self::Refund => &[Self::DoneRefund],
            Self::CompleteOrder | Self::Cancelled | Self::DoneRefund | Self::Unknown => &[],
        }
    }

    pub fn can_transition_to(&self, target: Self) -> bool {
        self.valid_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// The customer may still cancel before the parcel leaves the warehouse.
    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(Self::Cancelled)
    }
}

impl From<&str> for MaterialOrderStatus {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl From<String> for MaterialOrderStatus {
    fn from(code: String) -> Self {
        let status = Self::parse(&code);
        if status == Self::Unknown {
            tracing::warn!(code = %code, "Unrecognised material order status");
        }
        status
    }
}

impl From<MaterialOrderStatus> for String {
    fn from(status: MaterialOrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for MaterialOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
