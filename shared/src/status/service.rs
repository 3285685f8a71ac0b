//! Service order lifecycle
//!
//! A design order moves from consulting and sketching through design
//! pricing, deposit, design, material pricing, payment, delivery and
//! installation. The backend stays the authority on the current status;
//! the table here only lets the client refuse requests the backend would
//! never accept.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::{OrderAction, OrderSection, RefundTier};
use super::catalog::{UNKNOWN_COLOR, UNKNOWN_LABEL};

/// Service order status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceOrderStatus {
    #[default]
    Pending,
    ConsultingAndSketching,
    DeterminingDesignPrice,
    DepositSuccessful,
    AssignToDesigner,
    DeterminingMaterialPrice,
    DoneDesign,
    PaymentSuccess,
    Processing,
    PickedPackageAndDelivery,
    DeliveryFail,
    ReDelivery,
    DeliveredSuccessfully,
    CompleteOrder,
    OrderCancelled,
    Warning,
    Refund,
    DoneRefund,
    StopService,
    ReConsultingAndSketching,
    ReDesign,
    WaitDeposit,
    DoneDeterminingDesignPrice,
    DoneDeterminingMaterialPrice,
    ReDeterminingDesignPrice,
    /// Wire code is `ExchangeProdcut`.
    ExchangeProduct,
    WaitForScheduling,
    Installing,
    DoneInstalling,
    ReInstall,
    CustomerConfirm,
    Successfully,
    /// Any code this client does not know about.
    Unknown,
}

impl ServiceOrderStatus {
    /// Every known status, in backend declaration order.
    pub const ALL: [Self; 32] = [
        Self::Pending,
        Self::ConsultingAndSketching,
        Self::DeterminingDesignPrice,
        Self::DepositSuccessful,
        Self::AssignToDesigner,
        Self::DeterminingMaterialPrice,
        Self::DoneDesign,
        Self::PaymentSuccess,
        Self::Processing,
        Self::PickedPackageAndDelivery,
        Self::DeliveryFail,
        Self::ReDelivery,
        Self::DeliveredSuccessfully,
        Self::CompleteOrder,
        Self::OrderCancelled,
        Self::Warning,
        Self::Refund,
        Self::DoneRefund,
        Self::StopService,
        Self::ReConsultingAndSketching,
        Self::ReDesign,
        Self::WaitDeposit,
        Self::DoneDeterminingDesignPrice,
        Self::DoneDeterminingMaterialPrice,
        Self::ReDeterminingDesignPrice,
        Self::ExchangeProduct,
        Self::WaitForScheduling,
        Self::Installing,
        Self::DoneInstalling,
        Self::ReInstall,
        Self::CustomerConfirm,
        Self::Successfully,
    ];

    /// Parse a backend code. Matching ignores ASCII case and surrounding
    /// whitespace; anything unrecognised becomes [`Self::Unknown`].
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(code))
            .unwrap_or(Self::Unknown)
    }

    /// Backend wire code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::ConsultingAndSketching => "ConsultingAndSketching",
            Self::DeterminingDesignPrice => "DeterminingDesignPrice",
            Self::DepositSuccessful => "DepositSuccessful",
            Self::AssignToDesigner => "AssignToDesigner",
            Self::DeterminingMaterialPrice => "DeterminingMaterialPrice",
            Self::DoneDesign => "DoneDesign",
            Self::PaymentSuccess => "PaymentSuccess",
            Self::Processing => "Processing",
            Self::PickedPackageAndDelivery => "PickedPackageAndDelivery",
            Self::DeliveryFail => "DeliveryFail",
            Self::ReDelivery => "ReDelivery",
            Self::DeliveredSuccessfully => "DeliveredSuccessfully",
            Self::CompleteOrder => "CompleteOrder",
            Self::OrderCancelled => "OrderCancelled",
            Self::Warning => "Warning",
            Self::Refund => "Refund",
            Self::DoneRefund => "DoneRefund",
            Self::StopService => "StopService",
            Self::ReConsultingAndSketching => "ReConsultingAndSketching",
            Self::ReDesign => "ReDesign",
            Self::WaitDeposit => "WaitDeposit",
            Self::DoneDeterminingDesignPrice => "DoneDeterminingDesignPrice",
            Self::DoneDeterminingMaterialPrice => "DoneDeterminingMaterialPrice",
            Self::ReDeterminingDesignPrice => "ReDeterminingDesignPrice",
            Self::ExchangeProduct => "ExchangeProdcut",
            Self::WaitForScheduling => "WaitForScheduling",
            Self::Installing => "Installing",
            Self::DoneInstalling => "DoneInstalling",
            Self::ReInstall => "ReInstall",
            Self::CustomerConfirm => "CustomerConfirm",
            Self::Successfully => "Successfully",
            Self::Unknown => "Unknown",
        }
    }

    /// Vietnamese display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Đang chờ",
            Self::ConsultingAndSketching => "Đang tư vấn và phác thảo",
            Self::DeterminingDesignPrice => "Đang xác định giá thiết kế",
            Self::DepositSuccessful => "Đặt cọc thành công",
            Self::AssignToDesigner => "Đã giao cho nhà thiết kế",
            Self::DeterminingMaterialPrice => "Đang xác định giá vật liệu",
            Self::DoneDesign => "Hoàn thành thiết kế",
            Self::PaymentSuccess => "Thanh toán thành công",
            Self::Processing => "Đang xử lý",
            Self::PickedPackageAndDelivery => "Đã lấy hàng và đang giao",
            Self::DeliveryFail => "Giao hàng thất bại",
            Self::ReDelivery => "Giao hàng lại",
            Self::DeliveredSuccessfully => "Đã giao hàng thành công",
            Self::CompleteOrder => "Hoàn thành đơn hàng",
            Self::OrderCancelled => "Đơn hàng đã bị hủy",
            Self::Warning => "Cảnh báo",
            Self::Refund => "Đang hoàn tiền",
            Self::DoneRefund => "Đã hoàn tiền",
            Self::StopService => "Ngừng dịch vụ",
            Self::ReConsultingAndSketching => "Phác thảo lại",
            Self::ReDesign => "Thiết kế lại",
            Self::WaitDeposit => "Chờ đặt cọc",
            Self::DoneDeterminingDesignPrice => "Đã xác định giá thiết kế",
            Self::DoneDeterminingMaterialPrice => "Đã xác định giá vật liệu",
            Self::ReDeterminingDesignPrice => "Xác định lại giá thiết kế",
            Self::ExchangeProduct => "Đổi sản phẩm",
            Self::WaitForScheduling => "Chờ lên lịch thi công",
            Self::Installing => "Đang lắp đặt",
            Self::DoneInstalling => "Đã lắp đặt xong",
            Self::ReInstall => "Lắp đặt lại",
            Self::CustomerConfirm => "Khách hàng đã xác nhận",
            Self::Successfully => "Thành công",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    /// Badge color as `#RRGGBB`.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Pending => "#FFA500",
            Self::ConsultingAndSketching => "#1E90FF",
            Self::DeterminingDesignPrice => "#8A2BE2",
            Self::DepositSuccessful => "#2E8B57",
            Self::AssignToDesigner => "#4682B4",
            Self::DeterminingMaterialPrice => "#9370DB",
            Self::DoneDesign => "#3CB371",
            Self::PaymentSuccess => "#228B22",
            Self::Processing => "#FF8C00",
            Self::PickedPackageAndDelivery => "#00CED1",
            Self::DeliveryFail => "#DC143C",
            Self::ReDelivery => "#FF7F50",
            Self::DeliveredSuccessfully => "#32CD32",
            Self::CompleteOrder => "#008000",
            Self::OrderCancelled => "#FF0000",
            Self::Warning => "#FFD700",
            Self::Refund => "#FF69B4",
            Self::DoneRefund => "#C71585",
            Self::StopService => "#696969",
            Self::ReConsultingAndSketching => "#5F9EA0",
            Self::ReDesign => "#BA55D3",
            Self::WaitDeposit => "#DAA520",
            Self::DoneDeterminingDesignPrice => "#6A5ACD",
            Self::DoneDeterminingMaterialPrice => "#7B68EE",
            Self::ReDeterminingDesignPrice => "#9932CC",
            Self::ExchangeProduct => "#D2691E",
            Self::WaitForScheduling => "#20B2AA",
            Self::Installing => "#4169E1",
            Self::DoneInstalling => "#66CDAA",
            Self::ReInstall => "#CD5C5C",
            Self::CustomerConfirm => "#00FA9A",
            Self::Successfully => "#006400",
            Self::Unknown => UNKNOWN_COLOR,
        }
    }

    /// Statuses the backend may move this order to next.
    pub const fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[
                Self::ConsultingAndSketching,
                Self::OrderCancelled,
                Self::Warning,
            ],
            Self::ConsultingAndSketching | Self::ReConsultingAndSketching => &[
                Self::DeterminingDesignPrice,
                Self::OrderCancelled,
                Self::Warning,
            ],
            Self::DeterminingDesignPrice => &[
                Self::DoneDeterminingDesignPrice,
                Self::ReDeterminingDesignPrice,
                Self::OrderCancelled,
            ],
            Self::ReDeterminingDesignPrice => {
                &[Self::DoneDeterminingDesignPrice, Self::OrderCancelled]
            }
            Self::DoneDeterminingDesignPrice => &[
                Self::WaitDeposit,
                Self::ReConsultingAndSketching,
                Self::ReDeterminingDesignPrice,
                Self::OrderCancelled,
            ],
            Self::WaitDeposit => &[Self::DepositSuccessful, Self::OrderCancelled],
            Self::DepositSuccessful => &[Self::AssignToDesigner, Self::OrderCancelled],
            Self::AssignToDesigner => &[Self::DeterminingMaterialPrice, Self::OrderCancelled],
            Self::DeterminingMaterialPrice => {
                &[Self::DoneDeterminingMaterialPrice, Self::OrderCancelled]
            }
            Self::DoneDeterminingMaterialPrice => {
                &[Self::DoneDesign, Self::ReDesign, Self::OrderCancelled]
            }
            Self::ReDesign => &[Self::DeterminingMaterialPrice, Self::OrderCancelled],
            Self::DoneDesign => &[Self::PaymentSuccess, Self::OrderCancelled],
            Self::PaymentSuccess => &[Self::Processing],
            Self::Processing => &[Self::PickedPackageAndDelivery, Self::Refund],
            Self::PickedPackageAndDelivery => {
                &[Self::DeliveredSuccessfully, Self::DeliveryFail]
            }
            Self::DeliveryFail => &[Self::ReDelivery, Self::Refund],
            Self::ReDelivery => &[Self::DeliveredSuccessfully, Self::DeliveryFail],
            Self::DeliveredSuccessfully => &[
                Self::WaitForScheduling,
                Self::ExchangeProduct,
                Self::CompleteOrder,
            ],
            Self::ExchangeProduct => &[Self::Processing, Self::Refund],
            Self::WaitForScheduling => &[Self::Installing],
            Self::Installing => &[Self::DoneInstalling],
            Self::DoneInstalling => &[Self::CustomerConfirm, Self::ReInstall, Self::Successfully],
            Self::ReInstall => &[Self::Installing],
            Self::CustomerConfirm => &[Self::Successfully],
            Self::Warning => &[Self::OrderCancelled, Self::StopService, Self::Refund],
            Self::Refund => &[Self::DoneRefund],
            // Terminal
            Self::Successfully
            | Self::CompleteOrder
            | Self::OrderCancelled
            | Self::DoneRefund
            | Self::StopService
            | Self::Unknown => &[],
        }
    }

    /// Returns `true` if moving to `target` is legal from this status.
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.valid_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Position on the main line of the lifecycle. Side branches
    /// (cancellation, refund, warnings) have no position.
    pub const fn progress(&self) -> Option<u8> {
        let step = match self {
            Self::Pending => 0,
            Self::ConsultingAndSketching | Self::ReConsultingAndSketching => 1,
            Self::DeterminingDesignPrice
            | Self::ReDeterminingDesignPrice
            | Self::DoneDeterminingDesignPrice => 2,
            Self::WaitDeposit => 3,
            Self::DepositSuccessful | Self::AssignToDesigner => 4,
            Self::DeterminingMaterialPrice | Self::ReDesign => 5,
            Self::DoneDeterminingMaterialPrice => 6,
            Self::DoneDesign => 7,
            Self::PaymentSuccess | Self::Processing | Self::ExchangeProduct => 8,
            Self::PickedPackageAndDelivery | Self::DeliveryFail | Self::ReDelivery => 9,
            Self::DeliveredSuccessfully => 10,
            Self::WaitForScheduling
            | Self::Installing
            | Self::DoneInstalling
            | Self::ReInstall
            | Self::CustomerConfirm => 11,
            Self::Successfully | Self::CompleteOrder => 12,
            Self::OrderCancelled
            | Self::Warning
            | Self::Refund
            | Self::DoneRefund
            | Self::StopService
            | Self::Unknown => return None,
        };
        Some(step)
    }

    /// Whether a detail section is shown for an order in this status.
    pub fn shows(&self, section: OrderSection) -> bool {
        let Some(progress) = self.progress() else {
            return false;
        };
        match section {
            OrderSection::Sketches => {
                progress >= 2 || matches!(self, Self::ReConsultingAndSketching)
            }
            OrderSection::Contract => progress >= 3,
            OrderSection::Designs => progress >= 6 || matches!(self, Self::ReDesign),
            OrderSection::MaterialPricing => progress >= 6,
            OrderSection::Payment => progress >= 7,
            OrderSection::Delivery => progress >= 8,
            OrderSection::Installation => progress >= 11,
        }
    }

    /// Actions the customer may trigger from this status. At most one of
    /// them is dispatched at a time.
    pub const fn available_actions(&self) -> &'static [OrderAction] {
        match self {
            Self::Pending
            | Self::ConsultingAndSketching
            | Self::ReConsultingAndSketching
            | Self::DeterminingDesignPrice
            | Self::ReDeterminingDesignPrice => &[OrderAction::Cancel],
            Self::DoneDeterminingDesignPrice => &[
                OrderAction::ConfirmSketch,
                OrderAction::RejectSketch,
                OrderAction::Cancel,
            ],
            Self::WaitDeposit => &[OrderAction::SignContract, OrderAction::Cancel],
            Self::DepositSuccessful
            | Self::AssignToDesigner
            | Self::DeterminingMaterialPrice
            | Self::ReDesign => &[OrderAction::CancelWithRefund],
            Self::DoneDeterminingMaterialPrice => &[
                OrderAction::ConfirmDesign,
                OrderAction::RejectDesign,
                OrderAction::CancelWithRefund,
            ],
            Self::DoneDesign => &[OrderAction::PayRemainder, OrderAction::CancelWithPayment],
            Self::DeliveredSuccessfully => &[OrderAction::ScheduleInstallation],
            Self::DoneInstalling => &[
                OrderAction::ConfirmInstallation,
                OrderAction::RequestReinstall,
            ],
            _ => &[],
        }
    }

    pub fn allows(&self, action: OrderAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Refund tier that applies when the customer cancels after paying
    /// the deposit.
    pub const fn refund_tier(&self) -> Option<RefundTier> {
        match self {
            Self::DepositSuccessful => Some(RefundTier::BeforeDesign),
            Self::AssignToDesigner
            | Self::DeterminingMaterialPrice
            | Self::ReDesign
            | Self::DoneDeterminingMaterialPrice => Some(RefundTier::DuringDesign),
            _ => None,
        }
    }

    /// Whether the design deposit has been paid by this point.
    pub fn deposit_paid(&self) -> bool {
        self.progress().is_some_and(|p| p >= 4)
    }
}

impl From<&str> for ServiceOrderStatus {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl From<String> for ServiceOrderStatus {
    fn from(code: String) -> Self {
        let status = Self::parse(&code);
        if status == Self::Unknown {
            tracing::warn!(code = %code, "Unrecognised order status");
        }
        status
    }
}

impl From<ServiceOrderStatus> for String {
    fn from(status: ServiceOrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
