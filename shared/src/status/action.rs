//! Customer actions and detail sections

use serde::{Deserialize, Serialize};

use super::{MaterialOrderStatus, ServiceOrderStatus};

/// Detail sections whose visibility depends on the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSection {
    Sketches,
    Designs,
    Contract,
    MaterialPricing,
    Payment,
    Delivery,
    Installation,
}

/// A customer action on a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    ConfirmSketch,
    RejectSketch,
    SignContract,
    ConfirmDesign,
    RejectDesign,
    PayRemainder,
    /// Cancel before any deposit was paid
    Cancel,
    /// Cancel after the deposit, refunding part of it
    CancelWithRefund,
    /// Cancel after the design was delivered, paying the rest of the design fee
    CancelWithPayment,
    ScheduleInstallation,
    ConfirmInstallation,
    RequestReinstall,
}

impl OrderAction {
    /// Status the order is moved to when the action succeeds.
    pub const fn target(&self) -> ServiceOrderStatus {
        match self {
            Self::ConfirmSketch => ServiceOrderStatus::WaitDeposit,
            Self::RejectSketch => ServiceOrderStatus::ReConsultingAndSketching,
            Self::SignContract => ServiceOrderStatus::DepositSuccessful,
            Self::ConfirmDesign => ServiceOrderStatus::DoneDesign,
            Self::RejectDesign => ServiceOrderStatus::ReDesign,
            Self::PayRemainder => ServiceOrderStatus::PaymentSuccess,
            Self::Cancel | Self::CancelWithRefund | Self::CancelWithPayment => {
                ServiceOrderStatus::OrderCancelled
            }
            Self::ScheduleInstallation => ServiceOrderStatus::WaitForScheduling,
            Self::ConfirmInstallation => ServiceOrderStatus::Successfully,
            Self::RequestReinstall => ServiceOrderStatus::ReInstall,
        }
    }
}

/// How much of the deposit is returned on cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundTier {
    /// Deposit paid, no designer assigned yet
    BeforeDesign,
    /// Designer already working on the order
    DuringDesign,
}

/// A customer action on a material order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialAction {
    Checkout,
    Cancel,
    ConfirmReceived,
    RequestRefund,
}

impl MaterialAction {
    pub const fn target(&self) -> MaterialOrderStatus {
        match self {
            Self::Checkout => MaterialOrderStatus::Processing,
            Self::Cancel => MaterialOrderStatus::Cancelled,
            Self::ConfirmReceived => MaterialOrderStatus::CompleteOrder,
            Self::RequestRefund => MaterialOrderStatus::Refund,
        }
    }
}
