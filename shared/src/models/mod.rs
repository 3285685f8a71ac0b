//! Backend wire models
//!
//! JSON is camelCase. Field names follow the backend, typos included,
//! through `#[serde(rename)]` where the Rust name differs.

pub mod address;
pub mod contract;
pub mod material_order;
pub mod notification;
pub mod product;
pub mod record;
pub mod service_order;
pub mod wallet;

pub use address::{District, Province, Ward};
pub use contract::{Contract, ContractCreate, ContractSign};
pub use material_order::{MaterialOrder, MaterialOrderCreate, OrderDetail, OrderItemInput};
pub use notification::{DeviceTokenRegistration, Notification};
pub use product::{Category, Product};
pub use record::{MAX_PHASE, PhaseRecord, RecordDesign, RecordSelect, RecordSketch};
pub use service_order::{
    ExternalProduct, ScheduleUpdate, ServiceOrder, ServiceOrderDetail, StatusUpdate, WorkTask,
    WorkTaskStatus, WorkTaskUpdate,
};
pub use wallet::{
    BillCreate, PaymentPercentage, RefundCreate, TopUpRequest, TopUpResponse, TransactionKind,
    Wallet, WalletTransaction,
};
