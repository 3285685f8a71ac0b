//! Shared types for the GreenSpace client
//!
//! Wire models, the order status catalog with its lifecycle table,
//! money formatting and request/response DTOs. Nothing in this crate
//! performs I/O.

pub mod client;
pub mod models;
pub mod money;
pub mod response;
pub mod status;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use status::{
    MaterialAction, MaterialOrderStatus, OrderAction, OrderSection, ServiceOrderStatus,
    status_color, status_text,
};
