//! Order status catalog
//!
//! Backend status codes arrive as strings. They are parsed once into
//! closed enums which own their display label, color, visibility sets
//! and the table of legal transitions. The free functions
//! [`status_text`] and [`status_color`] keep the old string-keyed lookup
//! for callers that only hold a raw code.

mod action;
mod catalog;
mod material;
mod service;

pub use action::{MaterialAction, OrderAction, OrderSection, RefundTier};
pub use catalog::{UNKNOWN_COLOR, UNKNOWN_LABEL, status_color, status_text};
pub use material::MaterialOrderStatus;
pub use service::ServiceOrderStatus;
