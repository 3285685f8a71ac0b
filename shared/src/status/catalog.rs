//! String-keyed status lookup

use super::{MaterialOrderStatus, ServiceOrderStatus};

pub const UNKNOWN_LABEL: &str = "Không xác định";
pub const UNKNOWN_COLOR: &str = "#808080";

/// Display label for any status code, service or material.
///
/// Total: unknown or empty codes give [`UNKNOWN_LABEL`].
pub fn status_text(code: &str) -> &'static str {
    match ServiceOrderStatus::parse(code) {
        ServiceOrderStatus::Unknown => MaterialOrderStatus::parse(code).label(),
        status => status.label(),
    }
}

/// Badge color for any status code, service or material.
///
/// Total: unknown or empty codes give [`UNKNOWN_COLOR`].
pub fn status_color(code: &str) -> &'static str {
    match ServiceOrderStatus::parse(code) {
        ServiceOrderStatus::Unknown => MaterialOrderStatus::parse(code).color(),
        status => status.color(),
    }
}
