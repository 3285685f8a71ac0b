//! Backend route table

pub const LOGIN: &str = "Users/login";
pub const DEVICE_TOKEN: &str = "Users/device-token";
pub const PERCENTAGE: &str = "Percentage";
pub const BILL: &str = "Bill";
pub const REFUND: &str = "Wallets/refund";
pub const TOP_UP: &str = "Wallets/vnpay-payment";
pub const CONTRACT: &str = "Contract";
pub const MATERIAL_ORDER: &str = "Order";

pub fn service_order(id: &str) -> String {
    format!("ServiceOrder/{id}")
}

pub fn service_orders_for_user(user_id: &str) -> String {
    format!("ServiceOrder/user/{user_id}")
}

pub fn service_order_status(id: &str) -> String {
    format!("ServiceOrder/status/{id}")
}

pub fn service_order_schedule(id: &str) -> String {
    format!("ServiceOrder/{id}/construction")
}

pub fn sketches(order_id: &str) -> String {
    format!("RecordSketch/serviceorder/{order_id}")
}

pub fn sketch(id: &str) -> String {
    format!("RecordSketch/{id}")
}

pub fn designs(order_id: &str) -> String {
    format!("RecordDesign/serviceorder/{order_id}")
}

pub fn design(id: &str) -> String {
    format!("RecordDesign/{id}")
}

pub fn product(id: &str) -> String {
    format!("Product/{id}")
}

pub fn contract_for_order(order_id: &str) -> String {
    format!("Contract/serviceorder/{order_id}")
}

pub fn contract(id: &str) -> String {
    format!("Contract/{id}")
}

pub fn work_task(id: &str) -> String {
    format!("WorkTask/{id}")
}

pub fn wallet_for_user(user_id: &str) -> String {
    format!("Wallets/user/{user_id}")
}

pub fn transactions_for_user(user_id: &str) -> String {
    format!("Transaction/user/{user_id}")
}

pub fn material_order(id: &str) -> String {
    format!("Order/{id}")
}

pub fn material_orders_for_user(user_id: &str) -> String {
    format!("Order/user/{user_id}")
}

pub fn material_order_status(id: &str) -> String {
    format!("Order/status/{id}")
}

pub fn notifications_for_user(user_id: &str) -> String {
    format!("Notification/user/{user_id}")
}

pub fn notification_read(id: &str) -> String {
    format!("Notification/{id}/read")
}
