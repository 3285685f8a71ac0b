//! In-memory backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use greenspace_client::upload::ImageUploader;
use greenspace_client::{ClientError, ClientResult, HttpClient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    NotFound,
    ServerError,
}

#[derive(Default)]
struct Backend {
    routes: HashMap<(Method, String), Reply>,
    requests: Vec<Recorded>,
}

/// Route table plus request log. Unrouted GETs answer 404, unrouted
/// writes answer an empty body.
#[derive(Clone, Default)]
pub struct MockHttp {
    backend: Arc<Mutex<Backend>>,
    token: Option<String>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, body: Value) -> &Self {
        self.set(method, path, Reply::Json(body))
    }

    pub fn not_found(&self, method: Method, path: &str) -> &Self {
        self.set(method, path, Reply::NotFound)
    }

    pub fn fail(&self, method: Method, path: &str) -> &Self {
        self.set(method, path, Reply::ServerError)
    }

    fn set(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.backend
            .lock()
            .unwrap()
            .routes
            .insert((method, path.to_string()), reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.backend.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.backend.lock().unwrap().requests.clear();
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Body of the last request to `path`.
    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body)
    }

    /// `(method, path)` of every request, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    fn handle<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let reply = {
            let mut backend = self.backend.lock().unwrap();
            backend.requests.push(Recorded {
                method,
                path: path.to_string(),
                body,
            });
            backend.routes.get(&(method, path.to_string())).cloned()
        };
        let value = match reply {
            Some(Reply::Json(value)) => value,
            Some(Reply::NotFound) => return Err(ClientError::NotFound(path.to_string())),
            Some(Reply::ServerError) => {
                return Err(ClientError::Api {
                    status: 500,
                    message: format!("{path} failed"),
                });
            }
            None if method == Method::Get => return Err(ClientError::NotFound(path.to_string())),
            None => Value::Null,
        };
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.handle(Method::Get, path, None)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.handle(Method::Post, path, Some(body))
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.handle(Method::Put, path, Some(body))
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.handle(Method::Delete, path, None)
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

/// Uploader that hands back a fixed URL.
pub struct StubUploader;

pub const SIGNATURE_URL: &str = "https://res.cloudinary.com/demo/image/upload/signature.png";

#[async_trait]
impl ImageUploader for StubUploader {
    async fn upload(&self, _file_name: &str, bytes: Vec<u8>) -> ClientResult<String> {
        if bytes.is_empty() {
            return Err(ClientError::Upload("empty image".into()));
        }
        Ok(SIGNATURE_URL.to_string())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const USER_ID: &str = "u-1";
pub const WALLET_ID: &str = "w-1";

pub fn wallet_json(amount: f64) -> Value {
    json!({ "id": WALLET_ID, "userId": USER_ID, "amount": amount })
}

pub fn transactions_json() -> Value {
    json!([
        { "id": "t-1", "amount": 1_000_000, "type": "Deposit" },
        { "id": "t-2", "amount": 250_000, "type": "Purchase", "orderId": "o-1" },
        { "id": "t-3", "amount": 100_000, "type": "Refund" },
        { "id": "t-4", "amount": 5, "type": "Adjustment" }
    ])
}

/// Backend with a wallet holding `balance`.
pub fn backend_with_wallet(balance: f64) -> MockHttp {
    let mock = MockHttp::new();
    mock.on(Method::Get, "Wallets/user/u-1", wallet_json(balance))
        .on(Method::Get, "Transaction/user/u-1", transactions_json());
    mock
}

pub fn service_order_json(id: &str, status: &str, design_price: f64, material_price: f64) -> Value {
    json!({
        "id": id,
        "userId": USER_ID,
        "status": status,
        "designPrice": design_price,
        "materialPrice": material_price,
        "totalCost": design_price + material_price,
        "address": "12 Lê Lợi, Quận 1, TP.HCM",
        "cusPhone": "0901234567",
        "userName": "Nguyễn Văn A",
        "workTasks": [
            { "id": "wt-1", "serviceOrderId": id, "status": "Consulting" },
            { "id": "wt-2", "serviceOrderId": id, "status": "Design" }
        ],
        "serviceOrderDetails": []
    })
}

pub fn sketch_json(id: &str, phase: u8, selected: bool) -> Value {
    json!({
        "id": id,
        "serviceOrderId": "so-1",
        "phase": phase,
        "imageUrl": format!("https://img.greenspace.vn/{id}.png"),
        "isSelected": selected
    })
}

pub fn design_json(id: &str, phase: u8, selected: bool) -> Value {
    json!({
        "id": id,
        "serviceOrderId": "so-1",
        "phase": phase,
        "designImages": [format!("https://img.greenspace.vn/{id}-a.png")],
        "isSelected": selected
    })
}

pub fn product_json(id: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Sản phẩm {id}"),
        "price": price,
        "stockQuantity": 20
    })
}
