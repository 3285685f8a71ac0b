//! GreenSpace Client - typed SDK for the GreenSpace storefront backend
//!
//! Loads service and material orders, dispatches customer actions
//! against the order lifecycle, and keeps a cached view of the wallet.

pub mod actions;
pub mod address;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logger;
pub mod moderation;
pub mod payment;
pub mod session;
pub mod types;
pub mod upload;
pub mod wallet;

pub use actions::{Cart, DispatchReport, MaterialOrderActions, ServiceOrderActions};
pub use client::GreenSpaceClient;
pub use config::{ClientConfig, PaymentPolicy};
pub use error::{ClientError, ClientResult, DispatchAction, DispatchStep};
pub use fetcher::{MaterialOrderView, OrderFetcher, ServiceOrderView};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{Session, SessionStore};
pub use types::{Authenticated, ClientState, Guest};
pub use wallet::{WalletContext, WalletSnapshot};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
pub use shared::status::{MaterialOrderStatus, OrderAction, ServiceOrderStatus};
