//! Wallet context
//!
//! Process-wide cache of the customer's balance and transactions. Reads
//! inside the TTL window are served from memory. Mutations are applied
//! optimistically and then reconciled by a forced background refetch;
//! whatever the server returns last wins.

use serde::{Deserialize, Serialize};
use shared::models::{TopUpRequest, TopUpResponse, TransactionKind, Wallet, WalletTransaction};
use shared::money;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::payment::VnPayReturn;
use crate::session::SessionStore;

/// Balance plus transactions split by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub wallet_id: Option<String>,
    pub balance: f64,
    #[serde(default)]
    pub purchases: Vec<WalletTransaction>,
    #[serde(default)]
    pub deposits: Vec<WalletTransaction>,
    #[serde(default)]
    pub refunds: Vec<WalletTransaction>,
}

impl WalletSnapshot {
    pub fn from_parts(wallet: Wallet, transactions: Vec<WalletTransaction>) -> Self {
        let mut snapshot = Self {
            wallet_id: Some(wallet.id),
            balance: wallet.amount,
            ..Self::default()
        };
        for tx in transactions {
            match tx.kind() {
                TransactionKind::Purchase => snapshot.purchases.push(tx),
                TransactionKind::Deposit => snapshot.deposits.push(tx),
                TransactionKind::Refund => snapshot.refunds.push(tx),
                TransactionKind::Other => {
                    tracing::debug!(id = %tx.id, code = %tx.type_code, "Ignoring uncategorised transaction");
                }
            }
        }
        snapshot
    }
}

#[derive(Debug, Default)]
struct WalletState {
    snapshot: WalletSnapshot,
    last_fetched: Option<Instant>,
}

/// Shared wallet cache for one user
pub struct WalletContext<C: HttpClient> {
    http: Arc<C>,
    user_id: String,
    ttl: Duration,
    state: Arc<RwLock<WalletState>>,
    refresh: Arc<Mutex<()>>,
    store: Option<SessionStore>,
}

impl<C: HttpClient> Clone for WalletContext<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            user_id: self.user_id.clone(),
            ttl: self.ttl,
            state: Arc::clone(&self.state),
            refresh: Arc::clone(&self.refresh),
            store: self.store.clone(),
        }
    }
}

impl<C: HttpClient + 'static> WalletContext<C> {
    pub fn new(http: Arc<C>, user_id: impl Into<String>, ttl: Duration) -> Self {
        Self {
            http,
            user_id: user_id.into(),
            ttl,
            state: Arc::new(RwLock::new(WalletState::default())),
            refresh: Arc::new(Mutex::new(())),
            store: None,
        }
    }

    /// Write every refreshed snapshot into the saved session.
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Seed the cache from a persisted snapshot. The snapshot is shown
    /// immediately but counts as stale, so the next fetch still hits the
    /// network.
    pub async fn restore(&self, snapshot: WalletSnapshot) {
        let mut state = self.state.write().await;
        state.snapshot = snapshot;
        state.last_fetched = None;
    }

    /// Current cached snapshot, fresh or not.
    pub async fn snapshot(&self) -> WalletSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Mark the cache stale.
    pub async fn invalidate(&self) {
        self.state.write().await.last_fetched = None;
    }

    async fn fresh_snapshot(&self) -> Option<WalletSnapshot> {
        let state = self.state.read().await;
        let fetched = state.last_fetched?;
        (fetched.elapsed() < self.ttl).then(|| state.snapshot.clone())
    }

    /// Balance and transactions, from cache when the last fetch is
    /// younger than the TTL and `force_refresh` is false.
    pub async fn fetch_wallet_data(&self, force_refresh: bool) -> ClientResult<WalletSnapshot> {
        if !force_refresh && let Some(snapshot) = self.fresh_snapshot().await {
            tracing::debug!(user_id = %self.user_id, "Wallet served from cache");
            return Ok(snapshot);
        }

        let _guard = self.refresh.lock().await;
        // A concurrent caller may have refreshed while we waited.
        if !force_refresh && let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let wallet_path = endpoints::wallet_for_user(&self.user_id);
        let transactions_path = endpoints::transactions_for_user(&self.user_id);
        let (wallet, transactions) = tokio::try_join!(
            self.http.get::<Wallet>(&wallet_path),
            self.http.get::<Vec<WalletTransaction>>(&transactions_path),
        )?;
        let snapshot = WalletSnapshot::from_parts(wallet, transactions);
        tracing::debug!(user_id = %self.user_id, balance = snapshot.balance, "Wallet refreshed");

        {
            let mut state = self.state.write().await;
            state.snapshot = snapshot.clone();
            state.last_fetched = Some(Instant::now());
        }
        if let Some(store) = &self.store
            && let Err(e) = store.update_wallet(&snapshot)
        {
            tracing::warn!(path = %store.path().display(), error = %e, "Could not persist wallet snapshot");
        }
        Ok(snapshot)
    }

    /// Wallet id, fetching the wallet if it was never loaded.
    pub async fn wallet_id(&self) -> ClientResult<String> {
        self.fetch_wallet_data(false)
            .await?
            .wallet_id
            .ok_or_else(|| ClientError::InvalidResponse("wallet has no id".into()))
    }

    /// Fail with `InsufficientBalance` unless the cached balance covers `amount`.
    pub async fn ensure_sufficient(&self, amount: f64) -> ClientResult<()> {
        let available = self.fetch_wallet_data(false).await?.balance;
        if available < amount {
            return Err(ClientError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        Ok(())
    }

    /// Apply `delta` to the local balance now and reconcile with the
    /// server in the background.
    pub async fn update_balance(&self, delta: f64) -> JoinHandle<()> {
        {
            let mut state = self.state.write().await;
            state.snapshot.balance = money::sum([state.snapshot.balance, delta]);
        }
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.fetch_wallet_data(true).await {
                tracing::warn!(user_id = %this.user_id, error = %e, "Background wallet refresh failed");
            }
        })
    }

    /// Start a VNPay top-up; returns the gateway URL to open.
    pub async fn top_up(&self, amount: f64) -> ClientResult<String> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ClientError::Validation(format!(
                "top-up amount must be positive, got {amount}"
            )));
        }
        let request = TopUpRequest {
            wallet_id: self.wallet_id().await?,
            amount,
        };
        let response: TopUpResponse = self.http.post(endpoints::TOP_UP, &request).await?;
        tracing::info!(user_id = %self.user_id, amount, "Top-up started");
        Ok(response.payment_url)
    }

    /// Handle the VNPay redirect. A successful payment is credited
    /// locally right away; the server balance follows in the background.
    pub async fn complete_top_up(&self, return_url: &str) -> ClientResult<VnPayReturn> {
        let result = VnPayReturn::parse(return_url)?;
        if result.is_success() {
            tracing::info!(user_id = %self.user_id, amount = result.amount, "Top-up completed");
            let _refresh = self.update_balance(result.amount).await;
        } else {
            tracing::warn!(user_id = %self.user_id, code = %result.response_code, "Top-up failed");
        }
        Ok(result)
    }
}
