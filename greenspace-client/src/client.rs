//! GreenSpaceClient - typestate facade over the SDK components.

use serde_json::{Value, json};
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::models::{DeviceTokenRegistration, Notification};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::actions::{MaterialOrderActions, ServiceOrderActions};
use crate::address::{AddressCascade, OpenApiAddressProvider};
use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::fetcher::OrderFetcher;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::moderation::ModerationClient;
use crate::session::{Session, SessionStore};
use crate::types::{Authenticated, ClientState, Guest};
use crate::upload::{CloudinaryUploader, ImageUploader};
use crate::wallet::{WalletContext, WalletSnapshot};

/// GreenSpace customer client
pub struct GreenSpaceClient<S: ClientState, C: HttpClient = NetworkHttpClient> {
    config: ClientConfig,
    http: Arc<C>,
    store: Option<SessionStore>,
    uploader: Option<Arc<dyn ImageUploader>>,
    user: Option<UserInfo>,
    wallet: Option<WalletContext<C>>,
    _state: PhantomData<S>,
}

impl<S: ClientState, C: HttpClient + Clone + 'static> GreenSpaceClient<S, C> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session_store(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    fn transition<T: ClientState>(self) -> GreenSpaceClient<T, C> {
        GreenSpaceClient {
            config: self.config,
            http: self.http,
            store: self.store,
            uploader: self.uploader,
            user: self.user,
            wallet: self.wallet,
            _state: PhantomData,
        }
    }
}

// ============================================================================
// Guest State
// ============================================================================

impl GreenSpaceClient<Guest> {
    /// Create a client talking to the configured backend.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(&config)?;
        Ok(Self::with_http(config, http))
    }
}

impl<C: HttpClient + Clone + 'static> GreenSpaceClient<Guest, C> {
    /// Create a client over any transport.
    pub fn with_http(config: ClientConfig, http: C) -> Self {
        let store = config.session_dir.clone().map(SessionStore::new);
        let uploader = config
            .cloudinary
            .clone()
            .map(|c| Arc::new(CloudinaryUploader::new(c)) as Arc<dyn ImageUploader>);
        Self {
            config,
            http: Arc::new(http),
            store,
            uploader,
            user: None,
            wallet: None,
            _state: PhantomData,
        }
    }

    /// Replace the image uploader used for contract signatures.
    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Sign in with email and password.
    ///
    /// The session is written to the session store when one is configured.
    pub async fn login(
        self,
        email: &str,
        password: &str,
    ) -> ClientResult<GreenSpaceClient<Authenticated, C>> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".into(),
            ));
        }
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post(endpoints::LOGIN, &request).await?;
        tracing::info!(user_id = %response.user.id, "Customer logged in");

        let client = self
            .authenticate(response.token.clone(), response.user.clone(), None)
            .await;
        if let Some(store) = &client.store
            && let Err(e) = store.save(&Session::new(response.token, response.user))
        {
            tracing::warn!(path = %store.path().display(), error = %e, "Could not persist session");
        }
        Ok(client)
    }

    /// Resume a session without talking to the backend.
    pub async fn restore_session(self, session: Session) -> GreenSpaceClient<Authenticated, C> {
        tracing::info!(user_id = %session.user.id, "Session restored");
        self.authenticate(session.token, session.user, session.wallet).await
    }

    /// Resume the session saved in the session store, if any.
    pub async fn restore_saved(self) -> Result<GreenSpaceClient<Authenticated, C>, Self> {
        match self.store.as_ref().and_then(SessionStore::load) {
            Some(session) => Ok(self.restore_session(session).await),
            None => Err(self),
        }
    }

    async fn authenticate(
        mut self,
        token: String,
        user: UserInfo,
        wallet: Option<WalletSnapshot>,
    ) -> GreenSpaceClient<Authenticated, C> {
        Arc::make_mut(&mut self.http).set_token(Some(token));
        let mut context = WalletContext::new(
            Arc::clone(&self.http),
            user.id.clone(),
            self.config.wallet_cache_ttl,
        );
        if let Some(store) = &self.store {
            context = context.with_store(store.clone());
        }
        if let Some(snapshot) = wallet {
            context.restore(snapshot).await;
        }
        self.wallet = Some(context);
        self.user = Some(user);
        self.transition()
    }
}

// ============================================================================
// Authenticated State
// ============================================================================

impl<C: HttpClient + Clone + 'static> GreenSpaceClient<Authenticated, C> {
    pub fn user(&self) -> ClientResult<&UserInfo> {
        self.user.as_ref().ok_or(ClientError::Unauthorized)
    }

    pub fn token(&self) -> Option<&str> {
        self.http.token()
    }

    pub fn http(&self) -> &Arc<C> {
        &self.http
    }

    pub fn wallet(&self) -> ClientResult<&WalletContext<C>> {
        self.wallet.as_ref().ok_or(ClientError::Unauthorized)
    }

    pub fn fetcher(&self) -> OrderFetcher<C> {
        OrderFetcher::new(Arc::clone(&self.http))
    }

    pub fn service_orders(&self) -> ClientResult<ServiceOrderActions<C>> {
        let actions = ServiceOrderActions::new(
            Arc::clone(&self.http),
            self.wallet()?.clone(),
            self.config.payment_policy,
        );
        Ok(match &self.uploader {
            Some(uploader) => actions.with_uploader(Arc::clone(uploader)),
            None => actions,
        })
    }

    pub fn material_orders(&self) -> ClientResult<MaterialOrderActions<C>> {
        Ok(MaterialOrderActions::new(
            Arc::clone(&self.http),
            self.wallet()?.clone(),
        ))
    }

    pub fn moderation(&self) -> ModerationClient {
        ModerationClient::new(self.config.moderation.clone())
    }

    pub fn address_cascade(&self) -> AddressCascade<OpenApiAddressProvider> {
        AddressCascade::new(OpenApiAddressProvider::new(
            self.config.address_api_url.clone(),
        ))
    }

    /// Register the device's push token for order notifications.
    pub async fn register_device_token(&self, device_token: &str) -> ClientResult<()> {
        let body = DeviceTokenRegistration {
            user_id: self.user()?.id.clone(),
            device_token: device_token.to_string(),
        };
        let _: Value = self.http.post(endpoints::DEVICE_TOKEN, &body).await?;
        tracing::debug!(user_id = %body.user_id, "Device token registered");
        Ok(())
    }

    /// Notifications, newest first.
    pub async fn notifications(&self) -> ClientResult<Vec<Notification>> {
        let path = endpoints::notifications_for_user(&self.user()?.id);
        let mut notifications: Vec<Notification> = match self.http.get(&path).await {
            Ok(list) => list,
            Err(ClientError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        notifications.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        Ok(notifications)
    }

    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .http
            .put(&endpoints::notification_read(id), &json!({}))
            .await?;
        Ok(())
    }

    /// Persist token, user and the current wallet snapshot.
    pub async fn save_session(&self) -> ClientResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let token = self
            .token()
            .ok_or(ClientError::Unauthorized)?
            .to_string();
        let mut session = Session::new(token, self.user()?.clone());
        session.wallet = Some(self.wallet()?.snapshot().await);
        store.save(&session)?;
        Ok(())
    }

    /// Sign out and forget the saved session.
    pub fn logout(mut self) -> ClientResult<GreenSpaceClient<Guest, C>> {
        if let Some(store) = &self.store {
            store.delete()?;
        }
        self.wallet = None;
        Arc::make_mut(&mut self.http).set_token(None);
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "Customer logged out");
        }
        Ok(self.transition())
    }
}
