//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default public address API (province / district / ward)
pub const DEFAULT_ADDRESS_API_URL: &str = "https://provinces.open-api.vn/api";

/// Cloudinary unsigned upload settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

impl CloudinaryConfig {
    pub fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }
}

/// Text moderation settings. A provider without a key is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationConfig {
    pub openai_api_key: Option<String>,
    pub perspective_api_key: Option<String>,
    /// Perspective TOXICITY score at or above which text is flagged
    pub toxicity_threshold: f64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            perspective_api_key: None,
            toxicity_threshold: 0.7,
        }
    }
}

/// Percentages used when the backend does not supply its own.
///
/// The deposit and refund percentages are replaced by `GET /Percentage`
/// whenever that call succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentPolicy {
    /// Share of the design fee paid at contract signing
    pub deposit_percentage: f64,
    /// Share of the deposit returned when cancelling before design starts
    pub refund_before_design: f64,
    /// Share of the deposit returned once a designer is working
    pub refund_during_design: f64,
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            deposit_percentage: 50.0,
            refund_before_design: 50.0,
            refund_during_design: 30.0,
        }
    }
}

/// Client configuration for connecting to the GreenSpace backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://api.greenspace.vn/api")
    pub base_url: String,

    /// Second base URL tried once when the first cannot be reached
    pub fallback_base_url: Option<String>,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// How long a wallet fetch stays fresh
    pub wallet_cache_ttl: Duration,

    pub cloudinary: Option<CloudinaryConfig>,

    pub moderation: ModerationConfig,

    pub address_api_url: String,

    pub payment_policy: PaymentPolicy,

    /// Directory for the persisted session file
    pub session_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fallback_base_url: None,
            token: None,
            timeout: 30,
            wallet_cache_ttl: Duration::from_secs(30),
            cloudinary: None,
            moderation: ModerationConfig::default(),
            address_api_url: DEFAULT_ADDRESS_API_URL.to_string(),
            payment_policy: PaymentPolicy::default(),
            session_dir: None,
        }
    }

    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> ClientResult<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("GREENSPACE_API_URL")
            .ok_or_else(|| ClientError::Config("GREENSPACE_API_URL must be set".into()))?;
        let mut config = Self::new(base_url);

        config.fallback_base_url = get("GREENSPACE_FALLBACK_API_URL");
        if let Some(secs) = get("GREENSPACE_TIMEOUT_SECS") {
            config.timeout = parse_secs("GREENSPACE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = get("GREENSPACE_WALLET_TTL_SECS") {
            config.wallet_cache_ttl =
                Duration::from_secs(parse_secs("GREENSPACE_WALLET_TTL_SECS", &secs)?);
        }
        if let (Some(cloud_name), Some(upload_preset)) =
            (get("CLOUDINARY_CLOUD_NAME"), get("CLOUDINARY_UPLOAD_PRESET"))
        {
            config.cloudinary = Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
            });
        }
        config.moderation.openai_api_key = get("OPENAI_API_KEY");
        config.moderation.perspective_api_key = get("PERSPECTIVE_API_KEY");
        if let Some(url) = get("GREENSPACE_ADDRESS_API_URL") {
            config.address_api_url = url;
        }
        config.session_dir = get("GREENSPACE_SESSION_DIR").map(PathBuf::from);

        Ok(config)
    }

    /// Set the fallback base URL
    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback_base_url = Some(url.into());
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_wallet_cache_ttl(mut self, ttl: Duration) -> Self {
        self.wallet_cache_ttl = ttl;
        self
    }

    pub fn with_cloudinary(
        mut self,
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> Self {
        self.cloudinary = Some(CloudinaryConfig {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        });
        self
    }

    pub fn with_moderation(mut self, moderation: ModerationConfig) -> Self {
        self.moderation = moderation;
        self
    }

    pub fn with_payment_policy(mut self, policy: PaymentPolicy) -> Self {
        self.payment_policy = policy;
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000/api")
    }
}

fn parse_secs(key: &str, value: &str) -> ClientResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{key} must be a number of seconds, got {value:?}")))
}
