//! DHL API configuration.

use tracing::warn;

/// Production endpoint of the DHL Unified Tracking API.
pub const DEFAULT_TRACKING_URL: &str = "https://api-eu.dhl.com/track/shipments";

#[derive(Clone, PartialEq, Eq)]
pub struct DhlConfig {
    /// Sent as the `DHL-API-Key` header. Requests go out without it when unset.
    pub api_key: Option<String>,
    pub tracking_url: String,
}

impl DhlConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            tracking_url: DEFAULT_TRACKING_URL.to_string(),
        }
    }

    pub fn with_tracking_url(mut self, url: impl Into<String>) -> Self {
        self.tracking_url = url.into();
        self
    }

    /// Load from `DHL_API_KEY` and `DHL_TRACKING_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DhlConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("DHL_API_KEY").filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("DHL_API_KEY not set; tracking requests will be rejected by the carrier");
        }

        let tracking_url = lookup("DHL_TRACKING_URL")
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_TRACKING_URL.to_string());

        Self {
            api_key,
            tracking_url,
        }
    }
}

impl core::fmt::Debug for DhlConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DhlConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("tracking_url", &self.tracking_url)
            .finish()
    }
}
