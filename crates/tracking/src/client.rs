//! DHL tracking HTTP client.
//!
//! One authenticated GET per lookup. No retry, no backoff and no per-call
//! timeout beyond what the underlying `reqwest::Client` is built with.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::DhlConfig;
use crate::error::TrackingError;
use crate::parser::{TrackingResult, parse_tracking_response};

const API_KEY_HEADER: &str = "DHL-API-Key";

#[derive(Debug, Clone)]
pub struct DhlTrackingClient {
    http: Client,
    config: DhlConfig,
}

impl DhlTrackingClient {
    pub fn new(config: DhlConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Reuse an existing connection pool.
    pub fn with_http_client(config: DhlConfig, http: Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &DhlConfig {
        &self.config
    }

    /// Fetch tracking information for a DHL shipment.
    ///
    /// # Errors
    /// - [`TrackingError::InvalidTrackingNumber`] for an empty number (no request is sent)
    /// - [`TrackingError::ApiRequestFailed`] when DHL answers with a non-2xx status
    /// - [`TrackingError::NetworkError`] on transport failures or an unreadable body
    pub async fn tracking_info(
        &self,
        tracking_number: &str,
    ) -> Result<TrackingResult, TrackingError> {
        if tracking_number.is_empty() {
            return Err(TrackingError::invalid_tracking_number(tracking_number));
        }

        let response = self
            .send(tracking_number)
            .await
            .map_err(|e| network_error(tracking_number, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                tracking_number,
                status = status.as_u16(),
                response = %body,
                "DHL API request failed"
            );
            return Err(TrackingError::api_request_failed(tracking_number, status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| network_error(tracking_number, e))?;

        let result = parse_tracking_response(&body);
        debug!(
            tracking_number,
            status = result.status.map(|s| s.as_str()),
            events = result.events.len(),
            "DHL tracking info fetched"
        );
        Ok(result)
    }

    async fn send(&self, tracking_number: &str) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .http
            .get(&self.config.tracking_url)
            .query(&[("trackingNumber", tracking_number)]);

        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        request.send().await
    }
}

fn network_error(tracking_number: &str, err: reqwest::Error) -> TrackingError {
    error!(tracking_number, error = %err, "DHL API request exception");
    TrackingError::network_error(tracking_number, err)
}
