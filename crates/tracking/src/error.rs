//! Tracking error taxonomy.

use thiserror::Error;

/// Errors surfaced by [`crate::DhlTrackingClient`].
///
/// Every carrier-side failure is re-raised as one of these variants.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Invalid or empty DHL tracking number: {tracking_number}")]
    InvalidTrackingNumber { tracking_number: String },

    /// Carrier answered with a non-2xx status. The body is logged, not kept.
    #[error("DHL API request failed for tracking number {tracking_number}. HTTP Status: {status}")]
    ApiRequestFailed { tracking_number: String, status: u16 },

    /// Malformed 2xx response. Not produced by the current parser, which
    /// degrades missing fields to empty values.
    #[error("Invalid response from DHL API for tracking number: {tracking_number}")]
    InvalidResponse { tracking_number: String },

    #[error("Network error when calling DHL API for tracking number: {tracking_number}")]
    NetworkError {
        tracking_number: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TrackingError {
    pub fn invalid_tracking_number(tracking_number: impl Into<String>) -> Self {
        Self::InvalidTrackingNumber {
            tracking_number: tracking_number.into(),
        }
    }

    pub fn api_request_failed(tracking_number: impl Into<String>, status: u16) -> Self {
        Self::ApiRequestFailed {
            tracking_number: tracking_number.into(),
            status,
        }
    }

    pub fn invalid_response(tracking_number: impl Into<String>) -> Self {
        Self::InvalidResponse {
            tracking_number: tracking_number.into(),
        }
    }

    pub fn network_error(tracking_number: impl Into<String>, source: reqwest::Error) -> Self {
        Self::NetworkError {
            tracking_number: tracking_number.into(),
            source,
        }
    }

    /// Stable machine-readable code for logs and API payloads.
    pub fn error_code(&self) -> &'static str {
        match self {
            TrackingError::InvalidTrackingNumber { .. } => "invalid_tracking_number",
            TrackingError::ApiRequestFailed { .. } => "api_request_failed",
            TrackingError::InvalidResponse { .. } => "invalid_response",
            TrackingError::NetworkError { .. } => "network_error",
        }
    }

    /// HTTP status a host application should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            TrackingError::InvalidTrackingNumber { .. } => 400,
            TrackingError::ApiRequestFailed { .. } | TrackingError::InvalidResponse { .. } => 502,
            TrackingError::NetworkError { .. } => 503,
        }
    }
}
