//! `watchstock-tracking` — DHL shipment tracking.
//!
//! Maps DHL Unified Tracking API responses onto the internal shipment
//! lifecycle (`preparing`, `in_transit`, `delivered`, `shipped`).

pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod status;

pub use client::DhlTrackingClient;
pub use config::DhlConfig;
pub use error::TrackingError;
pub use parser::{TrackingResult, parse_tracking_response};
pub use status::{TrackingStatus, map_carrier_status};
