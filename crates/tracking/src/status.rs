//! DHL status codes and their internal shipment lifecycle counterparts.

use serde::{Deserialize, Serialize};

/// DHL status codes as reported in `shipments[].status.statusCode`.
pub mod carrier {
    pub const PRE_TRANSIT: &str = "pre-transit";
    pub const TRANSIT: &str = "transit";
    pub const DELIVERED: &str = "delivered";
    pub const FAILURE: &str = "failure";
    pub const UNKNOWN: &str = "unknown";
}

/// Internal shipment lifecycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Preparing,
    InTransit,
    Delivered,
    Shipped,
}

impl TrackingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Preparing => "preparing",
            TrackingStatus::InTransit => "in_transit",
            TrackingStatus::Delivered => "delivered",
            TrackingStatus::Shipped => "shipped",
        }
    }
}

impl core::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carrier code → internal status.
pub const STATUS_MAP: [(&str, TrackingStatus); 5] = [
    (carrier::PRE_TRANSIT, TrackingStatus::Preparing),
    (carrier::TRANSIT, TrackingStatus::InTransit),
    (carrier::DELIVERED, TrackingStatus::Delivered),
    (carrier::FAILURE, TrackingStatus::Shipped),
    (carrier::UNKNOWN, TrackingStatus::Shipped),
];

/// Map a DHL status code onto the internal lifecycle.
///
/// Missing or empty codes yield `None`. Codes outside [`STATUS_MAP`] fall back
/// to [`TrackingStatus::Shipped`].
pub fn map_carrier_status(code: Option<&str>) -> Option<TrackingStatus> {
    let code = code.filter(|c| !c.is_empty())?;

    let mapped = STATUS_MAP
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, status)| *status)
        .unwrap_or(TrackingStatus::Shipped);

    Some(mapped)
}
