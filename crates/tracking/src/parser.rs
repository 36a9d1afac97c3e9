//! DHL response parsing (pure, no IO).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{TrackingStatus, map_carrier_status};

/// Standardized tracking information for one shipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingResult {
    /// `None` when the carrier returned no shipment (or no status code).
    pub status: Option<TrackingStatus>,
    /// `"<locality>, <country>"` of the latest event, when known.
    pub location: Option<String>,
    /// Carrier events, passed through untouched. The first one is the latest.
    pub events: Vec<Value>,
}

impl TrackingResult {
    /// Result for unknown or empty shipments.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Parse a DHL `GET /track/shipments` body.
///
/// Only `shipments[0]` is considered. Missing fields degrade to `None` / empty
/// rather than failing.
pub fn parse_tracking_response(response: &Value) -> TrackingResult {
    let Some(shipment) = response
        .get("shipments")
        .and_then(Value::as_array)
        .and_then(|shipments| shipments.first())
    else {
        return TrackingResult::empty();
    };

    let status_code = shipment.pointer("/status/statusCode").and_then(Value::as_str);
    let events = shipment
        .get("events")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    TrackingResult {
        status: map_carrier_status(status_code),
        location: latest_location(&events),
        events,
    }
}

fn latest_location(events: &[Value]) -> Option<String> {
    let address = events.first()?.pointer("/location/address")?;

    let parts: Vec<&str> = ["addressLocality", "countryCode"]
        .iter()
        .filter_map(|field| address.get(*field).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn empty_shipments_yield_empty_result() {
        let result = parse_tracking_response(&json!({ "shipments": [] }));
        assert_eq!(result, TrackingResult::empty());
        assert!(result.status.is_none());
        assert!(result.location.is_none());
        assert!(result.events.is_empty());
    }

    #[test]
    fn missing_shipments_key_yields_empty_result() {
        assert_eq!(parse_tracking_response(&json!({})), TrackingResult::empty());
        assert_eq!(
            parse_tracking_response(&json!({ "shipments": "nope" })),
            TrackingResult::empty()
        );
    }

    #[test]
    fn delivered_shipment_with_location() {
        let events = json!([
            {
                "location": { "address": { "addressLocality": "Berlin", "countryCode": "DE" } },
                "description": "Delivered"
            }
        ]);
        let body = json!({
            "shipments": [
                {
                    "status": { "statusCode": "delivered", "description": "Delivered" },
                    "events": events.clone()
                }
            ]
        });

        let result = parse_tracking_response(&body);

        assert_eq!(result.status, Some(TrackingStatus::Delivered));
        assert_eq!(result.location.as_deref(), Some("Berlin, DE"));
        assert_eq!(Value::Array(result.events), events);
    }

    #[test]
    fn transit_without_events_has_no_location() {
        let body = json!({
            "shipments": [{ "status": { "statusCode": "transit" }, "events": [] }]
        });

        let result = parse_tracking_response(&body);

        assert_eq!(result.status, Some(TrackingStatus::InTransit));
        assert_eq!(result.location, None);
        assert!(result.events.is_empty());
    }

    #[test]
    fn unrecognized_status_is_shipped() {
        let body = json!({
            "shipments": [{ "status": { "statusCode": "unknown_status" }, "events": [] }]
        });

        assert_eq!(parse_tracking_response(&body).status, Some(TrackingStatus::Shipped));
    }

    #[test]
    fn missing_status_and_events_degrade_to_none() {
        let result = parse_tracking_response(&json!({ "shipments": [{}] }));
        assert_eq!(result, TrackingResult::empty());
    }

    #[test]
    fn location_uses_only_present_parts() {
        let body = json!({
            "shipments": [{
                "status": { "statusCode": "transit" },
                "events": [
                    { "location": { "address": { "countryCode": "NL" } } },
                    {
                        "location": {
                            "address": { "addressLocality": "Leipzig", "countryCode": "DE" }
                        }
                    }
                ]
            }]
        });

        assert_eq!(parse_tracking_response(&body).location.as_deref(), Some("NL"));
    }

    #[test]
    fn latest_event_without_address_has_no_location() {
        let body = json!({
            "shipments": [{
                "status": { "statusCode": "transit" },
                "events": [{ "description": "Processed" }]
            }]
        });

        let result = parse_tracking_response(&body);
        assert_eq!(result.location, None);
        assert_eq!(result.events.len(), 1);
    }

    proptest! {
        /// Locality and country are joined in that order.
        #[test]
        fn location_joins_locality_and_country(
            locality in "[A-Za-z][A-Za-z ]{0,20}",
            country in "[A-Z]{2}"
        ) {
            let body = json!({
                "shipments": [{
                    "events": [{ "location": { "address": {
                        "addressLocality": locality.clone(),
                        "countryCode": country.clone()
                    } } }]
                }]
            });

            let result = parse_tracking_response(&body);
            prop_assert_eq!(result.location, Some(format!("{locality}, {country}")));
            prop_assert_eq!(result.status, None);
        }
    }
}
