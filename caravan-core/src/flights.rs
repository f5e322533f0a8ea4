use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One directional leg of an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSlice {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
}

/// Passenger descriptor as the flight provider expects it, e.g. `adult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPassenger {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result of an offer-request + offer-list round trip. Offers are kept raw;
/// the API layer shapes them for clients.
#[derive(Debug, Clone)]
pub struct FlightSearchData {
    pub offer_request_id: String,
    pub offers: Vec<Value>,
    pub slices: Value,
}
