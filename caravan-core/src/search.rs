use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_adults() -> u32 {
    1
}

fn default_residency() -> String {
    "GB".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_guests() -> Vec<GuestGroup> {
    vec![GuestGroup::default()]
}

/// One room's worth of travellers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestGroup {
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: Vec<u32>,
}

impl Default for GuestGroup {
    fn default() -> Self {
        Self {
            adults: 1,
            children: Vec::new(),
        }
    }
}

/// Simplified hotel-search request as clients send it. Region ids arrive as
/// strings or numbers depending on the caller, so the field stays a raw
/// `Value` until a provider client coerces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    #[serde(default = "default_residency")]
    pub residency: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_guests")]
    pub guests: Vec<GuestGroup>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub region_id: Option<Value>,
}

/// Request body for the combined multi-provider search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSearchRequest {
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    #[serde(default = "default_residency")]
    pub residency: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_guests")]
    pub guests: Vec<GuestGroup>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub region_id: Option<Value>,
    #[serde(default)]
    pub tbo_city_code: Option<Value>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Autocomplete result normalized across providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Value,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub provider: String,
}

/// Regions and hotels straight out of the Ratehawk multicomplete call,
/// already pulled out of whichever envelope the response used.
#[derive(Debug, Clone, Default)]
pub struct RatehawkSuggestions {
    pub regions: Vec<Value>,
    pub hotels: Vec<Value>,
}

/// Everything the TBO search path needs after the free-form request body has
/// been picked apart. `city_hint` is only consulted when the caller did not
/// supply `hotel_codes` directly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TboSearchRequest {
    pub city_hint: Option<String>,
    pub hotel_codes: Option<Vec<String>>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub country_code: Option<String>,
    pub guests: Option<Vec<GuestGroup>>,
}

/// Per-provider outcome of the combined search. A branch that was skipped or
/// failed stays `null`; failures land in `errors` instead of aborting the
/// other branch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CombinedResults {
    pub ratehawk: Option<Value>,
    pub tbo: Option<Value>,
    pub errors: Vec<ProviderFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// Renders a region/city identifier from a JSON field that may be a string
/// or a number. Empty strings and anything else yield `None`.
pub fn code_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_string_accepts_strings_and_numbers() {
        assert_eq!(code_string(&json!("100765")), Some("100765".to_string()));
        assert_eq!(code_string(&json!(100765)), Some("100765".to_string()));
    }

    #[test]
    fn code_string_rejects_empty_and_other_types() {
        assert_eq!(code_string(&json!("")), None);
        assert_eq!(code_string(&json!(null)), None);
        assert_eq!(code_string(&json!(["100765"])), None);
    }

    #[test]
    fn search_request_fills_defaults() {
        let req: SearchRequest =
            serde_json::from_value(json!({ "checkin": "2025-12-01", "checkout": "2025-12-05" }))
                .unwrap();
        assert_eq!(req.residency, "GB");
        assert_eq!(req.language, "en");
        assert_eq!(req.currency, "EUR");
        assert_eq!(req.guests.len(), 1);
        assert_eq!(req.guests[0].adults, 1);
        assert!(req.guests[0].children.is_empty());
        assert!(req.region_id.is_none());
    }

    #[test]
    fn guest_group_defaults_adults() {
        let group: GuestGroup = serde_json::from_value(json!({ "children": [4, 9] })).unwrap();
        assert_eq!(group.adults, 1);
        assert_eq!(group.children, vec![4, 9]);
    }

    #[test]
    fn suggestion_omits_missing_country_code() {
        let suggestion = Suggestion {
            id: json!(42),
            name: "Deira".to_string(),
            kind: "City".to_string(),
            country_code: None,
            provider: "tbo".to_string(),
        };
        let rendered = serde_json::to_value(&suggestion).unwrap();
        assert!(rendered.get("country_code").is_none());
        assert_eq!(rendered["type"], "City");
    }
}
