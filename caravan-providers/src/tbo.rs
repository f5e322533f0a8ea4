use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};

use caravan_core::dates::future_or;
use caravan_core::search::{Suggestion, TboSearchRequest};
use caravan_core::supplier::TboSupplier;
use caravan_core::{CoreError, CoreResult};

use crate::envelope::first_array;
use crate::tables::ResolutionTables;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SUGGEST_LIMIT: usize = 10;
const MAPPED_CODE_LIMIT: usize = 10;
const LISTED_CODE_LIMIT: usize = 50;

// Envelope shapes seen in the wild, highest priority first.
const CITY_ENVELOPES: &[&[&str]] = &[&["data", "Cities"], &["Cities"], &["Data", "Cities"], &["Data"]];
const HOTEL_ENVELOPES: &[&[&str]] = &[
    &["data", "Hotels"],
    &["Hotels"],
    &["HotelList"],
    &["Data", "Hotels"],
    &["Data"],
];

pub struct TboClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    tables: ResolutionTables,
}

impl TboClient {
    pub fn new(base_url: String, username: String, password: String, tables: ResolutionTables) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url,
            username,
            password,
            tables,
        }
    }

    /// POSTs to a TBO endpoint with the credentials merged into the body,
    /// which is how this upstream authenticates alongside Basic auth.
    async fn post(&self, path: &str, mut body: Value) -> CoreResult<Value> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(CoreError::Upstream("TBO credentials not configured".to_string()));
        }

        if let Some(map) = body.as_object_mut() {
            map.insert("UserName".to_string(), json!(self.username));
            map.insert("Password".to_string(), json!(self.password));
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "TBO API error: {} - {}",
                status.as_u16(),
                text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))
    }

    async fn city_list(&self, country_code: &str) -> CoreResult<Value> {
        self.post(
            "CityList",
            json!({ "CountryCode": country_code, "IsDetailedResponse": "true" }),
        )
        .await
    }

    /// Pulls hotel codes for a city from the upstream list endpoint.
    async fn listed_hotel_codes(&self, city_code: &str) -> CoreResult<Vec<String>> {
        let response = self
            .post(
                "TBOHotelCodeList",
                json!({ "CityCode": city_code, "IsDetailedResponse": "true" }),
            )
            .await?;

        let hotels = first_array(&response, HOTEL_ENVELOPES)
            .cloned()
            .unwrap_or_default();
        Ok(hotels
            .iter()
            .filter_map(hotel_code)
            .take(LISTED_CODE_LIMIT)
            .collect())
    }

    /// Turns a region id or city code into a bounded hotel-code list.
    ///
    /// Unmapped inputs are taken literally as TBO city codes. A curated list
    /// wins outright; otherwise the upstream list endpoint is consulted, and
    /// any failure or empty result degrades to the fixed fallback list so a
    /// search never dies on code resolution alone.
    pub async fn resolve_hotel_codes(&self, candidate: &str) -> Vec<String> {
        let city = match self.tables.city_code_for(candidate) {
            Some(mapped) => mapped,
            None => {
                debug!(candidate, "no region mapping, using input as TBO city code");
                candidate
            }
        };

        if let Some(codes) = self.tables.hotel_codes_for(city) {
            return codes.iter().take(MAPPED_CODE_LIMIT).cloned().collect();
        }

        match self.listed_hotel_codes(city).await {
            Ok(codes) if !codes.is_empty() => codes,
            Ok(_) => {
                warn!(candidate, city, "no hotel codes found, using fallback list");
                self.fallback_codes()
            }
            Err(err) => {
                warn!(candidate, city, error = %err, "hotel code resolution failed, using fallback list");
                self.fallback_codes()
            }
        }
    }

    fn fallback_codes(&self) -> Vec<String> {
        self.tables
            .fallback_codes()
            .iter()
            .take(MAPPED_CODE_LIMIT)
            .cloned()
            .collect()
    }
}

fn hotel_code(hotel: &Value) -> Option<String> {
    for key in ["Code", "HotelCode", "Id"] {
        match hotel.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Builds the upstream search body. `today` is a parameter so the date rule
/// stays testable; production passes the current UTC date.
pub fn build_search_body(req: &TboSearchRequest, hotel_codes: &[String], today: NaiveDate) -> Value {
    let pax_rooms: Vec<Value> = match &req.guests {
        Some(groups) => groups
            .iter()
            .map(|g| {
                json!({
                    "Adults": g.adults.max(1),
                    "Children": g.children.len(),
                    "ChildrenAges": g.children,
                })
            })
            .collect(),
        None => vec![json!({ "Adults": 1, "Children": 0, "ChildrenAges": [] })],
    };

    let mut body = json!({
        "CheckIn": future_or(req.checkin.as_deref(), today, 1),
        "CheckOut": future_or(req.checkout.as_deref(), today, 2),
        "GuestNationality": req.country_code.clone().unwrap_or_else(|| "AE".to_string()),
        "PaxRooms": pax_rooms,
        "ResponseTime": 18,
        "IsDetailedResponse": true,
        "Filters": {
            "Refundable": true,
            "NoOfRooms": 0,
            "MealType": "All",
        },
    });

    if !hotel_codes.is_empty() {
        body["HotelCodes"] = json!(hotel_codes.join(","));
    }

    body
}

#[async_trait]
impl TboSupplier for TboClient {
    async fn suggest(&self, query: &str, country_code: &str) -> CoreResult<Vec<Suggestion>> {
        let response = self.city_list(country_code).await?;
        let cities = first_array(&response, CITY_ENVELOPES)
            .cloned()
            .unwrap_or_default();

        let needle = query.to_lowercase();
        Ok(cities
            .iter()
            .filter(|city| {
                city.get("CityName")
                    .and_then(Value::as_str)
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .take(SUGGEST_LIMIT)
            .map(|city| Suggestion {
                id: city.get("CityCode").cloned().unwrap_or(Value::Null),
                name: city
                    .get("CityName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                kind: "City".to_string(),
                country_code: city
                    .get("CountryCode")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                provider: "tbo".to_string(),
            })
            .collect())
    }

    async fn hotel_codes(&self, city_code: &str, detailed: Value) -> CoreResult<Value> {
        self.post(
            "TBOHotelCodeList",
            json!({ "CityCode": city_code, "IsDetailedResponse": detailed }),
        )
        .await
    }

    async fn search(&self, req: &TboSearchRequest) -> CoreResult<Value> {
        let codes = match (&req.hotel_codes, &req.city_hint) {
            (Some(codes), _) => codes.clone(),
            (None, Some(city)) => self.resolve_hotel_codes(city).await,
            (None, None) => Vec::new(),
        };

        let body = build_search_body(req, &codes, Utc::now().date_naive());
        debug!(payload = %body, "tbo search payload");
        self.post("search", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravan_core::search::GuestGroup;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn unreachable_client() -> TboClient {
        // Empty credentials make every upstream call fail before the network,
        // so resolution tests exercise the fallback path deterministically.
        TboClient::new(
            "http://127.0.0.1:9".to_string(),
            String::new(),
            String::new(),
            ResolutionTables::builtin(),
        )
    }

    #[tokio::test]
    async fn curated_city_resolves_to_first_ten_codes() {
        let client = unreachable_client();
        let codes = client.resolve_hotel_codes("100765").await;
        assert_eq!(codes.len(), 10);
        assert_eq!(codes[0], "1402689");
        assert_eq!(codes[9], "1415518");
    }

    #[tokio::test]
    async fn unmapped_region_passes_through_as_city_code() {
        // "777" has a curated list but no region mapping, so the input itself
        // must be taken as the city code.
        let mut city_hotels = std::collections::HashMap::new();
        city_hotels.insert("777".to_string(), vec!["900001".to_string(), "900002".to_string()]);
        let tables = ResolutionTables::new(
            std::collections::HashMap::new(),
            city_hotels,
            vec!["999999".to_string()],
        );
        let client = TboClient::new(
            "http://127.0.0.1:9".to_string(),
            String::new(),
            String::new(),
            tables,
        );

        let codes = client.resolve_hotel_codes("777").await;
        assert_eq!(codes, vec!["900001".to_string(), "900002".to_string()]);
    }

    #[tokio::test]
    async fn unknown_city_with_failing_upstream_uses_fallback() {
        let client = unreachable_client();
        let codes = client.resolve_hotel_codes("somewhere-else").await;
        let fallback: Vec<String> = ResolutionTables::builtin()
            .fallback_codes()
            .iter()
            .take(10)
            .cloned()
            .collect();
        assert_eq!(codes, fallback);
    }

    #[test]
    fn search_body_applies_defaults() {
        let req = TboSearchRequest {
            city_hint: Some("100765".to_string()),
            checkin: Some("2025-12-01".to_string()),
            checkout: Some("2025-12-05".to_string()),
            country_code: Some("AE".to_string()),
            ..Default::default()
        };
        let codes = vec!["1402689".to_string(), "1405349".to_string()];
        let body = build_search_body(&req, &codes, today());

        assert_eq!(body["CheckIn"], "2025-12-01");
        assert_eq!(body["CheckOut"], "2025-12-05");
        assert_eq!(body["HotelCodes"], "1402689,1405349");
        assert_eq!(body["GuestNationality"], "AE");
        assert_eq!(body["ResponseTime"], 18);
        assert_eq!(body["IsDetailedResponse"], true);
        assert_eq!(body["Filters"]["Refundable"], true);
        assert_eq!(body["Filters"]["NoOfRooms"], 0);
        assert_eq!(body["Filters"]["MealType"], "All");
        assert_eq!(
            body["PaxRooms"],
            json!([{ "Adults": 1, "Children": 0, "ChildrenAges": [] }])
        );
    }

    #[test]
    fn search_body_pushes_stale_dates_forward() {
        let req = TboSearchRequest {
            checkin: Some("2025-06-15".to_string()),
            checkout: Some("2025-06-10".to_string()),
            ..Default::default()
        };
        let body = build_search_body(&req, &[], today());
        assert_eq!(body["CheckIn"], "2025-06-16");
        assert_eq!(body["CheckOut"], "2025-06-17");
        assert!(body.get("HotelCodes").is_none());
        assert_eq!(body["GuestNationality"], "AE");
    }

    #[test]
    fn search_body_maps_guest_groups() {
        let req = TboSearchRequest {
            guests: Some(vec![
                GuestGroup { adults: 2, children: vec![4, 9] },
                GuestGroup { adults: 0, children: vec![] },
            ]),
            ..Default::default()
        };
        let body = build_search_body(&req, &[], today());
        assert_eq!(
            body["PaxRooms"],
            json!([
                { "Adults": 2, "Children": 2, "ChildrenAges": [4, 9] },
                { "Adults": 1, "Children": 0, "ChildrenAges": [] },
            ])
        );
    }

    #[test]
    fn hotel_code_tries_keys_in_order() {
        assert_eq!(hotel_code(&json!({ "Code": "1402689" })), Some("1402689".to_string()));
        assert_eq!(hotel_code(&json!({ "HotelCode": 1405349 })), Some("1405349".to_string()));
        assert_eq!(hotel_code(&json!({ "Id": "abc" })), Some("abc".to_string()));
        assert_eq!(hotel_code(&json!({ "Name": "no code" })), None);
        assert_eq!(hotel_code(&json!({ "Code": "" })), None);
    }
}
