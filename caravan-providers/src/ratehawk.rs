use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use caravan_core::search::{RatehawkSuggestions, SearchRequest};
use caravan_core::supplier::RatehawkSupplier;
use caravan_core::{CoreError, CoreResult};

use crate::envelope::first_array;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MULTICOMPLETE_PATH: &str = "search/multicomplete/";
const REGION_SERP_PATH: &str = "search/serp/region/";

pub struct RatehawkClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    api_key: String,
}

impl RatehawkClient {
    pub fn new(base_url: String, key_id: String, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url,
            key_id,
            api_key,
        }
    }

    async fn post(&self, path: &str, body: Value) -> CoreResult<Value> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "Ratehawk API error: {} - {}",
                status.as_u16(),
                text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))
    }
}

// The multicomplete response puts `regions`/`hotels` either at the top level
// or under `data`, depending on the gateway in front of the API.
fn suggestion_section(response: &Value, key: &str) -> Vec<Value> {
    first_array(response, &[&[key], &["data", key]])
        .cloned()
        .unwrap_or_default()
}

/// Region ids arrive as numbers or numeric strings; the SERP endpoint only
/// accepts numbers.
pub fn numeric_region_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl RatehawkSupplier for RatehawkClient {
    async fn suggest(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> CoreResult<RatehawkSuggestions> {
        let response = self
            .post(
                MULTICOMPLETE_PATH,
                json!({ "query": query.trim(), "language": language, "limit": limit }),
            )
            .await?;

        Ok(RatehawkSuggestions {
            regions: suggestion_section(&response, "regions"),
            hotels: suggestion_section(&response, "hotels"),
        })
    }

    async fn search(&self, req: &SearchRequest) -> CoreResult<Value> {
        let checkin = req
            .checkin
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::MissingParameter("checkin".to_string()))?;
        let checkout = req
            .checkout
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::MissingParameter("checkout".to_string()))?;
        let region_id = req
            .region_id
            .as_ref()
            .and_then(numeric_region_id)
            .ok_or_else(|| CoreError::MissingParameter("region_id".to_string()))?;

        let payload = json!({
            "checkin": checkin,
            "checkout": checkout,
            "residency": req.residency,
            "language": req.language,
            "guests": req.guests,
            "currency": req.currency,
            "region_id": region_id,
        });

        self.post(REGION_SERP_PATH, payload).await
    }
}
