use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use caravan_core::flights::{FlightPassenger, FlightSearchData, FlightSlice};
use caravan_core::supplier::FlightSupplier;
use caravan_core::{CoreError, CoreResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DUFFEL_VERSION: &str = "v2";
const OFFER_PAGE_LIMIT: u32 = 50;

pub struct DuffelClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DuffelClient {
    pub fn new(base_url: String, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Duffel-Version", DUFFEL_VERSION)
    }

    async fn send(&self, builder: RequestBuilder) -> CoreResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(CoreError::Upstream(upstream_message(&body, status)));
        }
        Ok(body)
    }
}

// Duffel wraps failures as {"errors": [{"message": ...}, ...]}; surface the
// first message when present so callers see the provider's own wording.
fn upstream_message(body: &Value, status: StatusCode) -> String {
    body.get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Duffel API error: {}", status))
}

#[async_trait]
impl FlightSupplier for DuffelClient {
    /// Two sequential calls: create an offer request, then list the offers
    /// priced against it.
    async fn search_flights(
        &self,
        slices: &[FlightSlice],
        passengers: &[FlightPassenger],
        cabin_class: &str,
        max_connections: u32,
    ) -> CoreResult<FlightSearchData> {
        let payload = json!({
            "data": {
                "slices": slices,
                "passengers": passengers,
                "cabin_class": cabin_class,
                "max_connections": max_connections,
            }
        });

        let created = self
            .send(self.request(Method::POST, "/air/offer_requests").json(&payload))
            .await?;

        let offer_request_id = created["data"]["id"]
            .as_str()
            .ok_or_else(|| CoreError::Upstream("offer request response carried no id".to_string()))?
            .to_string();
        debug!(%offer_request_id, "offer request created");

        let limit = OFFER_PAGE_LIMIT.to_string();
        let offers = self
            .send(self.request(Method::GET, "/air/offers").query(&[
                ("offer_request_id", offer_request_id.as_str()),
                ("limit", limit.as_str()),
            ]))
            .await?;

        Ok(FlightSearchData {
            offers: offers["data"].as_array().cloned().unwrap_or_default(),
            slices: created["data"]["slices"].clone(),
            offer_request_id,
        })
    }

    async fn offer_details(&self, offer_id: &str) -> CoreResult<Value> {
        let body = self
            .send(self.request(Method::GET, &format!("/air/offers/{}", offer_id)))
            .await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn search_airports(&self, query: &str) -> CoreResult<Vec<Value>> {
        let body = self
            .send(
                self.request(Method::GET, "/air/airports")
                    .query(&[("name", query)]),
            )
            .await?;

        // Some deployments return the list bare instead of under `data`.
        let airports = match body.get("data") {
            Some(data) => data.as_array().cloned().unwrap_or_default(),
            None => body.as_array().cloned().unwrap_or_default(),
        };
        Ok(airports)
    }

    async fn airline(&self, airline_id: &str) -> CoreResult<Value> {
        let body = self
            .send(self.request(Method::GET, &format!("/air/airlines/{}", airline_id)))
            .await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}
