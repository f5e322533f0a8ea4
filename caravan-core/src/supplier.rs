use async_trait::async_trait;
use serde_json::Value;

use crate::flights::{FlightPassenger, FlightSearchData, FlightSlice};
use crate::search::{RatehawkSuggestions, SearchRequest, Suggestion, TboSearchRequest};
use crate::CoreResult;

/// Ratehawk hotel-search API.
#[async_trait]
pub trait RatehawkSupplier: Send + Sync {
    /// Autocomplete lookup. Returns regions and hotels still in provider
    /// shape; the API layer maps them to [`Suggestion`]s.
    async fn suggest(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> CoreResult<RatehawkSuggestions>;

    /// Region search. Requires checkin, checkout and a numeric region id.
    async fn search(&self, req: &SearchRequest) -> CoreResult<Value>;
}

/// TBO hotel-search API.
#[async_trait]
pub trait TboSupplier: Send + Sync {
    /// City autocomplete for a country, at most ten results.
    async fn suggest(&self, query: &str, country_code: &str) -> CoreResult<Vec<Suggestion>>;

    /// Raw hotel-code list for a city. `detailed` is forwarded verbatim
    /// because the upstream accepts both strings and booleans there.
    async fn hotel_codes(&self, city_code: &str, detailed: Value) -> CoreResult<Value>;

    /// Hotel search with code resolution and date coercion applied.
    async fn search(&self, req: &TboSearchRequest) -> CoreResult<Value>;
}

/// Duffel flight-search API.
#[async_trait]
pub trait FlightSupplier: Send + Sync {
    async fn search_flights(
        &self,
        slices: &[FlightSlice],
        passengers: &[FlightPassenger],
        cabin_class: &str,
        max_connections: u32,
    ) -> CoreResult<FlightSearchData>;

    async fn offer_details(&self, offer_id: &str) -> CoreResult<Value>;

    async fn search_airports(&self, query: &str) -> CoreResult<Vec<Value>>;

    async fn airline(&self, airline_id: &str) -> CoreResult<Value>;
}
