use async_trait::async_trait;
use serde_json::Value;

use crate::CoreResult;

/// One page of a bounded hotel-table scan. The cursor is opaque to clients;
/// it round-trips through the `lastKey` query parameter.
#[derive(Debug, Clone)]
pub struct HotelPage {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

/// Read-only access to the hotel inventory table.
#[async_trait]
pub trait HotelStore: Send + Sync {
    /// Scans one page of up to ten hotels, resuming from `cursor`.
    async fn list(&self, cursor: Option<&str>) -> CoreResult<HotelPage>;

    /// Case-sensitive contains filter on the hotel name.
    async fn search_by_name(&self, name: &str) -> CoreResult<Vec<Value>>;

    /// Contains filter on the nested region name.
    async fn filter_by_region(&self, region: &str) -> CoreResult<Vec<Value>>;
}
