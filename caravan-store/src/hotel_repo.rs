use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use caravan_core::store::{HotelPage, HotelStore};
use caravan_core::{CoreError, CoreResult};

const PAGE_SIZE: i64 = 10;

/// Hotel inventory reader over the pre-existing hotels table. Each row holds
/// the full hotel record as one JSONB document keyed by a text id, so scans
/// return items exactly as they were loaded.
pub struct PgHotelStore {
    pool: PgPool,
    table: String,
}

impl PgHotelStore {
    pub fn new(pool: PgPool, table: String) -> Self {
        Self { pool, table }
    }
}

fn store_error(err: sqlx::Error) -> CoreError {
    CoreError::StoreUnavailable(err.to_string())
}

/// The page cursor clients see: the last id of the previous page as
/// URL-encoded JSON, opaque by convention.
fn encode_cursor(last_id: &str) -> CoreResult<String> {
    let key = serde_json::to_string(&serde_json::json!({ "id": last_id }))
        .map_err(|e| CoreError::Internal(e.to_string()))?;
    Ok(urlencoding::encode(&key).into_owned())
}

fn decode_cursor(cursor: &str) -> CoreResult<String> {
    let raw = urlencoding::decode(cursor).map_err(|e| CoreError::Internal(e.to_string()))?;
    let key: Value =
        serde_json::from_str(&raw).map_err(|e| CoreError::Internal(e.to_string()))?;
    key.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CoreError::Internal("page cursor carries no id".to_string()))
}

#[async_trait]
impl HotelStore for PgHotelStore {
    async fn list(&self, cursor: Option<&str>) -> CoreResult<HotelPage> {
        let after = match cursor {
            Some(c) => Some(decode_cursor(c)?),
            None => None,
        };

        let sql = format!(
            "SELECT id, document FROM {} WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(after)
            .bind(PAGE_SIZE)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        let mut items = Vec::with_capacity(rows.len());
        let mut last_id: Option<String> = None;
        for row in &rows {
            let id: String = row.try_get("id").map_err(store_error)?;
            let document: Value = row.try_get("document").map_err(store_error)?;
            items.push(document);
            last_id = Some(id);
        }

        // A short page means the scan is exhausted.
        let next_cursor = match last_id {
            Some(id) if items.len() as i64 == PAGE_SIZE => Some(encode_cursor(&id)?),
            _ => None,
        };

        Ok(HotelPage { items, next_cursor })
    }

    async fn search_by_name(&self, name: &str) -> CoreResult<Vec<Value>> {
        let sql = format!(
            "SELECT document FROM {} WHERE strpos(document->>'name', $1) > 0",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(|row| row.try_get("document").map_err(store_error))
            .collect()
    }

    async fn filter_by_region(&self, region: &str) -> CoreResult<Vec<Value>> {
        let sql = format!(
            "SELECT document FROM {} WHERE strpos(document->'region'->>'name', $1) > 0",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(region)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(|row| row.try_get("document").map_err(store_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_round_trips() {
        let cursor = encode_cursor("hotel-00042").unwrap();
        // Opaque to clients, but URL-safe by construction.
        assert!(!cursor.contains('{'));
        assert_eq!(decode_cursor(&cursor).unwrap(), "hotel-00042");
    }

    #[test]
    fn garbage_cursor_is_rejected() {
        assert!(decode_cursor("not-json").is_err());
        assert!(decode_cursor("%7B%22other%22%3A1%7D").is_err());
    }
}
