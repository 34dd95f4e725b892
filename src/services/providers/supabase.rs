//! Supabase-hosted property catalog
//!
//! Reads the `properties` table through the PostgREST endpoint. The full
//! listing set is cached in Redis for five minutes.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::Property,
    services::providers::PropertyCatalog,
};
use reqwest::Client as HttpClient;

const CATALOG_CACHE_TTL: u64 = 300; // 5 minutes
const PROPERTIES_TABLE: &str = "properties";

#[derive(Clone)]
pub struct SupabaseCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl SupabaseCatalog {
    pub fn new(cache: Cache, api_url: String, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    fn listings_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.api_url.trim_end_matches('/'),
            PROPERTIES_TABLE
        )
    }

    async fn fetch_properties(&self) -> AppResult<Vec<Property>> {
        let response = self
            .http_client
            .get(self.listings_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Catalog request failed");
            return Err(AppError::ExternalApi(format!(
                "Catalog returned status {}: {}",
                status, body
            )));
        }

        let rows: serde_json::Value = response.json().await?;
        let properties = parse_rows(rows)?;

        tracing::info!(
            properties = properties.len(),
            provider = "supabase",
            "Catalog fetched"
        );

        Ok(properties)
    }
}

/// Converts PostgREST rows, skipping rows that do not describe a valid listing
fn parse_rows(rows: serde_json::Value) -> AppResult<Vec<Property>> {
    let rows = rows
        .as_array()
        .ok_or_else(|| AppError::ExternalApi("Catalog response is not an array".to_string()))?;

    let properties: Vec<Property> = rows
        .iter()
        .filter_map(|row| match serde_json::from_value::<Property>(row.clone()) {
            Ok(property) => Some(property),
            Err(e) => {
                tracing::warn!(error = %e, id = %row["id"], "Skipping malformed catalog row");
                None
            }
        })
        .collect();

    Ok(properties)
}

#[async_trait::async_trait]
impl PropertyCatalog for SupabaseCatalog {
    async fn list_properties(&self) -> AppResult<Vec<Property>> {
        cached!(
            self.cache,
            CacheKey::Catalog,
            Some(CATALOG_CACHE_TTL),
            self.fetch_properties()
        )
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_listings_url_trims_trailing_slash() {
        let client = redis::Client::open("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        let catalog = SupabaseCatalog::new(
            cache,
            "https://abc.supabase.co/".to_string(),
            "anon".to_string(),
        );
        assert_eq!(
            catalog.listings_url(),
            "https://abc.supabase.co/rest/v1/properties"
        );
        assert_eq!(catalog.name(), "supabase");
    }

    #[test]
    fn test_parse_rows_skips_malformed() {
        let rows = json!([
            { "id": "p-1", "zone": "north", "type": "plot", "status": "active", "tags": ["trending"] },
            { "id": "p-2", "zone": "west" },
            { "id": "p-3", "zone": "south", "type": "villa", "status": "pre-launch", "configurations": null }
        ]);

        let properties = parse_rows(rows).unwrap();
        let ids: Vec<&str> = properties.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-3"]);
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        let err = parse_rows(json!({ "message": "permission denied" })).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
