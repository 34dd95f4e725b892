use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::Property,
    services::providers::PropertyCatalog,
};

/// Fixed listing set held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    properties: Vec<Property>,
}

impl InMemoryCatalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// Loads a JSON array of properties from disk
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read catalog seed {}: {}", path.display(), e))
        })?;
        let properties: Vec<Property> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Internal(format!("Invalid catalog seed {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            properties = properties.len(),
            "Loaded catalog seed"
        );

        Ok(Self::new(properties))
    }
}

#[async_trait::async_trait]
impl PropertyCatalog for InMemoryCatalog {
    async fn list_properties(&self) -> AppResult<Vec<Property>> {
        Ok(self.properties.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
