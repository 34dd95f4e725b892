//! Property catalog sources
//!
//! Recommendation runs read the full listing set from a `PropertyCatalog`. The
//! hosted catalog is a Supabase table; a fixed in-memory list backs tests and
//! local runs without credentials.

use crate::{
    error::{AppError, AppResult},
    models::Property,
};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryCatalog;
pub use supabase::SupabaseCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PropertyCatalog: Send + Sync {
    /// All listings, in catalog order
    async fn list_properties(&self) -> AppResult<Vec<Property>>;

    /// Single listing by id
    ///
    /// Default implementation scans `list_properties`; sources with a keyed
    /// lookup can override it.
    async fn get_property(&self, id: &str) -> AppResult<Property> {
        self.list_properties()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", id)))
    }

    /// Source name for logging
    fn name(&self) -> &'static str;
}
