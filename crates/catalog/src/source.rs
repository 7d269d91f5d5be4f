//! The batch lookup seam between the enrichment step and catalog storage.

use crate::error::Result;
use crate::types::{CatalogEntry, CatalogIndex, CourseId};
use async_trait::async_trait;
use std::collections::HashSet;

/// Read-only batch access to the course catalog.
///
/// Implementations must answer a whole batch with one storage round trip.
/// Ids with no matching course are simply absent from the result; that is
/// not an error. Entries come back in no particular order.
///
/// `Send + Sync` so a catalog can be shared behind an `Arc` across request
/// tasks.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &str;

    /// Fetch the catalog entries for every id in `ids`.
    async fn fetch_entries(&self, ids: &[CourseId]) -> Result<Vec<CatalogEntry>>;
}

#[async_trait]
impl CourseCatalog for CatalogIndex {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn fetch_entries(&self, ids: &[CourseId]) -> Result<Vec<CatalogEntry>> {
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.entry(*id))
            .collect())
    }
}
