//! Joining decoded recommendations with catalog data.

use std::collections::HashMap;
use std::sync::Arc;

use catalog::{CatalogEntry, CourseCatalog, CourseId};
use tracing::{debug, info, warn};

use crate::records::{
    CourseDetails, DecodedItem, EnrichedRecommendation, RecommendationRecord,
    RecommendationResponse,
};

const UNKNOWN_INSTRUCTOR: &str = "Unknown";

/// Enriches decoded recommendations with one batch catalog lookup.
#[derive(Clone)]
pub struct Enricher {
    catalog: Arc<dyn CourseCatalog>,
}

impl Enricher {
    pub fn new(catalog: Arc<dyn CourseCatalog>) -> Self {
        Self { catalog }
    }

    /// Enrich decoded items, preserving their order.
    ///
    /// Empty input, or input led by a scorer notice, is returned unchanged
    /// without touching the catalog. Courses missing from the catalog fall
    /// back to the decoded fields. The only error is the catalog itself
    /// failing.
    pub async fn enrich(&self, items: Vec<DecodedItem>) -> catalog::Result<RecommendationResponse> {
        if items.first().is_none_or(DecodedItem::is_notice) {
            debug!("Nothing to enrich, passing {} items through", items.len());
            return Ok(RecommendationResponse::PassThrough(items));
        }

        let records: Vec<RecommendationRecord> = items
            .into_iter()
            .filter_map(|item| match item {
                DecodedItem::Recommendation(record) => Some(record),
                DecodedItem::Notice(notice) => {
                    warn!("Dropping scorer notice between recommendations: {}", notice.error);
                    None
                }
            })
            .collect();

        let course_ids: Vec<CourseId> = records.iter().map(|r| r.course_id).collect();
        let entries = self.catalog.fetch_entries(&course_ids).await?;
        info!(
            "Catalog '{}' returned {} entries for {} recommendations",
            self.catalog.name(),
            entries.len(),
            records.len()
        );

        Ok(RecommendationResponse::Enriched(merge_with_catalog(
            records, &entries,
        )))
    }
}

/// Merge each record with its catalog entry, in record order.
///
/// When the catalog holds several entries for one id the first wins.
pub fn merge_with_catalog(
    records: Vec<RecommendationRecord>,
    entries: &[CatalogEntry],
) -> Vec<EnrichedRecommendation> {
    let mut by_id: HashMap<CourseId, &CatalogEntry> = HashMap::new();
    for entry in entries {
        if let Some(id) = entry.id {
            by_id.entry(id).or_insert(entry);
        }
    }

    let missing = CatalogEntry::default();
    records
        .into_iter()
        .map(|record| {
            let entry = match by_id.get(&record.course_id) {
                Some(entry) => *entry,
                None => {
                    debug!("Course {} not in catalog, using scorer fields", record.course_id);
                    &missing
                }
            };
            let course_details = course_details(&record, entry);
            EnrichedRecommendation {
                record,
                course_details,
            }
        })
        .collect()
}

/// Display name of the entry's instructor.
///
/// "First Last" when both names are present and non-empty, otherwise
/// `"Unknown"`.
pub fn instructor_name(entry: &CatalogEntry) -> String {
    match (
        non_empty(&entry.instructor_first_name),
        non_empty(&entry.instructor_last_name),
    ) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => UNKNOWN_INSTRUCTOR.to_string(),
    }
}

fn course_details(record: &RecommendationRecord, entry: &CatalogEntry) -> CourseDetails {
    let instructor = instructor_name(entry);

    CourseDetails {
        id: entry.id,
        title: Some(
            non_empty(&entry.title)
                .map(str::to_string)
                .unwrap_or_else(|| record.title.clone()),
        ),
        description: non_empty(&entry.description)
            .map(str::to_string)
            .or_else(|| record.description.clone()),
        instructor,
        department: entry.department_name.clone(),
        thumbnail: entry.thumbnail_url.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
