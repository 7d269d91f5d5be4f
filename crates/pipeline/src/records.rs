//! Request-scoped recommendation types.
//!
//! These are created fresh for every request and never persisted. The JSON
//! shapes are part of the HTTP contract, so field names and omission rules
//! are fixed by the serde attributes below.

use catalog::CourseId;
use serde::{Deserialize, Serialize};

/// One recommendation decoded from scorer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub course_id: CourseId,
    pub title: String,
    /// Usually within 0.0..=1.0, but the scorer's range is not enforced
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecommendationRecord {
    pub fn new(course_id: CourseId, title: impl Into<String>, score: f64) -> Self {
        Self {
            course_id,
            title: title.into(),
            score,
            reason: None,
            description: None,
        }
    }
}

/// A scorer-reported condition such as "student not in training data".
///
/// Sent as `{"error": "..."}` in place of recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerNotice {
    pub error: String,
}

/// One element of decoded scorer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedItem {
    Recommendation(RecommendationRecord),
    Notice(ScorerNotice),
}

impl DecodedItem {
    pub fn as_recommendation(&self) -> Option<&RecommendationRecord> {
        match self {
            DecodedItem::Recommendation(record) => Some(record),
            DecodedItem::Notice(_) => None,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, DecodedItem::Notice(_))
    }
}

impl From<RecommendationRecord> for DecodedItem {
    fn from(record: RecommendationRecord) -> Self {
        DecodedItem::Recommendation(record)
    }
}

/// Catalog-backed details attached to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CourseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// "First Last", or "Unknown" when either name is missing
    pub instructor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// The response unit: a decoded record plus its course details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecommendation {
    #[serde(flatten)]
    pub record: RecommendationRecord,
    #[serde(rename = "courseDetails")]
    pub course_details: CourseDetails,
}

/// What the recommendations endpoint returns.
///
/// Both variants serialize as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Enriched(Vec<EnrichedRecommendation>),
    /// Decoder output returned unchanged: empty, or led by a scorer notice
    PassThrough(Vec<DecodedItem>),
}

impl RecommendationResponse {
    pub fn len(&self) -> usize {
        match self {
            RecommendationResponse::Enriched(items) => items.len(),
            RecommendationResponse::PassThrough(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
