//! Decoding and enrichment of scorer output.
//!
//! This crate provides:
//! - Line classification for the scorer's text format
//! - A decoder that turns raw scorer output into recommendation items
//! - An enricher that joins recommendations with catalog data
//!
//! ## Architecture
//! A request flows through two stages:
//! 1. [`decode`] reads the scorer's stdout (JSON block or text) into
//!    [`DecodedItem`]s. It never fails.
//! 2. [`Enricher::enrich`] looks up all recommended courses in one catalog
//!    call and attaches [`CourseDetails`] to each, preserving order.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{decode, Enricher};
//!
//! let items = decode(&stdout);
//! let enricher = Enricher::new(catalog.clone());
//! let response = enricher.enrich(items).await?;
//! ```

pub mod records;
pub mod lines;
pub mod decoder;
pub mod enrichment;

// Re-export main types
pub use decoder::{decode, decode_json_block, decode_text};
pub use enrichment::{Enricher, instructor_name, merge_with_catalog};
pub use records::{
    CourseDetails, DecodedItem, EnrichedRecommendation, RecommendationRecord,
    RecommendationResponse, ScorerNotice,
};
