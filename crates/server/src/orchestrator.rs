//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Check the caller is a student
//! 2. Resolve the result limit
//! 3. Run the scorer for the student
//! 4. Decode the scorer output
//! 5. Enrich the decoded records from the catalog
//!
//! A scorer failure ends the request before decoding. Nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use catalog::{CourseCatalog, StudentId};
use pipeline::{Enricher, RecommendationResponse};
use scorer::Scorer;
use tracing::{debug, info};

use crate::auth::Caller;
use crate::config::LimitPolicy;
use crate::error::RecommendationError;

/// Coordinates the scorer, decoder and enricher for each request
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    scorer: Arc<dyn Scorer>,
    enricher: Enricher,
    limits: LimitPolicy,
}

impl RecommendationOrchestrator {
    pub fn new(
        scorer: Arc<dyn Scorer>,
        catalog: Arc<dyn CourseCatalog>,
        limits: LimitPolicy,
    ) -> Self {
        Self {
            scorer,
            enricher: Enricher::new(catalog),
            limits,
        }
    }

    /// Serve a request on behalf of `caller`.
    ///
    /// # Arguments
    /// * `caller` - Identity forwarded by the gateway
    /// * `limit_param` - Raw `limit` query value, if any
    pub async fn handle(
        &self,
        caller: &Caller,
        limit_param: Option<&str>,
    ) -> Result<RecommendationResponse, RecommendationError> {
        if !caller.is_student() {
            return Err(RecommendationError::Forbidden {
                role: caller.role.clone(),
            });
        }

        let limit = self.limits.resolve(limit_param);
        debug!("Resolved limit {:?} to {}", limit_param, limit);
        self.get_recommendations(caller.id, limit).await
    }

    /// Run the pipeline for a student without any authorization check.
    pub async fn get_recommendations(
        &self,
        student_id: StudentId,
        limit: usize,
    ) -> Result<RecommendationResponse, RecommendationError> {
        let start_time = Instant::now();

        let output = self.scorer.invoke(student_id, limit).await?;
        info!(
            "Scorer returned {} bytes for student {} (limit {})",
            output.len(),
            student_id,
            limit
        );

        let items = pipeline::decode(&output);
        info!("Decoded {} items", items.len());

        let response = self.enricher.enrich(items).await?;
        info!(
            "Returning {} recommendations for student {} in {:.2?}",
            response.len(),
            student_id,
            start_time.elapsed()
        );

        Ok(response)
    }
}
