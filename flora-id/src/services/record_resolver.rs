//! Plant Record Resolver
//!
//! Entry point for text queries:
//! 1. Disambiguate the query
//! 2. Single species: generate a detailed record with bounded retry, strict
//!    parse, resolve the image by scientific name
//! 3. Several species: hand the candidates back; the caller picks one and
//!    calls [`PlantRecordResolver::resolve_from_candidate`]
//!
//! The two detail paths deliberately use different completeness gates: the
//! query path retries until the strict parse accepts, the candidate path
//! already has the identifying triple and parses leniently.

use super::disambiguator::{Disambiguation, SpeciesDisambiguator};
use super::image_resolver::{is_placeholder, is_sentinel, is_valid_plant_image, ImageResolver};
use super::prompts;
use crate::error::ResolveError;
use crate::text;
use crate::types::{
    PlantRecord, SpeciesCandidate, TextGenerator, COMMON_NAME, DESCRIPTION, SCIENTIFIC_NAME,
};
use crate::utils::{retry_fixed, RetryPolicy};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a text query
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Record(PlantRecord),
    Candidates(Vec<SpeciesCandidate>),
}

pub struct PlantRecordResolver {
    generator: Arc<dyn TextGenerator>,
    disambiguator: SpeciesDisambiguator,
    images: ImageResolver,
    retry: RetryPolicy,
}

impl PlantRecordResolver {
    pub fn new(generator: Arc<dyn TextGenerator>, images: ImageResolver, retry: RetryPolicy) -> Self {
        Self {
            disambiguator: SpeciesDisambiguator::new(Arc::clone(&generator), images.clone()),
            generator,
            images,
            retry,
        }
    }

    /// Resolve a free-text query into one record or a candidate list
    pub async fn resolve_from_query(&self, query: &str) -> Result<Resolution, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::InvalidInput("Search query is empty".to_string()));
        }

        info!(query = %query, "Resolving plant query");

        match self.disambiguator.check_multiple(query).await? {
            Disambiguation::Multiple(candidates) => Ok(Resolution::Candidates(candidates)),
            Disambiguation::Single => {
                let fields = self.fetch_details_with_retry(query).await?;
                let mut record = PlantRecord::from_fields(fields);
                record.image_url = self.record_image(&record.scientific_name).await;

                info!(
                    query = %query,
                    common_name = %record.common_name,
                    scientific_name = %record.scientific_name,
                    has_image = record.image_url.is_some(),
                    "Plant record resolved"
                );
                Ok(Resolution::Record(record))
            }
        }
    }

    /// Promote a selected candidate into a full record
    ///
    /// The candidate's names and description come first in the merged blob,
    /// the generated fields after (so a generated label of the same name
    /// wins). The candidate's image is kept only when it is a real image that
    /// passes the image filter; otherwise the image is looked up again.
    pub async fn resolve_from_candidate(
        &self,
        candidate: &SpeciesCandidate,
    ) -> Result<PlantRecord, ResolveError> {
        if candidate.common_name.trim().is_empty() && candidate.scientific_name.trim().is_empty() {
            return Err(ResolveError::InvalidInput(
                "Candidate has neither a common nor a scientific name".to_string(),
            ));
        }

        let additional = self
            .generator
            .generate(&prompts::candidate_details(
                &candidate.common_name,
                &candidate.scientific_name,
            ))
            .await?;

        let combined = format!(
            "{}: {}\n{}: {}\n{}: {}\n{}",
            COMMON_NAME,
            candidate.common_name,
            SCIENTIFIC_NAME,
            candidate.scientific_name,
            DESCRIPTION,
            candidate.description,
            additional
        );

        let mut record = PlantRecord::from_fields(text::parse_lenient(&combined));
        let image = candidate.image_url.trim();
        record.image_url = if is_placeholder(image) || !is_valid_plant_image(image) {
            self.record_image(&record.scientific_name).await
        } else {
            Some(image.to_string())
        };

        debug!(
            common_name = %record.common_name,
            fields = record.fields.len(),
            "Candidate promoted to record"
        );
        Ok(record)
    }

    /// Generate until the strict parse accepts, within the retry policy
    async fn fetch_details_with_retry(
        &self,
        query: &str,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        let prompt = prompts::plant_details(query);

        let fields = retry_fixed("plant_details", self.retry, |attempt| {
            let prompt = &prompt;
            async move {
                match self.generator.generate(prompt).await {
                    Ok(blob) => {
                        let parsed = text::parse_strict(&blob);
                        if parsed.is_none() {
                            debug!(attempt, "Generated details missing required fields");
                        }
                        parsed
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Detail generation failed");
                        None
                    }
                }
            }
        })
        .await;

        fields.ok_or(ResolveError::DetailsUnavailable {
            attempts: self.retry.max_attempts.max(1),
        })
    }

    /// Image for a record: `None` when only a sentinel came back
    async fn record_image(&self, scientific_name: &str) -> Option<String> {
        if scientific_name.trim().is_empty() {
            return None;
        }
        let url = self.images.resolve_image(scientific_name).await;
        if is_sentinel(&url) {
            None
        } else {
            Some(url)
        }
    }
}
