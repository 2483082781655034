//! Species Disambiguator
//!
//! Asks the generation service whether a common name covers several
//! botanical species. A reply containing "no multiple species" (any casing)
//! means one species. Anything else is read as a listing of species blocks
//! separated by blank lines, each carrying a common name, scientific name and
//! description line.

use super::image_resolver::ImageResolver;
use super::prompts;
use crate::types::{ServiceError, SpeciesCandidate, TextGenerator};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a disambiguation check
#[derive(Debug, Clone, PartialEq)]
pub enum Disambiguation {
    /// The name maps to one species
    Single,
    /// Several species; image-resolved candidates (possibly empty)
    Multiple(Vec<SpeciesCandidate>),
}

pub struct SpeciesDisambiguator {
    generator: Arc<dyn TextGenerator>,
    images: ImageResolver,
}

impl SpeciesDisambiguator {
    pub fn new(generator: Arc<dyn TextGenerator>, images: ImageResolver) -> Self {
        Self { generator, images }
    }

    /// Check whether `query` names multiple species
    ///
    /// Candidate images are resolved concurrently. Generation failures
    /// propagate; an unparseable listing yields an empty candidate list.
    pub async fn check_multiple(&self, query: &str) -> Result<Disambiguation, ServiceError> {
        let response = self.generator.generate(&prompts::species_check(query)).await?;

        if is_single_species(&response) {
            debug!(query = %query, "Single species");
            return Ok(Disambiguation::Single);
        }

        let blocks = parse_species_blocks(&response);
        info!(query = %query, candidates = blocks.len(), "Multiple species listed");

        let futures = blocks.into_iter().map(|mut candidate| {
            let images = self.images.clone();
            async move {
                candidate.image_url = images
                    .fetch_species_image(&candidate.scientific_name, &candidate.common_name)
                    .await;
                candidate
            }
        });

        Ok(Disambiguation::Multiple(join_all(futures).await))
    }
}

/// Sentinel check, case-insensitive
pub fn is_single_species(response: &str) -> bool {
    response
        .to_lowercase()
        .contains(&prompts::NO_MULTIPLE_SPECIES.to_lowercase())
}

/// Split a multi-species listing into candidates (without images)
///
/// Blocks missing any of the three fields are discarded.
pub fn parse_species_blocks(response: &str) -> Vec<SpeciesCandidate> {
    split_blocks(response)
        .iter()
        .filter_map(|block| {
            Some(SpeciesCandidate {
                common_name: block_field(block, "common name")?,
                scientific_name: block_field(block, "scientific name")?,
                description: block_field(block, "description")?,
                image_url: String::new(),
            })
        })
        .collect()
}

/// Groups of consecutive non-blank lines
fn split_blocks(response: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in response.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Value of the first line mentioning `key`: the text between the first and
/// second `:`, emphasis stripped
fn block_field(block: &[&str], key: &str) -> Option<String> {
    let line = block.iter().find(|l| l.to_lowercase().contains(key))?;
    let value = line.split(':').nth(1)?.replace('*', "");
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
