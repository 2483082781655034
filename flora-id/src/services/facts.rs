//! Facts Browser
//!
//! Random plant facts from two sources, merged and shuffled:
//! - **Generated:** the generation service is asked for a JSON array of
//!   `{plantName, fact}` objects; images come from encyclopedia summaries
//! - **Encyclopedia:** a random page from a random plant category, first two
//!   sentences of its summary

use crate::text::{genus, normalize};
use crate::types::{Encyclopedia, Fact, FactSource, ServiceError, TextGenerator};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::prompts;

/// Categories a random encyclopedia page is drawn from
pub const PLANT_CATEGORIES: &[&str] = &[
    "Flowering_plants",
    "Trees",
    "Shrubs",
    "Herbs",
    "Vegetables",
    "Fruits",
    "Grasses",
    "Ferns",
    "Mosses",
    "Succulents",
    "Vines",
    "Aquatic_plants",
    "Conifers",
    "Palms",
    "Orchids",
    "Cacti",
    "Bamboos",
    "Bromeliads",
    "Carnivorous_plants",
    "Epiphytes",
    "Medicinal_plants",
    "Poisonous_plants",
    "Edible_plants",
    "Ornamental_plants",
    "Tropical_plants",
    "Desert_plants",
    "Alpine_plants",
    "Rainforest_plants",
    "Mangroves",
    "Seagrasses",
];

/// Image used when no summary thumbnail exists
pub const FACT_PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

const CATEGORY_LIMIT: u32 = 500;
const ENCYCLOPEDIA_ATTEMPTS: u32 = 3;

/// One element of the generated facts array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedFact {
    #[serde(rename = "plantName")]
    pub plant_name: String,
    pub fact: String,
}

pub struct FactsBrowser {
    generator: Arc<dyn TextGenerator>,
    encyclopedia: Arc<dyn Encyclopedia>,
}

impl FactsBrowser {
    pub fn new(generator: Arc<dyn TextGenerator>, encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self {
            generator,
            encyclopedia,
        }
    }

    /// Up to `count` facts from both sources, shuffled
    pub async fn random_facts(&self, count: usize) -> Vec<Fact> {
        if count == 0 {
            return Vec::new();
        }

        let encyclopedia_facts = async {
            join_all((0..count).map(|_| self.encyclopedia_fact()))
                .await
                .into_iter()
                .filter_map(|result| match result {
                    Ok(fact) => Some(fact),
                    Err(e) => {
                        warn!(error = %e, "Encyclopedia fact unavailable");
                        None
                    }
                })
                .collect::<Vec<_>>()
        };

        let (mut facts, encyclopedia_facts) =
            tokio::join!(self.generated_facts(count), encyclopedia_facts);
        facts.extend(encyclopedia_facts);

        facts.shuffle(&mut rand::thread_rng());
        facts.truncate(count);
        facts
    }

    /// Ask the generation service for `2 * count` facts
    ///
    /// Transport failures and malformed replies yield an empty list.
    pub async fn generated_facts(&self, count: usize) -> Vec<Fact> {
        let response = match self.generator.generate(&prompts::random_facts(count * 2)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Fact generation failed");
                return Vec::new();
            }
        };

        let generated = parse_generated_facts(&response);
        debug!(count = generated.len(), "Generated facts parsed");

        join_all(generated.into_iter().map(|g| async move {
            let image_url = self.summary_image(&g.plant_name).await;
            Fact {
                text: format!("{}: {}", g.plant_name, g.fact),
                plant_name: g.plant_name,
                image_url,
                source: FactSource::Generated,
            }
        }))
        .await
    }

    /// One fact from a random encyclopedia page
    ///
    /// Disambiguation pages and failed lookups are retried up to three times.
    pub async fn encyclopedia_fact(&self) -> Result<Fact, ServiceError> {
        let mut last_error = ServiceError::NotAvailable("No encyclopedia fact found".to_string());

        for attempt in 1..=ENCYCLOPEDIA_ATTEMPTS {
            match self.try_encyclopedia_fact().await {
                Ok(fact) => return Ok(fact),
                Err(e) => {
                    debug!(attempt, error = %e, "Encyclopedia fact attempt failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn try_encyclopedia_fact(&self) -> Result<Fact, ServiceError> {
        let title = self.random_encyclopedia_title().await?;
        let summary = self.encyclopedia.page_summary(&title).await?;

        if summary.is_disambiguation() {
            return Err(ServiceError::NotAvailable(format!(
                "'{}' is a disambiguation page",
                summary.title
            )));
        }

        let snippet = summary
            .extract
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map(first_sentences)
            .unwrap_or_else(|| "No description available.".to_string());

        Ok(Fact {
            text: format!("{}: {}", summary.title, snippet),
            image_url: summary
                .thumbnail_url()
                .unwrap_or(FACT_PLACEHOLDER_IMAGE)
                .to_string(),
            plant_name: summary.title,
            source: FactSource::Encyclopedia,
        })
    }

    /// Random page title from a random plant category
    ///
    /// Titles containing `:` (other namespaces) or `List of` are skipped.
    pub async fn random_encyclopedia_title(&self) -> Result<String, ServiceError> {
        let category = {
            let mut rng = rand::thread_rng();
            PLANT_CATEGORIES[rng.gen_range(0..PLANT_CATEGORIES.len())]
        };

        let titles: Vec<String> = self
            .encyclopedia
            .category_members(category, CATEGORY_LIMIT)
            .await?
            .into_iter()
            .filter(|t| !t.contains(':') && !t.contains("List of"))
            .collect();

        titles
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| {
                ServiceError::NotAvailable(format!("No suitable plants in category {}", category))
            })
    }

    /// Summary thumbnail for a fact's plant
    ///
    /// Tries the normalized name, then its genus (binomials only), then the
    /// name as given, then falls back to [`FACT_PLACEHOLDER_IMAGE`].
    pub async fn summary_image(&self, plant_name: &str) -> String {
        let cleaned = normalize(plant_name);

        if let Some(url) = self.thumbnail(&cleaned).await {
            return url;
        }
        if cleaned.contains(' ') {
            if let Some(url) = self.thumbnail(&genus(&cleaned)).await {
                return url;
            }
        }
        if let Some(url) = self.thumbnail(plant_name).await {
            return url;
        }
        FACT_PLACEHOLDER_IMAGE.to_string()
    }

    async fn thumbnail(&self, title: &str) -> Option<String> {
        if title.trim().is_empty() {
            return None;
        }
        match self.encyclopedia.page_summary(title).await {
            Ok(summary) => summary.thumbnail_url().map(str::to_string),
            Err(e) => {
                debug!(title = %title, error = %e, "No summary thumbnail");
                None
            }
        }
    }
}

/// Parse the generated facts array, tolerating code fences around it
///
/// Anything that is not a JSON array of `{plantName, fact}` yields an empty list.
pub fn parse_generated_facts(response: &str) -> Vec<GeneratedFact> {
    let (Some(start), Some(end)) = (response.find('['), response.rfind(']')) else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    match serde_json::from_str(&response[start..=end]) {
        Ok(facts) => facts,
        Err(e) => {
            warn!(error = %e, "Generated facts were not a JSON array");
            Vec::new()
        }
    }
}

/// First two sentences of an extract, ending in exactly one period
pub fn first_sentences(extract: &str) -> String {
    let mut snippet = extract
        .trim()
        .split(". ")
        .take(2)
        .collect::<Vec<_>>()
        .join(". ");
    if !snippet.ends_with('.') {
        snippet.push('.');
    }
    snippet
}
