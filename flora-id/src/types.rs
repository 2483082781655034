//! Core Types and Trait Definitions for flora-id
//!
//! Defines the records produced by the resolution pipeline and the trait
//! seams for the three external collaborators:
//! - **TextGenerator:** generative-language service (free-form text)
//! - **PlantIdentifier:** photo identification service
//! - **Encyclopedia:** page render, page summary, category listing
//!
//! Concrete HTTP clients live in `clients`; tests substitute fakes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Records
// ============================================================================

/// Field label carrying the common name
pub const COMMON_NAME: &str = "Common name";
/// Field label carrying the scientific name
pub const SCIENTIFIC_NAME: &str = "Scientific name";
/// Field label carrying the description
pub const DESCRIPTION: &str = "Description";

/// Resolved unit of plant information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    /// Additional labeled attributes, keyed exactly as the generation
    /// service labeled them (trimmed). Last label wins.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Only present when derived from photo identification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl PlantRecord {
    /// Build a record from a parsed field map
    ///
    /// The three required labels are lifted out of the map into their own
    /// members; everything else stays in `fields`.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        let common_name = fields.remove(COMMON_NAME).unwrap_or_default();
        let scientific_name = fields.remove(SCIENTIFIC_NAME).unwrap_or_default();
        let description = fields.remove(DESCRIPTION).unwrap_or_default();

        Self {
            common_name,
            scientific_name,
            description,
            fields,
            image_url: None,
            confidence: None,
        }
    }

    /// Complete enough to display: all three required members non-empty
    pub fn is_displayable(&self) -> bool {
        !self.common_name.trim().is_empty()
            && !self.scientific_name.trim().is_empty()
            && !self.description.trim().is_empty()
    }
}

/// Provisional species record produced by disambiguation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCandidate {
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub image_url: String,
}

/// Top suggestion from the photo identification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub common_name: String,
    pub scientific_name: String,
    /// Probability in [0, 1]
    pub confidence: f32,
}

/// Where a fact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    Generated,
    Encyclopedia,
}

/// A single plant fact for the facts browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub plant_name: String,
    pub text: String,
    pub image_url: String,
    pub source: FactSource,
}

/// Encyclopedia data for a selected record's details view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantDetails {
    pub record: PlantRecord,
    /// Leading article paragraphs separated by blank lines
    pub extract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    pub gallery: Vec<String>,
}

/// Short summary of an encyclopedia page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageSummary {
    pub title: String,
    /// Page type ("standard", "disambiguation", ...)
    #[serde(rename = "type", default)]
    pub page_type: String,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

impl PageSummary {
    pub fn is_disambiguation(&self) -> bool {
        self.page_type == "disambiguation"
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(|t| t.source.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

// ============================================================================
// External service seams
// ============================================================================

/// Generative-language service
///
/// The only contract is "prompt in, free-form text out". Any structure
/// ("Label: value" lines, JSON) is by convention and enforced client-side.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Service name for logging
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Photo identification service
#[async_trait::async_trait]
pub trait PlantIdentifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Submit one image, receive ranked suggestions (best first)
    async fn identify(&self, image: &[u8]) -> Result<Vec<Suggestion>, ServiceError>;
}

/// One ranked identification suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub scientific_name: String,
    pub probability: f32,
}

/// Online encyclopedia
#[async_trait::async_trait]
pub trait Encyclopedia: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rendered page markup for a title, `None` when the page does not exist
    ///
    /// `title` is a plain (not percent-encoded) page title.
    async fn render_page(&self, title: &str) -> Result<Option<String>, ServiceError>;

    /// Page summary (short extract plus optional thumbnail)
    async fn page_summary(&self, title: &str) -> Result<PageSummary, ServiceError>;

    /// Page titles in a category (at most `limit`)
    async fn category_members(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<String>, ServiceError>;
}

/// External service error
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network/transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Service answered but had nothing for this request
    #[error("Not available: {0}")]
    NotAvailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_lifts_required_labels() {
        let mut fields = BTreeMap::new();
        fields.insert(COMMON_NAME.to_string(), "Oak".to_string());
        fields.insert(SCIENTIFIC_NAME.to_string(), "Quercus".to_string());
        fields.insert(DESCRIPTION.to_string(), "A tree.".to_string());
        fields.insert("Family".to_string(), "Fagaceae".to_string());

        let record = PlantRecord::from_fields(fields);

        assert_eq!(record.common_name, "Oak");
        assert_eq!(record.scientific_name, "Quercus");
        assert_eq!(record.description, "A tree.");
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.fields["Family"], "Fagaceae");
        assert!(record.is_displayable());
    }

    #[test]
    fn test_not_displayable_with_blank_member() {
        let record = PlantRecord {
            common_name: "Oak".to_string(),
            scientific_name: "   ".to_string(),
            description: "A tree.".to_string(),
            ..Default::default()
        };
        assert!(!record.is_displayable());
    }

    #[test]
    fn test_record_serialization_skips_absent_options() {
        let record = PlantRecord {
            common_name: "Oak".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("image_url").is_none());
        assert!(json.get("confidence").is_none());
        assert_eq!(json["common_name"], "Oak");
    }

    #[test]
    fn test_page_summary_deserialization() {
        let summary: PageSummary = serde_json::from_str(
            r#"{"title":"Fern","type":"standard","extract":"A plant.","thumbnail":{"source":"https://x/fern.jpg","width":320}}"#,
        )
        .unwrap();
        assert!(!summary.is_disambiguation());
        assert_eq!(summary.thumbnail_url(), Some("https://x/fern.jpg"));

        let disambig: PageSummary =
            serde_json::from_str(r#"{"title":"Rose (disambiguation)","type":"disambiguation"}"#).unwrap();
        assert!(disambig.is_disambiguation());
        assert!(disambig.thumbnail_url().is_none());
    }
}
