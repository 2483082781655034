//! Identification Adapter
//!
//! Photo path: submit the image to the identification service, take the top
//! suggestion, then run a single (non-retried) detail generation for it.

use super::image_resolver::{is_sentinel, ImageResolver};
use super::prompts;
use crate::error::ResolveError;
use crate::text;
use crate::types::{Identification, PlantIdentifier, PlantRecord, TextGenerator, DESCRIPTION};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Photo identification plus the best-effort record for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoOutcome {
    pub identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PlantRecord>,
    /// In-place error text when detail generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct IdentificationAdapter {
    identifier: Arc<dyn PlantIdentifier>,
    generator: Arc<dyn TextGenerator>,
    images: ImageResolver,
}

impl IdentificationAdapter {
    pub fn new(
        identifier: Arc<dyn PlantIdentifier>,
        generator: Arc<dyn TextGenerator>,
        images: ImageResolver,
    ) -> Self {
        Self {
            identifier,
            generator,
            images,
        }
    }

    /// Identify the plant in a photo (top suggestion only)
    pub async fn identify_from_photo(&self, image: &[u8]) -> Result<Identification, ResolveError> {
        if image.is_empty() {
            return Err(ResolveError::InvalidInput("Uploaded image is empty".to_string()));
        }

        let suggestions = self.identifier.identify(image).await?;
        let top = suggestions
            .into_iter()
            .next()
            .ok_or(ResolveError::NoIdentification)?;

        let identification = Identification {
            common_name: top.name,
            scientific_name: top.scientific_name,
            confidence: top.probability.clamp(0.0, 1.0),
        };

        info!(
            service = self.identifier.name(),
            common_name = %identification.common_name,
            confidence = identification.confidence,
            "Photo identified"
        );
        Ok(identification)
    }

    /// Identify, then describe the top suggestion with one generation attempt
    ///
    /// Identification failures propagate. A failed description is reported in
    /// [`PhotoOutcome::error`] and leaves `record` empty.
    pub async fn identify_and_describe(&self, image: &[u8]) -> Result<PhotoOutcome, ResolveError> {
        let identification = self.identify_from_photo(image).await?;
        let plant_name = identification.common_name.clone();

        let blob = match self.generator.generate(&prompts::photo_details(&plant_name)).await {
            Ok(blob) if !blob.trim().is_empty() => blob,
            Ok(_) => {
                return Ok(Self::failed(
                    identification,
                    "Received empty response from the generation service",
                ))
            }
            Err(e) => {
                warn!(plant = %plant_name, error = %e, "Photo detail generation failed");
                return Ok(Self::failed(identification, &e.to_string()));
            }
        };

        let mut fields = text::parse_lenient(&blob);
        if let Some(description) = fields.remove(&prompts::photo_description_label(&plant_name)) {
            fields.entry(DESCRIPTION.to_string()).or_insert(description);
        }

        let mut record = PlantRecord::from_fields(fields);
        record.common_name = identification.common_name.clone();
        record.scientific_name = identification.scientific_name.clone();
        record.confidence = Some(identification.confidence);

        let image_url = self.images.resolve_image(&record.scientific_name).await;
        if !is_sentinel(&image_url) {
            record.image_url = Some(image_url);
        }

        Ok(PhotoOutcome {
            identification,
            record: Some(record),
            error: None,
        })
    }

    fn failed(identification: Identification, message: &str) -> PhotoOutcome {
        PhotoOutcome {
            identification,
            record: None,
            error: Some(format!("Error getting additional information: {}", message)),
        }
    }
}
