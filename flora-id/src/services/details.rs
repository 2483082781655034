//! Details Enrichment
//!
//! Encyclopedia content for a record selected for the details view: leading
//! article paragraphs, a main image matching the plant's name, and a small
//! gallery.

use super::image_resolver::{commons_images, is_placeholder};
use crate::text::normalize;
use crate::types::{Encyclopedia, PlantDetails, PlantRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const MAX_PARAGRAPHS: usize = 10;
const MAX_GALLERY: usize = 10;

/// Image paths that are interface chrome, not plant photos
const CHROME_IMAGES: &[&str] = &["OOjs_UI_icon", "edit-ltr.svg"];

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
// Inline styles leak into paragraph text on some templates
static PARSER_OUTPUT_CSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.mw-parser-output [^{]+\{[^}]+\}").unwrap());
static SR_ONLY_CSS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.sr-only[^{]+\{[^}]+\}").unwrap());

pub struct DetailsEnricher {
    encyclopedia: Arc<dyn Encyclopedia>,
}

/// Content pulled out of a rendered page
#[derive(Debug, Default, PartialEq)]
struct PageContent {
    extract: String,
    main_image: Option<String>,
    gallery: Vec<String>,
}

impl DetailsEnricher {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self { encyclopedia }
    }

    /// Encyclopedia details for a record
    ///
    /// Lookup is by the normalized scientific name. Fetch failures degrade to
    /// an empty extract and gallery; the main image then falls back to the
    /// record's own image when it is a real one.
    pub async fn details_for(&self, record: PlantRecord) -> PlantDetails {
        let title = normalize(&record.scientific_name);

        let markup = if title.is_empty() {
            None
        } else {
            match self.encyclopedia.render_page(&title).await {
                Ok(markup) => markup,
                Err(e) => {
                    warn!(title = %title, error = %e, "Details page render failed");
                    None
                }
            }
        };

        let content = markup
            .map(|m| page_content(&m, &title, &record.common_name))
            .unwrap_or_default();

        debug!(
            title = %title,
            paragraphs = content.extract.split("\n\n").filter(|p| !p.is_empty()).count(),
            gallery = content.gallery.len(),
            "Details extracted"
        );

        let main_image = content.main_image.or_else(|| {
            record
                .image_url
                .clone()
                .filter(|url| !is_placeholder(url))
        });

        PlantDetails {
            record,
            extract: content.extract,
            main_image,
            gallery: content.gallery,
        }
    }
}

fn page_content(markup: &str, scientific_name: &str, common_name: &str) -> PageContent {
    let images = commons_images(markup);

    let needles: Vec<String> = [scientific_name, common_name]
        .iter()
        .map(|name| name.trim().replace(' ', "_").to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    let main_image = images
        .iter()
        .find(|url| {
            let lower = url.to_lowercase();
            !url.contains("OOjs_UI_icon") && needles.iter().any(|n| lower.contains(n.as_str()))
        })
        .cloned();

    let mut seen = HashSet::new();
    let gallery = images
        .into_iter()
        .filter(|url| !CHROME_IMAGES.iter().any(|chrome| url.contains(chrome)))
        .filter(|url| seen.insert(url.clone()))
        .take(MAX_GALLERY)
        .collect();

    PageContent {
        extract: extract_paragraphs(markup),
        main_image,
        gallery,
    }
}

/// First non-empty paragraphs, style noise removed, separated by blank lines
fn extract_paragraphs(markup: &str) -> String {
    let document = Html::parse_fragment(markup);
    document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .take(MAX_PARAGRAPHS)
        .map(|text| {
            let text = PARSER_OUTPUT_CSS.replace_all(&text, "");
            SR_ONLY_CSS.replace_all(&text, "").trim().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
