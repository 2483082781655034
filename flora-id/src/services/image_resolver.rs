//! Encyclopedia Image Resolver
//!
//! Finds a representative plant photo on the encyclopedia's rendered page for
//! a name. A miss is not an error: the resolver returns a *sentinel URL*
//! (search page or bare page link) and callers decide whether to substitute
//! a placeholder.
//!
//! # Query variants
//! Tried in order, duplicates and empties skipped:
//! 1. the raw query
//! 2. the text before the first `'` (drops cultivar names)
//! 3. the text before the first of `( [ { / ' "`
//!
//! A variant that is already an encyclopedia page URL is looked up by its
//! last path segment.
//!
//! # Image filter
//! Only user-media assets (`//upload.wikimedia.org/wikipedia/commons/...`)
//! are considered. SVGs, anything containing `icon`/`Icon`, and thumbnails
//! with an explicit width under 100px are rejected.

use crate::types::Encyclopedia;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of a bare encyclopedia page URL
pub const PAGE_URL_PREFIX: &str = "https://en.wikipedia.org/wiki/";
/// Prefix of an encyclopedia search URL
pub const SEARCH_URL_PREFIX: &str = "https://en.wikipedia.org/w/index.php?search=";
/// Local placeholder asset for species without any usable image
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-plant.jpg";

/// Minimum thumbnail width accepted when the URL embeds one
const MIN_IMAGE_WIDTH: u32 = 100;

static COMMONS_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?:)?//upload\.wikimedia\.org/wikipedia/commons/").unwrap()
});
static PIXEL_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d+)px-").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Image lookup against the encyclopedia's page-render endpoint
#[derive(Clone)]
pub struct ImageResolver {
    encyclopedia: Arc<dyn Encyclopedia>,
}

impl ImageResolver {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self { encyclopedia }
    }

    /// Resolve an image for a name or page URL
    ///
    /// Returns the first accepted image URL, or `search_url(query)` when no
    /// variant produced one.
    pub async fn resolve_image(&self, query: &str) -> String {
        for variant in query_variants(query) {
            let title = title_for_variant(&variant);
            if let Some(url) = self.first_valid_image(&title).await {
                debug!(query = %query, variant = %variant, image = %url, "Resolved encyclopedia image");
                return url;
            }
        }

        debug!(query = %query, "No encyclopedia image found, returning search URL");
        search_url(query)
    }

    /// Multi-stage image lookup for a species
    ///
    /// Each stage runs only while the current result is still a sentinel:
    /// common name, scientific name, page URL of the common name, page URL of
    /// the scientific name, and finally [`PLACEHOLDER_IMAGE`].
    ///
    /// [`resolve_image`](Self::resolve_image) yields either an accepted image
    /// or a search URL, and search URLs are never adopted, so no bare page URL
    /// survives the stages and needs re-extracting.
    pub async fn fetch_species_image(&self, scientific_name: &str, common_name: &str) -> String {
        let mut image = self.resolve_image(common_name).await;

        let stages = [
            scientific_name.to_string(),
            page_url(common_name),
            page_url(scientific_name),
        ];
        for stage in stages {
            if !is_sentinel(&image) {
                break;
            }
            let candidate = self.resolve_image(&stage).await;
            if !is_search_url(&candidate) {
                image = candidate;
            }
        }

        if is_sentinel(&image) {
            debug!(
                common_name = %common_name,
                scientific_name = %scientific_name,
                "No species image found, using placeholder"
            );
            image = PLACEHOLDER_IMAGE.to_string();
        }
        image
    }

    /// First accepted image on a page, `None` on a miss or transport failure
    async fn first_valid_image(&self, title: &str) -> Option<String> {
        let markup = match self.encyclopedia.render_page(title).await {
            Ok(Some(markup)) => markup,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    service = self.encyclopedia.name(),
                    title = %title,
                    error = %e,
                    "Page render failed"
                );
                return None;
            }
        };

        commons_images(&markup)
            .into_iter()
            .find(|url| is_valid_plant_image(url))
    }
}

/// Lookup variants for a query (see module docs)
pub fn query_variants(query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    if query.starts_with(PAGE_URL_PREFIX) {
        return vec![query.to_string()];
    }

    let before_quote = query.split('\'').next().unwrap_or_default().trim();
    let before_bracket = query
        .split(['(', '[', '{', '/', '\'', '"'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut variants: Vec<String> = Vec::with_capacity(3);
    for variant in [query, before_quote, before_bracket] {
        if !variant.is_empty() && !variants.iter().any(|v| v == variant) {
            variants.push(variant.to_string());
        }
    }
    variants
}

/// Page title for a variant: last path segment of a page URL, or the text
pub fn title_for_variant(variant: &str) -> String {
    match variant.strip_prefix(PAGE_URL_PREFIX) {
        Some(path) => {
            let segment = path.rsplit('/').next().unwrap_or(path);
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        }
        None => variant.to_string(),
    }
}

/// All user-media image sources in document order, scheme normalized to https
pub fn commons_images(markup: &str) -> Vec<String> {
    let document = Html::parse_fragment(markup);
    document
        .select(&IMG_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| COMMONS_SRC.is_match(src))
        .map(|src| {
            if src.starts_with("http") {
                src.to_string()
            } else {
                format!("https:{}", src)
            }
        })
        .collect()
}

/// Image filter: no SVGs, no icons, no explicit width under 100px
pub fn is_valid_plant_image(url: &str) -> bool {
    if url.contains(".svg") || url.contains("icon") || url.contains("Icon") {
        return false;
    }

    match PIXEL_WIDTH.captures(url) {
        // Widths too large for u32 are certainly not thumbnails
        Some(caps) => caps[1]
            .parse::<u32>()
            .map_or(true, |width| width >= MIN_IMAGE_WIDTH),
        None => true,
    }
}

/// Search-results URL for a query
pub fn search_url(query: &str) -> String {
    format!("{}{}", SEARCH_URL_PREFIX, urlencoding::encode(query))
}

/// Bare page URL for a name (spaces become underscores)
pub fn page_url(name: &str) -> String {
    format!("{}{}", PAGE_URL_PREFIX, urlencoding::encode(&name.replace(' ', "_")))
}

pub fn is_search_url(url: &str) -> bool {
    url.contains("wikipedia.org/w/index.php?search=")
}

pub fn is_page_url(url: &str) -> bool {
    url.contains("wikipedia.org/wiki/")
}

/// "No image resolved" shapes: search URL or bare page URL
pub fn is_sentinel(url: &str) -> bool {
    is_search_url(url) || is_page_url(url)
}

/// True for anything that is not a real image: sentinels, the local
/// placeholder assets, and placeholder-service URLs
pub fn is_placeholder(url: &str) -> bool {
    let url = url.trim();
    url.is_empty()
        || is_sentinel(url)
        || url.starts_with("/placeholder-")
        || url.contains("via.placeholder.com")
}
