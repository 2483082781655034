//! Test doubles for the external collaborators
//!
//! Each fake counts its calls so tests can assert on request volume.

#![allow(dead_code)]

use async_trait::async_trait;
use flora_id::services::FloraServices;
use flora_id::types::{
    Encyclopedia, PageSummary, PlantIdentifier, ServiceError, Suggestion, TextGenerator,
};
use flora_id::utils::RetryPolicy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SUNFLOWER_IMAGE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/4/40/Sunflower_sky_backdrop.jpg/220px-Sunflower_sky_backdrop.jpg";

pub const SUNFLOWER_PAGE: &str = r#"
<div class="mw-parser-output">
  <img src="//upload.wikimedia.org/wikipedia/commons/thumb/a/a1/OOjs_UI_icon_edit-ltr.svg/20px-OOjs_UI_icon_edit-ltr.svg.png">
  <img src="//upload.wikimedia.org/wikipedia/commons/thumb/4/40/Sunflower_sky_backdrop.jpg/220px-Sunflower_sky_backdrop.jpg">
  <p>The <b>common sunflower</b> is a species of large annual forb.</p>
  <p>It is grown as a crop for its edible oily seeds.</p>
</div>"#;

pub const SUNFLOWER_DETAILS: &str = "\
Common name: Sunflower
Scientific name: Helianthus annuus
Family: Asteraceae
Description: A tall annual with large yellow flower heads.
Young heads track the sun.
Care tips: Full sun, deep watering.";

/// Generator answering by prompt substring; first matching rule wins,
/// unmatched prompts get an empty reply
#[derive(Default)]
pub struct ScriptedGenerator {
    rules: Vec<(String, Result<String, u16>)>,
    pub calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, prompt_contains: &str, response: &str) -> Self {
        self.rules
            .push((prompt_contains.to_string(), Ok(response.to_string())));
        self
    }

    pub fn fail_with_status(mut self, prompt_contains: &str, status: u16) -> Self {
        self.rules.push((prompt_contains.to_string(), Err(status)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts_containing(&self, needle: &str) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .count()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "ScriptedGenerator"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            Some((_, Ok(text))) => Ok(text.clone()),
            Some((_, Err(status))) => Err(ServiceError::Api {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(String::new()),
        }
    }
}

/// Encyclopedia backed by maps; unknown pages do not exist
#[derive(Default)]
pub struct StaticEncyclopedia {
    pages: HashMap<String, String>,
    summaries: HashMap<String, PageSummary>,
    category_titles: Vec<String>,
    pub render_calls: AtomicUsize,
}

impl StaticEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, title: &str, markup: &str) -> Self {
        self.pages.insert(title.to_string(), markup.to_string());
        self
    }

    pub fn summary(mut self, summary: PageSummary) -> Self {
        self.summaries.insert(summary.title.clone(), summary);
        self
    }

    /// Titles returned for every category
    pub fn category_titles(mut self, titles: &[&str]) -> Self {
        self.category_titles = titles.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[async_trait]
impl Encyclopedia for StaticEncyclopedia {
    fn name(&self) -> &'static str {
        "StaticEncyclopedia"
    }

    async fn render_page(&self, title: &str) -> Result<Option<String>, ServiceError> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.get(title).cloned())
    }

    async fn page_summary(&self, title: &str) -> Result<PageSummary, ServiceError> {
        self.summaries
            .get(title)
            .cloned()
            .ok_or_else(|| ServiceError::NotAvailable(format!("no summary for {}", title)))
    }

    async fn category_members(
        &self,
        _category: &str,
        limit: u32,
    ) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .category_titles
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Identifier with a fixed answer
pub struct StaticIdentifier {
    result: Result<Vec<Suggestion>, u16>,
    pub calls: AtomicUsize,
}

impl StaticIdentifier {
    pub fn suggesting(suggestions: Vec<Suggestion>) -> Self {
        Self {
            result: Ok(suggestions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            result: Err(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn sunflower() -> Self {
        Self::suggesting(vec![Suggestion {
            name: "Helianthus annuus".to_string(),
            scientific_name: "Helianthus annuus".to_string(),
            probability: 0.97,
        }])
    }
}

#[async_trait]
impl PlantIdentifier for StaticIdentifier {
    fn name(&self) -> &'static str {
        "StaticIdentifier"
    }

    async fn identify(&self, _image: &[u8]) -> Result<Vec<Suggestion>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(suggestions) => Ok(suggestions.clone()),
            Err(status) => Err(ServiceError::Api {
                status: *status,
                body: "identification failed".to_string(),
            }),
        }
    }
}

/// Retry policy with a negligible backoff
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        backoff: Duration::from_millis(1),
    }
}

/// Wire fakes into the service graph
pub fn services(
    generator: Arc<ScriptedGenerator>,
    identifier: Arc<StaticIdentifier>,
    encyclopedia: Arc<StaticEncyclopedia>,
) -> FloraServices {
    FloraServices::new(generator, identifier, encyclopedia, fast_retry())
}
