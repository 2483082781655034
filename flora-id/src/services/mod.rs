//! Resolution pipeline services
//!
//! Leaf-first:
//! - **image_resolver** - encyclopedia image lookup with sentinel fallbacks
//! - **disambiguator** - one name, one species or several?
//! - **record_resolver** - query/candidate → `PlantRecord` (bounded retry)
//! - **identification** - photo → identification → record
//! - **facts** - random facts from both sources
//! - **details** - encyclopedia extract and gallery for a selected record
//!
//! Every service holds its collaborators as `Arc<dyn Trait>` so the HTTP
//! clients can be swapped for fakes.

pub mod details;
pub mod disambiguator;
pub mod facts;
pub mod identification;
pub mod image_resolver;
pub mod prompts;
pub mod record_resolver;

pub use details::DetailsEnricher;
pub use disambiguator::{Disambiguation, SpeciesDisambiguator};
pub use facts::FactsBrowser;
pub use identification::{IdentificationAdapter, PhotoOutcome};
pub use image_resolver::ImageResolver;
pub use record_resolver::{PlantRecordResolver, Resolution};

use crate::types::{Encyclopedia, PlantIdentifier, TextGenerator};
use crate::utils::RetryPolicy;
use std::sync::Arc;

/// All pipeline services wired to one set of collaborators
#[derive(Clone)]
pub struct FloraServices {
    pub resolver: Arc<PlantRecordResolver>,
    pub identification: Arc<IdentificationAdapter>,
    pub facts: Arc<FactsBrowser>,
    pub details: Arc<DetailsEnricher>,
}

impl FloraServices {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        identifier: Arc<dyn PlantIdentifier>,
        encyclopedia: Arc<dyn Encyclopedia>,
        retry: RetryPolicy,
    ) -> Self {
        let images = ImageResolver::new(Arc::clone(&encyclopedia));

        Self {
            resolver: Arc::new(PlantRecordResolver::new(
                Arc::clone(&generator),
                images.clone(),
                retry,
            )),
            identification: Arc::new(IdentificationAdapter::new(
                identifier,
                Arc::clone(&generator),
                images,
            )),
            facts: Arc::new(FactsBrowser::new(generator, Arc::clone(&encyclopedia))),
            details: Arc::new(DetailsEnricher::new(encyclopedia)),
        }
    }
}

// ============================================================================
// Fakes for Testing
// ============================================================================

#[cfg(test)]
pub mod mock {
    use crate::types::{
        Encyclopedia, PageSummary, PlantIdentifier, ServiceError, Suggestion, TextGenerator,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EncyclopediaState {
        pages: HashMap<String, String>,
        summaries: HashMap<String, PageSummary>,
        categories: HashMap<String, Vec<String>>,
        rendered: Vec<String>,
    }

    /// In-memory encyclopedia; unknown pages render as `None`
    #[derive(Clone, Default)]
    pub struct FakeEncyclopedia {
        state: Arc<Mutex<EncyclopediaState>>,
    }

    impl FakeEncyclopedia {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(self, title: &str, markup: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .pages
                .insert(title.to_string(), markup.to_string());
            self
        }

        pub fn with_summary(self, summary: PageSummary) -> Self {
            self.state
                .lock()
                .unwrap()
                .summaries
                .insert(summary.title.clone(), summary);
            self
        }

        pub fn with_category(self, category: &str, titles: &[&str]) -> Self {
            self.state.lock().unwrap().categories.insert(
                category.to_string(),
                titles.iter().map(|t| t.to_string()).collect(),
            );
            self
        }

        /// Titles passed to `render_page`, in call order
        pub fn rendered_titles(&self) -> Vec<String> {
            self.state.lock().unwrap().rendered.clone()
        }
    }

    #[async_trait]
    impl Encyclopedia for FakeEncyclopedia {
        fn name(&self) -> &'static str {
            "FakeEncyclopedia"
        }

        async fn render_page(&self, title: &str) -> Result<Option<String>, ServiceError> {
            let mut state = self.state.lock().unwrap();
            state.rendered.push(title.to_string());
            Ok(state.pages.get(title).cloned())
        }

        async fn page_summary(&self, title: &str) -> Result<PageSummary, ServiceError> {
            self.state
                .lock()
                .unwrap()
                .summaries
                .get(title)
                .cloned()
                .ok_or_else(|| ServiceError::NotAvailable(title.to_string()))
        }

        async fn category_members(
            &self,
            category: &str,
            limit: u32,
        ) -> Result<Vec<String>, ServiceError> {
            let state = self.state.lock().unwrap();
            let members = state.categories.get(category).cloned().unwrap_or_default();
            Ok(members.into_iter().take(limit as usize).collect())
        }
    }

    /// Generator answering by prompt substring; first matching rule wins
    #[derive(Clone, Default)]
    pub struct FakeGenerator {
        rules: Arc<Mutex<Vec<(String, Result<String, String>)>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl FakeGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn answer(self, prompt_contains: &str, response: &str) -> Self {
            self.rules
                .lock()
                .unwrap()
                .push((prompt_contains.to_string(), Ok(response.to_string())));
            self
        }

        pub fn fail(self, prompt_contains: &str) -> Self {
            self.rules
                .lock()
                .unwrap()
                .push((prompt_contains.to_string(), Err("generation failed".to_string())));
            self
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        fn name(&self) -> &'static str {
            "FakeGenerator"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let rules = self.rules.lock().unwrap();
            match rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
                Some((_, Ok(text))) => Ok(text.clone()),
                Some((_, Err(msg))) => Err(ServiceError::Api {
                    status: 500,
                    body: msg.clone(),
                }),
                None => Ok(String::new()),
            }
        }
    }

    /// Identifier returning a fixed suggestion list
    pub struct FakeIdentifier {
        pub suggestions: Vec<Suggestion>,
    }

    #[async_trait]
    impl PlantIdentifier for FakeIdentifier {
        fn name(&self) -> &'static str {
            "FakeIdentifier"
        }

        async fn identify(&self, _image: &[u8]) -> Result<Vec<Suggestion>, ServiceError> {
            Ok(self.suggestions.clone())
        }
    }
}
