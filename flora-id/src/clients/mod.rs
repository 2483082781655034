//! HTTP clients for the external collaborators
//!
//! Each client implements one of the trait seams from `types`:
//! 1. **gemini_client** - `TextGenerator` (generative-language service)
//! 2. **plant_id_client** - `PlantIdentifier` (photo identification)
//! 3. **wikipedia_client** - `Encyclopedia` (page render, summary, categories)

pub mod gemini_client;
pub mod plant_id_client;
pub mod wikipedia_client;

pub use gemini_client::GeminiClient;
pub use plant_id_client::PlantIdClient;
pub use wikipedia_client::WikipediaClient;
