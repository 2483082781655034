//! Prompt templates for the generation service
//!
//! Every template asks for "Label: value" lines; the field parser enforces
//! the structure on the way back.

/// Labels requested for a full plant record, after the identifying triple
const DETAIL_LABELS: &[&str] = &[
    "Family",
    "Flower characteristics",
    "Leaf characteristics",
    "Plant height",
    "Blooming season",
    "Sunlight requirements",
    "Water needs",
    "Soil type",
    "Growth rate",
    "Hardiness zones",
    "Native region",
    "Potential uses",
    "Care tips",
    "Interesting facts",
];

/// Sentinel phrase the generation service answers with for single-species names
pub const NO_MULTIPLE_SPECIES: &str = "No multiple species";

fn label_block(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| format!("{}:", label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask whether a common name covers several species
pub fn species_check(query: &str) -> String {
    format!(
        "Does the plant \"{query}\" have multiple species? If yes, list all species with their \
         common names, scientific names, and a brief description in a structured format, \
         separating species with a blank line:\n\
         Common name:\n\
         Scientific name (by which they are available on wikipedia):\n\
         Description:\n\
         If no, just say \"{NO_MULTIPLE_SPECIES}\"."
    )
}

/// Full structured record for a free-text query
pub fn plant_details(query: &str) -> String {
    format!(
        "Identify this plant \"{query}\" and provide the following information in a structured \
         format with labels:\nCommon name:\nScientific name:\nFamily:\nDescription:\n{}",
        label_block(&DETAIL_LABELS[1..])
    )
}

/// Additional fields for a candidate whose names and description are known
pub fn candidate_details(common_name: &str, scientific_name: &str) -> String {
    format!(
        "Provide the following additional information for the plant \"{common_name}\" \
         ({scientific_name}) in a structured format with labels:\n{}",
        label_block(DETAIL_LABELS)
    )
}

/// Full structured record for a photo identification result
///
/// The description label is `Description of <name>`; see
/// [`photo_description_label`].
pub fn photo_details(plant_name: &str) -> String {
    format!(
        "Provide detailed information about the plant \"{plant_name}\" in a structured format \
         with the following labels:\nCommon name:\nScientific name:\n{}:\n{}",
        photo_description_label(plant_name),
        label_block(DETAIL_LABELS)
    )
}

/// Description label used by [`photo_details`]
pub fn photo_description_label(plant_name: &str) -> String {
    format!("Description of {}", plant_name)
}

/// Random plant facts as a JSON array
pub fn random_facts(count: usize) -> String {
    format!(
        "Generate {count} random, interesting facts about different plants. Answer with a JSON \
         array only, where each element is an object with the keys \"plantName\" (the plant's \
         common or scientific name) and \"fact\" (one or two sentences). Do not add any other text."
    )
}
