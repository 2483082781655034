//! "Label: value" field parser
//!
//! Converts the loosely structured text returned by the generation service
//! into a label → value map.
//!
//! # Algorithm
//! For each line:
//! 1. Blank (whitespace-only) lines are skipped. They do NOT close the open field.
//! 2. Split on the first `:` into `(label, rest)`. If `rest` is non-empty after
//!    stripping `*` emphasis markers and trimming, a new field opens:
//!    `fields[label] = rest`. Later colons stay in the value. The label may be
//!    empty (`": value"` opens the field `""`).
//! 3. Otherwise (no `:`, or nothing after it) the cleaned line is appended to
//!    the open field with a single joining space. Lines before the first field
//!    are dropped.
//!
//! # Known ambiguity
//! The service gives no schema guarantee. A continuation line that happens to
//! look like `Something: more text` inside a paragraph starts a new field named
//! `Something` instead of extending the paragraph. There is no way to tell the
//! two apart from the text alone, so this parser does not try.

use crate::types::{COMMON_NAME, DESCRIPTION, SCIENTIFIC_NAME};
use std::collections::BTreeMap;

/// Parse a blob into fields (shared line algorithm)
pub fn parse(blob: &str) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut open_label: Option<String> = None;

    for line in blob.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some((label, rest)) = line.split_once(':') {
            let value = clean(rest);
            if !value.is_empty() {
                let label = clean(label);
                fields.insert(label.clone(), value);
                open_label = Some(label);
                continue;
            }
        }

        if let Some(label) = &open_label {
            if let Some(value) = fields.get_mut(label) {
                value.push(' ');
                value.push_str(&clean(line));
            }
        }
    }

    fields
}

/// Strict variant: accepted only when common name, scientific name and
/// description are all present and non-empty
pub fn parse_strict(blob: &str) -> Option<BTreeMap<String, String>> {
    let fields = parse(blob);
    if has_required_fields(&fields) {
        Some(fields)
    } else {
        None
    }
}

/// Lenient variant: no completeness gate
pub fn parse_lenient(blob: &str) -> BTreeMap<String, String> {
    parse(blob)
}

/// True when the three required labels carry non-empty values
pub fn has_required_fields(fields: &BTreeMap<String, String>) -> bool {
    [COMMON_NAME, SCIENTIFIC_NAME, DESCRIPTION]
        .iter()
        .all(|label| fields.get(*label).is_some_and(|v| !v.trim().is_empty()))
}

/// Strip `*` emphasis markers and surrounding whitespace
pub fn clean(text: &str) -> String {
    text.replace('*', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_line_joined_with_single_space() {
        let fields = parse(
            "Common name: Oak\nScientific name: Quercus\nDescription: A tree.\nIt is large.",
        );

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["Common name"], "Oak");
        assert_eq!(fields["Scientific name"], "Quercus");
        assert_eq!(fields["Description"], "A tree. It is large.");
    }

    #[test]
    fn test_blank_lines_do_not_close_open_field() {
        let fields = parse("Description: First part.\n\n   \nSecond part.");
        assert_eq!(fields["Description"], "First part. Second part.");
    }

    #[test]
    fn test_emphasis_markers_stripped_from_labels_and_values() {
        let fields = parse("**Common name:** Sunflower\n* **Family:** *Asteraceae*");
        assert_eq!(fields["Common name"], "Sunflower");
        assert_eq!(fields["Family"], "Asteraceae");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let fields = parse("Care tips: Water weekly: more in summer");
        assert_eq!(fields["Care tips"], "Water weekly: more in summer");
    }

    #[test]
    fn test_empty_rest_appends_to_open_field() {
        let fields = parse("Description: A tree.\nNote:");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Description"], "A tree. Note:");
    }

    #[test]
    fn test_empty_label_opens_its_own_field() {
        let fields = parse("Common name: Oak\n: orphan value\nmore orphan\nDescription: A tree.");
        assert_eq!(fields["Common name"], "Oak");
        assert_eq!(fields[""], "orphan value more orphan");
        assert_eq!(fields["Description"], "A tree.");
    }

    #[test]
    fn test_lines_before_first_field_dropped() {
        let fields = parse("Here is the information you asked for\nCommon name: Oak");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Common name"], "Oak");
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let fields = parse("Family: Rosaceae\nFamily: Fagaceae");
        assert_eq!(fields["Family"], "Fagaceae");
    }

    #[test]
    fn test_labels_are_case_sensitive_and_trimmed() {
        let fields = parse("  Common name  : Oak\ncommon name: oak");
        assert_eq!(fields["Common name"], "Oak");
        assert_eq!(fields["common name"], "oak");
    }

    #[test]
    fn test_label_like_line_inside_paragraph_starts_new_field() {
        // Documented ambiguity: this is indistinguishable from a new label
        let fields = parse("Description: A tall plant.\nNote well: it is poisonous.");
        assert_eq!(fields["Description"], "A tall plant.");
        assert_eq!(fields["Note well"], "it is poisonous.");
    }

    #[test]
    fn test_strict_requires_all_three() {
        assert!(parse_strict("Common name: Oak\nScientific name: Quercus").is_none());
        assert!(parse_strict("Common name: Oak\nScientific name: **\nDescription: x").is_none());

        let fields =
            parse_strict("Common name: Oak\nScientific name: Quercus\nDescription: A tree.").unwrap();
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_lenient_has_no_gate() {
        let fields = parse_lenient("Family: Fagaceae");
        assert_eq!(fields.len(), 1);
        assert!(!has_required_fields(&fields));
    }

    #[test]
    fn test_empty_blob() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
        assert!(parse_strict("").is_none());
    }

    #[test]
    fn test_windows_line_endings() {
        let fields = parse("Common name: Oak\r\nDescription: A tree.\r\nIt is large.\r\n");
        assert_eq!(fields["Common name"], "Oak");
        assert_eq!(fields["Description"], "A tree. It is large.");
    }
}
