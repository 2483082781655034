//! Scientific/common name normalizer
//!
//! Reduces a free-form name to something an encyclopedia title lookup can
//! use: emphasis markers, cultivar quotes, parenthetical qualifiers and
//! taxonomic rank suffixes are removed, then the result is cut down to
//! genus + species.

use once_cell::sync::Lazy;
use regex::Regex;

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_*]").unwrap());
static CULTIVAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"'[^']*'").unwrap());
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
// Rank abbreviations only count as whole tokens ("leaf." is not "f.")
static RANK_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\b(spp|var|subsp|f|cv)\..*$").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z_\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a plant name to genus, or genus + species
///
/// Never fails; the result may be empty.
pub fn normalize(name: &str) -> String {
    let name = EMPHASIS.replace_all(name, "");
    let name = CULTIVAR.replace_all(&name, "");
    let name = PARENTHETICAL.replace_all(&name, "");
    let name = RANK_SUFFIX.replace(&name, "");
    let name = NON_WORD.replace_all(&name, "");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = name.trim();

    let tokens: Vec<&str> = name.split(' ').collect();
    if tokens.len() == 1 {
        return name.to_string();
    }
    tokens[..2].join(" ")
}

/// Genus of a name: first token of the normalized form
pub fn genus(name: &str) -> String {
    normalize(name)
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}
