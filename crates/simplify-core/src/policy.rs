//! When to attach the original source text to a whole-document edit

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word stems (Spanish and English) that point at content the simplified
/// form may no longer carry
pub const SOURCE_REFERENCE_STEMS: &[&str] = &[
    "original",
    "omit",
    "falt",
    "añad",
    "agreg",
    "inclu",
    "restaur",
    "recuper",
    "olvid",
    "fuente",
    "restor",
    "recover",
    "source",
];

/// Whole words with the same meaning, too short to match as stems
pub const SOURCE_REFERENCE_WORDS: &[&str] = &["add", "added", "adding", "missing", "left out"];

lazy_static! {
    static ref SOURCE_REFERENCE_PATTERN: Regex = {
        let stems = SOURCE_REFERENCE_STEMS
            .iter()
            .map(|stem| format!(r"{}\w*", regex::escape(stem)));
        let words = SOURCE_REFERENCE_WORDS.iter().map(|word| regex::escape(word));
        let alternation = stems.chain(words).collect::<Vec<_>>().join("|");
        Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
    };
}

/// Policy for including the extracted source text in whole-document edit prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceContextPolicy {
    Never,
    /// Include it when the instruction mentions the original or missing content
    #[default]
    Heuristic,
    Always,
}

impl SourceContextPolicy {
    pub fn wants_source(&self, instruction: &str) -> bool {
        match self {
            SourceContextPolicy::Never => false,
            SourceContextPolicy::Always => true,
            SourceContextPolicy::Heuristic => refers_to_source(instruction),
        }
    }
}

/// Whether an instruction plausibly needs material from the original contract
pub fn refers_to_source(instruction: &str) -> bool {
    SOURCE_REFERENCE_PATTERN.is_match(instruction)
}

impl FromStr for SourceContextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "never" => Ok(SourceContextPolicy::Never),
            "heuristic" => Ok(SourceContextPolicy::Heuristic),
            "always" => Ok(SourceContextPolicy::Always),
            other => Err(format!(
                "unknown source context policy '{}' (expected never, heuristic or always)",
                other
            )),
        }
    }
}

impl fmt::Display for SourceContextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceContextPolicy::Never => "never",
            SourceContextPolicy::Heuristic => "heuristic",
            SourceContextPolicy::Always => "always",
        };
        f.write_str(name)
    }
}
