use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::rules::RuleTable;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-.]").expect("Invalid character-strip regex"));
static KEBAB_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\s]+").expect("Invalid kebab separator regex"));
static SNAKE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("Invalid snake separator regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingStyle {
    #[default]
    Kebab,
    Snake,
    LowerCamel,
    UpperCamel,
}

impl NamingStyle {
    pub const ALL: [NamingStyle; 4] = [
        NamingStyle::Kebab,
        NamingStyle::Snake,
        NamingStyle::LowerCamel,
        NamingStyle::UpperCamel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStyle::Kebab => "kebab",
            NamingStyle::Snake => "snake",
            NamingStyle::LowerCamel => "lower-camel",
            NamingStyle::UpperCamel => "upper-camel",
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown naming style '{0}' (expected kebab, snake, lower-camel or upper-camel)")]
pub struct UnknownStyle(pub String);

impl FromStr for NamingStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamingStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Normalizes a single file or directory name.
///
/// The name is lower-cased, run through `rules` in order, stripped of anything that
/// is not a word character, `-`, `_` or `.`, and finally joined in `style`. Periods
/// are never treated as word separators, so extensions stay attached to the last
/// segment. The result may be empty.
pub fn clean_name(name: &str, style: NamingStyle, rules: &RuleTable) -> String {
    let lowered = name.to_lowercase();
    let substituted = rules.apply(&lowered);
    let stripped = INVALID_CHARS.replace_all(&substituted, "");

    match style {
        NamingStyle::Kebab => to_kebab(&stripped),
        NamingStyle::Snake => SNAKE_SEPARATORS
            .replace_all(&stripped, "_")
            .trim_matches('_')
            .to_string(),
        NamingStyle::LowerCamel => {
            let kebab = to_kebab(&stripped);
            let mut segments = kebab.split('-');
            let first = segments.next().unwrap_or_default().to_string();
            segments.fold(first, |mut acc, segment| {
                acc.push_str(&capitalize(segment));
                acc
            })
        }
        NamingStyle::UpperCamel => to_kebab(&stripped).split('-').map(capitalize).collect(),
    }
}

fn to_kebab(name: &str) -> String {
    KEBAB_SEPARATORS
        .replace_all(name, "-")
        .trim_matches('-')
        .to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}
