use indexmap::IndexMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Built-in substitutions, used whenever no readable rules file is available.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("c#", "csharp"),
    ("c++", "cpp"),
    (" ", "-"),
    ("+", ""),
    ("#", ""),
    ("&", "and"),
];

#[derive(thiserror::Error, Debug)]
pub enum RuleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid rules: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered literal substitutions applied to a lower-cased name.
///
/// Rules run one after another, so a replacement produced by an early rule can be
/// matched again by a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: IndexMap<String, String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
                .collect(),
        }
    }
}

impl RuleTable {
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let rules: IndexMap<String, String> = serde_json::from_str(json)?;
        if rules.contains_key("") {
            warn!("Rule with an empty pattern will never be applied");
        }
        Ok(Self { rules })
    }

    /// Loads rules from `path`, falling back to the built-in table when the file is
    /// missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No rules file at {:?}, using default rules", path);
                return Self::default();
            }
            Err(e) => {
                warn!("Could not read rules file {:?}: {}; using default rules", path, e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(table) => {
                debug!("Loaded {} rules from {:?}", table.len(), path);
                table
            }
            Err(e) => {
                warn!("Ignoring malformed rules file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn reload(&mut self, path: &Path) {
        *self = Self::load_or_default(path);
    }

    /// Replaces every rule with the ones in `json`. The current rules stay in place
    /// if `json` does not parse.
    pub fn replace_from_json(&mut self, json: &str) -> Result<(), RuleError> {
        *self = Self::from_json(json)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), RuleError> {
        fs::write(path, self.to_json_pretty()? + "\n")?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }

    pub fn apply(&self, name: &str) -> String {
        let mut result = name.to_string();
        for (pattern, replacement) in &self.rules {
            if !pattern.is_empty() && result.contains(pattern.as_str()) {
                result = result.replace(pattern.as_str(), replacement);
            }
        }
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
