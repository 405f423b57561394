//! Query construction: resolving the placeholder marker for a candidate.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal marker standing in for the answer in a query.
pub const PLACEHOLDER: &str = "@placeholder";

/// How a candidate's surface text is combined with the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionMode {
    /// Substitute the first placeholder marker with the candidate text.
    #[default]
    Replace,
    /// Prepend the candidate text and a space, leaving the query untouched.
    Concatenate,
}

impl UnionMode {
    /// Configuration string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionMode::Replace => "replace",
            UnionMode::Concatenate => "concatenate",
        }
    }

    /// Build the candidate-specific query text.
    pub fn apply(&self, query: &str, candidate: &str) -> String {
        match self {
            UnionMode::Replace => query.replacen(PLACEHOLDER, candidate, 1),
            UnionMode::Concatenate => format!("{} {}", candidate, query),
        }
    }
}

impl FromStr for UnionMode {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "replace" => Ok(UnionMode::Replace),
            "concatenate" => Ok(UnionMode::Concatenate),
            other => Err(DatasetError::InvalidConfig(format!(
                "unknown query_placeholder_union_mode '{}' (expected 'replace' or 'concatenate')",
                other
            ))),
        }
    }
}

impl fmt::Display for UnionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace() {
        let text = UnionMode::Replace.apply("The city is @placeholder.", "Paris");
        assert_eq!(text, "The city is Paris.");
    }

    #[test]
    fn test_replace_first_only() {
        let text = UnionMode::Replace.apply("@placeholder and @placeholder", "Paris");
        assert_eq!(text, "Paris and @placeholder");
    }

    #[test]
    fn test_replace_without_marker() {
        let text = UnionMode::Replace.apply("No marker here.", "Paris");
        assert_eq!(text, "No marker here.");
    }

    #[test]
    fn test_concatenate() {
        let text = UnionMode::Concatenate.apply("The city is @placeholder.", "Paris");
        assert_eq!(text, "Paris The city is @placeholder.");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("replace".parse::<UnionMode>().unwrap(), UnionMode::Replace);
        assert_eq!(
            "concatenate".parse::<UnionMode>().unwrap(),
            UnionMode::Concatenate
        );
        assert!(matches!(
            "foo".parse::<UnionMode>(),
            Err(DatasetError::InvalidConfig(_))
        ));
        // Exact match only.
        assert!("Replace".parse::<UnionMode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [UnionMode::Replace, UnionMode::Concatenate] {
            assert_eq!(mode.to_string().parse::<UnionMode>().unwrap(), mode);
        }
    }
}
