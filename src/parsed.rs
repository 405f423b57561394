//! Parsed records handed to the downstream scoring model.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One candidate answer for a passage, with its resolved query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCandidate {
    /// Query text with the candidate resolved into it.
    pub text2: String,

    /// 1 if the candidate matches a gold answer, 0 otherwise; absent when
    /// labels are disabled.
    pub label: Option<u8>,

    /// Start offset in characters into the passage.
    pub start_char: usize,

    /// End offset in characters (exclusive).
    pub end_char: usize,

    /// Passage text spanned by `[start_char, end_char)`.
    pub placeholder: String,
}

impl ParsedCandidate {
    /// Whether the candidate is labelled as a gold answer.
    pub fn is_gold(&self) -> bool {
        self.label == Some(1)
    }
}

/// A passage paired with its deduplicated candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedParagraph {
    /// Passage text.
    pub text1: String,

    /// Record identifier from the source.
    pub idx: i64,

    /// Candidates in first-occurrence order.
    pub candidates: Vec<ParsedCandidate>,
}

impl ParsedParagraph {
    /// Candidates labelled as gold answers.
    pub fn gold_candidates(&self) -> impl Iterator<Item = &ParsedCandidate> {
        self.candidates.iter().filter(|c| c.is_gold())
    }

    /// Check if at least one candidate is labelled gold.
    pub fn has_gold(&self) -> bool {
        self.gold_candidates().next().is_some()
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write paragraphs as JSON Lines, one paragraph per line.
pub fn write_jsonl(paragraphs: &[ParsedParagraph], mut out: impl Write) -> Result<()> {
    for paragraph in paragraphs {
        serde_json::to_writer(&mut out, paragraph)?;
        out.write_all(b"\n")
            .map_err(|e| DatasetError::Serialization(e.to_string()))?;
    }
    out.flush()
        .map_err(|e| DatasetError::Serialization(e.to_string()))
}

/// Summary counts over a set of parsed paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStats {
    pub paragraphs: usize,
    pub candidates: usize,
    pub gold_candidates: usize,
    pub paragraphs_without_gold: usize,
    pub unlabelled_candidates: usize,
}

impl DatasetStats {
    /// Count candidates and labels across `paragraphs`.
    pub fn from_paragraphs(paragraphs: &[ParsedParagraph]) -> Self {
        let mut stats = DatasetStats {
            paragraphs: paragraphs.len(),
            ..Default::default()
        };

        for paragraph in paragraphs {
            stats.candidates += paragraph.candidates.len();
            let gold = paragraph.gold_candidates().count();
            stats.gold_candidates += gold;
            if gold == 0 {
                stats.paragraphs_without_gold += 1;
            }
            stats.unlabelled_candidates += paragraph
                .candidates
                .iter()
                .filter(|c| c.label.is_none())
                .count();
        }

        stats
    }

    /// Mean number of candidates per paragraph.
    pub fn mean_candidates(&self) -> f64 {
        if self.paragraphs == 0 {
            0.0
        } else {
            self.candidates as f64 / self.paragraphs as f64
        }
    }
}
