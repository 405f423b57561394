//! Typed input records.
//!
//! Each line of a RuCoS source is one JSON object:
//!
//! ```json
//! {"idx": 0,
//!  "passage": {"text": "...", "entities": [{"start": 0, "end": 5}]},
//!  "qas": [{"query": "... @placeholder ...", "answers": [{"start": 0, "end": 5}]}]}
//! ```
//!
//! The `text` of entities and answers is optional on input and always
//! recomputed from the character offsets, so a [`Record`] is the only shape
//! the rest of the crate works with.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};

/// A tagged span as it appears in the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpan {
    /// Start offset in characters.
    pub start: usize,
    /// End offset in characters (exclusive).
    pub end: usize,
    /// Surface text, ignored on input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Passage block of a raw record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPassage {
    pub text: String,
    pub entities: Vec<RawSpan>,
}

/// Query block of a raw record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuery {
    pub query: String,
    pub answers: Vec<RawSpan>,
}

/// One line of the source, deserialized but not yet checked against its passage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub idx: i64,
    pub passage: RawPassage,
    pub qas: Vec<RawQuery>,
}

/// A span whose text has been materialized from the passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A validated record: spans resolved, first query block selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub idx: i64,
    pub passage: String,
    pub entities: Vec<Span>,
    pub query: String,
    pub answers: Vec<Span>,
}

impl RawRecord {
    /// Parse a single source line.
    ///
    /// `line` is the zero-based line number, used only for error reporting.
    pub fn parse(input: &str, line: usize) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| DatasetError::malformed(line, e.to_string()))
    }

    /// Resolve every entity and answer span against the passage text.
    ///
    /// Supplied `text` values are overwritten. Only the first query block is
    /// kept; a record without one is malformed.
    pub fn materialize(self, line: usize) -> Result<Record> {
        let RawRecord { idx, passage, qas } = self;

        let query = qas
            .into_iter()
            .next()
            .ok_or_else(|| DatasetError::malformed(line, "record has no query block in `qas`"))?;

        let offsets = CharOffsets::new(&passage.text);
        let resolve = |spans: Vec<RawSpan>, field: &str| -> Result<Vec<Span>> {
            spans
                .into_iter()
                .map(|span| {
                    let text = offsets.slice(&passage.text, span.start, span.end).ok_or_else(|| {
                        DatasetError::malformed(
                            line,
                            format!(
                                "{} span [{}, {}) is outside a passage of {} characters",
                                field,
                                span.start,
                                span.end,
                                offsets.char_len()
                            ),
                        )
                    })?;
                    Ok(Span {
                        start: span.start,
                        end: span.end,
                        text: text.to_string(),
                    })
                })
                .collect()
        };

        let entities = resolve(passage.entities, "entity")?;
        let answers = resolve(query.answers, "answer")?;

        Ok(Record {
            idx,
            passage: passage.text,
            entities,
            query: query.query,
            answers,
        })
    }
}

impl Record {
    /// Parse and materialize one source line.
    pub fn from_line(input: &str, line: usize) -> Result<Self> {
        RawRecord::parse(input, line)?.materialize(line)
    }
}

/// Byte positions of character boundaries, for slicing by character offset.
struct CharOffsets {
    bounds: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { bounds }
    }

    fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> Option<&'a str> {
        if start > end || end > self.char_len() {
            return None;
        }
        Some(&text[self.bounds[start]..self.bounds[end]])
    }
}
