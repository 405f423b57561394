//! Dataset loader: selects source lines and turns each into a [`ParsedParagraph`].
//!
//! Records are selected either as a contiguous range (streamed, so only the
//! requested slice is held in memory) or by an explicit list of line indices
//! (the source is read fully, since indices may come in any order).

use crate::dedup::dedup_spans;
use crate::error::{DatasetError, Result};
use crate::parsed::{ParsedCandidate, ParsedParagraph};
use crate::query::UnionMode;
use crate::record::{Record, Span};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Options for building a [`DatasetLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Path to the line-delimited JSON source.
    pub path: PathBuf,

    /// Compute candidate labels against the gold answers.
    #[serde(default = "default_has_labels")]
    pub has_labels: bool,

    /// Maximum number of records to stream (range selection only).
    #[serde(default)]
    pub nrows: Option<usize>,

    /// Zero-based line to start streaming from (range selection only).
    #[serde(default)]
    pub start_row: usize,

    /// Explicit zero-based line indices; overrides `start_row`/`nrows`.
    #[serde(default)]
    pub text_idxs: Option<Vec<usize>>,

    /// Either "replace" or "concatenate".
    #[serde(default = "default_union_mode")]
    pub query_placeholder_union_mode: String,

    /// Add the gold answers to the candidate pool.
    #[serde(default)]
    pub extend_entities_with_answers: bool,
}

fn default_has_labels() -> bool {
    true
}

fn default_union_mode() -> String {
    UnionMode::default().as_str().to_string()
}

impl LoaderOptions {
    /// Options with defaults for everything but the path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_labels: default_has_labels(),
            nrows: None,
            start_row: 0,
            text_idxs: None,
            query_placeholder_union_mode: default_union_mode(),
            extend_entities_with_answers: false,
        }
    }

    pub fn with_labels(mut self, has_labels: bool) -> Self {
        self.has_labels = has_labels;
        self
    }

    pub fn with_range(mut self, start_row: usize, nrows: Option<usize>) -> Self {
        self.start_row = start_row;
        self.nrows = nrows;
        self
    }

    pub fn with_text_idxs(mut self, text_idxs: Vec<usize>) -> Self {
        self.text_idxs = Some(text_idxs);
        self
    }

    pub fn with_union_mode(mut self, mode: impl Into<String>) -> Self {
        self.query_placeholder_union_mode = mode.into();
        self
    }

    pub fn with_extended_entities(mut self, extend: bool) -> Self {
        self.extend_entities_with_answers = extend;
        self
    }
}

/// Which source lines a load reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Contiguous lines starting at `start_row`, at most `nrows` of them.
    Range {
        start_row: usize,
        nrows: Option<usize>,
    },
    /// Absolute line indices, in the given order.
    Indices(Vec<usize>),
}

impl Selection {
    fn from_options(options: &LoaderOptions) -> Self {
        match &options.text_idxs {
            Some(idxs) => Selection::Indices(idxs.clone()),
            None => Selection::Range {
                start_row: options.start_row,
                nrows: options.nrows,
            },
        }
    }
}

/// Loads a RuCoS source into parsed paragraphs.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    options: LoaderOptions,
    union_mode: UnionMode,
    selection: Selection,
}

impl DatasetLoader {
    /// Validate `options` and create a loader.
    ///
    /// The union mode is checked here, before the source is touched.
    pub fn new(options: LoaderOptions) -> Result<Self> {
        let union_mode: UnionMode = options.query_placeholder_union_mode.parse()?;
        let selection = Selection::from_options(&options);
        Ok(Self {
            options,
            union_mode,
            selection,
        })
    }

    /// The options this loader was built from.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn union_mode(&self) -> UnionMode {
        self.union_mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    /// Read the selected records and parse each one.
    ///
    /// Any malformed line or out-of-range index aborts the whole load.
    pub fn load(&self) -> Result<Vec<ParsedParagraph>> {
        let file = File::open(self.path()).map_err(|e| DatasetError::io(self.path(), e))?;
        let reader = BufReader::new(file);

        let paragraphs = match &self.selection {
            Selection::Range { start_row, nrows } => {
                tracing::debug!(
                    path = %self.path().display(),
                    start_row,
                    ?nrows,
                    "streaming record range"
                );
                self.load_range(reader, *start_row, *nrows)?
            }
            Selection::Indices(idxs) => {
                tracing::debug!(
                    path = %self.path().display(),
                    count = idxs.len(),
                    "loading records by index"
                );
                self.load_indices(reader, idxs)?
            }
        };

        tracing::info!(
            path = %self.path().display(),
            paragraphs = paragraphs.len(),
            "loaded dataset"
        );
        Ok(paragraphs)
    }

    fn load_range(
        &self,
        reader: impl BufRead,
        start_row: usize,
        nrows: Option<usize>,
    ) -> Result<Vec<ParsedParagraph>> {
        let end = nrows.map(|n| start_row.saturating_add(n));
        let mut paragraphs = Vec::new();

        for (line_no, line) in reader.lines().enumerate().skip(start_row) {
            if end.is_some_and(|end| line_no >= end) {
                break;
            }
            let line = self.check_line(line, line_no)?;
            let record = Record::from_line(&line, line_no)?;
            paragraphs.push(self.transform_record(&record));
        }

        if let Some(n) = nrows {
            if paragraphs.len() < n {
                tracing::warn!(
                    requested = n,
                    read = paragraphs.len(),
                    start_row,
                    "source ended before the requested range"
                );
            }
        }

        Ok(paragraphs)
    }

    fn load_indices(&self, reader: impl BufRead, idxs: &[usize]) -> Result<Vec<ParsedParagraph>> {
        let lines = reader
            .lines()
            .enumerate()
            .map(|(line_no, line)| self.check_line(line, line_no))
            .collect::<Result<Vec<String>>>()?;

        idxs.iter()
            .map(|&index| {
                let line = lines.get(index).ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: lines.len(),
                })?;
                let record = Record::from_line(line, index)?;
                Ok(self.transform_record(&record))
            })
            .collect()
    }

    fn check_line(&self, line: io::Result<String>, line_no: usize) -> Result<String> {
        line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => DatasetError::malformed(line_no, "line is not valid UTF-8"),
            _ => DatasetError::io(self.path(), e),
        })
    }

    /// Turn one materialized record into a parsed paragraph.
    ///
    /// Depends only on `record` and the loader options.
    pub fn transform_record(&self, record: &Record) -> ParsedParagraph {
        let pool = if self.options.extend_entities_with_answers {
            dedup_spans(record.entities.iter().chain(&record.answers))
        } else {
            dedup_spans(&record.entities)
        };
        let answers = dedup_spans(&record.answers);

        let candidates = pool
            .into_iter()
            .map(|entity| self.build_candidate(entity, &record.query, &answers))
            .collect();

        ParsedParagraph {
            text1: record.passage.clone(),
            idx: record.idx,
            candidates,
        }
    }

    fn build_candidate(&self, entity: &Span, query: &str, answers: &[&Span]) -> ParsedCandidate {
        let label = self.options.has_labels.then(|| {
            let is_answer = answers.iter().any(|answer| answer.text == entity.text);
            u8::from(is_answer)
        });

        ParsedCandidate {
            text2: self.union_mode.apply(query, &entity.text),
            label,
            start_char: entity.start,
            end_char: entity.end,
            placeholder: entity.text.clone(),
        }
    }
}
