//! RuCoS Loader - turns cloze-style reading-comprehension JSONL into
//! candidate-ranking records.
//!
//! Each source line holds a passage, the entities tagged in it, a query with
//! an `@placeholder` marker and (optionally) gold answers. Loading produces one
//! [`ParsedParagraph`] per selected line: the passage plus its deduplicated
//! candidates, each with the query resolved for that candidate and a 0/1
//! label when labels are enabled.
//!
//! # Quick Start
//!
//! ```no_run
//! use rucos_loader::{DatasetLoader, LoaderOptions};
//!
//! fn main() -> rucos_loader::Result<()> {
//!     let options = LoaderOptions::new("data/rucos/val.jsonl")
//!         .with_range(0, Some(100))
//!         .with_union_mode("concatenate");
//!
//!     // The union mode is validated here, before the file is opened.
//!     let loader = DatasetLoader::new(options)?;
//!
//!     for paragraph in loader.load()? {
//!         for candidate in &paragraph.candidates {
//!             println!("{} {:?}", candidate.text2, candidate.label);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **RawRecord / Record**: typed source lines, spans resolved by character offset
//! - **dedup**: first-occurrence filtering by surface text
//! - **UnionMode**: how a candidate is combined with the query
//! - **DatasetLoader**: line selection and the per-record transformation
//! - **ParsedParagraph / ParsedCandidate**: the output handed to a model

pub mod config;
pub mod dedup;
pub mod error;
pub mod loader;
pub mod parsed;
pub mod query;
pub mod record;

// Re-export commonly used types
pub use config::Config;
pub use error::{DatasetError, Result};
pub use loader::{DatasetLoader, LoaderOptions, Selection};
pub use parsed::{DatasetStats, ParsedCandidate, ParsedParagraph, write_jsonl};
pub use query::{PLACEHOLDER, UnionMode};
pub use record::{RawRecord, Record, Span};
