//! End-to-end loading of the checked-in sample dataset.

use rucos_loader::{
    DatasetError, DatasetLoader, DatasetStats, LoaderOptions, ParsedParagraph, Record,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Sample source plus its default parse, built once for the whole test binary.
struct Fixture {
    path: PathBuf,
    lines: Vec<String>,
    default_parse: Vec<ParsedParagraph>,
}

impl Fixture {
    fn build() -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample.jsonl");
        let lines = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        let default_parse = DatasetLoader::new(LoaderOptions::new(&path))
            .unwrap()
            .load()
            .unwrap();
        Self {
            path,
            lines,
            default_parse,
        }
    }

    fn options(&self) -> LoaderOptions {
        LoaderOptions::new(&self.path)
    }

    fn load(&self, options: LoaderOptions) -> Vec<ParsedParagraph> {
        DatasetLoader::new(options).unwrap().load().unwrap()
    }
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(Fixture::build)
}

fn placeholders(paragraph: &ParsedParagraph) -> Vec<&str> {
    paragraph
        .candidates
        .iter()
        .map(|c| c.placeholder.as_str())
        .collect()
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

fn check_invariants(fx: &Fixture, paragraphs: &[ParsedParagraph]) {
    assert_eq!(fx.lines.len(), 5);
    for paragraph in paragraphs {
        let texts: HashSet<&str> = placeholders(paragraph).into_iter().collect();
        assert_eq!(texts.len(), paragraph.candidates.len());

        let len = paragraph.text1.chars().count();
        for candidate in &paragraph.candidates {
            assert!(candidate.start_char <= candidate.end_char);
            assert!(candidate.end_char <= len);
            assert_eq!(
                candidate.placeholder,
                char_slice(&paragraph.text1, candidate.start_char, candidate.end_char)
            );
        }
    }
}

#[test]
fn test_default_load() {
    let fx = fixture();
    let paragraphs = &fx.default_parse;
    check_invariants(fx, paragraphs);

    let idxs: Vec<i64> = paragraphs.iter().map(|p| p.idx).collect();
    assert_eq!(idxs, vec![0, 1, 2, 3, 4]);

    assert_eq!(
        placeholders(&paragraphs[0]),
        vec!["Paris", "France", "Louvre", "London"]
    );
    assert_eq!(paragraphs[0].candidates[0].text2, "The Louvre is in Paris.");
    assert_eq!(paragraphs[0].candidates[0].label, Some(1));
    assert!(paragraphs[0].candidates[1..].iter().all(|c| c.label == Some(0)));
}

#[test]
fn test_supplied_text_is_recomputed() {
    let fx = fixture();
    check_invariants(fx, &fx.default_parse);

    // Line 3 carries a bogus `text` for its first entity.
    assert!(fx.lines[3].contains("WRONG"));
    let paragraph = &fx.default_parse[3];
    assert_eq!(paragraph.candidates[0].placeholder, "Thames");
    assert_eq!(
        paragraph.candidates[0].text2,
        "The Thames flows through Paris."
    );
    assert_eq!(paragraph.gold_candidates().count(), 1);

    for (line_no, line) in fx.lines.iter().enumerate() {
        let record = Record::from_line(line, line_no).unwrap();
        for span in record.entities.iter().chain(&record.answers) {
            assert_eq!(span.text, char_slice(&record.passage, span.start, span.end));
        }
    }
}

#[test]
fn test_cyrillic_offsets_and_duplicate_answers() {
    let fx = fixture();
    let paragraph = &fx.default_parse[1];

    assert_eq!(
        placeholders(paragraph),
        vec!["Москва", "Санкт-Петербург", "России"]
    );
    assert_eq!(paragraph.candidates[0].start_char, 0);
    assert_eq!(paragraph.candidates[0].end_char, 6);
    assert_eq!(
        paragraph.candidates[0].text2,
        "Столицей России является Москва."
    );
    let labels: Vec<Option<u8>> = paragraph.candidates.iter().map(|c| c.label).collect();
    assert_eq!(labels, vec![Some(1), Some(0), Some(0)]);
}

#[test]
fn test_replace_first_marker_only() {
    let paragraph = &fixture().default_parse[2];
    assert_eq!(
        paragraph.candidates[0].text2,
        "Berlin was not tagged, unlike @placeholder."
    );
}

#[test]
fn test_query_without_marker() {
    let paragraph = &fixture().default_parse[4];
    assert_eq!(paragraph.candidates.len(), 1);
    assert_eq!(paragraph.candidates[0].text2, "No marker in this query.");
    assert_eq!(paragraph.candidates[0].label, Some(0));
}

#[test]
fn test_concatenate_mode() {
    let fx = fixture();
    let paragraphs = fx.load(
        fx.options()
            .with_union_mode("concatenate")
            .with_text_idxs(vec![0]),
    );
    assert_eq!(
        paragraphs[0].candidates[0].text2,
        "Paris The Louvre is in @placeholder."
    );
}

#[test]
fn test_extension_adds_untagged_answers() {
    let fx = fixture();

    assert_eq!(placeholders(&fx.default_parse[2]), vec!["Berlin", "Vienna"]);
    assert!(!fx.default_parse[2].has_gold());

    let extended = fx.load(fx.options().with_extended_entities(true));
    check_invariants(fx, &extended);
    assert_eq!(
        placeholders(&extended[2]),
        vec!["Berlin", "Vienna", "Prague"]
    );
    assert_eq!(extended[2].candidates[2].label, Some(1));
    assert_eq!(
        extended[2].candidates[2].text2,
        "Prague was not tagged, unlike @placeholder."
    );

    // Answers already tagged as entities add nothing.
    assert_eq!(extended[0], fx.default_parse[0]);
    assert_eq!(extended[1], fx.default_parse[1]);
}

#[test]
fn test_without_labels() {
    let fx = fixture();
    let paragraphs = fx.load(fx.options().with_labels(false));
    assert!(
        paragraphs
            .iter()
            .flat_map(|p| &p.candidates)
            .all(|c| c.label.is_none())
    );

    let stats = DatasetStats::from_paragraphs(&paragraphs);
    assert_eq!(stats.gold_candidates, 0);
    assert_eq!(stats.unlabelled_candidates, stats.candidates);
}

#[test]
fn test_select_by_index() {
    let fx = fixture();
    let paragraphs = fx.load(fx.options().with_text_idxs(vec![3, 0]));
    assert_eq!(paragraphs, vec![fx.default_parse[3].clone(), fx.default_parse[0].clone()]);
}

#[test]
fn test_select_by_range() {
    let fx = fixture();
    let paragraphs = fx.load(fx.options().with_range(2, Some(2)));
    assert_eq!(paragraphs, fx.default_parse[2..4].to_vec());
}

#[test]
fn test_range_without_limit() {
    let fx = fixture();
    let paragraphs = fx.load(fx.options().with_range(3, None));
    assert_eq!(paragraphs, fx.default_parse[3..].to_vec());
}

#[test]
fn test_index_out_of_range() {
    let fx = fixture();
    let loader = DatasetLoader::new(fx.options().with_text_idxs(vec![0, 7])).unwrap();
    assert!(matches!(
        loader.load(),
        Err(DatasetError::IndexOutOfRange { index: 7, len: 5 })
    ));
}

#[test]
fn test_invalid_mode() {
    let fx = fixture();
    let result = DatasetLoader::new(fx.options().with_union_mode("foo"));
    assert!(matches!(result, Err(DatasetError::InvalidConfig(_))));
}

#[test]
fn test_stats() {
    let stats = DatasetStats::from_paragraphs(&fixture().default_parse);
    assert_eq!(stats.paragraphs, 5);
    assert_eq!(stats.candidates, 4 + 3 + 2 + 4 + 1);
    assert_eq!(stats.gold_candidates, 3);
    assert_eq!(stats.paragraphs_without_gold, 2);
}
