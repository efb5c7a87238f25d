/*!
 * Word highlighting and example-sentence lookup over article text.
 *
 * Words are always matched literally and case-insensitively. Highlights
 * are kept as byte ranges next to the untouched text, so removing them is
 * just dropping the ranges.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

// A sentence is a run of non-terminators closed by one or more terminators
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

/// Byte ranges of every case-insensitive occurrence of `word` in `text`
///
/// Regex metacharacters in `word` have no special meaning. Blank words
/// match nothing.
pub fn find_occurrences(text: &str, word: &str) -> Vec<Range<usize>> {
    if word.trim().is_empty() {
        return Vec::new();
    }

    match RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
        Err(e) => {
            warn!("Cannot build highlight pattern for '{}': {}", word, e);
            Vec::new()
        }
    }
}

/// Wrap each range of `text` in the given markers
///
/// Ranges must be sorted, non-overlapping and on char boundaries, which is
/// what `find_occurrences` returns.
pub fn apply_markers(text: &str, ranges: &[Range<usize>], open: &str, close: &str) -> String {
    let mut output = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for range in ranges {
        output.push_str(&text[cursor..range.start]);
        output.push_str(open);
        output.push_str(&text[range.clone()]);
        output.push_str(close);
        cursor = range.end;
    }
    output.push_str(&text[cursor..]);
    output
}

/// First sentence of `text` containing `word`, case-insensitively
pub fn find_example_sentence(word: &str, text: &str) -> Option<String> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    SENTENCE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|sentence| sentence.to_lowercase().contains(&needle))
        .map(|sentence| sentence.to_string())
}

/// The word currently highlighted in a text and where it occurs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub word: String,
    pub ranges: Vec<Range<usize>>,
}

impl Highlight {
    pub fn new(text: &str, word: &str) -> Self {
        Self {
            word: word.to_string(),
            ranges: find_occurrences(text, word),
        }
    }

    pub fn count(&self) -> usize {
        self.ranges.len()
    }
}
