/*!
 * Session models.
 *
 * Rendering is derived from these structures; nothing reads state back
 * out of rendered text.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::api::models::{ArticleId, GeneratedArticle, SaveArticleRequest, SaveGrammarNoteRequest};
use crate::highlight::find_example_sentence;

/// Lookup state of a word's meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meaning {
    /// The `/translate` request has not answered yet
    Pending,
    /// Translation received
    Resolved(String),
    /// The lookup failed; the message is shown in the word's slot
    Failed(String),
}

impl Meaning {
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Save status of a vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SavedState {
    #[default]
    Unsaved,
    Saving,
    Saved,
    Error(String),
}

/// One word of the live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub meaning: Meaning,
    /// First article sentence containing the word
    pub example: Option<String>,
    pub saved_state: SavedState,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, article: &str) -> Self {
        let word = word.into();
        let example = find_example_sentence(&word, article);
        Self {
            word,
            meaning: Meaning::Pending,
            example,
            saved_state: SavedState::Unsaved,
        }
    }
}

/// Distinct non-blank words in order of first occurrence
///
/// Surrounding whitespace is trimmed; otherwise words compare exactly.
pub fn dedup_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter_map(|w| {
            let word = w.as_ref().trim();
            (!word.is_empty() && seen.insert(word.to_string())).then(|| word.to_string())
        })
        .collect()
}

/// The article currently being read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Sequence number of the generate call that produced this session
    pub generation: u64,
    pub title: String,
    pub article: String,
    pub translation: String,
    pub category: String,
    /// Set once the article has been saved
    pub id: Option<ArticleId>,
    pub vocabulary: Vec<VocabularyEntry>,
}

impl Session {
    /// Build a session from a validated generation result
    pub fn from_generated(
        generation: u64,
        category: &str,
        default_title: &str,
        generated: GeneratedArticle,
    ) -> Self {
        let vocabulary = dedup_words(&generated.words)
            .into_iter()
            .map(|word| VocabularyEntry::new(word, &generated.article))
            .collect();

        Self {
            generation,
            title: generated.title.unwrap_or_else(|| default_title.to_string()),
            article: generated.article,
            translation: generated.translation,
            category: category.to_string(),
            id: None,
            vocabulary,
        }
    }

    pub fn has_article(&self) -> bool {
        !self.article.trim().is_empty()
    }

    pub fn vocabulary_words(&self) -> Vec<String> {
        self.vocabulary.iter().map(|e| e.word.clone()).collect()
    }

    pub fn entry(&self, word: &str) -> Option<&VocabularyEntry> {
        self.vocabulary.iter().find(|e| e.word == word)
    }

    pub fn entry_mut(&mut self, word: &str) -> Option<&mut VocabularyEntry> {
        self.vocabulary.iter_mut().find(|e| e.word == word)
    }

    /// Snapshot sent to `/save_article`
    pub fn save_request(&self) -> SaveArticleRequest {
        SaveArticleRequest {
            title: self.title.clone(),
            content: self.article.clone(),
            translation: self.translation.clone(),
            category: self.category.clone(),
            id: self.id.clone(),
        }
    }
}

/// Result of analyzing a selected span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarNote {
    pub sentence: String,
    pub grammar_point: String,
    pub explanation: String,
    pub article_id: Option<ArticleId>,
}

impl GrammarNote {
    pub fn save_request(&self) -> SaveGrammarNoteRequest {
        SaveGrammarNoteRequest {
            sentence: self.sentence.clone(),
            grammar_point: self.grammar_point.clone(),
            explanation: self.explanation.clone(),
            article_id: self.article_id.clone(),
        }
    }
}
