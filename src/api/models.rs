/*!
 * Wire types for the reading API.
 *
 * Response fields are never guaranteed to be present, so every response
 * type deserializes leniently and is validated by an explicit `into_*`
 * step that maps body-level failures onto `ApiError`.
 */

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::ApiError;

/// Persistence identifier of a saved article
///
/// The store hands out numeric ids, but string ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for ArticleId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

// Treats an explicit `null` the same as a missing field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Keeps the string elements of a list and skips nulls and other values
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(word) => Some(word),
                _ => None,
            })
            .collect()
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Body of `/generate_article`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateArticleRequest {
    pub category: String,
    pub word_count: u32,
}

/// Legacy vocabulary item carrying a placeholder meaning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedWord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub word: String,
    #[serde(default)]
    pub meaning: Option<String>,
}

/// Raw response of `/generate_article`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateArticleResponse {
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub vocabulary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_words: Option<Vec<AdvancedWord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A validated generation result
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArticle {
    pub title: Option<String>,
    pub article: String,
    pub translation: String,
    /// Words in response order, duplicates included
    pub words: Vec<String>,
}

impl GenerateArticleResponse {
    /// Validate the response body
    ///
    /// `vocabulary` is the canonical word list. When it is missing the
    /// words of `advanced_words` are used instead and their meanings dropped.
    pub fn into_article(self) -> Result<GeneratedArticle, ApiError> {
        if let Some(error) = non_blank(self.error) {
            return Err(ApiError::Rejected(error));
        }

        let article = non_blank(self.article)
            .ok_or_else(|| ApiError::Malformed("response has no article text".to_string()))?;

        let words = match (self.vocabulary, self.advanced_words) {
            (Some(vocabulary), _) => vocabulary,
            (None, Some(advanced)) => advanced.into_iter().map(|w| w.word).collect(),
            (None, None) => Vec::new(),
        };

        Ok(GeneratedArticle {
            title: non_blank(self.title),
            article,
            translation: self.translation.unwrap_or_default(),
            words,
        })
    }
}

/// Body of `/translate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateRequest {
    pub text: String,
}

/// Raw response of `/translate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslateResponse {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            translation: Some(text.into()),
            error: None,
        }
    }

    pub fn into_translation(self) -> Result<String, ApiError> {
        if let Some(error) = non_blank(self.error) {
            return Err(ApiError::Rejected(error));
        }
        non_blank(self.translation)
            .ok_or_else(|| ApiError::Malformed("response has no translation".to_string()))
    }
}

/// Body of `/analyze_grammar`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeGrammarRequest {
    pub text: String,
}

/// Raw response of `/analyze_grammar`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarAnalysisResponse {
    #[serde(default)]
    pub grammar_point: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GrammarAnalysisResponse {
    /// Returns `(grammar_point, explanation)`
    pub fn into_parts(self) -> Result<(String, String), ApiError> {
        if let Some(error) = non_blank(self.error) {
            return Err(ApiError::Rejected(error));
        }
        let grammar_point = non_blank(self.grammar_point)
            .ok_or_else(|| ApiError::Malformed("response has no grammar point".to_string()))?;
        let explanation = non_blank(self.explanation)
            .ok_or_else(|| ApiError::Malformed("response has no explanation".to_string()))?;
        Ok((grammar_point, explanation))
    }
}

/// Body of `/save_article`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveArticleRequest {
    pub title: String,
    pub content: String,
    pub translation: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ArticleId>,
}

/// Body of `/save_vocabulary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveVocabularyRequest {
    pub word: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<ArticleId>,
}

/// Body of `/save_grammar_note`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveGrammarNoteRequest {
    pub sentence: String,
    pub grammar_point: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<ArticleId>,
}

/// Raw response of the save endpoints that report `success`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ArticleId>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self {
            success: Some(true),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            id: None,
        }
    }

    /// A missing `success` flag counts as success unless an error is reported
    pub fn into_result(self) -> Result<Option<ArticleId>, ApiError> {
        match (self.success, non_blank(self.error)) {
            (_, Some(error)) => Err(ApiError::Rejected(error)),
            (Some(false), None) => Err(ApiError::Rejected("save was not acknowledged".to_string())),
            _ => Ok(self.id),
        }
    }
}

/// Entry of `/get_saved_articles`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedArticle {
    #[serde(default)]
    pub id: Option<ArticleId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

/// Entry of `/get_saved_vocabulary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedVocabulary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub word: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

/// Entry of `/get_saved_grammar_notes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedGrammarNote {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grammar_point: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sentence: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

/// Parse a `created_at` timestamp down to its calendar date
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// and a bare `YYYY-MM-DD`.
pub fn parse_created_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
