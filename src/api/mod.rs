/*!
 * Client side of the reading API.
 *
 * The reading API is an external HTTP/JSON service that generates articles,
 * translates words, analyzes grammar and stores what the user saves.
 * - `http`: reqwest implementation talking to a real server
 * - `mock`: in-memory implementation for tests and offline runs
 * - `models`: request and response bodies
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ApiError;

pub mod http;
pub mod mock;
pub mod models;

pub use http::HttpApi;
pub use mock::MockApi;
pub use models::*;

/// Endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const GENERATE_ARTICLE: &str = "/generate_article";
    pub const TRANSLATE: &str = "/translate";
    pub const ANALYZE_GRAMMAR: &str = "/analyze_grammar";
    pub const SAVE_ARTICLE: &str = "/save_article";
    pub const SAVE_VOCABULARY: &str = "/save_vocabulary";
    pub const SAVE_GRAMMAR_NOTE: &str = "/save_grammar_note";
    pub const GET_SAVED_ARTICLES: &str = "/get_saved_articles";
    pub const GET_SAVED_VOCABULARY: &str = "/get_saved_vocabulary";
    pub const GET_SAVED_GRAMMAR_NOTES: &str = "/get_saved_grammar_notes";
}

/// Interface to the reading API
///
/// Implementations report transport failures, non-success statuses and
/// unparseable bodies as `ApiError`. Body-level failures (an `error` field,
/// `success: false`, missing fields) are left in the returned response and
/// checked by the caller through the response's `into_*` method.
#[async_trait]
pub trait ReadingApi: Send + Sync + Debug {
    /// Request a new article for a category and length
    async fn generate_article(
        &self,
        request: &GenerateArticleRequest,
    ) -> Result<GenerateArticleResponse, ApiError>;

    /// Translate a single word or phrase
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError>;

    /// Analyze the grammar of a selected text span
    async fn analyze_grammar(
        &self,
        request: &AnalyzeGrammarRequest,
    ) -> Result<GrammarAnalysisResponse, ApiError>;

    /// Persist an article
    async fn save_article(&self, request: &SaveArticleRequest) -> Result<SaveResponse, ApiError>;

    /// Persist a vocabulary record
    async fn save_vocabulary(
        &self,
        request: &SaveVocabularyRequest,
    ) -> Result<SaveResponse, ApiError>;

    /// Persist a grammar note; success is the HTTP status alone
    async fn save_grammar_note(&self, request: &SaveGrammarNoteRequest) -> Result<(), ApiError>;

    async fn get_saved_articles(&self) -> Result<Vec<SavedArticle>, ApiError>;

    async fn get_saved_vocabulary(&self) -> Result<Vec<SavedVocabulary>, ApiError>;

    async fn get_saved_grammar_notes(&self) -> Result<Vec<SavedGrammarNote>, ApiError>;
}
