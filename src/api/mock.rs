/*!
 * In-memory reading API for testing.
 *
 * `MockApi` behaves like a small server with its own store:
 * - generation responses are scripted and consumed in order
 * - `/translate` answers `"[ja] <text>"` unless a word is scripted
 * - saves append to the store; a second save of the same word is
 *   answered with `{success: false, error: "duplicate"}`
 * - any endpoint can be made to fail, and every call is recorded
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::api::endpoints;
use crate::api::models::*;
use crate::api::ReadingApi;
use crate::errors::ApiError;

/// A request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Endpoint path
    pub endpoint: &'static str,
    /// JSON body, `None` for GET requests
    pub body: Option<serde_json::Value>,
}

#[derive(Debug)]
struct ScriptedGeneration {
    result: Result<GenerateArticleResponse, ApiError>,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct MockState {
    generations: VecDeque<ScriptedGeneration>,
    translations: HashMap<String, Result<TranslateResponse, ApiError>>,
    translation_delays: HashMap<String, Duration>,
    grammar: Option<Result<GrammarAnalysisResponse, ApiError>>,
    failures: HashMap<&'static str, ApiError>,
    articles: Vec<SavedArticle>,
    vocabulary: Vec<SavedVocabulary>,
    grammar_notes: Vec<SavedGrammarNote>,
    next_article_id: i64,
    calls: Vec<RecordedCall>,
}

/// Scriptable in-memory implementation of `ReadingApi`
#[derive(Debug, Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a generation response
    pub fn push_generate(&self, response: GenerateArticleResponse) {
        self.push_generation(Ok(response), None);
    }

    /// Queue a generation response that arrives after `delay`
    pub fn push_generate_delayed(&self, response: GenerateArticleResponse, delay: Duration) {
        self.push_generation(Ok(response), Some(delay));
    }

    /// Queue a failed generation
    pub fn push_generate_error(&self, error: ApiError) {
        self.push_generation(Err(error), None);
    }

    fn push_generation(&self, result: Result<GenerateArticleResponse, ApiError>, delay: Option<Duration>) {
        self.state
            .lock()
            .generations
            .push_back(ScriptedGeneration { result, delay });
    }

    /// Script the translation returned for `word`
    pub fn set_translation(&self, word: &str, translation: &str) {
        self.state
            .lock()
            .translations
            .insert(word.to_string(), Ok(TranslateResponse::translated(translation)));
    }

    /// Script a raw `/translate` result for `word`
    pub fn set_translation_result(&self, word: &str, result: Result<TranslateResponse, ApiError>) {
        self.state.lock().translations.insert(word.to_string(), result);
    }

    /// Delay the `/translate` answer for `word`
    pub fn delay_translation(&self, word: &str, delay: Duration) {
        self.state
            .lock()
            .translation_delays
            .insert(word.to_string(), delay);
    }

    /// Script the `/analyze_grammar` result
    pub fn set_grammar_analysis(&self, result: Result<GrammarAnalysisResponse, ApiError>) {
        self.state.lock().grammar = Some(result);
    }

    /// Make every call to `endpoint` fail with `error`
    pub fn fail_endpoint(&self, endpoint: &'static str, error: ApiError) {
        self.state.lock().failures.insert(endpoint, error);
    }

    pub fn clear_failure(&self, endpoint: &'static str) {
        self.state.lock().failures.remove(endpoint);
    }

    /// Put an article in the store
    pub fn seed_article(&self, mut article: SavedArticle) -> ArticleId {
        let mut state = self.state.lock();
        let id = match article.id.clone() {
            Some(id) => id,
            None => {
                state.next_article_id += 1;
                ArticleId::Number(state.next_article_id)
            }
        };
        article.id = Some(id.clone());
        state.articles.push(article);
        id
    }

    /// Put a vocabulary record in the store
    pub fn seed_vocabulary(&self, entry: SavedVocabulary) {
        self.state.lock().vocabulary.push(entry);
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls received on `endpoint`
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Bodies received on `endpoint`, in arrival order
    pub fn bodies(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .filter_map(|c| c.body.clone())
            .collect()
    }

    /// Words currently in the vocabulary store
    pub fn stored_words(&self) -> Vec<String> {
        self.state
            .lock()
            .vocabulary
            .iter()
            .map(|v| v.word.clone())
            .collect()
    }

    /// Number of articles currently in the store
    pub fn stored_article_count(&self) -> usize {
        self.state.lock().articles.len()
    }

    /// Record the call and return the configured failure for the endpoint
    fn receive<B: Serialize>(&self, endpoint: &'static str, body: Option<&B>) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            endpoint,
            body: body.and_then(|b| serde_json::to_value(b).ok()),
        });
        match state.failures.get(endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl ReadingApi for MockApi {
    async fn generate_article(
        &self,
        request: &GenerateArticleRequest,
    ) -> Result<GenerateArticleResponse, ApiError> {
        self.receive(endpoints::GENERATE_ARTICLE, Some(request))?;
        let scripted = self.state.lock().generations.pop_front();
        let Some(scripted) = scripted else {
            return Err(ApiError::Status {
                status_code: 404,
                message: "No news found".to_string(),
            });
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.result
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError> {
        self.receive(endpoints::TRANSLATE, Some(request))?;
        let delay = self.state.lock().translation_delays.get(&request.text).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.state.lock().translations.get(&request.text).cloned();
        scripted.unwrap_or_else(|| Ok(TranslateResponse::translated(format!("[ja] {}", request.text))))
    }

    async fn analyze_grammar(
        &self,
        request: &AnalyzeGrammarRequest,
    ) -> Result<GrammarAnalysisResponse, ApiError> {
        self.receive(endpoints::ANALYZE_GRAMMAR, Some(request))?;
        let scripted = self.state.lock().grammar.clone();
        scripted.unwrap_or_else(|| {
            Ok(GrammarAnalysisResponse {
                grammar_point: Some("Sentence structure".to_string()),
                explanation: Some(format!("\"{}\" follows subject-verb-object order.", request.text)),
                error: None,
            })
        })
    }

    async fn save_article(&self, request: &SaveArticleRequest) -> Result<SaveResponse, ApiError> {
        self.receive(endpoints::SAVE_ARTICLE, Some(request))?;
        let mut state = self.state.lock();

        // Saving again under a known id updates the stored copy
        if let Some(id) = &request.id {
            if let Some(existing) = state.articles.iter_mut().find(|a| a.id.as_ref() == Some(id)) {
                existing.title = request.title.clone();
                existing.content = request.content.clone();
                existing.translation = request.translation.clone();
                existing.category = request.category.clone();
                return Ok(SaveResponse {
                    success: Some(true),
                    error: None,
                    id: Some(id.clone()),
                });
            }
        }

        state.next_article_id += 1;
        let id = ArticleId::Number(state.next_article_id);
        state.articles.push(SavedArticle {
            id: Some(id.clone()),
            title: request.title.clone(),
            content: request.content.clone(),
            translation: request.translation.clone(),
            category: request.category.clone(),
            created_at: now_timestamp(),
        });
        Ok(SaveResponse {
            success: Some(true),
            error: None,
            id: Some(id),
        })
    }

    async fn save_vocabulary(
        &self,
        request: &SaveVocabularyRequest,
    ) -> Result<SaveResponse, ApiError> {
        self.receive(endpoints::SAVE_VOCABULARY, Some(request))?;
        let mut state = self.state.lock();
        let duplicate = state
            .vocabulary
            .iter()
            .any(|v| v.word.to_lowercase() == request.word.to_lowercase());
        if duplicate {
            return Ok(SaveResponse::failed("duplicate"));
        }
        state.vocabulary.push(SavedVocabulary {
            word: request.word.clone(),
            meaning: request.meaning.clone(),
            example: request.example.clone(),
            created_at: now_timestamp(),
        });
        Ok(SaveResponse::ok())
    }

    async fn save_grammar_note(&self, request: &SaveGrammarNoteRequest) -> Result<(), ApiError> {
        self.receive(endpoints::SAVE_GRAMMAR_NOTE, Some(request))?;
        self.state.lock().grammar_notes.push(SavedGrammarNote {
            grammar_point: request.grammar_point.clone(),
            sentence: request.sentence.clone(),
            explanation: request.explanation.clone(),
            created_at: now_timestamp(),
        });
        Ok(())
    }

    async fn get_saved_articles(&self) -> Result<Vec<SavedArticle>, ApiError> {
        self.receive::<()>(endpoints::GET_SAVED_ARTICLES, None)?;
        Ok(self.state.lock().articles.clone())
    }

    async fn get_saved_vocabulary(&self) -> Result<Vec<SavedVocabulary>, ApiError> {
        self.receive::<()>(endpoints::GET_SAVED_VOCABULARY, None)?;
        Ok(self.state.lock().vocabulary.clone())
    }

    async fn get_saved_grammar_notes(&self) -> Result<Vec<SavedGrammarNote>, ApiError> {
        self.receive::<()>(endpoints::GET_SAVED_GRAMMAR_NOTES, None)?;
        Ok(self.state.lock().grammar_notes.clone())
    }
}
