use futures::future::join_all;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::api::models::*;
use crate::api::ReadingApi;
use crate::app_config::Config;
use crate::errors::{ApiError, ControllerError};
use crate::highlight::{apply_markers, Highlight};
use crate::layout::{Margins, PanelState};
use crate::session::{GrammarNote, Meaning, SavedState, Session, VocabularyEntry};

// @module: Reading session controller

/// Notices kept when nobody drains the queue; the oldest are dropped first
pub const MAX_QUEUED_NOTICES: usize = 50;

/// Where the displayed article came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArticleSource {
    /// The live session of the given generation
    Live { generation: u64 },
    /// A previously saved article
    Saved { id: Option<ArticleId> },
}

/// Content of the article and translation regions
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView {
    pub source: ArticleSource,
    pub title: String,
    pub text: String,
    pub translation: String,
    pub highlight: Option<Highlight>,
}

impl ArticleView {
    fn live(session: &Session) -> Self {
        Self {
            source: ArticleSource::Live {
                generation: session.generation,
            },
            title: session.title.clone(),
            text: session.article.clone(),
            translation: session.translation.clone(),
            highlight: None,
        }
    }

    fn saved(article: &SavedArticle) -> Self {
        Self {
            source: ArticleSource::Saved {
                id: article.id.clone(),
            },
            title: article.title.clone(),
            text: article.content.clone(),
            translation: article.translation.clone(),
            highlight: None,
        }
    }

    /// Article text with the current highlight markers applied
    pub fn rendered_text(&self, open: &str, close: &str) -> String {
        match &self.highlight {
            Some(highlight) => apply_markers(&self.text, &highlight.ranges, open, close),
            None => self.text.clone(),
        }
    }
}

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user (a toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Text-selection menu offering grammar analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub selection: String,
}

/// Snapshot of every display region
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    pub article: Option<ArticleView>,
    pub vocabulary: Vec<VocabularyEntry>,
    pub busy: bool,
    pub generate_enabled: bool,
    pub saved_articles: Vec<SavedArticle>,
    pub saved_vocabulary: Vec<SavedVocabulary>,
    pub saved_grammar_notes: Vec<SavedGrammarNote>,
    pub grammar_note: Option<GrammarNote>,
    pub context_menu: Option<ContextMenu>,
    pub panels: PanelState,
    pub margins: Margins,
}

/// Summary of a completed generate call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub generation: u64,
    /// Distinct vocabulary words
    pub words: usize,
    /// Words whose meaning lookup failed
    pub failed_lookups: usize,
}

#[derive(Debug, Default)]
struct ControllerState {
    session: Option<Session>,
    last_generation: u64,
    generating: bool,
    article: Option<ArticleView>,
    saved_articles: Vec<SavedArticle>,
    saved_vocabulary: Vec<SavedVocabulary>,
    saved_grammar_notes: Vec<SavedGrammarNote>,
    grammar_note: Option<GrammarNote>,
    context_menu: Option<ContextMenu>,
    panels: PanelState,
    notices: VecDeque<Notice>,
}

impl ControllerState {
    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        if self.notices.len() >= MAX_QUEUED_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    /// Live session with the given generation, if it is still current
    fn current_session(&mut self, generation: u64) -> Option<&mut Session> {
        self.session.as_mut().filter(|s| s.generation == generation)
    }
}

/// Clears the busy flag when a generate call ends, including on cancellation
struct BusyGuard<'a> {
    state: &'a Mutex<ControllerState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().generating = false;
    }
}

/// Owns the live reading session and mediates every reading API call
pub struct ReadingSessionController {
    // @field: App configuration
    config: Config,
    api: Arc<dyn ReadingApi>,
    state: Mutex<ControllerState>,
}

impl ReadingSessionController {
    // @method: Create a new controller with the given configuration and API
    pub fn new(config: Config, api: Arc<dyn ReadingApi>) -> Self {
        Self {
            config,
            api,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copy of the live session
    pub fn session(&self) -> Option<Session> {
        self.state.lock().session.clone()
    }

    /// Whether a generate request is pending
    pub fn is_generating(&self) -> bool {
        self.state.lock().generating
    }

    /// Snapshot of every display region
    pub fn display(&self) -> DisplaySnapshot {
        let state = self.state.lock();
        DisplaySnapshot {
            article: state.article.clone(),
            vocabulary: state
                .session
                .as_ref()
                .map(|s| s.vocabulary.clone())
                .unwrap_or_default(),
            busy: state.generating,
            generate_enabled: !state.generating,
            saved_articles: state.saved_articles.clone(),
            saved_vocabulary: state.saved_vocabulary.clone(),
            saved_grammar_notes: state.saved_grammar_notes.clone(),
            grammar_note: state.grammar_note.clone(),
            context_menu: state.context_menu.clone(),
            panels: state.panels,
            margins: state.panels.margins(&self.config.display),
        }
    }

    /// Displayed article text with highlight markers applied
    pub fn rendered_article(&self) -> Option<String> {
        let state = self.state.lock();
        state.article.as_ref().map(|view| {
            view.rendered_text(
                &self.config.display.highlight_open,
                &self.config.display.highlight_close,
            )
        })
    }

    /// Queued notices, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.state.lock().notices.iter().cloned().collect()
    }

    /// Remove and return the queued notices
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().notices).into()
    }

    /// Request a new article and make it the live session
    ///
    /// Word meanings are looked up concurrently once the article is shown;
    /// this returns when every lookup has settled.
    pub async fn generate(&self, category: &str, word_count: u32) -> Result<GenerationOutcome, ControllerError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ControllerError::InvalidInput("category must not be empty".to_string()));
        }
        if word_count == 0 {
            return Err(ControllerError::InvalidInput("word count must be positive".to_string()));
        }
        if !self.config.is_known_category(category) {
            warn!("Category '{}' is not one of the configured categories", category);
        }

        let guard = {
            let mut state = self.state.lock();
            if state.generating {
                return Err(ControllerError::GenerationInFlight);
            }
            state.generating = true;
            BusyGuard { state: &self.state }
        };

        info!("Generating a {}-word {} article", word_count, category);
        let request = GenerateArticleRequest {
            category: category.to_string(),
            word_count,
        };
        let generated = self
            .api
            .generate_article(&request)
            .await
            .and_then(GenerateArticleResponse::into_article);

        let generated = match generated {
            Ok(generated) => generated,
            Err(e) => {
                drop(guard);
                error!("Article generation failed: {}", e);
                self.state
                    .lock()
                    .notify(NoticeLevel::Error, format!("Failed to generate article: {}", e));
                return Err(e.into());
            }
        };

        let (generation, words) = {
            let mut state = self.state.lock();
            state.last_generation += 1;
            let generation = state.last_generation;
            let session = Session::from_generated(
                generation,
                category,
                &self.config.display.default_article_title,
                generated,
            );
            let words = session.vocabulary_words();
            state.article = Some(ArticleView::live(&session));
            state.grammar_note = None;
            state.context_menu = None;
            state.session = Some(session);
            (generation, words)
        };
        drop(guard);
        info!("Article {} ready with {} vocabulary words", generation, words.len());

        let lookups = words.iter().map(|word| self.lookup_word(generation, word));
        let failed_lookups = join_all(lookups).await.into_iter().filter(|ok| !ok).count();

        Ok(GenerationOutcome {
            generation,
            words: words.len(),
            failed_lookups,
        })
    }

    /// Translate one word and store the result in its own slot
    async fn lookup_word(&self, generation: u64, word: &str) -> bool {
        let request = TranslateRequest {
            text: word.to_string(),
        };
        let result = self
            .api
            .translate(&request)
            .await
            .and_then(TranslateResponse::into_translation);

        let mut state = self.state.lock();
        let Some(session) = state.current_session(generation) else {
            debug!("Discarding meaning of '{}' from replaced article {}", word, generation);
            return result.is_ok();
        };
        let Some(entry) = session.entry_mut(word) else {
            return result.is_ok();
        };

        match result {
            Ok(translation) => {
                entry.meaning = Meaning::Resolved(translation);
                true
            }
            Err(e) => {
                warn!("Failed to translate '{}': {}", word, e);
                entry.meaning = Meaning::Failed(e.to_string());
                false
            }
        }
    }

    /// Save the live article
    pub async fn save_article(&self) -> Result<(), ControllerError> {
        let (generation, request) = {
            let state = self.state.lock();
            match state.session.as_ref().filter(|s| s.has_article()) {
                Some(session) => (session.generation, session.save_request()),
                None => return Err(ControllerError::NoArticle),
            }
        };

        let result = self
            .api
            .save_article(&request)
            .await
            .and_then(SaveResponse::into_result);

        match result {
            Ok(id) => {
                {
                    let mut state = self.state.lock();
                    if let (Some(id), Some(session)) = (id, state.current_session(generation)) {
                        session.id = Some(id);
                    }
                    state.notify(NoticeLevel::Success, format!("Saved article \"{}\"", request.title));
                }
                info!("Saved article \"{}\"", request.title);
                let _ = self.load_saved_articles().await;
                Ok(())
            }
            Err(e) => {
                error!("Error saving article: {}", e);
                self.state
                    .lock()
                    .notify(NoticeLevel::Error, format!("Failed to save article: {}", e));
                Err(e.into())
            }
        }
    }

    /// Save one vocabulary record
    ///
    /// When the word belongs to the live session its slot tracks the save.
    pub async fn save_vocabulary(
        &self,
        word: &str,
        meaning: &str,
        example: Option<&str>,
    ) -> Result<(), ControllerError> {
        let word = word.trim();
        let meaning = meaning.trim();
        if word.is_empty() || meaning.is_empty() {
            return Err(ControllerError::InvalidInput(
                "word and meaning must not be empty".to_string(),
            ));
        }

        let (generation, article_id) = {
            let mut state = self.state.lock();
            match state.session.as_mut() {
                Some(session) => {
                    if let Some(entry) = session.entry_mut(word) {
                        entry.saved_state = SavedState::Saving;
                    }
                    (Some(session.generation), session.id.clone())
                }
                None => (None, None),
            }
        };

        let request = SaveVocabularyRequest {
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: example
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            article_id,
        };
        let result = self
            .api
            .save_vocabulary(&request)
            .await
            .and_then(SaveResponse::into_result);

        {
            let mut state = self.state.lock();
            let saved_state = match &result {
                Ok(_) => SavedState::Saved,
                Err(e) => SavedState::Error(e.to_string()),
            };
            let entry = match generation {
                Some(generation) => state
                    .current_session(generation)
                    .and_then(|s| s.entry_mut(word)),
                None => None,
            };
            if let Some(entry) = entry {
                entry.saved_state = saved_state;
            }
            match &result {
                Ok(_) => state.notify(NoticeLevel::Success, format!("Saved word \"{}\"", word)),
                Err(e) => state.notify(
                    NoticeLevel::Error,
                    format!("Failed to save word \"{}\": {}", word, e),
                ),
            }
        }

        match result {
            Ok(_) => {
                info!("Saved word \"{}\"", word);
                let _ = self.load_saved_vocabulary().await;
                Ok(())
            }
            Err(e) => {
                error!("Error saving word \"{}\": {}", word, e);
                Err(e.into())
            }
        }
    }

    /// Save a word of the live session using its looked-up meaning
    pub async fn save_word(&self, word: &str) -> Result<(), ControllerError> {
        let (meaning, example) = {
            let state = self.state.lock();
            let session = state
                .session
                .as_ref()
                .filter(|s| s.has_article())
                .ok_or(ControllerError::NoArticle)?;
            let entry = session.entry(word.trim()).ok_or_else(|| {
                ControllerError::InvalidInput(format!("\"{}\" is not in the vocabulary list", word))
            })?;
            let meaning = entry.meaning.resolved().ok_or_else(|| {
                ControllerError::InvalidInput(format!("the meaning of \"{}\" is not available", word))
            })?;
            (meaning.to_string(), entry.example.clone())
        };
        self.save_vocabulary(word, &meaning, example.as_deref()).await
    }

    /// Analyze the grammar of a selected span
    ///
    /// Failures are logged and reported as `None`.
    pub async fn analyze_grammar(&self, selected_text: &str) -> Option<GrammarNote> {
        let text = selected_text.trim();
        if text.is_empty() {
            return None;
        }

        // The note belongs to whichever article the text was selected from
        let article_id = {
            let state = self.state.lock();
            match state.article.as_ref().map(|view| &view.source) {
                Some(ArticleSource::Saved { id }) => id.clone(),
                _ => state.session.as_ref().and_then(|s| s.id.clone()),
            }
        };
        let request = AnalyzeGrammarRequest {
            text: text.to_string(),
        };
        let result = self
            .api
            .analyze_grammar(&request)
            .await
            .and_then(GrammarAnalysisResponse::into_parts);

        match result {
            Ok((grammar_point, explanation)) => Some(GrammarNote {
                sentence: text.to_string(),
                grammar_point,
                explanation,
                article_id,
            }),
            Err(e) => {
                error!("Grammar analysis error: {}", e);
                None
            }
        }
    }

    /// Persist a grammar note
    pub async fn save_grammar_note(&self, note: &GrammarNote) -> Result<(), ControllerError> {
        if note.sentence.trim().is_empty() || note.grammar_point.trim().is_empty() {
            return Err(ControllerError::InvalidInput(
                "grammar note needs a sentence and a grammar point".to_string(),
            ));
        }

        match self.api.save_grammar_note(&note.save_request()).await {
            Ok(()) => {
                self.state
                    .lock()
                    .notify(NoticeLevel::Success, "Saved grammar note");
                info!("Saved grammar note \"{}\"", note.grammar_point);
                let _ = self.load_saved_grammar_notes().await;
                Ok(())
            }
            Err(e) => {
                error!("Error saving grammar note: {}", e);
                self.state
                    .lock()
                    .notify(NoticeLevel::Error, format!("Failed to save grammar note: {}", e));
                Err(e.into())
            }
        }
    }

    /// Replace the saved-articles list; keeps the old list on failure
    pub async fn load_saved_articles(&self) -> Result<usize, ControllerError> {
        let articles = self
            .api
            .get_saved_articles()
            .await
            .map_err(|e| log_load_error("saved articles", e))?;
        let count = articles.len();
        self.state.lock().saved_articles = articles;
        debug!("Loaded {} saved articles", count);
        Ok(count)
    }

    /// Replace the saved-vocabulary list; keeps the old list on failure
    pub async fn load_saved_vocabulary(&self) -> Result<usize, ControllerError> {
        let vocabulary = self
            .api
            .get_saved_vocabulary()
            .await
            .map_err(|e| log_load_error("saved vocabulary", e))?;
        let count = vocabulary.len();
        self.state.lock().saved_vocabulary = vocabulary;
        debug!("Loaded {} saved words", count);
        Ok(count)
    }

    /// Replace the saved-notes list; keeps the old list on failure
    pub async fn load_saved_grammar_notes(&self) -> Result<usize, ControllerError> {
        let notes = self
            .api
            .get_saved_grammar_notes()
            .await
            .map_err(|e| log_load_error("saved grammar notes", e))?;
        let count = notes.len();
        self.state.lock().saved_grammar_notes = notes;
        debug!("Loaded {} saved grammar notes", count);
        Ok(count)
    }

    /// Load all three saved lists concurrently
    pub async fn load_all_saved(&self) {
        let _ = futures::join!(
            self.load_saved_articles(),
            self.load_saved_vocabulary(),
            self.load_saved_grammar_notes()
        );
    }

    /// Show a loaded saved article in the article and translation regions
    pub fn open_saved_article(&self, id: &ArticleId) -> Result<(), ControllerError> {
        let mut state = self.state.lock();
        let view = state
            .saved_articles
            .iter()
            .find(|a| a.id.as_ref() == Some(id))
            .map(ArticleView::saved)
            .ok_or_else(|| ControllerError::InvalidInput(format!("no saved article with id {}", id)))?;
        state.article = Some(view);
        Ok(())
    }

    pub fn toggle_vocabulary_panel(&self) -> Margins {
        let mut state = self.state.lock();
        state.panels.toggle_vocabulary();
        state.panels.margins(&self.config.display)
    }

    pub fn toggle_translation_panel(&self) -> Margins {
        let mut state = self.state.lock();
        state.panels.toggle_translation();
        state.panels.margins(&self.config.display)
    }

    /// Highlight every occurrence of `word` in the displayed article
    ///
    /// Replaces any previous highlight. Returns the number of occurrences.
    pub fn highlight_word(&self, word: &str) -> usize {
        let mut state = self.state.lock();
        match state.article.as_mut() {
            Some(view) => {
                let highlight = Highlight::new(&view.text, word);
                let count = highlight.count();
                view.highlight = Some(highlight);
                count
            }
            None => 0,
        }
    }

    pub fn clear_highlights(&self) {
        if let Some(view) = self.state.lock().article.as_mut() {
            view.highlight = None;
        }
    }

    /// Open the context menu for a selection; blank selections close it
    pub fn select_text(&self, text: &str) -> bool {
        let selection = text.trim();
        let mut state = self.state.lock();
        if selection.is_empty() {
            state.context_menu = None;
            return false;
        }
        state.context_menu = Some(ContextMenu {
            selection: selection.to_string(),
        });
        true
    }

    pub fn dismiss_context_menu(&self) {
        self.state.lock().context_menu = None;
    }

    /// Analyze the context menu's selection and show the resulting note
    pub async fn analyze_selection(&self) -> Option<GrammarNote> {
        let selection = self.state.lock().context_menu.take()?;
        let note = self.analyze_grammar(&selection.selection).await;

        let mut state = self.state.lock();
        match &note {
            Some(note) => {
                state.grammar_note = Some(note.clone());
                state.notify(NoticeLevel::Success, "Grammar analysis complete");
            }
            None => state.notify(NoticeLevel::Error, "Grammar analysis failed"),
        }
        note
    }
}

fn log_load_error(what: &str, error: ApiError) -> ControllerError {
    error!("Error loading {}: {}", what, error);
    error.into()
}
