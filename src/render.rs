/*!
 * Plain-text rendering of the display regions.
 *
 * Everything here is a pure function of a `DisplaySnapshot`, so the same
 * controller state always renders the same way.
 */

use std::fmt::Write;

use crate::api::models::{parse_created_date, SavedArticle, SavedGrammarNote, SavedVocabulary};
use crate::app_config::DisplayConfig;
use crate::app_controller::{ArticleView, DisplaySnapshot, Notice, NoticeLevel};
use crate::layout::LayoutMode;
use crate::session::{GrammarNote, Meaning, SavedState, VocabularyEntry};

/// Renders display regions as terminal text
#[derive(Debug, Clone)]
pub struct TextRenderer {
    display: DisplayConfig,
}

impl TextRenderer {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Article title and (highlighted) body
    pub fn article(&self, view: &ArticleView) -> String {
        let body = view.rendered_text(&self.display.highlight_open, &self.display.highlight_close);
        format!("{}\n{}\n\n{}\n", view.title, "=".repeat(view.title.chars().count()), body)
    }

    pub fn translation(&self, view: &ArticleView) -> String {
        format!("Translation\n-----------\n{}\n", view.translation)
    }

    /// One line per word: status, word, meaning and example
    pub fn word_list(&self, entries: &[VocabularyEntry]) -> String {
        let mut output = String::from("Vocabulary\n----------\n");
        if entries.is_empty() {
            output.push_str("(no words)\n");
        }
        for entry in entries {
            let meaning = match &entry.meaning {
                Meaning::Pending => "…".to_string(),
                Meaning::Resolved(text) => text.clone(),
                Meaning::Failed(message) => format!("(lookup failed: {})", message),
            };
            let marker = match &entry.saved_state {
                SavedState::Unsaved => "[ ]".to_string(),
                SavedState::Saving => "[~]".to_string(),
                SavedState::Saved => "[✓]".to_string(),
                SavedState::Error(message) => format!("[!] ({})", message),
            };
            let _ = writeln!(output, "{} {} : {}", marker, entry.word, meaning);
            if let Some(example) = &entry.example {
                let _ = writeln!(output, "      e.g. {}", example);
            }
        }
        output
    }

    pub fn saved_articles(&self, articles: &[SavedArticle]) -> String {
        let mut output = String::from("Saved articles\n--------------\n");
        if articles.is_empty() {
            output.push_str("(none)\n");
        }
        for article in articles {
            let id = article
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                output,
                "#{} {} [{}] {}",
                id,
                article.title,
                article.category,
                format_date(&article.created_at)
            );
        }
        output
    }

    pub fn saved_vocabulary(&self, vocabulary: &[SavedVocabulary]) -> String {
        let mut output = String::from("Saved vocabulary\n----------------\n");
        if vocabulary.is_empty() {
            output.push_str("(none)\n");
        }
        for entry in vocabulary {
            let _ = writeln!(
                output,
                "{} : {} ({})",
                entry.word,
                entry.meaning,
                format_date(&entry.created_at)
            );
            if let Some(example) = entry.example.as_deref().filter(|e| !e.is_empty()) {
                let _ = writeln!(output, "      e.g. {}", example);
            }
        }
        output
    }

    pub fn saved_grammar_notes(&self, notes: &[SavedGrammarNote]) -> String {
        let mut output = String::from("Saved grammar notes\n-------------------\n");
        if notes.is_empty() {
            output.push_str("(none)\n");
        }
        for note in notes {
            let _ = writeln!(
                output,
                "{} ({})\n  \"{}\"\n  {}",
                note.grammar_point,
                format_date(&note.created_at),
                note.sentence,
                note.explanation
            );
        }
        output
    }

    pub fn grammar_note(&self, note: &GrammarNote) -> String {
        format!(
            "Grammar: {}\n  \"{}\"\n  {}\n",
            note.grammar_point, note.sentence, note.explanation
        )
    }

    pub fn notice(&self, notice: &Notice) -> String {
        match notice.level {
            NoticeLevel::Success => format!("✓ {}", notice.message),
            NoticeLevel::Error => format!("✗ {}", notice.message),
        }
    }

    /// The reading screen: panels that are hidden are left out
    pub fn screen(&self, snapshot: &DisplaySnapshot) -> String {
        let mut sections = Vec::new();
        if snapshot.busy {
            sections.push("Generating...\n".to_string());
        }
        let mode = snapshot.panels.mode();
        if let Some(view) = &snapshot.article {
            sections.push(self.article(view));
            if matches!(mode, LayoutMode::BothPanels | LayoutMode::TranslationOnly) {
                sections.push(self.translation(view));
            }
        }
        let show_vocabulary = matches!(mode, LayoutMode::BothPanels | LayoutMode::VocabularyOnly);
        if show_vocabulary && !snapshot.vocabulary.is_empty() {
            sections.push(self.word_list(&snapshot.vocabulary));
        }
        if let Some(note) = &snapshot.grammar_note {
            sections.push(self.grammar_note(note));
        }
        sections.join("\n")
    }
}

/// Calendar date of a `created_at` value, or the raw value if unparseable
fn format_date(raw: &str) -> String {
    match parse_created_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}
