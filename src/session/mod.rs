/*!
 * Reading session data model.
 *
 * This module holds the explicit state of what is being read:
 * - `Session`: the live article, its translation and vocabulary
 * - `VocabularyEntry`: one word with its meaning lookup and save status
 * - `GrammarNote`: an analyzed text span
 */

pub mod models;

pub use models::{dedup_words, GrammarNote, Meaning, SavedState, Session, VocabularyEntry};
