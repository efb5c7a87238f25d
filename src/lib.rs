/*!
 * # readlingo - graded reading practice client
 *
 * A Rust library for reading practice against a remote reading API.
 *
 * ## Features
 *
 * - Request generated reading passages by category and length
 * - Show each passage with its whole-passage translation
 * - List the passage vocabulary with per-word meanings looked up concurrently
 * - Highlight words in the passage (literal, case-insensitive)
 * - Analyze the grammar of a selected span
 * - Save articles, words and grammar notes and list them again later
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: The reading session controller and its display model
 * - `api`: The reading API seam:
 *   - `api::http`: reqwest client for a real server
 *   - `api::mock`: in-memory server for tests
 *   - `api::models`: request and response bodies
 * - `session`: Session, vocabulary entry and grammar note models
 * - `highlight`: Word highlighting and example sentences
 * - `layout`: Side panel state and margins
 * - `render`: Plain-text rendering of the display regions
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod api;
pub mod session;
pub mod highlight;
pub mod layout;
pub mod render;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{DisplaySnapshot, GenerationOutcome, Notice, NoticeLevel, ReadingSessionController};
pub use api::{HttpApi, MockApi, ReadingApi};
pub use session::{GrammarNote, Meaning, SavedState, Session, VocabularyEntry};
pub use errors::{ApiError, AppError, ControllerError};
