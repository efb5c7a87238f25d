/*!
 * End-to-end reading workflow against the in-memory API
 */

use readlingo::api::endpoints;
use readlingo::api::models::ArticleId;
use readlingo::render::TextRenderer;
use readlingo::{NoticeLevel, SavedState};

use crate::common;

#[tokio::test]
async fn test_full_reading_workflow() {
    let (api, controller) = common::controller();
    api.push_generate(common::market_response());
    api.set_translation("procurement", "調達");

    // Generate and read
    let outcome = controller.generate("business", 300).await.unwrap();
    assert_eq!(outcome.generation, 1);
    assert_eq!(outcome.words, 3);
    assert_eq!(controller.highlight_word("rall"), 2);
    controller.clear_highlights();

    // Save the article, then words tagged with its id
    controller.save_article().await.unwrap();
    controller.save_word("procurement").await.unwrap();
    controller.save_word("analysts").await.unwrap();

    for body in api.bodies(endpoints::SAVE_VOCABULARY) {
        assert_eq!(body["article_id"], 1);
    }
    let session = controller.session().unwrap();
    assert_eq!(session.entry("procurement").unwrap().saved_state, SavedState::Saved);
    assert_eq!(session.entry("analysts").unwrap().saved_state, SavedState::Saved);
    assert_eq!(session.entry("rallied").unwrap().saved_state, SavedState::Unsaved);

    // Analyze a selection and keep the note
    assert!(controller.select_text("Analysts expect the rally to continue."));
    let note = controller.analyze_selection().await.unwrap();
    assert_eq!(note.article_id, Some(ArticleId::Number(1)));
    controller.save_grammar_note(&note).await.unwrap();
    assert_eq!(api.bodies(endpoints::SAVE_GRAMMAR_NOTE)[0]["article_id"], 1);

    // Reload everything the way a fresh screen would
    controller.load_all_saved().await;
    let display = controller.display();
    assert_eq!(display.saved_articles.len(), 1);
    assert_eq!(display.saved_articles[0].title, "Markets Rally");
    assert_eq!(api.stored_words(), vec!["procurement", "analysts"]);
    assert_eq!(display.saved_vocabulary.len(), 2);
    assert_eq!(display.saved_vocabulary[0].meaning, "調達");
    assert_eq!(display.saved_grammar_notes.len(), 1);

    let notices = controller.take_notices();
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Success));
    assert!(controller.notices().is_empty());

    let renderer = TextRenderer::new(controller.config().display.clone());
    let screen = renderer.screen(&display);
    assert!(screen.contains("Markets Rally"));
    assert!(screen.contains("[✓] procurement : 調達"));
    assert!(screen.contains("Translation"));
}

#[tokio::test]
async fn test_new_generation_should_reset_word_state() {
    let (api, controller) = common::controller();
    api.push_generate(common::cat_response());
    api.push_generate(common::cat_response());

    controller.generate("science", 200).await.unwrap();
    controller.save_article().await.unwrap();
    controller.save_word("cat").await.unwrap();
    controller.highlight_word("cat");

    let outcome = controller.generate("science", 200).await.unwrap();
    assert_eq!(outcome.generation, 2);

    let session = controller.session().unwrap();
    assert_eq!(session.id, None);
    assert_eq!(session.entry("cat").unwrap().saved_state, SavedState::Unsaved);
    assert_eq!(controller.rendered_article().unwrap(), "The cat sat.");
    // Saved lists are not part of the session
    assert_eq!(controller.display().saved_vocabulary.len(), 1);
}

#[tokio::test]
async fn test_hidden_panels_should_be_left_out_of_screen() {
    let (api, controller) = common::controller();
    api.push_generate(common::cat_response());
    controller.generate("science", 200).await.unwrap();

    controller.toggle_translation_panel();
    controller.toggle_vocabulary_panel();

    let renderer = TextRenderer::new(controller.config().display.clone());
    let screen = renderer.screen(&controller.display());
    assert!(screen.contains("The cat sat."));
    assert!(!screen.contains("Translation"));
    assert!(!screen.contains("Vocabulary"));
}

#[tokio::test]
async fn test_saved_article_can_be_reopened_after_new_generation() {
    let (api, controller) = common::controller();
    api.push_generate(common::market_response());
    api.push_generate(common::cat_response());

    controller.generate("business", 300).await.unwrap();
    controller.save_article().await.unwrap();
    controller.generate("science", 200).await.unwrap();

    let id = controller.display().saved_articles[0].id.clone().unwrap();
    controller.open_saved_article(&id).unwrap();
    let article = controller.display().article.unwrap();
    assert_eq!(article.title, "Markets Rally");
    assert_eq!(controller.session().unwrap().article, "The cat sat.");
}
