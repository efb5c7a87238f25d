/*!
 * Overlapping controller operations
 *
 * Timed tests run on a paused clock, so sleeps only order the tasks.
 */

use std::time::Duration;

use readlingo::api::endpoints;
use readlingo::errors::ControllerError;
use readlingo::api::models::SavedVocabulary;
use readlingo::{Meaning, SavedState};

use crate::common;

#[tokio::test]
async fn test_concurrent_word_saves_should_settle_independently() {
    let (api, controller) = common::controller();
    api.seed_vocabulary(SavedVocabulary {
        word: "sat".to_string(),
        meaning: "座った".to_string(),
        ..Default::default()
    });
    api.push_generate(common::cat_response());
    controller.generate("science", 200).await.unwrap();

    let (cat, sat) = tokio::join!(controller.save_word("cat"), controller.save_word("sat"));
    assert!(cat.is_ok());
    assert!(sat.is_err());

    let session = controller.session().unwrap();
    assert_eq!(session.entry("cat").unwrap().saved_state, SavedState::Saved);
    assert!(matches!(session.entry("sat").unwrap().saved_state, SavedState::Error(_)));
    assert_eq!(api.call_count(endpoints::SAVE_VOCABULARY), 2);
}

#[tokio::test(start_paused = true)]
async fn test_second_generate_while_pending_should_be_refused() {
    let (api, controller) = common::controller();
    api.push_generate_delayed(common::cat_response(), Duration::from_millis(100));
    api.push_generate(common::market_response());

    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let display = controller.display();
        assert!(display.busy);
        assert!(!display.generate_enabled);
        controller.generate("business", 300).await
    };
    let (first, second) = tokio::join!(controller.generate("science", 200), second);

    assert!(first.is_ok());
    assert_eq!(second, Err(ControllerError::GenerationInFlight));
    assert_eq!(api.call_count(endpoints::GENERATE_ARTICLE), 1);
    assert!(!controller.is_generating());

    // The refused request did not consume the queued response
    controller.generate("business", 300).await.unwrap();
    assert_eq!(controller.session().unwrap().title, "Markets Rally");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_generate_should_clear_busy_flag() {
    let (api, controller) = common::controller();
    api.push_generate_delayed(common::cat_response(), Duration::from_millis(500));

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        controller.generate("science", 200),
    )
    .await;
    assert!(result.is_err());
    assert!(!controller.is_generating());
    assert!(controller.session().is_none());

    api.push_generate(common::market_response());
    assert!(controller.generate("business", 300).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_stale_lookup_should_not_touch_replacement_session() {
    let (api, controller) = common::controller();
    api.push_generate(common::cat_response());
    api.push_generate(common::market_response());
    api.delay_translation("cat", Duration::from_millis(150));

    let replace = async {
        // The first article is shown before its lookups finish
        tokio::time::sleep(Duration::from_millis(30)).await;
        let session = controller.session().unwrap();
        assert_eq!(session.generation, 1);
        assert_eq!(session.entry("cat").unwrap().meaning, Meaning::Pending);
        controller.generate("business", 300).await
    };
    let (first, second) = tokio::join!(controller.generate("science", 200), replace);

    assert_eq!(first.unwrap().generation, 1);
    assert_eq!(second.unwrap().generation, 2);

    let session = controller.session().unwrap();
    assert_eq!(session.generation, 2);
    assert_eq!(session.title, "Markets Rally");
    assert!(session.entry("cat").is_none());
    assert!(session
        .vocabulary
        .iter()
        .all(|entry| matches!(entry.meaning, Meaning::Resolved(_))));
    assert_eq!(controller.display().article.unwrap().text, session.article);
}
