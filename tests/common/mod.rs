/*!
 * Common test utilities for the readlingo test suite
 */

use std::sync::Arc;

use readlingo::api::models::GenerateArticleResponse;
use readlingo::{Config, MockApi, ReadingSessionController};

/// Route log output through the test harness; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Generation response used by most tests
pub fn cat_response() -> GenerateArticleResponse {
    GenerateArticleResponse {
        article: Some("The cat sat.".to_string()),
        translation: Some("猫が座った。".to_string()),
        vocabulary: Some(vec!["cat".to_string(), "cat".to_string(), "sat".to_string()]),
        ..Default::default()
    }
}

/// A longer generation response with a title
pub fn market_response() -> GenerateArticleResponse {
    GenerateArticleResponse {
        title: Some("Markets Rally".to_string()),
        article: Some(
            "Global markets rallied on Monday. Investors welcomed the procurement data! \
             Analysts expect the rally to continue."
                .to_string(),
        ),
        translation: Some("世界の市場は月曜日に反発した。".to_string()),
        vocabulary: Some(vec![
            "rallied".to_string(),
            "procurement".to_string(),
            "analysts".to_string(),
        ]),
        ..Default::default()
    }
}

/// A controller with the default configuration over a fresh mock API
pub fn controller() -> (Arc<MockApi>, ReadingSessionController) {
    init_logging();
    let api = Arc::new(MockApi::new());
    let controller = ReadingSessionController::new(Config::default(), api.clone());
    (api, controller)
}
