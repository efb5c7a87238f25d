use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::api::endpoints;
use crate::api::models::*;
use crate::api::ReadingApi;
use crate::app_config::ApiConfig;
use crate::errors::ApiError;

/// reqwest client for the reading API
#[derive(Debug, Clone)]
pub struct HttpApi {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, always ending in `/`
    base_url: Url,
}

impl HttpApi {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid base URL '{}': {}", base_url, e)))?;

        // Url::join replaces the last path segment unless the base ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the `api` section of the configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn check_status(response: reqwest::Response, path: &str) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        let message = extract_error_message(&error_text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
        error!("Reading API error on {} ({}): {}", path, status, message);
        Err(ApiError::Status {
            status_code: status.as_u16(),
            message,
        })
    }

    async fn parse_body<R: DeserializeOwned>(response: reqwest::Response, path: &str) -> Result<R, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response from {}: {}", path, e)))?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("{} returned unexpected JSON: {}", path, e)))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint_url(path)?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to send request to {}: {}", path, e)))?;
        Self::check_status(response, path).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let response = self.post(path, body).await?;
        Self::parse_body(response, path).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to send request to {}: {}", path, e)))?;
        let response = Self::check_status(response, path).await?;
        Self::parse_body(response, path).await
    }
}

/// Pull the `error` field out of a JSON error body, if there is one
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(|e| e.to_string())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
}

#[async_trait]
impl ReadingApi for HttpApi {
    async fn generate_article(
        &self,
        request: &GenerateArticleRequest,
    ) -> Result<GenerateArticleResponse, ApiError> {
        self.post_json(endpoints::GENERATE_ARTICLE, request).await
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError> {
        self.post_json(endpoints::TRANSLATE, request).await
    }

    async fn analyze_grammar(
        &self,
        request: &AnalyzeGrammarRequest,
    ) -> Result<GrammarAnalysisResponse, ApiError> {
        self.post_json(endpoints::ANALYZE_GRAMMAR, request).await
    }

    async fn save_article(&self, request: &SaveArticleRequest) -> Result<SaveResponse, ApiError> {
        self.post_json(endpoints::SAVE_ARTICLE, request).await
    }

    async fn save_vocabulary(
        &self,
        request: &SaveVocabularyRequest,
    ) -> Result<SaveResponse, ApiError> {
        self.post_json(endpoints::SAVE_VOCABULARY, request).await
    }

    async fn save_grammar_note(&self, request: &SaveGrammarNoteRequest) -> Result<(), ApiError> {
        self.post(endpoints::SAVE_GRAMMAR_NOTE, request).await?;
        Ok(())
    }

    async fn get_saved_articles(&self) -> Result<Vec<SavedArticle>, ApiError> {
        self.get_json(endpoints::GET_SAVED_ARTICLES).await
    }

    async fn get_saved_vocabulary(&self) -> Result<Vec<SavedVocabulary>, ApiError> {
        self.get_json(endpoints::GET_SAVED_VOCABULARY).await
    }

    async fn get_saved_grammar_notes(&self) -> Result<Vec<SavedGrammarNote>, ApiError> {
        self.get_json(endpoints::GET_SAVED_GRAMMAR_NOTES).await
    }
}
