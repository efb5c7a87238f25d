/*!
 * Error types for the readlingo application.
 *
 * This module contains custom error types for the API client, the reading
 * session controller and the binary, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the reading API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, IO)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success HTTP status
    #[error("API responded with error: {status_code} - {message}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The API answered successfully but reported a failure in the body
    #[error("API rejected the request: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    Malformed(String),
}

/// Errors returned by the reading session controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The external API call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The action needs a generated article and none is loaded
    #[error("No article has been generated yet")]
    NoArticle,

    /// A generation request is already pending
    #[error("An article is already being generated")]
    GenerationInFlight,

    /// The caller passed an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or validating configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the reading session controller
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    /// Error from the API client
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
