/*!
 * Tests for error types and conversions
 */

use readlingo::errors::{ApiError, AppError, ControllerError};

#[test]
fn test_api_error_transport_should_display_correctly() {
    let error = ApiError::Transport("Connection refused".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Request failed"));
    assert!(display.contains("Connection refused"));
}

#[test]
fn test_api_error_status_should_display_status_and_message() {
    let error = ApiError::Status {
        status_code: 404,
        message: "No news found".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("404"));
    assert!(display.contains("No news found"));
}

#[test]
fn test_api_error_rejected_and_malformed_should_display_correctly() {
    let rejected = format!("{}", ApiError::Rejected("duplicate".to_string()));
    assert!(rejected.contains("rejected"));
    assert!(rejected.contains("duplicate"));

    let malformed = format!("{}", ApiError::Malformed("missing article".to_string()));
    assert!(malformed.contains("Failed to parse API response"));
}

#[test]
fn test_controller_error_from_api_error_should_wrap_correctly() {
    let controller_error: ControllerError = ApiError::Rejected("duplicate".to_string()).into();
    assert_eq!(
        controller_error,
        ControllerError::Api(ApiError::Rejected("duplicate".to_string()))
    );
    assert!(format!("{}", controller_error).contains("API error"));
}

#[test]
fn test_controller_error_variants_should_display_correctly() {
    assert!(format!("{}", ControllerError::NoArticle).contains("No article"));
    assert!(format!("{}", ControllerError::GenerationInFlight).contains("already being generated"));
    assert!(format!("{}", ControllerError::InvalidInput("empty word".to_string())).contains("empty word"));
}

#[test]
fn test_app_error_from_controller_error_should_wrap_correctly() {
    let app_error: AppError = ControllerError::NoArticle.into();
    assert!(format!("{}", app_error).contains("Controller error"));
}

#[test]
fn test_app_error_from_io_error_should_wrap_as_file_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_app_error_from_anyhow_error_should_wrap_as_unknown() {
    let app_error: AppError = anyhow::anyhow!("Something went wrong").into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}
