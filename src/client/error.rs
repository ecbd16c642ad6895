// src/client/error.rs

use thiserror::Error;

use crate::client::http::HttpStatus;
use crate::decision::response::ApiMessage;

/// 传输层错误
///
/// 构造器本身从不报错，所有错误都在发送请求时产生。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Decoding error: {0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Server error with status code: {0}")]
    ServerError(u16),

    #[error("{}", describe_validation(.0))]
    ValidationError(Vec<ApiMessage>),

    #[error("Client error: {0}")]
    ClientError(HttpStatus),

    #[error("Unexpected status code: {0}")]
    UnexpectedStatusCode(u16),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

fn describe_validation(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "Validation error: Unknown".to_string();
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect();
    format!("Validation errors:\n{}", messages.join("\n"))
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ApiError::ValidationError(vec![
            ApiMessage::new(1001, "placement not found"),
            ApiMessage::new(1002, "count too large"),
        ]);
        assert_eq!(
            error.to_string(),
            "Validation errors:\n[1001] placement not found\n[1002] count too large"
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).to_string(),
            "Validation error: Unknown"
        );
    }

    #[test]
    fn test_status_errors_display() {
        assert_eq!(ApiError::ServerError(503).to_string(), "Server error with status code: 503");
        assert_eq!(
            ApiError::ClientError(HttpStatus::TooManyRequests).to_string(),
            "Client error: 429 - Too Many Requests"
        );
        assert_eq!(ApiError::UnexpectedStatusCode(302).to_string(), "Unexpected status code: 302");
    }

    #[test]
    fn test_decoding_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ApiError::DecodingError(json_error);
        assert!(error.to_string().starts_with("Decoding error:"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
