/*!
 * Error types for the subsetzer application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to an LLM endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request exceeded the caller-supplied timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-success status returned by the API
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Errors raised by transcript parsing and output-path templating
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Unknown placeholder in an output-path template
    #[error("Unknown placeholder '{{{0}}}' in output template")]
    UnknownPlaceholder(String),

    /// Malformed input subtitle text
    #[error("Malformed {format} input: {message}")]
    Parse {
        /// Subtitle format being parsed
        format: String,
        /// What went wrong
        message: String,
    },

    /// Format tag that is not one of the supported subtitle formats
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the LLM transport
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from transcript handling
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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
