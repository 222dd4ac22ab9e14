//! Application error types

use crate::services::fetcher::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Job parameters are invalid: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No API key available for category '{category}'")]
    NoKeyAvailable { category: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    /// Short error category, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Fetch(FetchError::InvalidUrl(_)) => "invalid_url",
            ToolError::Fetch(FetchError::HttpStatus { .. }) => "http_status",
            ToolError::Fetch(_) => "fetch_error",
            ToolError::Validation(_) => "validation_error",
            ToolError::NoKeyAvailable { .. } => "missing_api_key",
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::Io { .. } => "io_error",
            ToolError::Json(_) => "invalid_json",
            ToolError::Internal(_) => "internal_error",
        }
    }

    /// Message suitable for showing directly to the user
    pub fn user_message(&self) -> String {
        match self {
            ToolError::Fetch(FetchError::InvalidUrl(detail)) => {
                format!("That link could not be used: {}", detail)
            }
            ToolError::Fetch(FetchError::HttpStatus { status, .. }) => match *status {
                401 | 403 => "Access denied. Make sure the file is shared with \"Anyone with the link\".".to_string(),
                404 => "The file was not found. Check that the link is correct.".to_string(),
                _ => format!("The server responded with HTTP {}. Please try again later.", status),
            },
            ToolError::Fetch(FetchError::Http(_)) => {
                "Could not reach Google. Check your internet connection.".to_string()
            }
            ToolError::Validation(messages) => {
                let mut text = String::from("Please fix the following:");
                for message in messages {
                    text.push_str("\n  - ");
                    text.push_str(message);
                }
                text
            }
            ToolError::NoKeyAvailable { category } => format!(
                "No {} API key is configured. Add one to {}_API_KEYS.",
                category,
                category.to_uppercase()
            ),
            ToolError::Io { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => format!("{} does not exist.", path.display()),
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied for {}.", path.display())
                }
                _ => format!("Could not access {}: {}", path.display(), source),
            },
            other => other.to_string(),
        }
    }
}
