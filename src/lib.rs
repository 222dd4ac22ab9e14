//! Video generation helper library
//!
//! Shared API key rotation plus the Sheets/Drive fetcher, job validator and
//! voiceover cleaner used by the desktop front end.

// Public modules
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod schemas;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use context::AppContext;
pub use error::ToolError;
pub use services::{KeyCategory, KeyRotationRegistry};
