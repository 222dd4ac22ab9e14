//! Error types
//!
//! Service modules define their own error enums; [`ToolError`] gathers them
//! at the application boundary and turns them into user-facing text.

mod types;

pub use types::ToolError;
