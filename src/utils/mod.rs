//! Utility modules
//!
//! Contains string helpers shared by logging and display code, and file
//! helpers for command input and output.

pub mod files;
pub mod string;

pub use files::{read_text, write_text};
pub use string::{mask_key, truncate_str, truncate_with_suffix};
