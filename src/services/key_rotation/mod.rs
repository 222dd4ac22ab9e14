//! Key Rotation Module
//!
//! This module provides the process-wide registry of API key pools used to
//! spread requests across several credentials of the same provider.
//!
//! # Features
//! - One pool per key category (Gemini, OpenAI, ElevenLabs, Pexels, or any custom name)
//! - Fair round-robin selection in insertion order
//! - A single critical section guarding every read, replace and advance
//! - Lazily constructed global instance, plus explicit construction for injection
//!
//! # Example
//! ```
//! use vidgen_helper::services::key_rotation::{KeyCategory, KeyRotationRegistry};
//!
//! let registry = KeyRotationRegistry::new();
//! registry.set_keys(KeyCategory::Gemini, ["k1", "k2"]);
//!
//! assert_eq!(registry.get_next_key(KeyCategory::Gemini).as_deref(), Some("k1"));
//! assert_eq!(registry.get_next_key(KeyCategory::Gemini).as_deref(), Some("k2"));
//! assert_eq!(registry.get_next_key(KeyCategory::Gemini).as_deref(), Some("k1"));
//! ```

mod category;
mod registry;

pub use category::{KeyCategory, UnknownCategory};
pub use registry::{KeyPool, KeyPoolStats, KeyRotationRegistry};
