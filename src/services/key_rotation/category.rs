//! Key categories
//!
//! The fixed set of credential pools the application knows about. The
//! registry itself is keyed by plain strings, so custom categories remain
//! usable; this enum names the ones created at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named class of credential, one per external provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCategory {
    /// Google Gemini (script and outline generation)
    Gemini,
    /// OpenAI
    OpenAi,
    /// ElevenLabs (voiceover synthesis)
    ElevenLabs,
    /// Pexels (stock footage search)
    Pexels,
}

/// Returned when parsing a name that is not one of the known categories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown key category: {0}. Expected one of: gemini, openai, elevenlabs, pexels")]
pub struct UnknownCategory(pub String);

impl KeyCategory {
    /// Every category registered when a registry is constructed
    pub const ALL: [KeyCategory; 4] = [
        KeyCategory::Gemini,
        KeyCategory::OpenAi,
        KeyCategory::ElevenLabs,
        KeyCategory::Pexels,
    ];

    /// Canonical lowercase name, used as the registry key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::ElevenLabs => "elevenlabs",
            Self::Pexels => "pexels",
        }
    }

    /// Environment variable holding this category's comma-separated keys
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEYS",
            Self::OpenAi => "OPENAI_API_KEYS",
            Self::ElevenLabs => "ELEVENLABS_API_KEYS",
            Self::Pexels => "PEXELS_API_KEYS",
        }
    }
}

impl fmt::Display for KeyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for KeyCategory {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for KeyCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "elevenlabs" | "eleven_labs" => Ok(Self::ElevenLabs),
            "pexels" => Ok(Self::Pexels),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
