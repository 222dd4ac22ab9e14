//! Video outline schema
//!
//! An outline is produced by the script generator and edited by hand before
//! rendering. Only the fields this crate touches are typed; everything else
//! is carried through unchanged so a load/clean/save cycle is lossless.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A generated video outline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub scenes: Vec<Scene>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One scene of an outline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Text read by the voiceover
    #[serde(default, alias = "voiceover", skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Outline {
    /// Parse an outline from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of scenes that carry narration text
    pub fn narrated_scene_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.narration.is_some()).count()
    }
}

impl Scene {
    pub fn with_narration(narration: impl Into<String>) -> Self {
        Self {
            narration: Some(narration.into()),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_are_preserved() {
        let input = json!({
            "title": "Deep sea",
            "style": "documentary",
            "scenes": [
                {"narration": "Below 200 meters...", "duration": 8, "visual": "anglerfish"},
                {"visual": "title card"}
            ]
        });

        let outline: Outline = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(outline.title.as_deref(), Some("Deep sea"));
        assert_eq!(outline.extra["style"], "documentary");
        assert_eq!(outline.scenes[0].extra["duration"], 8);
        assert_eq!(outline.scenes[1].narration, None);
        assert_eq!(outline.narrated_scene_count(), 1);

        assert_eq!(serde_json::to_value(&outline).unwrap(), input);
    }

    #[test]
    fn test_voiceover_alias() {
        let outline = Outline::from_json(r#"{"scenes": [{"voiceover": "Hello"}]}"#).unwrap();
        assert_eq!(outline.scenes[0].narration.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_missing_scenes_defaults_to_empty() {
        let outline = Outline::from_json("{}").unwrap();
        assert!(outline.scenes.is_empty());
        assert!(outline.title.is_none());
    }
}
