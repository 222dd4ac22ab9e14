//! Video generation job parameters

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Aspect ratios the renderer supports
pub const ASPECT_RATIOS: [&str; 3] = ["16:9", "9:16", "1:1"];

/// Parameters of a single video generation job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct JobParams {
    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: String,

    #[validate(range(min = 10, max = 600, message = "Duration must be between 10 and 600 seconds"))]
    pub duration_seconds: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 50, message = "Scene count must be between 1 and 50"))]
    pub scene_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_aspect_ratio"))]
    pub aspect_ratio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Voice must not be empty"))]
    pub voice: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Sheet URL must be a valid URL"))]
    pub sheet_url: Option<String>,
}

fn validate_aspect_ratio(value: &str) -> Result<(), ValidationError> {
    if ASPECT_RATIOS.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new("aspect_ratio");
    error.message = Some(Cow::from(format!(
        "Aspect ratio must be one of {}",
        ASPECT_RATIOS.join(", ")
    )));
    Err(error)
}
