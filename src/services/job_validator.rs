//! Job parameter validation
//!
//! The UI hands over a loose JSON object of job parameters. Validation never
//! fails outright: every problem becomes a message the UI can show as-is,
//! and an empty list means the job can be submitted.

use crate::schemas::JobParams;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::Validate;

/// Fields in display order, with the label used in messages
const FIELDS: [(&str, &str); 6] = [
    ("topic", "Topic"),
    ("duration_seconds", "Duration"),
    ("scene_count", "Scene count"),
    ("aspect_ratio", "Aspect ratio"),
    ("voice", "Voice"),
    ("sheet_url", "Sheet URL"),
];

const REQUIRED: [&str; 2] = ["topic", "duration_seconds"];

/// Collects messages keyed by field position so output order is stable
#[derive(Default)]
struct Report {
    messages: BTreeMap<(usize, usize), String>,
}

impl Report {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        let position = field_position(field);
        let seq = self.messages.len();
        self.messages.insert((position, seq), message.into());
    }

    fn has(&self, field: &str) -> bool {
        let position = field_position(field);
        self.messages.keys().any(|(p, _)| *p == position)
    }

    fn into_messages(self) -> Vec<String> {
        self.messages.into_values().collect()
    }
}

fn field_position(field: &str) -> usize {
    FIELDS
        .iter()
        .position(|(name, _)| *name == field)
        .unwrap_or(FIELDS.len())
}

fn label(field: &str) -> &str {
    FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
        .unwrap_or(field)
}

/// Validate a job parameter mapping, returning user-facing error messages
pub fn validate_job(params: &Map<String, Value>) -> Vec<String> {
    let mut report = Report::default();

    let job = JobParams {
        topic: text_field(params, "topic", &mut report).unwrap_or_default(),
        duration_seconds: integer_field(params, "duration_seconds", &mut report).unwrap_or_default(),
        scene_count: integer_field(params, "scene_count", &mut report),
        aspect_ratio: text_field(params, "aspect_ratio", &mut report),
        voice: text_field(params, "voice", &mut report),
        sheet_url: text_field(params, "sheet_url", &mut report),
    };

    for field in REQUIRED {
        if !report.has(field) && is_absent(params.get(field)) {
            report.push(field, format!("{} is required", label(field)));
        }
    }

    if let Err(errors) = job.validate() {
        for (field, field_errors) in errors.field_errors() {
            let field: &str = field.as_ref();
            if report.has(field) {
                continue;
            }
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", label(field)));
                report.push(field, message);
            }
        }
    }

    let messages = report.into_messages();
    if messages.is_empty() {
        tracing::debug!("Job parameters valid");
    } else {
        tracing::info!(error_count = messages.len(), "Job parameters rejected");
    }
    messages
}

/// Validate a job supplied as a JSON value; non-objects yield a single message
pub fn validate_job_value(value: &Value) -> Vec<String> {
    match value.as_object() {
        Some(params) => validate_job(params),
        None => vec!["Job parameters must be a JSON object".to_string()],
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Trimmed string value; any other JSON type is reported
fn text_field(params: &Map<String, Value>, field: &str, report: &mut Report) -> Option<String> {
    match params.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        _ => {
            report.push(field, format!("{} must be a string", label(field)));
            None
        }
    }
}

/// Whole number value; numeric strings such as "60" are accepted
fn integer_field(params: &Map<String, Value>, field: &str, report: &mut Report) -> Option<i64> {
    let number = match params.get(field)? {
        Value::Null => return None,
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64()),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };

    let Some(number) = number else {
        report.push(field, format!("{} must be a number", label(field)));
        return None;
    };
    if number.fract() != 0.0 {
        report.push(field, format!("{} must be a whole number", label(field)));
        return None;
    }
    Some(number as i64)
}
