//! Voiceover text cleanup
//!
//! Generated narration often arrives wrapped in boilerplate such as
//! "Here's the voiceover:" or "**Narrator:**". The text-to-speech step would
//! read those aloud, so they are stripped before synthesis.

use crate::schemas::Outline;
use crate::utils::truncate_with_suffix;
use regex::Regex;
use std::sync::LazyLock;

/// Leading phrases removed from narration, applied repeatedly until none match
static BOILERPLATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "Sure! Here's the voiceover script:"
        r"(?i)^\s*(?:sure[,!.]?\s*)?here(?:'s|’s| is) (?:the |your |a )?(?:voice[- ]?over|narration)(?: text| script)?(?:\s*:|\s+[-–])\s*",
        // "Voiceover:", "**Narrator (calm):**", "VO -"
        r"(?i)^\s*\**\s*(?:voice[- ]?over|narration|narrator|vo)\s*(?:\([^)]*\))?\s*\**(?:\s*:|\s+[-–])\s*\**\s*",
        // "Scene 3:", "**Scene 3** -"
        r"(?i)^\s*\**\s*scene\s*\d+\s*\**(?:\s*:|\s+[-–])\s*\**\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

const QUOTE_PAIRS: [(char, char); 2] = [('"', '"'), ('“', '”')];

/// Strip leading boilerplate and enclosing quotes from narration text
pub fn clean_voiceover(text: &str) -> String {
    let mut remaining = text.trim();

    'strip: loop {
        for pattern in BOILERPLATE_PATTERNS.iter() {
            if let Some(found) = pattern.find(remaining) {
                if found.end() > 0 {
                    remaining = remaining[found.end()..].trim_start();
                    continue 'strip;
                }
            }
        }
        break;
    }

    strip_enclosing_quotes(remaining.trim()).to_string()
}

fn strip_enclosing_quotes(text: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            if !inner.contains(open) && !inner.contains(close) {
                return inner.trim();
            }
        }
    }
    text
}

/// Clean every scene's narration in place, returning how many scenes changed
pub fn clean_outline_in_place(outline: &mut Outline) -> usize {
    let mut changed = 0;
    for (index, scene) in outline.scenes.iter_mut().enumerate() {
        let Some(narration) = scene.narration.as_mut() else {
            continue;
        };
        let cleaned = clean_voiceover(narration);
        if cleaned != *narration {
            tracing::debug!(
                scene = index,
                before = %truncate_with_suffix(narration, 40, "…"),
                after = %truncate_with_suffix(&cleaned, 40, "…"),
                "Cleaned narration"
            );
            *narration = cleaned;
            changed += 1;
        }
    }
    tracing::info!(
        scenes = outline.scenes.len(),
        changed,
        "Cleaned outline narration"
    );
    changed
}

/// Clean every scene's narration and hand the outline back
pub fn clean_outline(mut outline: Outline) -> Outline {
    clean_outline_in_place(&mut outline);
    outline
}
