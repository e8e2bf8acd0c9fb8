//! Architectural scale notation detection.
//!
//! Tries a fixed, ordered list of patterns against the extracted text and
//! returns the first match. Ordering is by pattern list, not by position
//! in the text, so the more specific fractional notation always beats the
//! generic ratio form.

use bidforge_core::ScaleInfo;
use once_cell::sync::Lazy;
use regex::Regex;

/// Confidence assigned to any regex match. Scale notations are formulaic
/// enough that a match is a strong signal, but OCR noise keeps this
/// below certainty.
const SCALE_MATCH_CONFIDENCE: f64 = 0.9;

static SCALE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        // 1/4" = 1'-0", 1/8"=1', 3/32" = 1'-0"
        (
            "fractional_inch",
            Regex::new(r#"(?i)\d+/\d+\s*["”]\s*=\s*\d+['’](?:\s*-\s*\d+["”])?"#)
                .expect("fractional_inch pattern"),
        ),
        // 1" = 1'-0", 3" = 1'
        (
            "inch_per_foot",
            Regex::new(r#"(?i)\d+\s*["”]\s*=\s*\d+['’](?:\s*-\s*\d+["”])?"#)
                .expect("inch_per_foot pattern"),
        ),
        // 1:100, 1 : 50
        ("ratio", Regex::new(r"\b1\s*:\s*\d+\b").expect("ratio pattern")),
    ]
});

/// Find an architectural scale notation in OCR text.
///
/// Returns `None` for empty text or when no pattern matches.
pub fn detect_scale(text: &str) -> Option<ScaleInfo> {
    if text.is_empty() {
        return None;
    }
    for (name, pattern) in SCALE_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            return Some(ScaleInfo {
                scale_string: m.as_str().to_string(),
                pattern: (*name).to_string(),
                confidence: SCALE_MATCH_CONFIDENCE,
            });
        }
    }
    None
}
