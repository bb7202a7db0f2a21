// ============================================================
// Text Preprocessor
// ============================================================
// Small text rewrites applied while building a sample:
//
//   strip_bullets        — "• " markers from case write-ups
//   strip_measurements   — "3.5 cm", "12mm", "4x5 cm" in
//                          findings answers
//   prefix_history       — "history question"
//   append_explanation   — "answer. explanation"
//
// The two concatenations return Result so a caller sees when an
// operand is missing and can fall back to the base string.
//
// Reference: regex crate documentation

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConcatError;

const BULLET: &str = "• ";

/// A number, optional decimals, optional space, then mm / cm / x<n> cm,
/// followed by any further "x <number> <unit>" dimensions.
const MEASUREMENT_PATTERN: &str =
    r"\d+(?:\.\d+)?\s*(?:mm|cm|x\d+\s*cm)(?:\s*x\s*\d+(?:\.\d+)?\s*(?:mm|cm))*";

fn measurement_regex() -> &'static Regex {
    static MEASUREMENT: OnceLock<Regex> = OnceLock::new();
    MEASUREMENT.get_or_init(|| Regex::new(MEASUREMENT_PATTERN).expect("MEASUREMENT_PATTERN is valid"))
}

/// Remove every bullet marker.
pub fn strip_bullets(text: &str) -> String {
    text.replace(BULLET, "")
}

/// Remove size measurements. The result contains no further match.
pub fn strip_measurements(text: &str) -> String {
    let re = measurement_regex();
    let mut current = text.to_string();
    // A removal can join two fragments into a new match ("5 3mmcm"),
    // so repeat until nothing changes. Each pass strictly shrinks the text.
    loop {
        let next = re.replace_all(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// `history + " " + question`, when there is a history to prepend.
pub fn prefix_history(history: Option<&str>, question: &str) -> Result<String, ConcatError> {
    match history {
        Some(h) if !h.trim().is_empty() => Ok(format!("{h} {question}")),
        _ => Err(ConcatError::Missing("history")),
    }
}

/// `answer + ". " + explanation`, when there is an explanation.
pub fn append_explanation(answer: &str, explanation: Option<&str>) -> Result<String, ConcatError> {
    match explanation {
        Some(e) if !e.trim().is_empty() => Ok(format!("{answer}. {e}")),
        _ => Err(ConcatError::Missing("explanation")),
    }
}
