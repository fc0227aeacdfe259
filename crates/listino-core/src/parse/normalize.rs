//! Line normalization: OCR repair, line splitting, and noise filtering.

use tracing::debug;

use super::patterns::{
    GLYPH_ONE, GLYPH_ZERO_O, NOISE_LINE, THREE_DECIMAL_ZERO, TRAILING_COMMA, WHITESPACE_RUN,
};

/// A cleaned candidate line with its index in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Zero-based line index in the source document.
    pub index: usize,
    /// Cleaned line text (whitespace collapsed, trimmed).
    pub text: String,
}

/// Repair common OCR artifacts in a raw text block.
///
/// Applied before line splitting:
/// - three-decimal amounts ending in zero lose the trailing digit
///   ("1.850" -> "1.85", "1,600" -> "1,60"),
/// - a bare trailing comma becomes a full decimal part ("12," -> "12,00"),
/// - "0O" between non-digits becomes "00",
/// - "l"/"I" between digits becomes "1", repeated until stable.
pub fn repair_ocr_text(text: &str) -> String {
    let repaired = THREE_DECIMAL_ZERO.replace_all(text, "${1}${2}");
    let repaired = TRAILING_COMMA.replace_all(&repaired, "${1},00${2}");
    let mut repaired = GLYPH_ZERO_O.replace_all(&repaired, "${1}00${2}").into_owned();

    // Non-overlapping replacement misses alternating runs like "1l2l3";
    // iterate until the text stops changing.
    while GLYPH_ONE.is_match(&repaired) {
        repaired = GLYPH_ONE.replace_all(&repaired, "${1}1${2}").into_owned();
    }

    repaired
}

/// Check whether a cleaned line is boilerplate noise.
///
/// A line is noise when it is shorter than `min_line_len` or matches the
/// fixed noise lexicon. A line containing a digit is never dropped for any
/// other reason.
pub fn is_noise_line(line: &str, min_line_len: usize) -> bool {
    if line.chars().count() < min_line_len {
        return true;
    }
    NOISE_LINE.is_match(line)
}

/// Turn a repaired text block into ordered, cleaned, non-noise lines.
pub fn normalize_lines(text: &str, min_line_len: usize) -> Vec<RawLine> {
    let mut lines = Vec::new();
    let mut dropped = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let cleaned = WHITESPACE_RUN.replace_all(raw, " ").trim().to_string();
        if cleaned.is_empty() {
            continue;
        }
        if is_noise_line(&cleaned, min_line_len) {
            dropped += 1;
            continue;
        }
        lines.push(RawLine {
            index,
            text: cleaned,
        });
    }

    debug!("Normalized {} candidate lines ({} noise)", lines.len(), dropped);
    lines
}
