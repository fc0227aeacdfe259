//! Common regex patterns for Italian supplier invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price tokens: European format with optional thousands grouping and
    // exactly two decimal digits, optional leading euro mark.
    // The original rule also required the match not to be followed by a
    // digit; the regex crate has no lookahead, so the scanner enforces
    // that boundary after matching.
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        r"(?:€\s*)?(\d{1,3}(?:[.\s]\d{3})*[.,]\d{2}|\d+[.,]\d{2})"
    ).unwrap();

    // VAT tokens: the four legal Italian classes, optionally labeled with
    // "IVA", optionally with a ",0" tail or "%" suffix.
    pub static ref VAT_TOKEN: Regex = Regex::new(
        r"(?i)\b(?:iva\s*[:\-]?\s*)?(0?4(?:[.,]0)?|0?5(?:[.,]0)?|10(?:[.,]0)?|22(?:[.,]0)?)\s*%?\b"
    ).unwrap();

    // Noise lexicon: totals, tax summaries, document headers, bank and
    // transport boilerplate. A line matching any of these never yields
    // a product.
    pub static ref NOISE_LINE: Regex = Regex::new(
        r"(?i)\b(totale|imponibile|imposta|documento|iban|annotazioni|firma|vettore|destinatario|saldo|trasporto|legenda|codici iva)\b"
    ).unwrap();

    // OCR repair: a three-decimal amount ending in zero at a token boundary
    // is a per-kg price with a spurious trailing digit ("1.850" -> "1.85").
    pub static ref THREE_DECIMAL_ZERO: Regex = Regex::new(
        r"(\d+[.,]\d{2})0(\s|$)"
    ).unwrap();

    // OCR repair: a bare trailing comma before whitespace is a truncated
    // decimal part ("12," -> "12,00").
    pub static ref TRAILING_COMMA: Regex = Regex::new(
        r"(\d+),(\s)"
    ).unwrap();

    // OCR repair: "0O" between non-digits is a misread "00".
    pub static ref GLYPH_ZERO_O: Regex = Regex::new(
        r"([^\d])0O([^\d])"
    ).unwrap();

    // OCR repair: lowercase L or uppercase I between digits is a misread "1".
    pub static ref GLYPH_ONE: Regex = Regex::new(
        r"(\d)[lI](\d)"
    ).unwrap();

    // Trailing boilerplate in a description: article/lot codes, packaging,
    // weight and unit-of-measure abbreviations. Everything from the first
    // such token to the end of the line is stripped.
    pub static ref DESCRIPTION_BOILERPLATE: Regex = Regex::new(
        r"(?i)\b(art\.?|cod\.?|lotto|iso|cal|cat|colli?|lordo|tara|netto|kg|ct|pz|u\.?m\.?|p\.?\s*lordo/?pz|p\.?\s*netto|uom)\b.*$"
    ).unwrap();

    // Column separators and bullet punctuation inside descriptions.
    pub static ref SEPARATOR_RUN: Regex = Regex::new(
        r"[|•·–—-]+"
    ).unwrap();

    // Runs of whitespace collapsed to a single space.
    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();
}
