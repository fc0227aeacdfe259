//! Token scanning: price-like and VAT-like tokens with line offsets.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::product::VatClass;

use super::patterns::{PRICE_TOKEN, VAT_TOKEN};

/// A price candidate found in a line.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceToken {
    /// Matched text, including any currency mark.
    pub raw: String,
    /// Parsed value, non-negative, two fractional digits.
    pub value: Decimal,
    /// Character offset of the match within its line.
    pub offset: usize,
}

/// A VAT class candidate found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatToken {
    /// Matched text, including any label or suffix.
    pub raw: String,
    /// The legal VAT class this token maps to.
    pub class: VatClass,
    /// Character offset of the match within its line.
    pub offset: usize,
}

/// Parse a European-formatted price string ("1.850,25", "6,40", "€ 12.50").
///
/// When both separators are present, dots group thousands and the comma is
/// the decimal mark; a lone comma is the decimal mark. Unparsable or
/// negative input yields `None`.
pub fn parse_price_value(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != '€' && !c.is_whitespace()).collect();

    let normalized = if cleaned.contains('.') && cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    let mut value = Decimal::from_str(&normalized).ok()?;
    if value.is_sign_negative() {
        return None;
    }
    value.rescale(2);
    Some(value)
}

/// Scan a line for price tokens, in order of appearance.
///
/// The token grammar requires exactly two decimal digits; a match directly
/// followed by another digit (e.g. the "1,60" inside an unrepaired "1,600")
/// is rejected, reproducing the original trailing-boundary rule.
pub fn scan_prices(line: &str) -> Vec<PriceToken> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();

    for m in PRICE_TOKEN.find_iter(line) {
        if bytes.get(m.end()).is_some_and(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Some(value) = parse_price_value(m.as_str()) {
            tokens.push(PriceToken {
                raw: m.as_str().to_string(),
                value,
                offset: m.start(),
            });
        }
    }

    tokens
}

/// Scan a line for VAT tokens, in order of appearance.
pub fn scan_vats(line: &str) -> Vec<VatToken> {
    VAT_TOKEN
        .captures_iter(line)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let class = VatClass::from_token(&caps[1])?;
            Some(VatToken {
                raw: full.as_str().to_string(),
                class,
                offset: full.start(),
            })
        })
        .collect()
}

/// The rightmost VAT token of a line, which is the authoritative one.
pub fn last_vat(vats: &[VatToken]) -> Option<&VatToken> {
    vats.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_price_value() {
        assert_eq!(parse_price_value("6,40"), Some(dec("6.40")));
        assert_eq!(parse_price_value("12.50"), Some(dec("12.50")));
        assert_eq!(parse_price_value("1.850,25"), Some(dec("1850.25")));
        assert_eq!(parse_price_value("€ 8,90"), Some(dec("8.90")));
        assert_eq!(parse_price_value("abc"), None);
    }

    #[test]
    fn test_scan_prices_with_offsets() {
        let prices = scan_prices("POMODORO CILIEGINO 8,90 6,40 4%");

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].value, dec("8.90"));
        assert_eq!(prices[0].offset, 19);
        assert_eq!(prices[1].value, dec("6.40"));
        assert_eq!(prices[1].offset, 24);
    }

    #[test]
    fn test_scan_prices_rejects_digit_tail() {
        // Unrepaired three-decimal amounts are not valid price tokens.
        assert!(scan_prices("MELONI 1,600").is_empty());
    }

    #[test]
    fn test_scan_vats() {
        let vats = scan_vats("ZUCCHINE 3,20 iva 10%");
        assert_eq!(vats.len(), 1);
        assert_eq!(vats[0].class, VatClass::Reduced10);

        let vats = scan_vats("MISTO 4% 1,20 22%");
        assert_eq!(last_vat(&vats).unwrap().class, VatClass::Standard22);
    }

    #[test]
    fn test_scan_vats_ignores_illegal_classes() {
        assert!(scan_vats("SCONTO 15%").is_empty());
    }

    #[test]
    fn test_malformed_text_never_panics() {
        assert!(scan_prices("€€€ ,, .. %%").is_empty());
        assert!(scan_vats("").is_empty());
    }
}
