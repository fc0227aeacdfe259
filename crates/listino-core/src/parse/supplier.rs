//! Supplier detection and per-profile price disambiguation.
//!
//! Each known supplier lays out its line columns differently, so the choice
//! of the authoritative unit price among a line's price tokens is a named
//! per-supplier rule. The rules are tuned to known sample documents; they
//! are reproduced exactly, not generalized.

use tracing::debug;

use super::tokens::{PriceToken, VatToken};

/// Strategy for choosing the authoritative unit price on one line.
pub trait PriceRule: Sync {
    /// Choose one price token, given the line's ordered price tokens and
    /// its rightmost VAT token. `None` only when `prices` is empty.
    fn choose<'a>(
        &self,
        prices: &'a [PriceToken],
        last_vat: Option<&VatToken>,
    ) -> Option<&'a PriceToken>;
}

/// Price tokens strictly left of the rightmost VAT token.
///
/// With no VAT token on the line, every price token counts as "left".
/// Tokens are ordered by offset, so this is a prefix of the slice.
fn left_of_vat<'a>(prices: &'a [PriceToken], last_vat: Option<&VatToken>) -> &'a [PriceToken] {
    match last_vat {
        Some(vat) => {
            let n = prices.iter().take_while(|p| p.offset < vat.offset).count();
            &prices[..n]
        }
        None => prices,
    }
}

/// Generic rule: the price nearest to the VAT token, by character distance.
///
/// Falls back to the line's last price token when no VAT token exists or
/// nothing lies left of it. Ties go to the leftmost candidate.
pub struct NearestToVat;

impl PriceRule for NearestToVat {
    fn choose<'a>(
        &self,
        prices: &'a [PriceToken],
        last_vat: Option<&VatToken>,
    ) -> Option<&'a PriceToken> {
        if let Some(vat) = last_vat {
            let left = left_of_vat(prices, last_vat);
            if !left.is_empty() {
                return left.iter().min_by_key(|p| vat.offset.abs_diff(p.offset));
            }
        }
        prices.last()
    }
}

/// The last (rightmost) price token strictly left of the VAT token, not
/// necessarily the nearest one.
pub struct RightmostLeftOfVat;

impl PriceRule for RightmostLeftOfVat {
    fn choose<'a>(
        &self,
        prices: &'a [PriceToken],
        last_vat: Option<&VatToken>,
    ) -> Option<&'a PriceToken> {
        let left = left_of_vat(prices, last_vat);
        left.last().or_else(|| prices.last())
    }
}

/// The smallest price value left of the VAT token. This supplier's layout
/// lists a higher comparison price next to the true unit price, and the
/// true price is always the smaller.
pub struct MinimumLeftOfVat;

impl PriceRule for MinimumLeftOfVat {
    fn choose<'a>(
        &self,
        prices: &'a [PriceToken],
        last_vat: Option<&VatToken>,
    ) -> Option<&'a PriceToken> {
        let left = left_of_vat(prices, last_vat);
        left.iter()
            .min_by(|a, b| a.value.cmp(&b.value))
            .or_else(|| prices.last())
    }
}

/// A named supplier profile with its document fingerprint and price rule.
pub struct SupplierProfile {
    /// Label stored with parsed records and history entries.
    pub label: &'static str,
    /// Lowercase keywords that must all appear somewhere in the document.
    keywords: &'static [&'static str],
    /// Price disambiguation rule for this supplier's layout.
    pub rule: &'static dyn PriceRule,
}

static GENERIC_RULE: NearestToVat = NearestToVat;

static REGISTRY: [SupplierProfile; 4] = [
    SupplierProfile {
        label: "BIANCHIN",
        keywords: &["bianchin"],
        rule: &RightmostLeftOfVat,
    },
    SupplierProfile {
        label: "PITTONI",
        keywords: &["pittoni"],
        rule: &NearestToVat,
    },
    SupplierProfile {
        label: "BERICA_FUNGHI",
        keywords: &["berica", "funghi"],
        rule: &RightmostLeftOfVat,
    },
    SupplierProfile {
        label: "OROFRUIT",
        keywords: &["orofruit"],
        rule: &MinimumLeftOfVat,
    },
];

/// Fingerprint the whole document against the supplier registry.
///
/// Case-insensitive substring match over the full text, selected once per
/// document. No match is not an error; the caller falls back to the
/// generic rule.
pub fn detect_supplier(text: &str) -> Option<&'static SupplierProfile> {
    let lowered = text.to_lowercase();
    let profile = REGISTRY
        .iter()
        .find(|p| p.keywords.iter().all(|k| lowered.contains(k)));

    match profile {
        Some(p) => debug!("Detected supplier profile {}", p.label),
        None => debug!("No supplier fingerprint matched, using generic rule"),
    }
    profile
}

/// The fallback rule for unmatched documents.
pub fn generic_rule() -> &'static dyn PriceRule {
    &GENERIC_RULE
}
