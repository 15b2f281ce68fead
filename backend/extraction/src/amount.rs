//! Amount extraction: labeled totals first, bare decimals as fallback.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bare decimal matches at or above this are assumed to be misread
/// reference numbers, not totals, and are skipped.
const FALLBACK_CEILING: f64 = 10_000.0;

/// A total-ish keyword, optional colon, optional currency symbol, then a
/// numeral group allowing thousands separators and an optional embedded
/// space before the two-digit fraction.
static LABELED_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:SUB\s+TOTAL|SUBTOTAL|TOTAL|AMOUNT|GRAND\s+TOTAL|BALANCE\s+DUE|TOTAL\s+DUE|PAID)\s*:?\s*\$?\s*((?:[0-9]{1,3}(?:,\s?[0-9]{3})*|[0-9]+)\.?\s?[0-9]{2})",
    )
    .unwrap()
});

/// Bare `digits.digits` fallback when no labeled total matched.
static BARE_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+\.\s?[0-9]{2})").unwrap());

/// Extract the transaction amount from recognized text.
///
/// Receipts often repeat the total near subtotals and taxes; among all
/// labeled matches the MAXIMUM numeric value is taken as the grand total.
/// This can pick a larger labeled line item over the true total; that is
/// the inherited policy and the calibration suite depends on it.
pub fn extract_amount(text: &str) -> f64 {
    let mut max_amount = 0.0_f64;

    for caps in LABELED_AMOUNT_RE.captures_iter(text) {
        let raw = caps[1].replace([' ', ','], "");
        if let Ok(amount) = raw.parse::<f64>() {
            if amount > max_amount {
                max_amount = amount;
            }
        }
    }

    if max_amount == 0.0 {
        for caps in BARE_AMOUNT_RE.captures_iter(text) {
            let raw = caps[1].replace(' ', "");
            if let Ok(amount) = raw.parse::<f64>() {
                if amount > max_amount && amount < FALLBACK_CEILING {
                    max_amount = amount;
                }
            }
        }
    }

    max_amount
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_total_beats_subtotal() {
        assert_eq!(extract_amount("TOTAL: $45.00\nSUBTOTAL: $40.00"), 45.00);
    }

    #[test]
    fn picks_maximum_of_two_labeled_matches() {
        assert_eq!(extract_amount("SUBTOTAL: 99.10\nTOTAL: 12.00"), 99.10);
    }

    #[test]
    fn matches_all_label_variants() {
        assert_eq!(extract_amount("GRAND TOTAL 120.50"), 120.50);
        assert_eq!(extract_amount("Balance Due: 33.25"), 33.25);
        assert_eq!(extract_amount("PAID $7.80"), 7.80);
        assert_eq!(extract_amount("sub total: 15.00"), 15.00);
    }

    #[test]
    fn handles_thousands_separators() {
        assert_eq!(extract_amount("TOTAL: $1,234.56"), 1234.56);
    }

    #[test]
    fn handles_embedded_space_before_fraction() {
        // OCR frequently inserts a space between the point and the cents.
        assert_eq!(extract_amount("TOTAL: 45. 00"), 45.00);
    }

    #[test]
    fn no_numerals_returns_zero() {
        assert_eq!(extract_amount("thanks for shopping"), 0.0);
        assert_eq!(extract_amount(""), 0.0);
    }

    #[test]
    fn bare_fallback_when_no_label_matches() {
        assert_eq!(extract_amount("items 12.30 and 4.50"), 12.30);
    }

    #[test]
    fn bare_fallback_rejects_values_at_or_above_ceiling() {
        // A misread reference number must not win the fallback path.
        assert_eq!(extract_amount("ref 99999.00 coffee 3.75"), 3.75);
        assert_eq!(extract_amount("ref 10000.00"), 0.0);
    }

    #[test]
    fn labeled_match_is_preferred_over_larger_bare_number() {
        // The fallback only runs when zero labeled matches exist.
        assert_eq!(extract_amount("TOTAL: 20.00\nserial 500.00"), 20.00);
    }
}
