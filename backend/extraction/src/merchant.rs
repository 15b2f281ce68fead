//! Merchant extraction: greedy first-match scan over the text's lines.

use claimsnap_core::UNKNOWN_MERCHANT;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines that are nothing but digits and whitespace.
static NUMERIC_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s]+$").unwrap());

/// Lines containing a date-like shape (e.g. `12/05/2024`).
static DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2}[/-]\d{2}[/-]\d{2,4}").unwrap());

/// Words that strongly suggest a merchant-name line.
const MERCHANT_KEYWORDS: &[&str] = &["store", "mart", "shop", "restaurant", "cafe", "market"];

/// Extract the merchant name from recognized text.
///
/// Scans lines top to bottom and returns the FIRST line that carries a
/// merchant keyword or is longer than 5 characters, skipping purely
/// numeric, date-shaped, and very short lines. Falls back to the first
/// line longer than 3 characters, then to `"Unknown Merchant"`.
pub fn extract_merchant(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();

    for line in &lines {
        let line = line.trim();

        if NUMERIC_LINE_RE.is_match(line) || DATE_LINE_RE.is_match(line) || line.len() < 3 {
            continue;
        }

        let lower = line.to_lowercase();
        if MERCHANT_KEYWORDS.iter().any(|kw| lower.contains(kw)) || line.len() > 5 {
            return line.to_string();
        }
    }

    for line in &lines {
        let line = line.trim();
        if line.len() > 3 {
            return line.to_string();
        }
    }

    UNKNOWN_MERCHANT.to_string()
}
