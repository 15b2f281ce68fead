//! Field extraction engine: recognized receipt text in, typed fields out.
//!
//! Pure and total: no I/O, no failures. Each extractor runs independently
//! and substitutes a default when nothing in the text qualifies, so the
//! result is always fully populated. The heuristics are greedy first-match
//! (merchant, date) or largest-match (amount) policies; calibration data
//! depends on these exact selection rules.

pub mod amount;
pub mod date;
pub mod merchant;

use claimsnap_core::ExtractedFields;
use tracing::debug;

pub use amount::extract_amount;
pub use date::extract_date;
pub use merchant::extract_merchant;

/// Run all three extractors over one recognized text.
pub fn extract(text: &str) -> ExtractedFields {
    let fields = ExtractedFields {
        merchant_name: extract_merchant(text),
        amount: extract_amount(text),
        transaction_date: extract_date(text),
    };
    debug!(
        merchant = %fields.merchant_name,
        amount = fields.amount,
        date = %fields.transaction_date,
        "Extracted receipt fields"
    );
    fields
}
