//! Transaction-date extraction: first date-shaped match, ordered layouts.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Four date shapes tried as one alternation; the FIRST match in raw text
/// order wins, not the best or last.
///
/// 1. `d/d/d` with `/`, `-`, or `.` separators
/// 2. ISO-like year-first
/// 3. month-name day year ("Jan 01, 2025")
/// 4. day month-name year ("01 Jan 2025")
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    let month = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*";
    Regex::new(&format!(
        r"(?i)(\d{{1,2}}[/.\-]\d{{1,2}}[/.\-]\d{{2,4}})|(\d{{4}}[/.\-]\d{{1,2}}[/.\-]\d{{1,2}})|({month}[\s,.]+\d{{1,2}}(?:st|nd|rd|th)?[\s,.]+\d{{2,4}})|(\d{{1,2}}[\s,.\-]+{month}[\s,.\-]+\d{{2,4}})"
    ))
    .unwrap()
});

/// Concrete layouts tried in order against the matched text. The flag
/// marks two-digit-year layouts; four-digit layouts refuse years below
/// 100 so they cannot shadow their `%y` counterparts.
const DATE_LAYOUTS: &[(&str, bool)] = &[
    ("%d/%m/%Y", false),
    ("%m/%d/%Y", false),
    ("%d-%m-%Y", false),
    ("%m-%d-%Y", false),
    ("%Y-%m-%d", false),
    ("%Y/%m/%d", false),
    ("%d/%m/%y", true),
    ("%d-%m-%y", true),
    ("%m/%d/%y", true),
    ("%m-%d-%y", true),
];

/// Extract the transaction date from recognized text.
///
/// The receipt only carries a calendar date, so the current time-of-day
/// is attached to whatever parses. When no shape matches, or no layout
/// parses the matched text, the current moment is returned.
pub fn extract_date(text: &str) -> DateTime<Utc> {
    let now = Utc::now();

    let Some(m) = DATE_RE.find(text) else {
        return now;
    };

    for (layout, two_digit_year) in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), layout) {
            if !two_digit_year && date.year() < 100 {
                continue;
            }
            return Utc.from_utc_datetime(&date.and_time(now.time()));
        }
    }

    now
}
