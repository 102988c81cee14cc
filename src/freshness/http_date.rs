//! HTTP-date handling (RFC 9110 section 5.6.7).
//!
//! Formatting always produces IMF-fixdate. Parsing also accepts the obsolete
//! RFC 850 and asctime forms, which are normalised into a single layout first.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const IMF_FIXDATE: &[BorrowedFormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

const NORMALISED: &[BorrowedFormatItem<'_>] = format_description!(
    "[day] [month repr:short case_sensitive:false] [year] [hour]:[minute]:[second]"
);

/// Render `value` as an IMF-fixdate in GMT.
pub fn format(value: OffsetDateTime) -> Option<String> {
    value.to_offset(UtcOffset::UTC).format(IMF_FIXDATE).ok()
}

/// Parse any of the three HTTP-date forms. Returns `None` on anything else.
pub fn parse(raw: &str) -> Option<OffsetDateTime> {
    let normalised = normalise(raw.trim())?;
    PrimitiveDateTime::parse(&normalised, NORMALISED)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Reduce the accepted forms to `DD Mon YYYY HH:MM:SS`. The weekday is not
/// cross-checked.
fn normalise(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_ascii_whitespace().collect();
    match tokens.as_slice() {
        // Sun, 06 Nov 1994 08:49:37 GMT
        [weekday, day, month, year, clock, "GMT"] if weekday.ends_with(',') => {
            Some(format!("{:0>2} {month} {year} {clock}", day))
        }
        // Sunday, 06-Nov-94 08:49:37 GMT
        [weekday, date, clock, "GMT"] if weekday.ends_with(',') => {
            let mut parts = date.split('-');
            let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
            if parts.next().is_some() || year.len() != 2 {
                return None;
            }
            let year = expand_two_digit_year(year.parse().ok()?);
            Some(format!("{day:0>2} {month} {year} {clock}"))
        }
        // Sun Nov  6 08:49:37 1994
        [_weekday, month, day, clock, year] => {
            Some(format!("{:0>2} {month} {year} {clock}", day))
        }
        _ => None,
    }
}

/// Two-digit years more than 50 years ahead belong to the previous century.
fn expand_two_digit_year(short: i32) -> i32 {
    let current = OffsetDateTime::now_utc().year();
    let century = current - current.rem_euclid(100);
    let candidate = century + short;
    if candidate > current + 50 {
        candidate - 100
    } else {
        candidate
    }
}
