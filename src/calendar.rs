// 📅 Calendar Utilities - Timezone-safe date handling
// Every date in the catalog is a plain calendar day; parsing is always
// component-wise so the same string yields the same day in every timezone.

use chrono::{Datelike, Local, NaiveDate};

/// Wire literal for "no end date yet known".
pub const ONGOING_ISO: &str = "9999-12-31";

/// Sentinel date standing in for an open-ended range end.
/// Far enough in the future that ordering comparisons stay uniform.
pub fn ongoing_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).expect("sentinel date is a valid calendar day")
}

// ============================================================================
// FORMAT ERROR
// ============================================================================

/// Unparseable date string. Always recoverable - rendered as a field-level
/// validation message by the form layer, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub input: String,
    pub message: String,
}

impl FormatError {
    fn new(input: &str, message: impl Into<String>) -> Self {
        FormatError {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date {:?}: {}", self.input, self.message)
    }
}

impl std::error::Error for FormatError {}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a strict `YYYY-MM-DD` prefix into a calendar day.
///
/// A trailing time component (`2024-01-05T00:00:00Z`, `2024-01-05 10:30`) is
/// ignored. The components are used directly via `from_ymd_opt` - never a
/// timezone-aware parse - so `"2024-01-05"` is January 5th for every caller,
/// regardless of their local offset.
pub fn parse_local_date(text: &str) -> Result<NaiveDate, FormatError> {
    let prefix = text
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or("")
        .trim();

    let parts: Vec<&str> = prefix.split('-').collect();
    if parts.len() != 3 {
        return Err(FormatError::new(text, "expected YYYY-MM-DD"));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| FormatError::new(text, "year is not a number"))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| FormatError::new(text, "month is not a number"))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| FormatError::new(text, "day is not a number"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        FormatError::new(
            text,
            format!("{:04}-{:02}-{:02} is not a real calendar day", year, month, day),
        )
    })
}

/// Current local calendar date, no time-of-day component.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// FORMATTING
// ============================================================================

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Render as `"Mon D, YYYY"` (e.g. `"Jan 5, 2025"`).
/// The ongoing sentinel renders as the literal word `"Ongoing"`.
pub fn format_display(date: NaiveDate) -> String {
    if date == ongoing_date() {
        return "Ongoing".to_string();
    }
    format!(
        "{} {}, {}",
        MONTH_ABBREV[date.month0() as usize],
        date.day(),
        date.year()
    )
}

/// Render as zero-padded `YYYY-MM-DD` - the only external date format.
pub fn to_iso_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

// ============================================================================
// TESTS
// ============================================================================
