// ⏳ Effective-Range Model - Sentinel-normalized validity windows
// Internally a range end is a tagged union (Bounded | Ongoing); the
// "9999-12-31" sentinel literal exists only at the wire boundary.

use crate::calendar::{self, FormatError, ONGOING_ISO};
use chrono::NaiveDate;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// WIRE-STRING HELPERS
// ============================================================================

/// Normalize an external "to" value: empty or absent means ongoing and maps
/// to the sentinel literal; anything else passes through unchanged.
/// Total function, never fails.
pub fn normalize(to: Option<&str>) -> String {
    match to {
        None => ONGOING_ISO.to_string(),
        Some(s) if s.is_empty() => ONGOING_ISO.to_string(),
        Some(s) => s.to_string(),
    }
}

/// Inverse of `normalize`: the sentinel literal maps back to empty,
/// anything else passes through unchanged.
pub fn denormalize(to: &str) -> String {
    if to == ONGOING_ISO {
        String::new()
    } else {
        to.to_string()
    }
}

/// True iff `to` is exactly the sentinel literal.
pub fn is_ongoing(to: &str) -> bool {
    to == ONGOING_ISO
}

// ============================================================================
// RANGE END
// ============================================================================

/// End of an effective range: a concrete day, or open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Bounded(NaiveDate),
    Ongoing,
}

impl RangeEnd {
    /// Resolve to a comparable date: `Ongoing` becomes the sentinel, so
    /// ordering works uniformly without branching on open-endedness.
    pub fn resolved(&self) -> NaiveDate {
        match self {
            RangeEnd::Bounded(date) => *date,
            RangeEnd::Ongoing => calendar::ongoing_date(),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, RangeEnd::Ongoing)
    }

    /// Parse an external "to" string. Empty or sentinel means ongoing.
    pub fn parse(to: &str) -> Result<RangeEnd, FormatError> {
        let normalized = normalize(Some(to));
        if is_ongoing(&normalized) {
            Ok(RangeEnd::Ongoing)
        } else {
            Ok(RangeEnd::Bounded(calendar::parse_local_date(&normalized)?))
        }
    }

    /// Wire form: ISO date, or the sentinel literal for ongoing.
    pub fn to_iso(&self) -> String {
        calendar::to_iso_date(self.resolved())
    }
}

// The wire format is pinned here: always the ISO string, with the sentinel
// literal standing in for Ongoing. Must round-trip bit-for-bit.
impl Serialize for RangeEnd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for RangeEnd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RangeEnd::parse(&raw).map_err(D::Error::custom)
    }
}

impl std::fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEnd::Bounded(date) => write!(f, "{}", calendar::format_display(*date)),
            RangeEnd::Ongoing => write!(f, "Ongoing"),
        }
    }
}

// ============================================================================
// EFFECTIVE RANGE
// ============================================================================

/// The date interval during which a version's terms apply.
/// Closed on both ends; an open end is `RangeEnd::Ongoing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRange {
    pub from: NaiveDate,
    pub to: RangeEnd,
}

impl EffectiveRange {
    pub fn bounded(from: NaiveDate, to: NaiveDate) -> Self {
        EffectiveRange {
            from,
            to: RangeEnd::Bounded(to),
        }
    }

    pub fn ongoing(from: NaiveDate) -> Self {
        EffectiveRange {
            from,
            to: RangeEnd::Ongoing,
        }
    }

    /// Parse from external strings. An empty `to` means ongoing.
    pub fn parse(from: &str, to: &str) -> Result<Self, FormatError> {
        Ok(EffectiveRange {
            from: calendar::parse_local_date(from)?,
            to: RangeEnd::parse(to)?,
        })
    }

    /// Boundary-inclusive overlap test. Ongoing ends resolve to the sentinel,
    /// so all four bounded/ongoing combinations go through the same
    /// comparison: two ranges overlap iff each starts no later than the other
    /// ends. Ranges touching on exactly one day overlap.
    pub fn overlaps(&self, other: &EffectiveRange) -> bool {
        self.from <= other.to.resolved() && other.from <= self.to.resolved()
    }

    /// True iff `date` falls inside this range (boundary-inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to.resolved()
    }

    /// Wire form: `(from, to)` as ISO strings, sentinel for ongoing.
    pub fn to_iso_pair(&self) -> (String, String) {
        (calendar::to_iso_date(self.from), self.to.to_iso())
    }
}

impl std::fmt::Display for EffectiveRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", calendar::format_display(self.from), self.to)
    }
}

// ============================================================================
// TESTS
// ============================================================================
