// 🔄 Period-to-Range Resolver - Rotating category scheduling
// Maps a (period type, period value, year) descriptor to a concrete
// calendar range. Pure functions, no side effects.

use crate::effective_range::{EffectiveRange, RangeEnd};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// PERIOD TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Quarter,
    Month,
    HalfYear,
    Year,
    /// Caller supplies the range directly; the resolver is not invoked.
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Quarter => "quarter",
            PeriodType::Month => "month",
            PeriodType::HalfYear => "half_year",
            PeriodType::Year => "year",
            PeriodType::Custom => "custom",
        }
    }

    /// True iff this type needs a period value (quarter/month/half-year).
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            PeriodType::Quarter | PeriodType::Month | PeriodType::HalfYear
        )
    }
}

impl std::str::FromStr for PeriodType {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quarter" => Ok(PeriodType::Quarter),
            "month" => Ok(PeriodType::Month),
            "half_year" => Ok(PeriodType::HalfYear),
            "year" => Ok(PeriodType::Year),
            "custom" => Ok(PeriodType::Custom),
            other => Err(InvalidPeriodError {
                message: format!("unknown period type {:?}", other),
            }),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// INVALID PERIOD ERROR
// ============================================================================

/// Period value out of the declared range for its type, or missing when
/// required. Recoverable, field-level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPeriodError {
    pub message: String,
}

impl InvalidPeriodError {
    fn new(message: impl Into<String>) -> Self {
        InvalidPeriodError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvalidPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid period: {}", self.message)
    }
}

impl std::error::Error for InvalidPeriodError {}

// ============================================================================
// ROTATING PERIOD
// ============================================================================

/// Descriptor for a rotating reward category's applicability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatingPeriod {
    pub period_type: PeriodType,
    /// Required for quarter (1-4), month (1-12), half_year (1-2);
    /// absent and ignored for year and custom.
    pub period_value: Option<u32>,
    pub year: i32,
}

impl RotatingPeriod {
    pub fn new(period_type: PeriodType, period_value: Option<u32>, year: i32) -> Self {
        RotatingPeriod {
            period_type,
            period_value,
            year,
        }
    }

    /// Resolve to a concrete calendar range.
    ///
    /// Quarter and half-year boundaries are fixed days of the month (Q1 always
    /// ends March 31, Q3 always September 30), never last-day-of-month
    /// arithmetic. Month ranges use the actual month length, so February
    /// follows the leap-year rules.
    pub fn resolve(&self) -> Result<EffectiveRange, InvalidPeriodError> {
        let year = self.year;
        match self.period_type {
            PeriodType::Year => Ok(fixed_range(year, 1, 1, 12, 31)),

            PeriodType::Quarter => match self.required_value()? {
                1 => Ok(fixed_range(year, 1, 1, 3, 31)),
                2 => Ok(fixed_range(year, 4, 1, 6, 30)),
                3 => Ok(fixed_range(year, 7, 1, 9, 30)),
                4 => Ok(fixed_range(year, 10, 1, 12, 31)),
                v => Err(InvalidPeriodError::new(format!(
                    "quarter must be 1-4, got {}",
                    v
                ))),
            },

            PeriodType::HalfYear => match self.required_value()? {
                1 => Ok(fixed_range(year, 1, 1, 6, 30)),
                2 => Ok(fixed_range(year, 7, 1, 12, 31)),
                v => Err(InvalidPeriodError::new(format!(
                    "half-year must be 1-2, got {}",
                    v
                ))),
            },

            PeriodType::Month => {
                let month = self.required_value()?;
                if !(1..=12).contains(&month) {
                    return Err(InvalidPeriodError::new(format!(
                        "month must be 1-12, got {}",
                        month
                    )));
                }
                let from = first_day(year, month, 1);
                Ok(EffectiveRange {
                    from,
                    to: RangeEnd::Bounded(last_day_of_month(year, month)),
                })
            }

            PeriodType::Custom => Err(InvalidPeriodError::new(
                "custom periods take a caller-supplied range, not a resolved one",
            )),
        }
    }

    fn required_value(&self) -> Result<u32, InvalidPeriodError> {
        self.period_value.ok_or_else(|| {
            InvalidPeriodError::new(format!(
                "period value is required for type {}",
                self.period_type
            ))
        })
    }
}

/// Validate a caller-supplied custom range: only `from <= to` is checked.
pub fn resolve_custom(from: NaiveDate, to: RangeEnd) -> Result<EffectiveRange, InvalidPeriodError> {
    if from > to.resolved() {
        return Err(InvalidPeriodError::new(format!(
            "custom range starts after it ends ({} > {})",
            from,
            to.resolved()
        )));
    }
    Ok(EffectiveRange { from, to })
}

fn fixed_range(year: i32, fm: u32, fd: u32, tm: u32, td: u32) -> EffectiveRange {
    EffectiveRange {
        from: first_day(year, fm, fd),
        to: RangeEnd::Bounded(first_day(year, tm, td)),
    }
}

// All callers pass fixed in-range month/day pairs.
fn first_day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixed period boundary is a valid day")
}

/// Actual last day of the month: first day of the next month, minus one.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_day(next_year, next_month, 1)
        .pred_opt()
        .expect("month start has a predecessor")
}

// ============================================================================
// TESTS
// ============================================================================
