use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::{self, format_date};
use crate::ValidationError;

const DAYS_PER_YEAR: f64 = 365.25;
const DAYS_PER_MONTH: f64 = 31.0;
/// Longest accepted window: ten thousand Julian years.
const MAX_SPAN_DAYS: f64 = 10_000.0 * DAYS_PER_YEAR;

/// Trailing look-back window such as `10Y` or `6M`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "snake_case")]
pub enum Span {
    Years(f64),
    Months(f64),
}

impl Span {
    /// Whole days covered by the span; fractional days are dropped.
    pub fn days(self) -> i64 {
        self.exact_days().trunc() as i64
    }

    fn exact_days(self) -> f64 {
        match self {
            Self::Years(amount) => amount * DAYS_PER_YEAR,
            Self::Months(amount) => amount * DAYS_PER_MONTH,
        }
    }

    /// First date of the window that ends on `today`, clamped to the
    /// earliest representable date.
    pub fn start_from(self, today: Date) -> Date {
        i32::try_from(self.days())
            .ok()
            .and_then(|days| today.to_julian_day().checked_sub(days))
            .and_then(|day| Date::from_julian_day(day).ok())
            .unwrap_or(Date::MIN)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Years(amount) => write!(f, "{amount}Y"),
            Self::Months(amount) => write!(f, "{amount}M"),
        }
    }
}

impl FromStr for Span {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSpan {
            value: value.to_owned(),
        };

        let trimmed = value.trim();
        let (amount, unit) = trimmed
            .char_indices()
            .last()
            .map(|(index, unit)| (&trimmed[..index], unit))
            .ok_or_else(invalid)?;

        let amount = amount.trim().parse::<f64>().map_err(|_| invalid())?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(invalid());
        }

        let span = match unit.to_ascii_uppercase() {
            'Y' => Self::Years(amount),
            'M' => Self::Months(amount),
            _ => return Err(invalid()),
        };
        if span.exact_days() > MAX_SPAN_DAYS {
            return Err(invalid());
        }
        Ok(span)
    }
}

/// Inclusive calendar-date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "date::iso")]
    start: Date,
    #[serde(with = "date::iso")]
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: format_date(start),
                end: format_date(end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(date::parse_date(start)?, date::parse_date(end)?)
    }

    /// Range from optional `--from`/`--to` style bounds: both or neither.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Self::parse(start, end).map(Some),
            _ => Err(ValidationError::IncompleteRange),
        }
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", format_date(self.start), format_date(self.end))
    }
}

/// How far back a history request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySpan {
    /// Trailing window ending today.
    Trailing(Span),
    /// Explicit range applied as an inclusive post-fetch filter.
    Range(DateRange),
}

impl HistorySpan {
    /// Default window when the caller gives none: a century to date.
    pub const DEFAULT: Self = Self::Trailing(Span::Years(100.0));

    /// Concrete `[from, to]` window to request upstream.
    pub fn resolve(&self, today: Date) -> DateRange {
        match self {
            Self::Trailing(span) => DateRange {
                start: span.start_from(today),
                end: today,
            },
            Self::Range(range) => *range,
        }
    }
}

impl Default for HistorySpan {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Span> for HistorySpan {
    fn from(value: Span) -> Self {
        Self::Trailing(value)
    }
}

impl From<DateRange> for HistorySpan {
    fn from(value: DateRange) -> Self {
        Self::Range(value)
    }
}

impl FromStr for HistorySpan {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<Span>().map(Self::Trailing)
    }
}

impl Display for HistorySpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trailing(span) => span.fmt(f),
            Self::Range(range) => range.fmt(f),
        }
    }
}
