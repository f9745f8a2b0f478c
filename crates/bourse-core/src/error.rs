use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Country, Symbol};

/// Validation and contract errors exposed by `bourse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("country cannot be empty")]
    EmptyCountry,

    #[error("invalid span '{value}', expected a positive number followed by Y or M (e.g. 10Y, 6M)")]
    InvalidSpan { value: String },
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("date range start {start} is after end {end}")]
    InvertedRange { start: String, end: String },
    #[error("a date range needs both a start and an end date")]
    IncompleteRange,

    #[error(
        "invalid sort metric '{value}', expected one of 'Higher Turnover', 'Higher price increase', 'Higher price decrease'"
    )]
    InvalidSortMetric { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Operation a [`DataUnavailable`] error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Countries,
    History,
    Profile,
    FinancialSummary,
    Dividends,
    TopRanking,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::History => "history",
            Self::Profile => "profile",
            Self::FinancialSummary => "financial summary",
            Self::Dividends => "dividends",
            Self::TopRanking => "top ranking",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The upstream collaborator could not satisfy a request.
///
/// Raised for unknown entities, empty results and transport failures alike.
/// The upstream cause is kept as text only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("couldn't get {operation}{}: {reason}", scope(.symbol, .country))]
pub struct DataUnavailable {
    pub operation: Operation,
    /// `None` only for the country listing itself.
    pub country: Option<Country>,
    pub symbol: Option<Symbol>,
    pub reason: String,
}

impl DataUnavailable {
    pub fn new(
        operation: Operation,
        country: Country,
        symbol: Option<Symbol>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            country: Some(country),
            symbol,
            reason: reason.into(),
        }
    }

    /// The country listing failed; there is no country to blame.
    pub fn countries(reason: impl Into<String>) -> Self {
        Self {
            operation: Operation::Countries,
            country: None,
            symbol: None,
            reason: reason.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        "data.unavailable"
    }
}

fn scope(symbol: &Option<Symbol>, country: &Option<Country>) -> String {
    match (symbol, country) {
        (_, None) => String::new(),
        (Some(symbol), Some(country)) => format!(" for {symbol} in {country}"),
        (None, Some(country)) => format!(" for all stocks in {country}"),
    }
}
