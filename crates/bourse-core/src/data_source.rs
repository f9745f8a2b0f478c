//! Upstream data source contract and request types.
//!
//! A [`DataSource`] is the external collaborator behind the catalog and the
//! fetcher. It is queried by (symbol, country) and may fail arbitrarily; the
//! fetcher turns every [`SourceError`] into a single `DataUnavailable`.
//!
//! | Method | Request | Response |
//! |--------|---------|----------|
//! | `countries` | - | `Vec<Country>` |
//! | `stocks` | [`Country`] | `Vec<Stock>` |
//! | `history` | [`HistoryRequest`] | [`HistorySeries`] |
//! | `profile` | [`InstrumentRequest`] | [`Profile`] |
//! | `financial_summary` | [`InstrumentRequest`] | [`FinancialSummary`] |
//! | `dividends` | [`InstrumentRequest`] | [`DividendHistory`] |
//! | `overview` | [`Country`] | `Vec<OverviewRow>` |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::domain::date::format_date;
use crate::{
    Country, DateRange, DividendHistory, FinancialSummary, HistorySeries, OverviewRow, Profile,
    ProviderId, Stock, Symbol,
};

/// Boxed future returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Unknown country or symbol, or an empty result.
    NotFound,
    /// Transport failure or unexpected upstream status.
    Unavailable,
    /// Upstream answered with something we could not parse.
    Internal,
}

/// Structured error raised at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Identifies one stock: the symbol alone is ambiguous across countries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentRequest {
    pub symbol: Symbol,
    pub country: Country,
}

impl InstrumentRequest {
    pub fn new(symbol: Symbol, country: Country) -> Self {
        Self { symbol, country }
    }
}

/// Daily history request over an inclusive window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub country: Country,
    pub window: DateRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, country: Country, window: DateRange) -> Self {
        Self {
            symbol,
            country,
            window,
        }
    }

    pub fn from(&self) -> Date {
        self.window.start()
    }

    pub fn to(&self) -> Date {
        self.window.end()
    }
}

impl Display for HistoryRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) {}..={}",
            self.symbol,
            self.country,
            format_date(self.from()),
            format_date(self.to())
        )
    }
}

/// Market-data collaborator contract.
///
/// Implementations must be `Send + Sync`; the CLI shares one instance
/// between the catalog and the fetcher.
pub trait DataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Every country the source lists stocks for.
    fn countries(&self) -> SourceFuture<'_, Vec<Country>>;

    /// Stocks listed in `country`.
    ///
    /// # Errors
    ///
    /// [`SourceErrorKind::NotFound`] for an unknown country.
    fn stocks<'a>(&'a self, country: &'a Country) -> SourceFuture<'a, Vec<Stock>>;

    /// Daily OHLC rows for the request window.
    fn history(&self, req: HistoryRequest) -> SourceFuture<'_, HistorySeries>;

    /// Company description in English.
    fn profile(&self, req: InstrumentRequest) -> SourceFuture<'_, Profile>;

    /// Annual income-statement summary, most recent period first.
    fn financial_summary(&self, req: InstrumentRequest) -> SourceFuture<'_, FinancialSummary>;

    fn dividends(&self, req: InstrumentRequest) -> SourceFuture<'_, DividendHistory>;

    /// Market overview of `country` with textual numeric fields.
    fn overview<'a>(&'a self, country: &'a Country) -> SourceFuture<'a, Vec<OverviewRow>>;
}
