//! # Domain Models
//!
//! Canonical market-data types for bourse.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Country`] | Case-insensitive country name |
//! | [`Symbol`] | Validated ticker, unique per country |
//! | [`Stock`] / [`StockOption`] | Catalog entry and its selector option |
//! | [`HistorySeries`] | Daily OHLC rows, oldest first |
//! | [`Profile`] | Company description |
//! | [`FinancialSummary`] | Income-statement periods |
//! | [`DividendHistory`] | Declared dividends |
//! | [`TopRanking`] | Top stocks of a country by [`SortMetric`] |
//! | [`HistorySpan`] | Trailing span (`10Y`, `6M`) or explicit [`DateRange`] |
//!
//! Entities are never mutated after a fetch; a new request builds new values.

pub mod date;
mod country;
mod models;
mod ranking;
mod span;
mod symbol;

pub use country::Country;
pub use models::{
    clean_name, DividendHistory, DividendRecord, FinancialPeriod, FinancialSummary,
    HistoricalRow, HistorySeries, Profile, Stock, StockOption, SummaryKind, SummaryPeriod,
};
pub use ranking::{parse_decorated_number, OverviewRow, RankingRow, SortMetric, TopRanking, TOP_N};
pub use span::{DateRange, HistorySpan, Span};
pub use symbol::Symbol;
