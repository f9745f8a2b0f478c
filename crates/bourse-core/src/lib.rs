//! # Bourse Core
//!
//! Country/stock catalog and market data fetcher for the bourse stock
//! market monitor.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Data sources (investing.com scraper, offline fixture) |
//! | [`catalog`] | Country list and per-country stock options |
//! | [`chart`] | Line/candlestick traces and joined close tables |
//! | [`data_source`] | Data source trait and request types |
//! | [`domain`] | Domain models (Stock, HistorySeries, Profile, ...) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation errors and `DataUnavailable` |
//! | [`fetcher`] | History, profile, summary, dividends and rankings |
//! | [`http_client`] | HTTP client abstraction |
//! | [`report`] | Profile report text |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bourse_core::{Country, HistorySpan, MarketDataFetcher, OfflineAdapter, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = MarketDataFetcher::new(Arc::new(OfflineAdapter::new()));
//!     let series = fetcher
//!         .get_history(&Symbol::parse("BCP")?, &Country::parse("portugal")?, &"10Y".parse::<HistorySpan>()?)
//!         .await?;
//!     println!("{} rows", series.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fetch fails with the same [`DataUnavailable`] error whatever the
//! cause; callers show a placeholder for the affected output only.
//!
//! ```rust
//! use bourse_core::{DataUnavailable, Operation};
//!
//! fn placeholder(error: &DataUnavailable) -> &'static str {
//!     match error.operation {
//!         Operation::History => "no chart",
//!         Operation::TopRanking => "no ranking",
//!         _ => "no data",
//!     }
//! }
//! ```

pub mod adapters;
pub mod catalog;
pub mod chart;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod report;
pub mod source;

// Adapter implementations
pub use adapters::{DirectoryError, InvestingAdapter, OfflineAdapter, StockDirectory};

// Catalog and fetcher
pub use catalog::Catalog;
pub use fetcher::MarketDataFetcher;

// Reshaping
pub use chart::{CandlestickTrace, CloseColumn, CloseTable, LineTrace};
pub use report::{render_markdown, ProfileSection};

// Data source trait and types
pub use data_source::{
    DataSource, HistoryRequest, InstrumentRequest, SourceError, SourceErrorKind, SourceFuture,
};

// Domain models
pub use domain::{
    clean_name, parse_decorated_number, Country, DateRange, DividendHistory, DividendRecord,
    FinancialPeriod, FinancialSummary, HistoricalRow, HistorySeries, HistorySpan, OverviewRow,
    Profile, RankingRow, SortMetric, Span, Stock, StockOption, SummaryKind, SummaryPeriod, Symbol,
    TopRanking, TOP_N,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::{DataUnavailable, Operation, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    DEFAULT_USER_AGENT,
};

// Source identifiers
pub use source::ProviderId;
