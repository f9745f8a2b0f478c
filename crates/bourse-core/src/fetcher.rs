//! Market data fetcher.
//!
//! Every operation is a single upstream call with no retry and no cache.
//! Any [`SourceError`], and any empty result, becomes a [`DataUnavailable`]
//! naming the operation, the country and (when there is one) the symbol.

use std::sync::Arc;

use time::Date;
use tracing::{debug, warn};

use crate::data_source::{DataSource, HistoryRequest, InstrumentRequest, SourceError};
use crate::domain::date;
use crate::{
    Country, DataUnavailable, DividendHistory, FinancialSummary, HistorySeries, HistorySpan,
    Operation, Profile, ProviderId, RankingRow, SortMetric, Symbol, TopRanking,
};

pub struct MarketDataFetcher {
    source: Arc<dyn DataSource>,
    today: Option<Date>,
}

impl MarketDataFetcher {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            today: None,
        }
    }

    /// Pin "today" for trailing spans instead of reading the UTC clock.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    fn today(&self) -> Date {
        self.today.unwrap_or_else(date::today)
    }

    /// Daily history, oldest row first, restricted to the resolved window.
    pub async fn get_history(
        &self,
        symbol: &Symbol,
        country: &Country,
        span: &HistorySpan,
    ) -> Result<HistorySeries, DataUnavailable> {
        let window = span.resolve(self.today());
        let request = HistoryRequest::new(symbol.clone(), country.clone(), window);
        debug!(%request, "fetching history");

        let mut series = self
            .source
            .history(request)
            .await
            .map_err(|error| self.unavailable(Operation::History, country, Some(symbol), error))?;

        series.retain_within(window);
        if series.is_empty() {
            return Err(self.empty(
                Operation::History,
                country,
                Some(symbol),
                format!("no rows between {window}"),
            ));
        }

        Ok(series)
    }

    /// English company description.
    pub async fn get_profile(
        &self,
        symbol: &Symbol,
        country: &Country,
    ) -> Result<Profile, DataUnavailable> {
        let request = InstrumentRequest::new(symbol.clone(), country.clone());
        let profile = self
            .source
            .profile(request)
            .await
            .map_err(|error| self.unavailable(Operation::Profile, country, Some(symbol), error))?;

        if profile.description.trim().is_empty() {
            return Err(self.empty(Operation::Profile, country, Some(symbol), "empty description"));
        }
        Ok(profile)
    }

    /// Annual income-statement summary reduced to the latest period.
    pub async fn get_financial_summary(
        &self,
        symbol: &Symbol,
        country: &Country,
    ) -> Result<FinancialSummary, DataUnavailable> {
        let request = InstrumentRequest::new(symbol.clone(), country.clone());
        let summary = self
            .source
            .financial_summary(request)
            .await
            .map_err(|error| {
                self.unavailable(Operation::FinancialSummary, country, Some(symbol), error)
            })?
            .head(1);

        if summary.is_empty() {
            return Err(self.empty(
                Operation::FinancialSummary,
                country,
                Some(symbol),
                "no reporting periods",
            ));
        }
        Ok(summary)
    }

    /// Dividend history exactly as the upstream lists it.
    pub async fn get_dividends(
        &self,
        symbol: &Symbol,
        country: &Country,
    ) -> Result<DividendHistory, DataUnavailable> {
        let request = InstrumentRequest::new(symbol.clone(), country.clone());
        let history = self
            .source
            .dividends(request)
            .await
            .map_err(|error| self.unavailable(Operation::Dividends, country, Some(symbol), error))?;

        if history.is_empty() {
            return Err(self.empty(Operation::Dividends, country, Some(symbol), "no dividends"));
        }
        Ok(history)
    }

    /// Top rows of the country's market overview under `metric`.
    ///
    /// A row whose numeric text cannot be read fails the whole ranking.
    pub async fn get_top_ranking(
        &self,
        country: &Country,
        metric: SortMetric,
    ) -> Result<TopRanking, DataUnavailable> {
        let overview = self
            .source
            .overview(country)
            .await
            .map_err(|error| self.unavailable(Operation::TopRanking, country, None, error))?;

        if overview.is_empty() {
            return Err(self.empty(Operation::TopRanking, country, None, "empty market overview"));
        }

        let rows = overview
            .iter()
            .map(RankingRow::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| self.empty(Operation::TopRanking, country, None, reason))?;

        debug!(%country, metric = metric.label(), rows = rows.len(), "ranking overview");
        Ok(TopRanking::rank(country.clone(), metric, rows))
    }

    fn unavailable(
        &self,
        operation: Operation,
        country: &Country,
        symbol: Option<&Symbol>,
        error: SourceError,
    ) -> DataUnavailable {
        warn!(
            source = %self.source.id(),
            %operation,
            %country,
            symbol = symbol.map(Symbol::as_str),
            code = error.code(),
            "upstream call failed: {}",
            error.message()
        );
        DataUnavailable::new(operation, country.clone(), symbol.cloned(), error.to_string())
    }

    fn empty(
        &self,
        operation: Operation,
        country: &Country,
        symbol: Option<&Symbol>,
        reason: impl Into<String>,
    ) -> DataUnavailable {
        let error = DataUnavailable::new(operation, country.clone(), symbol.cloned(), reason);
        warn!(source = %self.source.id(), "{error}");
        error
    }
}
