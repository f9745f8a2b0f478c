//! Deterministic in-process data source.
//!
//! Serves a small fixed universe so the CLI and tests run without network
//! access. Prices are derived from a per-symbol seed and the calendar day,
//! so the same request always yields the same rows.

use std::collections::BTreeMap;

use time::{Date, Month, Weekday};

use crate::data_source::{
    DataSource, HistoryRequest, InstrumentRequest, SourceError, SourceFuture,
};
use crate::{
    Country, DividendHistory, DividendRecord, FinancialPeriod, FinancialSummary, HistoricalRow,
    HistorySeries, OverviewRow, Profile, ProviderId, Stock, Symbol,
};

struct Listing {
    country: &'static str,
    symbol: &'static str,
    name: &'static str,
    currency: &'static str,
    id: u64,
    pays_dividends: bool,
}

const fn listing(
    country: &'static str,
    symbol: &'static str,
    name: &'static str,
    currency: &'static str,
    id: u64,
    pays_dividends: bool,
) -> Listing {
    Listing {
        country,
        symbol,
        name,
        currency,
        id,
        pays_dividends,
    }
}

const LISTINGS: &[Listing] = &[
    listing("portugal", "BCP", "BCP", "EUR", 32244, true),
    listing("portugal", "GALP", "Galp Energia", "EUR", 32232, true),
    listing("portugal", "EDP", "EDP", "EUR", 32228, true),
    listing("portugal", "NOS", "NOS SGPS", "EUR", 32260, false),
    listing("portugal", "JMT", "\u{200b}Jeronimo Martins", "EUR", 32240, true),
    listing("spain", "TEF", "Telefonica", "EUR", 26, true),
    listing("spain", "SAN", "Banco Santander", "EUR", 396, true),
    listing("spain", "ITX", "Inditex", "EUR", 32229, true),
    listing("spain", "IBE", "Iberdrola", "EUR", 32237, false),
    listing("united states", "AAPL", "Apple", "USD", 6408, true),
    listing("united states", "MSFT", "Microsoft", "USD", 252, true),
    listing("united states", "AMZN", "Amazon.com\u{200b}", "USD", 6435, false),
    listing("united states", "GOOGL", "Alphabet A", "USD", 6369, false),
    listing("united states", "KO", "Coca-Cola", "USD", 238, true),
    listing("united states", "JPM", "JPMorgan", "USD", 267, true),
    listing("united states", "XOM", "Exxon Mobil", "USD", 7888, true),
    listing("united states", "NVDA", "NVIDIA", "USD", 6497, false),
    listing("united states", "TSLA", "Tesla", "USD", 13994, false),
    listing("united states", "WMT", "Walmart", "USD", 7997, true),
    listing("united states", "PG", "Procter & Gamble", "USD", 7961, true),
    listing("united states", "INTC", "Intel", "USD", 251, true),
];

/// Fiscal years covered by the offline financial summaries.
const SUMMARY_YEARS: [i32; 3] = [2021, 2022, 2023];
/// Years with a paid dividend; one further declared dividend is still unpaid.
const DIVIDEND_YEARS: [i32; 5] = [2019, 2020, 2021, 2022, 2023];

/// Offline adapter over a fixed universe of stocks.
#[derive(Debug, Clone)]
pub struct OfflineAdapter {
    stocks: Vec<Stock>,
}

impl OfflineAdapter {
    pub fn new() -> Self {
        let stocks = LISTINGS
            .iter()
            .filter_map(|listing| {
                Some(Stock {
                    symbol: Symbol::parse(listing.symbol).ok()?,
                    country: Country::parse(listing.country).ok()?,
                    name: listing.name.to_owned(),
                    full_name: None,
                    isin: None,
                    currency: listing.currency.to_owned(),
                    id: listing.id,
                    tag: tag_for(listing.name),
                })
            })
            .collect();

        Self { stocks }
    }

    fn listed(&self, symbol: &Symbol, country: &Country) -> Result<&Stock, SourceError> {
        if !self.stocks.iter().any(|stock| &stock.country == country) {
            return Err(SourceError::not_found(format!(
                "country '{country}' is not listed"
            )));
        }

        self.stocks
            .iter()
            .find(|stock| &stock.country == country && &stock.symbol == symbol)
            .ok_or_else(|| SourceError::not_found(format!("{symbol} is not listed in {country}")))
    }
}

impl Default for OfflineAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for OfflineAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Offline
    }

    fn countries(&self) -> SourceFuture<'_, Vec<Country>> {
        Box::pin(async move {
            let mut countries = self
                .stocks
                .iter()
                .map(|stock| stock.country.clone())
                .collect::<Vec<_>>();
            countries.sort();
            countries.dedup();
            Ok(countries)
        })
    }

    fn stocks<'a>(&'a self, country: &'a Country) -> SourceFuture<'a, Vec<Stock>> {
        Box::pin(async move {
            let stocks = self
                .stocks
                .iter()
                .filter(|stock| &stock.country == country)
                .cloned()
                .collect::<Vec<_>>();

            if stocks.is_empty() {
                return Err(SourceError::not_found(format!(
                    "country '{country}' is not listed"
                )));
            }
            Ok(stocks)
        })
    }

    fn history(&self, req: HistoryRequest) -> SourceFuture<'_, HistorySeries> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let seed = symbol_seed(&stock.symbol);

            let mut rows = Vec::new();
            let mut day = req.from();
            loop {
                if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
                    rows.push(price_row(seed, day, &stock.currency));
                }
                match day.next_day() {
                    Some(next) if next <= req.to() => day = next,
                    _ => break,
                }
            }

            if rows.is_empty() {
                return Err(SourceError::not_found(format!(
                    "no trading days in {req}"
                )));
            }
            Ok(HistorySeries::new(req.symbol, req.country, rows))
        })
    }

    fn profile(&self, req: InstrumentRequest) -> SourceFuture<'_, Profile> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let description = format!(
                "{} is a publicly traded company listed in {}. Its shares trade in {} under the ticker {}.",
                stock.display_name(),
                stock.country.title_case(),
                stock.currency,
                stock.symbol
            );

            Ok(Profile {
                symbol: req.symbol,
                country: req.country,
                description,
                url: None,
            })
        })
    }

    fn financial_summary(&self, req: InstrumentRequest) -> SourceFuture<'_, FinancialSummary> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let seed = symbol_seed(&stock.symbol);

            let periods = SUMMARY_YEARS
                .iter()
                .filter_map(|year| {
                    let period_end = Date::from_calendar_date(*year, Month::December, 31).ok()?;
                    let growth = 1.0 + f64::from(year - SUMMARY_YEARS[0]) * 0.05;
                    let revenue = (1_000.0 + (seed % 9_000) as f64) * growth;

                    let mut items = BTreeMap::new();
                    items.insert(String::from("Total Revenue"), Some(round2(revenue)));
                    items.insert(String::from("Gross Profit"), Some(round2(revenue * 0.42)));
                    items.insert(String::from("Operating Income"), Some(round2(revenue * 0.18)));
                    items.insert(String::from("Net Income"), Some(round2(revenue * 0.11)));
                    Some(FinancialPeriod { period_end, items })
                })
                .collect();

            Ok(FinancialSummary::new(req.symbol, req.country, periods))
        })
    }

    fn dividends(&self, req: InstrumentRequest) -> SourceFuture<'_, DividendHistory> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let listing = LISTINGS
                .iter()
                .find(|listing| listing.symbol == stock.symbol.as_str());
            if !listing.is_some_and(|listing| listing.pays_dividends) {
                return Err(SourceError::not_found(format!(
                    "{} has no dividend history",
                    req.symbol
                )));
            }

            let seed = symbol_seed(&stock.symbol);
            let amount = 0.05 + (seed % 150) as f64 / 100.0;
            let mut records = DIVIDEND_YEARS
                .iter()
                .filter_map(|year| {
                    Some(DividendRecord {
                        ex_date: Date::from_calendar_date(*year, Month::May, 15).ok()?,
                        payment_date: Date::from_calendar_date(*year, Month::May, 22).ok(),
                        dividend: round2(amount * (1.0 + f64::from(year - DIVIDEND_YEARS[0]) * 0.1)),
                        kind: Some(String::from("Annual")),
                        yield_pct: Some(round2(1.0 + (seed % 40) as f64 / 10.0)),
                    })
                })
                .collect::<Vec<_>>();

            // Declared but not yet paid.
            if let Ok(ex_date) = Date::from_calendar_date(2024, Month::May, 15) {
                records.push(DividendRecord {
                    ex_date,
                    payment_date: None,
                    dividend: round2(amount * 1.5),
                    kind: Some(String::from("Annual")),
                    yield_pct: None,
                });
            }

            Ok(DividendHistory {
                symbol: req.symbol,
                country: req.country,
                records,
            })
        })
    }

    fn overview<'a>(&'a self, country: &'a Country) -> SourceFuture<'a, Vec<OverviewRow>> {
        Box::pin(async move {
            let rows = self
                .stocks
                .iter()
                .filter(|stock| &stock.country == country)
                .map(overview_row)
                .collect::<Vec<_>>();

            if rows.is_empty() {
                return Err(SourceError::not_found(format!(
                    "country '{country}' is not listed"
                )));
            }
            Ok(rows)
        })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

fn tag_for(name: &str) -> String {
    crate::clean_name(name)
        .to_ascii_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn price_row(seed: u64, day: Date, currency: &str) -> HistoricalRow {
    let julian = u64::try_from(day.to_julian_day()).unwrap_or_default();
    let base = 5.0 + (seed % 200) as f64;
    let wiggle = ((seed + julian * 7) % 100) as f64 / 50.0;

    let open = round2(base + wiggle);
    let close = round2(open + 0.25 - (julian % 5) as f64 * 0.1);

    HistoricalRow {
        date: day,
        open,
        high: round2(open.max(close) + 0.3),
        low: round2(open.min(close) - 0.3),
        close,
        volume: 10_000 + (seed + julian) % 5_000,
        currency: currency.to_owned(),
    }
}

fn overview_row(stock: &Stock) -> OverviewRow {
    let seed = symbol_seed(&stock.symbol);
    let last = 5.0 + (seed % 200) as f64;
    let change_pct = ((seed % 900) as f64 - 450.0) / 100.0;
    let change = last * change_pct / 100.0;
    let turnover = 50_000 + (seed.wrapping_mul(7_919) % 9_000_000);

    OverviewRow {
        name: stock.display_name(),
        symbol: Some(stock.symbol.clone()),
        last: format!("{last:.2}"),
        high: format!("{:.2}", last * 1.02),
        low: format!("{:.2}", last * 0.98),
        change: format!("{change:+.2}"),
        change_pct: format!("{change_pct:+.2}%"),
        turnover: format_turnover(turnover),
    }
}

/// Upstream-style abbreviated volume: `845.12K`, `3.40M`.
fn format_turnover(value: u64) -> String {
    match value {
        v if v >= 1_000_000 => format!("{:.2}M", v as f64 / 1e6),
        v if v >= 1_000 => format!("{:.2}K", v as f64 / 1e3),
        v => v.to_string(),
    }
}
