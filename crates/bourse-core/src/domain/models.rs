use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date;
use crate::domain::span::DateRange;
use crate::{Country, Symbol};

const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// Catalog entry for one listed stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: Symbol,
    pub country: Country,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    pub currency: String,
    /// Upstream numeric instrument id.
    pub id: u64,
    /// Upstream URL tag (`banco-comercial-portugues`).
    pub tag: String,
}

impl Stock {
    /// Name with zero-width spaces removed and outer whitespace trimmed.
    pub fn display_name(&self) -> String {
        clean_name(&self.name)
    }
}

/// Strip stray zero-width spaces that upstream names sometimes carry.
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|ch| *ch != ZERO_WIDTH_SPACE)
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Selector option offered for a stock: `{label: "Name, SYM", value: "SYM"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOption {
    pub label: String,
    pub value: String,
}

impl StockOption {
    pub const NO_RESULTS: &'static str = "No results";

    pub fn for_stock(stock: &Stock) -> Self {
        Self {
            label: format!("{}, {}", stock.display_name(), stock.symbol),
            value: stock.symbol.to_string(),
        }
    }

    /// Placeholder returned when a country has no usable stocks.
    pub fn no_results() -> Self {
        Self {
            label: String::from(Self::NO_RESULTS),
            value: String::from(Self::NO_RESULTS),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == Self::NO_RESULTS
    }
}

/// One trading day of OHLC data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRow {
    #[serde(with = "date::iso")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub currency: String,
}

/// Daily history for one stock, oldest row first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub symbol: Symbol,
    pub country: Country,
    pub rows: Vec<HistoricalRow>,
}

impl HistorySeries {
    /// Builds a series, sorting rows ascending and dropping repeated dates.
    pub fn new(symbol: Symbol, country: Country, mut rows: Vec<HistoricalRow>) -> Self {
        rows.sort_by_key(|row| row.date);
        rows.dedup_by_key(|row| row.date);
        Self {
            symbol,
            country,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.rows.first().map(|row| row.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.rows.last().map(|row| row.date)
    }

    /// Keep rows whose date lies inside `range` (inclusive).
    pub fn retain_within(&mut self, range: DateRange) {
        self.rows.retain(|row| range.contains(row.date));
    }
}

/// Company description text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub symbol: Symbol,
    pub country: Country,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Statement a financial summary was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    IncomeStatement,
}

/// Reporting cadence of a financial summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    Annual,
}

/// One reporting period with its named line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    #[serde(with = "date::iso")]
    pub period_end: Date,
    /// Line item name -> value; `None` where upstream shows `-`.
    pub items: BTreeMap<String, Option<f64>>,
}

/// Small table of reporting periods, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub symbol: Symbol,
    pub country: Country,
    pub kind: SummaryKind,
    pub period: SummaryPeriod,
    pub periods: Vec<FinancialPeriod>,
}

impl FinancialSummary {
    pub fn new(symbol: Symbol, country: Country, mut periods: Vec<FinancialPeriod>) -> Self {
        periods.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        Self {
            symbol,
            country,
            kind: SummaryKind::IncomeStatement,
            period: SummaryPeriod::Annual,
            periods,
        }
    }

    /// Keep only the `n` most recent periods.
    pub fn head(mut self, n: usize) -> Self {
        self.periods.truncate(n);
        self
    }

    pub fn latest(&self) -> Option<&FinancialPeriod> {
        self.periods.first()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// One declared dividend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    #[serde(with = "date::iso")]
    pub ex_date: Date,
    #[serde(with = "date::iso::option", default)]
    pub payment_date: Option<Date>,
    pub dividend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_pct: Option<f64>,
}

/// Dividend events as returned upstream; ordering is not guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    pub symbol: Symbol,
    pub country: Country,
    pub records: Vec<DividendRecord>,
}

impl DividendHistory {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest payment first; records without a payment date sort last.
    pub fn sorted_by_payment_date(mut self) -> Self {
        self.records
            .sort_by(|a, b| match (a.payment_date, b.payment_date) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => b.ex_date.cmp(&a.ex_date),
            });
        self
    }

    /// Keep records paid inside `range`; unpaid records are dropped.
    pub fn paid_within(mut self, range: DateRange) -> Self {
        self.records
            .retain(|record| record.payment_date.is_some_and(|day| range.contains(day)));
        self
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn stock(name: &str, symbol: &str) -> Stock {
        Stock {
            symbol: Symbol::parse(symbol).expect("symbol"),
            country: Country::parse("portugal").expect("country"),
            name: name.to_owned(),
            full_name: None,
            isin: None,
            currency: String::from("EUR"),
            id: 1,
            tag: String::from("tag"),
        }
    }

    fn row(day: Date, close: f64) -> HistoricalRow {
        HistoricalRow {
            date: day,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
            currency: String::from("EUR"),
        }
    }

    #[test]
    fn option_label_strips_zero_width_spaces() {
        let option = StockOption::for_stock(&stock("\u{200b}Galp Energia\u{200b} ", "galp"));
        assert_eq!(option.label, "Galp Energia, GALP");
        assert_eq!(option.value, "GALP");
        assert!(!option.is_placeholder());
    }

    #[test]
    fn placeholder_is_recognised() {
        let option = StockOption::no_results();
        assert_eq!(option.label, "No results");
        assert!(option.is_placeholder());
    }

    #[test]
    fn series_sorts_and_dedups_rows() {
        let series = HistorySeries::new(
            Symbol::parse("EDP").expect("symbol"),
            Country::parse("portugal").expect("country"),
            vec![
                row(date!(2024 - 01 - 03), 3.0),
                row(date!(2024 - 01 - 01), 1.0),
                row(date!(2024 - 01 - 03), 3.5),
                row(date!(2024 - 01 - 02), 2.0),
            ],
        );

        let dates = series.rows.iter().map(|row| row.date).collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![date!(2024 - 01 - 01), date!(2024 - 01 - 02), date!(2024 - 01 - 03)]
        );
    }

    #[test]
    fn dividends_sort_newest_payment_first() {
        let record = |ex: Date, paid: Option<Date>| DividendRecord {
            ex_date: ex,
            payment_date: paid,
            dividend: 0.1,
            kind: None,
            yield_pct: None,
        };
        let history = DividendHistory {
            symbol: Symbol::parse("EDP").expect("symbol"),
            country: Country::parse("portugal").expect("country"),
            records: vec![
                record(date!(2020 - 05 - 01), Some(date!(2020 - 05 - 10))),
                record(date!(2023 - 05 - 01), None),
                record(date!(2022 - 05 - 01), Some(date!(2022 - 05 - 10))),
            ],
        }
        .sorted_by_payment_date();

        let paid = history
            .records
            .iter()
            .map(|record| record.payment_date)
            .collect::<Vec<_>>();
        assert_eq!(
            paid,
            vec![Some(date!(2022 - 05 - 10)), Some(date!(2020 - 05 - 10)), None]
        );
    }

    #[test]
    fn summary_head_keeps_most_recent_period() {
        let period = |day: Date| FinancialPeriod {
            period_end: day,
            items: BTreeMap::new(),
        };
        let summary = FinancialSummary::new(
            Symbol::parse("EDP").expect("symbol"),
            Country::parse("portugal").expect("country"),
            vec![period(date!(2021 - 12 - 31)), period(date!(2023 - 12 - 31))],
        )
        .head(1);

        assert_eq!(summary.periods.len(), 1);
        assert_eq!(
            summary.latest().map(|period| period.period_end),
            Some(date!(2023 - 12 - 31))
        );
    }
}
