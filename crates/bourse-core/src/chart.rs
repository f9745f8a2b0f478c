//! Chart-ready reshaping of price history.
//!
//! Traces keep the row count and date order of the series they come from.

use serde::{Serialize, Serializer};
use time::Date;

use crate::domain::date::format_date;
use crate::{HistorySeries, Symbol};

fn iso_dates<S>(dates: &[Date], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(dates.iter().map(|date| format_date(*date)))
}

/// Closing-price line for one stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    #[serde(serialize_with = "iso_dates")]
    pub x: Vec<Date>,
    pub y: Vec<f64>,
}

impl LineTrace {
    pub fn close(series: &HistorySeries) -> Self {
        Self {
            name: series.symbol.to_string(),
            x: series.rows.iter().map(|row| row.date).collect(),
            y: series.rows.iter().map(|row| row.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// OHLC candles for one stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    #[serde(serialize_with = "iso_dates")]
    pub x: Vec<Date>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl CandlestickTrace {
    pub fn from_series(series: &HistorySeries) -> Self {
        let mut trace = Self {
            name: series.symbol.to_string(),
            x: Vec::with_capacity(series.len()),
            open: Vec::with_capacity(series.len()),
            high: Vec::with_capacity(series.len()),
            low: Vec::with_capacity(series.len()),
            close: Vec::with_capacity(series.len()),
        };

        for row in &series.rows {
            trace.x.push(row.date);
            trace.open.push(row.open);
            trace.high.push(row.high);
            trace.low.push(row.low);
            trace.close.push(row.close);
        }
        trace
    }
}

/// One close column of a [`CloseTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseColumn {
    pub symbol: Symbol,
    pub values: Vec<Option<f64>>,
}

/// Closing prices of several stocks side by side, indexed by the dates of
/// the first series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseTable {
    #[serde(serialize_with = "iso_dates")]
    pub dates: Vec<Date>,
    pub columns: Vec<CloseColumn>,
}

impl CloseTable {
    /// Left join on date: later series contribute `None` where they have no
    /// row for a date of the first series, and their extra dates are dropped.
    pub fn left_join(series: &[HistorySeries]) -> Self {
        let dates = series
            .first()
            .map(|first| first.rows.iter().map(|row| row.date).collect::<Vec<_>>())
            .unwrap_or_default();

        let columns = series
            .iter()
            .map(|other| CloseColumn {
                symbol: other.symbol.clone(),
                values: dates
                    .iter()
                    .map(|date| {
                        other
                            .rows
                            .binary_search_by_key(date, |row| row.date)
                            .ok()
                            .map(|index| other.rows[index].close)
                    })
                    .collect(),
            })
            .collect();

        Self { dates, columns }
    }

    /// Per-stock line traces, skipping the gaps a join left behind.
    pub fn traces(&self) -> Vec<LineTrace> {
        self.columns
            .iter()
            .map(|column| {
                let (x, y) = self
                    .dates
                    .iter()
                    .zip(&column.values)
                    .filter_map(|(date, value)| value.map(|value| (*date, value)))
                    .unzip();
                LineTrace {
                    name: column.symbol.to_string(),
                    x,
                    y,
                }
            })
            .collect()
    }
}
