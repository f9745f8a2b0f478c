//! Stock directory backing the live adapter's catalog.
//!
//! The upstream site has no listing endpoint, so the universe of countries
//! and stocks comes from a CSV file with the header
//! `country,name,full_name,isin,currency,symbol,id,tag`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::{Country, Stock, Symbol};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read stock directory: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    country: String,
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    isin: Option<String>,
    currency: String,
    symbol: String,
    id: u64,
    tag: String,
}

impl DirectoryRow {
    fn into_stock(self) -> Option<Stock> {
        let country = Country::parse(&self.country).ok()?;
        let symbol = Symbol::parse(&self.symbol).ok()?;
        Some(Stock {
            symbol,
            country,
            name: self.name,
            full_name: self.full_name.filter(|value| !value.trim().is_empty()),
            isin: self.isin.filter(|value| !value.trim().is_empty()),
            currency: self.currency.trim().to_ascii_uppercase(),
            id: self.id,
            tag: self.tag.trim().to_owned(),
        })
    }
}

/// In-memory index of listed stocks keyed by country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDirectory {
    by_country: BTreeMap<Country, Vec<Stock>>,
}

impl StockDirectory {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DirectoryError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DirectoryError> {
        let mut stocks = Vec::new();
        for (line, row) in reader.deserialize::<DirectoryRow>().enumerate() {
            let row = row?;
            match row.into_stock() {
                Some(stock) => stocks.push(stock),
                None => warn!(line = line + 2, "skipping stock directory row with invalid country or symbol"),
            }
        }
        Ok(Self::from_stocks(stocks))
    }

    pub fn from_stocks(stocks: impl IntoIterator<Item = Stock>) -> Self {
        let mut by_country: BTreeMap<Country, Vec<Stock>> = BTreeMap::new();
        for stock in stocks {
            by_country.entry(stock.country.clone()).or_default().push(stock);
        }
        Self { by_country }
    }

    pub fn is_empty(&self) -> bool {
        self.by_country.is_empty()
    }

    pub fn countries(&self) -> Vec<Country> {
        self.by_country.keys().cloned().collect()
    }

    pub fn stocks(&self, country: &Country) -> Option<&[Stock]> {
        self.by_country.get(country).map(Vec::as_slice)
    }

    pub fn find(&self, country: &Country, symbol: &Symbol) -> Option<&Stock> {
        self.stocks(country)?
            .iter()
            .find(|stock| &stock.symbol == symbol)
    }

    pub fn find_by_tag(&self, country: &Country, tag: &str) -> Option<&Stock> {
        self.stocks(country)?.iter().find(|stock| stock.tag == tag)
    }
}
