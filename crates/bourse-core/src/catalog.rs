//! Country and stock catalog.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::data_source::DataSource;
use crate::{Country, DataUnavailable, StockOption};

/// Lists the countries and stocks a [`DataSource`] knows about.
///
/// The country list is fetched on first use and never refreshed for the
/// lifetime of the catalog.
pub struct Catalog {
    source: Arc<dyn DataSource>,
    countries: OnceCell<Vec<Country>>,
}

impl Catalog {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            countries: OnceCell::new(),
        }
    }

    /// Countries sorted alphabetically.
    ///
    /// # Errors
    ///
    /// [`DataUnavailable`] when the upstream listing fails or is empty. A
    /// failed load is retried by the next call.
    pub async fn list_countries(&self) -> Result<&[Country], DataUnavailable> {
        self.countries
            .get_or_try_init(|| async {
                let mut countries = self.source.countries().await.map_err(|error| {
                    warn!(source = %self.source.id(), %error, "country listing failed");
                    DataUnavailable::countries(error.to_string())
                })?;

                countries.sort();
                countries.dedup();
                if countries.is_empty() {
                    return Err(DataUnavailable::countries("upstream listed no countries"));
                }

                debug!(source = %self.source.id(), count = countries.len(), "country list loaded");
                Ok(countries)
            })
            .await
            .map(Vec::as_slice)
    }

    /// Selector options for `country`, matched case-insensitively.
    ///
    /// Never fails: any problem collapses into the single
    /// [`StockOption::no_results`] placeholder.
    pub async fn list_stocks(&self, country: &str) -> Vec<StockOption> {
        let Ok(country) = Country::parse(country) else {
            return vec![StockOption::no_results()];
        };

        let mut stocks = match self.source.stocks(&country).await {
            Ok(stocks) => stocks,
            Err(error) => {
                warn!(%country, %error, "stock listing failed, returning placeholder");
                return vec![StockOption::no_results()];
            }
        };

        if stocks.is_empty() {
            warn!(%country, "stock listing is empty, returning placeholder");
            return vec![StockOption::no_results()];
        }

        stocks.sort_by_cached_key(|stock| (stock.display_name(), stock.symbol.clone()));
        stocks.iter().map(StockOption::for_stock).collect()
    }
}
