//! Behavior-driven tests for the country/stock catalog
//!
//! These tests verify what a user picking a country and its stocks sees,
//! including how upstream failures degrade into the "No results" option.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bourse_core::{
    Catalog, Country, DataSource, DividendHistory, FinancialSummary, HistoryRequest,
    HistorySeries, InstrumentRequest, InvestingAdapter, OfflineAdapter, Operation, OverviewRow,
    Profile, ProviderId, SourceError, SourceFuture, Stock, StockDirectory, StockOption, Symbol,
};

/// Source whose listings can be scripted and whose country calls are counted.
struct ScriptedSource {
    countries: Result<Vec<Country>, SourceError>,
    stocks: Result<Vec<Stock>, SourceError>,
    country_calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(countries: Result<Vec<Country>, SourceError>, stocks: Result<Vec<Stock>, SourceError>) -> Self {
        Self {
            countries,
            stocks,
            country_calls: AtomicUsize::new(0),
        }
    }
}

impl DataSource for ScriptedSource {
    fn id(&self) -> ProviderId {
        ProviderId::Offline
    }

    fn countries(&self) -> SourceFuture<'_, Vec<Country>> {
        self.country_calls.fetch_add(1, Ordering::SeqCst);
        let countries = self.countries.clone();
        Box::pin(async move { countries })
    }

    fn stocks<'a>(&'a self, _country: &'a Country) -> SourceFuture<'a, Vec<Stock>> {
        let stocks = self.stocks.clone();
        Box::pin(async move { stocks })
    }

    fn history(&self, _req: HistoryRequest) -> SourceFuture<'_, HistorySeries> {
        Box::pin(async { Err(SourceError::unavailable("not scripted")) })
    }

    fn profile(&self, _req: InstrumentRequest) -> SourceFuture<'_, Profile> {
        Box::pin(async { Err(SourceError::unavailable("not scripted")) })
    }

    fn financial_summary(&self, _req: InstrumentRequest) -> SourceFuture<'_, FinancialSummary> {
        Box::pin(async { Err(SourceError::unavailable("not scripted")) })
    }

    fn dividends(&self, _req: InstrumentRequest) -> SourceFuture<'_, DividendHistory> {
        Box::pin(async { Err(SourceError::unavailable("not scripted")) })
    }

    fn overview<'a>(&'a self, _country: &'a Country) -> SourceFuture<'a, Vec<OverviewRow>> {
        Box::pin(async { Err(SourceError::unavailable("not scripted")) })
    }
}

fn country(name: &str) -> Country {
    Country::parse(name).expect("valid country")
}

fn stock(symbol: &str, name: &str) -> Stock {
    Stock {
        symbol: Symbol::parse(symbol).expect("valid symbol"),
        country: country("portugal"),
        name: name.to_owned(),
        full_name: None,
        isin: None,
        currency: String::from("EUR"),
        id: 1,
        tag: symbol.to_ascii_lowercase(),
    }
}

// =============================================================================
// Countries
// =============================================================================

#[tokio::test]
async fn user_sees_countries_in_alphabetical_order() {
    // Given: an upstream listing countries out of order
    let source = ScriptedSource::new(
        Ok(vec![country("spain"), country("Portugal"), country("united states"), country("spain")]),
        Ok(Vec::new()),
    );
    let catalog = Catalog::new(Arc::new(source));

    // When: the countries are listed
    let countries = catalog.list_countries().await.expect("countries");

    // Then: they come back sorted and without duplicates
    let names = countries.iter().map(Country::as_str).collect::<Vec<_>>();
    assert_eq!(names, vec!["portugal", "spain", "united states"]);
}

#[tokio::test]
async fn country_list_is_loaded_once_per_catalog() {
    // Given: a catalog over a counting source
    let source = Arc::new(ScriptedSource::new(Ok(vec![country("spain")]), Ok(Vec::new())));
    let catalog = Catalog::new(Arc::clone(&source) as Arc<dyn DataSource>);

    // When: the countries are listed several times
    for _ in 0..3 {
        catalog.list_countries().await.expect("countries");
    }

    // Then: the upstream was asked only once
    assert_eq!(source.country_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_country_listing_is_data_unavailable() {
    // Given: an upstream that cannot list countries
    let source = ScriptedSource::new(Err(SourceError::unavailable("connection refused")), Ok(Vec::new()));
    let catalog = Catalog::new(Arc::new(source));

    // When: the countries are listed
    let error = catalog.list_countries().await.expect_err("listing fails");

    // Then: the failure is typed and keeps the upstream cause
    assert_eq!(error.operation, Operation::Countries);
    assert_eq!(error.country, None);
    assert!(error.reason.contains("connection refused"));
}

// =============================================================================
// Stocks
// =============================================================================

#[tokio::test]
async fn stock_options_are_sorted_by_clean_name() {
    // Given: names with zero-width spaces and mixed case
    let source = ScriptedSource::new(
        Ok(Vec::new()),
        Ok(vec![
            stock("NOS", "NOS SGPS"),
            stock("JMT", "\u{200b}Jeronimo Martins"),
            stock("ALT", "altri"),
            stock("BCP", "BCP\u{200b} "),
        ]),
    );
    let catalog = Catalog::new(Arc::new(source));

    // When: the stocks of the country are listed
    let options = catalog.list_stocks("portugal").await;

    // Then: labels are "Name, SYMBOL", cleaned and sorted case-sensitively
    let labels = options.iter().map(|option| option.label.as_str()).collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec!["BCP, BCP", "Jeronimo Martins, JMT", "NOS SGPS, NOS", "altri, ALT"]
    );
    assert_eq!(options[1].value, "JMT");
}

#[tokio::test]
async fn unknown_country_yields_exactly_the_placeholder() {
    // Given: the offline universe
    let catalog = Catalog::new(Arc::new(OfflineAdapter::new()));

    // When: an unknown country is browsed
    let options = catalog.list_stocks("atlantis").await;

    // Then: the single "No results" option comes back instead of an error
    assert_eq!(options, vec![StockOption::no_results()]);
    assert!(options[0].is_placeholder());
    assert_eq!(options[0].label, "No results");
}

#[tokio::test]
async fn transport_failure_and_empty_listing_also_yield_the_placeholder() {
    for stocks in [Err(SourceError::unavailable("timeout")), Ok(Vec::new())] {
        // Given: an upstream that fails or lists nothing
        let catalog = Catalog::new(Arc::new(ScriptedSource::new(Ok(Vec::new()), stocks)));

        // When / Then: the placeholder is returned
        assert_eq!(catalog.list_stocks("portugal").await, vec![StockOption::no_results()]);
    }
}

#[tokio::test]
async fn country_lookup_is_case_insensitive() {
    let catalog = Catalog::new(Arc::new(OfflineAdapter::new()));

    let lower = catalog.list_stocks("united states").await;
    let mixed = catalog.list_stocks("  United   STATES ").await;

    assert_eq!(lower, mixed);
    assert!(!lower[0].is_placeholder());
}

// =============================================================================
// Stock directory
// =============================================================================

#[tokio::test]
async fn live_catalog_is_backed_by_the_directory_file() {
    // Given: a directory CSV on disk
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "country,name,full_name,isin,currency,symbol,id,tag").expect("write");
    writeln!(file, "spain,Telefonica,Telefonica SA,ES0178430E18,EUR,TEF,26,telefonica").expect("write");
    writeln!(file, "spain,Banco Santander,,ES0113900J37,EUR,SAN,396,banco-santander").expect("write");
    writeln!(file, "portugal,BCP,,,EUR,BCP,32244,banco-comercial-portugues").expect("write");

    let directory = StockDirectory::from_path(file.path()).expect("directory loads");
    let catalog = Catalog::new(Arc::new(InvestingAdapter::new(directory)));

    // When: countries and stocks are listed
    let countries = catalog.list_countries().await.expect("countries");
    let options = catalog.list_stocks("Spain").await;

    // Then: both come from the file without any network call
    assert_eq!(countries.len(), 2);
    assert_eq!(
        options.iter().map(|option| option.value.as_str()).collect::<Vec<_>>(),
        vec!["SAN", "TEF"]
    );
}
