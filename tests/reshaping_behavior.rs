//! Behavior-driven tests for chart and report reshaping
//!
//! History and profiles are fetched from the offline source and turned
//! into what the dashboard draws: line and candlestick traces, a joined
//! close-price table, and the profile report text.

use std::sync::Arc;

use time::macros::date;

use bourse_core::{
    render_markdown, CandlestickTrace, CloseTable, Country, DateRange, HistorySeries, HistorySpan,
    LineTrace, MarketDataFetcher, OfflineAdapter, ProfileSection, Symbol,
};

fn fetcher() -> MarketDataFetcher {
    MarketDataFetcher::new(Arc::new(OfflineAdapter::new())).with_today(date!(2024 - 03 - 15))
}

fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

async fn january(symbols: &[&str]) -> Vec<HistorySeries> {
    let span = HistorySpan::Range(
        DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)).expect("range"),
    );
    let portugal = Country::parse("portugal").expect("country");
    let fetcher = fetcher();

    let mut series = Vec::new();
    for value in symbols {
        series.push(
            fetcher
                .get_history(&symbol(value), &portugal, &span)
                .await
                .expect("history"),
        );
    }
    series
}

// =============================================================================
// Chart traces
// =============================================================================

#[tokio::test]
async fn traces_keep_every_row_in_date_order() {
    // Given: one month of history
    let series = january(&["GALP"]).await;
    let galp = &series[0];

    // When: line and candlestick traces are built
    let line = LineTrace::close(galp);
    let candles = CandlestickTrace::from_series(galp);

    // Then: both have one point per row, in the series' order
    assert_eq!(line.len(), galp.len());
    assert_eq!(candles.x.len(), galp.len());
    assert_eq!(line.name, "GALP");
    assert_eq!(line.x.first().copied(), galp.first_date());
    assert_eq!(line.x.last().copied(), galp.last_date());
    assert!(candles
        .high
        .iter()
        .zip(&candles.low)
        .all(|(high, low)| high >= low));
}

#[tokio::test]
async fn line_chart_serializes_iso_dates() {
    let series = january(&["EDP"]).await;

    let json = serde_json::to_value(LineTrace::close(&series[0])).expect("serializable");

    assert_eq!(json["x"][0], "2024-01-01");
    assert_eq!(json["name"], "EDP");
}

// =============================================================================
// Joined close table
// =============================================================================

#[tokio::test]
async fn close_table_is_anchored_on_the_first_stock() {
    // Given: a full month for BCP and only part of it for EDP
    let mut series = january(&["BCP", "EDP"]).await;
    series[1].retain_within(
        DateRange::new(date!(2024 - 01 - 10), date!(2024 - 01 - 31)).expect("range"),
    );

    // When: the close prices are joined
    let table = CloseTable::left_join(&series);

    // Then: the dates are BCP's, and EDP has gaps before the 10th
    assert_eq!(table.dates.len(), series[0].len());
    assert_eq!(table.columns.len(), 2);
    assert!(table.columns[0].values.iter().all(Option::is_some));
    assert_eq!(table.columns[1].values[0], None);
    assert_eq!(
        table.columns[1].values.iter().filter(|value| value.is_some()).count(),
        series[1].len()
    );

    // And: line traces skip the gaps
    let traces = table.traces();
    assert_eq!(traces[1].len(), series[1].len());
    assert_eq!(traces[1].x.first().copied(), Some(date!(2024 - 01 - 10)));
}

#[test]
fn close_table_of_nothing_is_empty() {
    let table = CloseTable::left_join(&[]);

    assert!(table.dates.is_empty());
    assert!(table.traces().is_empty());
}

// =============================================================================
// Profile report
// =============================================================================

#[tokio::test]
async fn report_lists_each_profile_with_its_latest_results() {
    // Given: two Portuguese stocks with profiles and summaries
    let fetcher = fetcher();
    let portugal = Country::parse("portugal").expect("country");

    let mut sections = Vec::new();
    for value in ["BCP", "JMT"] {
        let symbol = symbol(value);
        let profile = fetcher.get_profile(&symbol, &portugal).await.expect("profile");
        let summary = fetcher
            .get_financial_summary(&symbol, &portugal)
            .await
            .expect("summary");
        sections.push(ProfileSection {
            symbol,
            description: profile.description,
            summary: Some(summary),
        });
    }

    // When: the report is rendered
    let text = render_markdown(&sections);

    // Then: each description is followed by a results line for 2023
    let blocks = text.split("\n\n").filter(|block| !block.is_empty()).collect::<Vec<_>>();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("BCP is a publicly traded company"));
    assert!(blocks[1].starts_with("Jeronimo Martins"));
    assert!(blocks
        .iter()
        .all(|block| block.contains("Results from 2023/12/31: ")));
    assert!(text.ends_with("  \n\n"));
}

#[tokio::test]
async fn profile_without_results_has_no_results_line() {
    let section = ProfileSection {
        symbol: symbol("NOS"),
        description: String::from("Telecommunications group."),
        summary: None,
    };

    assert_eq!(render_markdown(&[section]), "Telecommunications group. \n\n\n");
}
