//! investing.com scraping adapter.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | history | `POST instruments/HistoricalDataAjax` |
//! | profile | `GET equities/{tag}-company-profile` |
//! | financial summary | `GET instruments/Financials/changesummaryreporttypeajax` |
//! | dividends | `GET equities/{tag}-dividends`, then `POST equities/MoreDividendsHistory` |
//! | overview | `GET equities/{country-slug}` |
//!
//! Countries and stocks come from the local [`StockDirectory`].

use std::collections::BTreeMap;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month};
use tracing::{debug, warn};

use super::directory::StockDirectory;
use crate::data_source::{
    DataSource, HistoryRequest, InstrumentRequest, SourceError, SourceFuture,
};
use crate::domain::date::date_from_unix;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{
    parse_decorated_number, Country, DividendHistory, DividendRecord, FinancialPeriod,
    FinancialSummary, HistoricalRow, HistorySeries, OverviewRow, Profile, ProviderId, Span, Stock,
    Symbol,
};

/// Longest range the history endpoint answers in one call.
const MAX_WINDOW_YEARS: f64 = 19.0;
/// Upper bound on "more dividends" pages followed for one stock.
const MAX_DIVIDEND_PAGES: usize = 50;
const NO_RESULTS_FOUND: &str = "No results found";
const FORM_DATE: &[FormatItem<'static>] = format_description!("[day]/[month]/[year]");

/// investing.com adapter over a [`HttpClient`] transport.
pub struct InvestingAdapter {
    http_client: Arc<dyn HttpClient>,
    directory: StockDirectory,
    base_url: String,
}

impl InvestingAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.investing.com";

    pub fn new(directory: StockDirectory) -> Self {
        Self::with_http_client(directory, Arc::new(ReqwestHttpClient::default()))
    }

    pub fn with_http_client(directory: StockDirectory, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            directory,
            base_url: String::from(Self::DEFAULT_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn directory(&self) -> &StockDirectory {
        &self.directory
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn listed(&self, symbol: &Symbol, country: &Country) -> Result<Stock, SourceError> {
        if self.directory.stocks(country).is_none() {
            return Err(SourceError::not_found(format!("country '{country}' is not listed")));
        }

        self.directory
            .find(country, symbol)
            .cloned()
            .ok_or_else(|| SourceError::not_found(format!("{symbol} is not listed in {country}")))
    }

    async fn fetch(&self, request: HttpRequest) -> Result<String, SourceError> {
        let request = request.with_header("x-requested-with", "XMLHttpRequest");
        debug!(method = ?request.method, url = %request.url, "investing request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("investing transport error: {}", e.message()))
        })?;

        match response.status {
            404 => Err(SourceError::not_found("investing returned status 404")),
            status if !response.is_success() => Err(SourceError::unavailable(format!(
                "investing returned status {status}"
            ))),
            _ => Ok(response.body),
        }
    }

    async fn fetch_history(&self, stock: &Stock, from: Date, to: Date) -> Result<Vec<HistoricalRow>, SourceError> {
        let request = HttpRequest::post(self.url("instruments/HistoricalDataAjax")).with_form(&[
            ("curr_id", stock.id.to_string()),
            // Not checked upstream, but the form is rejected without it.
            ("smlID", (1_000_000 + stock.id % 9_000_000).to_string()),
            ("header", format!("{} Historical Data", stock.symbol)),
            ("st_date", form_date(from)?),
            ("end_date", form_date(to)?),
            ("interval_sec", String::from("Daily")),
            ("sort_col", String::from("date")),
            ("sort_ord", String::from("DESC")),
            ("action", String::from("historical_data")),
        ]);

        let body = self.fetch(request).await?;
        parse_history_rows(&body, &stock.currency)
    }

    async fn fetch_more_dividends(
        &self,
        stock: &Stock,
        mut last_timestamp: i64,
    ) -> Result<Vec<DividendRecord>, SourceError> {
        let mut records = Vec::new();

        for _ in 0..MAX_DIVIDEND_PAGES {
            let request = HttpRequest::post(self.url("equities/MoreDividendsHistory")).with_form(&[
                ("pairID", stock.id.to_string()),
                ("last_timestamp", last_timestamp.to_string()),
            ]);
            let body = self.fetch(request).await?;
            let payload: MoreDividends = serde_json::from_str(&body).map_err(|e| {
                SourceError::internal(format!("failed to parse more dividends payload: {e}"))
            })?;

            let page = parse_dividend_fragment(&payload.history_rows)?;
            records.extend(page.records);

            match page.last_timestamp {
                Some(timestamp) if payload.has_more() && timestamp != last_timestamp => {
                    last_timestamp = timestamp;
                }
                _ => return Ok(records),
            }
        }

        warn!(symbol = %stock.symbol, pages = MAX_DIVIDEND_PAGES, "stopped following dividend pages");
        Ok(records)
    }
}

impl DataSource for InvestingAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Investing
    }

    fn countries(&self) -> SourceFuture<'_, Vec<Country>> {
        Box::pin(async move {
            if self.directory.is_empty() {
                return Err(SourceError::unavailable(
                    "stock directory is empty; point BOURSE_STOCKS_CSV at a directory file",
                ));
            }
            Ok(self.directory.countries())
        })
    }

    fn stocks<'a>(&'a self, country: &'a Country) -> SourceFuture<'a, Vec<Stock>> {
        Box::pin(async move {
            self.directory
                .stocks(country)
                .map(<[Stock]>::to_vec)
                .ok_or_else(|| SourceError::not_found(format!("country '{country}' is not listed")))
        })
    }

    fn history(&self, req: HistoryRequest) -> SourceFuture<'_, HistorySeries> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;

            let mut rows = Vec::new();
            for (from, to) in history_windows(req.from(), req.to()) {
                rows.extend(self.fetch_history(&stock, from, to).await?);
            }

            if rows.is_empty() {
                return Err(SourceError::not_found(format!("no history found for {req}")));
            }

            Ok(HistorySeries::new(req.symbol, req.country, rows))
        })
    }

    fn profile(&self, req: InstrumentRequest) -> SourceFuture<'_, Profile> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let url = self.url(&format!(
                "equities/{}-company-profile",
                urlencoding::encode(&stock.tag)
            ));

            let body = self.fetch(HttpRequest::get(url.clone())).await?;
            let description = parse_profile(&body)?.ok_or_else(|| {
                SourceError::not_found(format!("no profile found for {}", req.symbol))
            })?;

            Ok(Profile {
                symbol: req.symbol,
                country: req.country,
                description,
                url: Some(url),
            })
        })
    }

    fn financial_summary(&self, req: InstrumentRequest) -> SourceFuture<'_, FinancialSummary> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let url = self.url(&format!(
                "instruments/Financials/changesummaryreporttypeajax?action=change_report_type&pid={id}&financial_id={id}&ratios_id={id}&period_type=Annual",
                id = stock.id
            ));

            let body = self.fetch(HttpRequest::get(url)).await?;
            let periods = parse_income_summary(&body)?;
            if periods.is_empty() {
                return Err(SourceError::not_found(format!(
                    "no financial summary found for {}",
                    req.symbol
                )));
            }

            Ok(FinancialSummary::new(req.symbol, req.country, periods))
        })
    }

    fn dividends(&self, req: InstrumentRequest) -> SourceFuture<'_, DividendHistory> {
        Box::pin(async move {
            let stock = self.listed(&req.symbol, &req.country)?;
            let url = self.url(&format!("equities/{}-dividends", urlencoding::encode(&stock.tag)));

            let body = self.fetch(HttpRequest::get(url)).await?;
            let page = parse_dividend_page(&body, stock.id)?;
            let mut records = page.records;

            if let (true, Some(last_timestamp)) = (page.has_more, page.last_timestamp) {
                records.extend(self.fetch_more_dividends(&stock, last_timestamp).await?);
            }

            if records.is_empty() {
                return Err(SourceError::not_found(format!(
                    "no dividends found for {}",
                    req.symbol
                )));
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
            if self.directory.stocks(country).is_none() {
                return Err(SourceError::not_found(format!(
                    "country '{country}' is not listed"
                )));
            }

            let url = self.url(&format!("equities/{}", urlencoding::encode(&country.slug())));
            let body = self.fetch(HttpRequest::get(url)).await?;
            let rows = parse_overview(&body, |tag| {
                self.directory
                    .find_by_tag(country, tag)
                    .map(|stock| stock.symbol.clone())
            })?;

            if rows.is_empty() {
                return Err(SourceError::not_found(format!(
                    "no market overview found for {country}"
                )));
            }
            Ok(rows)
        })
    }
}

/// Consecutive inclusive windows covering `from..=to`, none longer than
/// [`MAX_WINDOW_YEARS`].
fn history_windows(from: Date, to: Date) -> Vec<(Date, Date)> {
    let reach = Duration::days(Span::Years(MAX_WINDOW_YEARS).days() - 1);
    let mut windows = Vec::new();
    let mut cursor = from;

    while cursor <= to {
        let end = cursor.checked_add(reach).map_or(to, |day| day.min(to));
        windows.push((cursor, end));
        match end.next_day() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    windows
}

fn form_date(date: Date) -> Result<String, SourceError> {
    date.format(FORM_DATE)
        .map_err(|e| SourceError::internal(format!("failed to format date {date}: {e}")))
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::internal(format!("invalid selector '{css}': {e}")))
}

/// Visible text with whitespace runs collapsed.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn unix_attr(element: ElementRef<'_>, name: &str) -> Option<i64> {
    let raw = element.value().attr(name)?.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|value| value as i64))
}

/// `-`, `--` and blanks mean "no value" in statement and dividend tables.
fn optional_number(raw: &str) -> Option<f64> {
    match raw.trim() {
        "" | "-" | "--" | "N/A" => None,
        other => parse_decorated_number(other),
    }
}

fn real_number(cell: ElementRef<'_>, field: &str) -> Result<f64, SourceError> {
    cell.value()
        .attr("data-real-value")
        .and_then(|raw| raw.replace(',', "").trim().parse::<f64>().ok())
        .or_else(|| optional_number(&text_of(cell)))
        .ok_or_else(|| SourceError::internal(format!("history row has an unreadable {field}")))
}

fn parse_history_rows(html: &str, currency: &str) -> Result<Vec<HistoricalRow>, SourceError> {
    let document = Html::parse_document(html);
    let table = selector("table#curr_table")?;
    let rows = selector("tbody tr")?;
    let cells = selector("td")?;

    let table = document
        .select(&table)
        .next()
        .ok_or_else(|| SourceError::internal("history response has no data table"))?;

    let mut parsed = Vec::new();
    for row in table.select(&rows) {
        let tds = row.select(&cells).collect::<Vec<_>>();
        // An empty window renders a single "No results found" row.
        if tds.iter().any(|td| text_of(*td) == NO_RESULTS_FOUND) {
            continue;
        }
        if tds.len() < 6 {
            return Err(SourceError::internal(format!(
                "history row has {} cells, expected at least 6",
                tds.len()
            )));
        }

        let date = unix_attr(tds[0], "data-real-value")
            .and_then(date_from_unix)
            .ok_or_else(|| SourceError::internal("history row has an unreadable date"))?;

        // Volume is blank for thinly traded days.
        let volume = real_number(tds[5], "volume").unwrap_or(0.0);

        parsed.push(HistoricalRow {
            date,
            close: real_number(tds[1], "close")?,
            open: real_number(tds[2], "open")?,
            high: real_number(tds[3], "high")?,
            low: real_number(tds[4], "low")?,
            volume: if volume.is_finite() && volume > 0.0 { volume as u64 } else { 0 },
            currency: currency.to_owned(),
        });
    }

    Ok(parsed)
}

fn parse_profile(html: &str) -> Result<Option<String>, SourceError> {
    let document = Html::parse_document(html);
    let story = selector("#profile-fullStory-showhide")?;

    Ok(document
        .select(&story)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty()))
}

/// Period header such as `Dec 31, 2023`.
fn parse_period_date(raw: &str) -> Option<Date> {
    let mut parts = raw.split_whitespace();
    let month = match parts.next()?.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    let day = parts.next()?.trim_end_matches(',').parse::<u8>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;

    Date::from_calendar_date(year, month, day).ok()
}

fn parse_income_summary(html: &str) -> Result<Vec<FinancialPeriod>, SourceError> {
    let document = Html::parse_document(html);
    let table = selector("div.companySummaryIncomeStatement table")?;
    let headers = selector("th")?;
    let rows = selector("tr")?;
    let cells = selector("td")?;

    let Some(table) = document.select(&table).next() else {
        return Ok(Vec::new());
    };

    let mut periods = table
        .select(&headers)
        .skip(1)
        .map(|th| {
            let raw = text_of(th);
            parse_period_date(&raw)
                .map(|period_end| FinancialPeriod {
                    period_end,
                    items: BTreeMap::new(),
                })
                .ok_or_else(|| SourceError::internal(format!("unreadable period header '{raw}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for row in table.select(&rows) {
        let tds = row.select(&cells).collect::<Vec<_>>();
        let Some((label, values)) = tds.split_first() else {
            continue;
        };
        let label = text_of(*label);
        if label.is_empty() {
            continue;
        }

        for (period, cell) in periods.iter_mut().zip(values) {
            period
                .items
                .insert(label.clone(), optional_number(&text_of(*cell)));
        }
    }

    Ok(periods)
}

struct DividendPage {
    records: Vec<DividendRecord>,
    last_timestamp: Option<i64>,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct MoreDividends {
    #[serde(rename = "historyRows", default)]
    history_rows: String,
    #[serde(rename = "hasMoreHistory", default)]
    has_more_history: serde_json::Value,
}

impl MoreDividends {
    fn has_more(&self) -> bool {
        match &self.has_more_history {
            serde_json::Value::Bool(flag) => *flag,
            serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            serde_json::Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

fn parse_dividend_page(html: &str, id: u64) -> Result<DividendPage, SourceError> {
    let document = Html::parse_document(html);
    let more = selector(&format!("#showMoreDividendsHistory{id}"))?;

    let mut page = parse_dividend_rows(&document, &format!("#dividendsHistoryData{id} tbody tr"))?;
    page.has_more = document.select(&more).next().is_some();
    Ok(page)
}

fn parse_dividend_fragment(rows: &str) -> Result<DividendPage, SourceError> {
    let document = Html::parse_fragment(&format!("<table><tbody>{rows}</tbody></table>"));
    parse_dividend_rows(&document, "table tbody tr")
}

fn parse_dividend_rows(document: &Html, rows_css: &str) -> Result<DividendPage, SourceError> {
    let rows = selector(rows_css)?;
    let cells = selector("td")?;
    let kind = selector("span")?;

    let mut records = Vec::new();
    let mut last_timestamp = None;

    for row in document.select(&rows) {
        let tds = row.select(&cells).collect::<Vec<_>>();
        if tds.len() < 5 {
            continue;
        }

        let ex_timestamp = unix_attr(tds[0], "data-value")
            .ok_or_else(|| SourceError::internal("dividend row has an unreadable ex-date"))?;
        let ex_date = date_from_unix(ex_timestamp)
            .ok_or_else(|| SourceError::internal("dividend row has an out-of-range ex-date"))?;
        let amount = text_of(tds[1]);
        let dividend = parse_decorated_number(&amount)
            .ok_or_else(|| SourceError::internal(format!("unreadable dividend amount '{amount}'")))?;

        let kind = tds[2]
            .select(&kind)
            .next()
            .and_then(|span| span.value().attr("title").map(str::to_owned))
            .unwrap_or_else(|| text_of(tds[2]));

        last_timestamp = row
            .value()
            .attr("event_timestamp")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .or(Some(ex_timestamp));

        records.push(DividendRecord {
            ex_date,
            payment_date: unix_attr(tds[3], "data-value").and_then(date_from_unix),
            dividend,
            kind: Some(kind).filter(|kind| !kind.is_empty()),
            yield_pct: optional_number(&text_of(tds[4])),
        });
    }

    Ok(DividendPage {
        records,
        last_timestamp,
        has_more: false,
    })
}

fn parse_overview(
    html: &str,
    resolve: impl Fn(&str) -> Option<Symbol>,
) -> Result<Vec<OverviewRow>, SourceError> {
    let document = Html::parse_document(html);
    let rows = selector("table#cross_rate_markets_stocks_1 tbody tr")?;
    let cells = selector("td")?;
    let link = selector("a")?;

    let mut parsed = Vec::new();
    for row in document.select(&rows) {
        let tds = row.select(&cells).collect::<Vec<_>>();
        if tds.len() < 8 {
            continue;
        }

        let anchor = tds[1].select(&link).next();
        let name = anchor
            .and_then(|a| a.value().attr("title").map(str::to_owned))
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| text_of(tds[1]));
        let symbol = anchor
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| href.split(['?', '#']).next())
            .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
            .and_then(&resolve);

        parsed.push(OverviewRow {
            name,
            symbol,
            last: text_of(tds[2]),
            high: text_of(tds[3]),
            low: text_of(tds[4]),
            change: text_of(tds[5]),
            change_pct: text_of(tds[6]),
            turnover: text_of(tds[7]),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use time::macros::date;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpMethod, HttpResponse};
    use crate::DateRange;

    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::ok(NO_RESULTS_PAGE)));
            Box::pin(async move { response })
        }
    }

    fn directory() -> StockDirectory {
        StockDirectory::from_reader(
            "country,name,full_name,isin,currency,symbol,id,tag\n\
             portugal,BCP,Banco Comercial Portugues SA,PTBCP0AM0015,EUR,BCP,32244,banco-comercial-portugues\n"
                .as_bytes(),
        )
        .expect("valid directory")
    }

    fn adapter(client: Arc<ScriptedHttpClient>) -> InvestingAdapter {
        InvestingAdapter::with_http_client(directory(), client).with_base_url("https://investing.test/")
    }

    fn bcp() -> InstrumentRequest {
        InstrumentRequest::new(
            Symbol::parse("BCP").expect("symbol"),
            Country::parse("portugal").expect("country"),
        )
    }

    const NO_RESULTS_PAGE: &str = r#"<table id="curr_table"><tbody><tr><td colspan="7">No results found</td></tr></tbody></table>"#;

    const HISTORY: &str = r#"
        <table id="curr_table"><tbody>
          <tr>
            <td data-real-value="1704240000">Jan 03, 2024</td>
            <td data-real-value="0.2671">0.2671</td>
            <td data-real-value="0.2630">0.2630</td>
            <td data-real-value="0.2702">0.2702</td>
            <td data-real-value="0.2611">0.2611</td>
            <td data-real-value="45123456">45.12M</td>
            <td>1.56%</td>
          </tr>
          <tr>
            <td data-real-value="1704153600">Jan 02, 2024</td>
            <td data-real-value="0.2630">0.2630</td>
            <td data-real-value="0.2580">0.2580</td>
            <td data-real-value="0.2644">0.2644</td>
            <td data-real-value="0.2571">0.2571</td>
            <td data-real-value="">-</td>
            <td>0.77%</td>
          </tr>
        </tbody></table>"#;

    #[test]
    fn windows_cover_range_without_exceeding_nineteen_years() {
        let from = date!(1924 - 03 - 01);
        let to = date!(2024 - 03 - 01);
        let windows = history_windows(from, to);

        assert_eq!(windows.first().map(|w| w.0), Some(from));
        assert_eq!(windows.last().map(|w| w.1), Some(to));
        for (start, end) in &windows {
            assert!(*end - *start < Duration::days(Span::Years(19.0).days()));
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1.next_day(), Some(pair[1].0));
        }
    }

    #[test]
    fn short_range_is_a_single_window() {
        let windows = history_windows(date!(2024 - 01 - 01), date!(2024 - 01 - 31));
        assert_eq!(windows, vec![(date!(2024 - 01 - 01), date!(2024 - 01 - 31))]);
    }

    #[test]
    fn parses_history_rows_from_real_values() {
        let rows = parse_history_rows(HISTORY, "EUR").expect("rows");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date!(2024 - 01 - 03));
        assert_eq!(rows[0].close, 0.2671);
        assert_eq!(rows[0].open, 0.2630);
        assert_eq!(rows[0].volume, 45_123_456);
        assert_eq!(rows[1].volume, 0);
    }

    #[test]
    fn no_results_page_yields_no_rows() {
        assert!(parse_history_rows(NO_RESULTS_PAGE, "EUR").expect("parsed").is_empty());
    }

    #[test]
    fn no_results_text_outside_the_table_keeps_rows() {
        let html = format!(
            "<div class=\"searchResults\">{NO_RESULTS_FOUND}</div>{HISTORY}"
        );

        let rows = parse_history_rows(&html, "EUR").expect("rows");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn page_without_history_table_is_an_error() {
        let error = parse_history_rows("<html><body>maintenance</body></html>", "EUR")
            .expect_err("no table");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }

    #[test]
    fn parses_period_headers() {
        assert_eq!(parse_period_date("Dec 31, 2023"), Some(date!(2023 - 12 - 31)));
        assert_eq!(parse_period_date("Sep 3, 2021"), Some(date!(2021 - 09 - 03)));
        assert_eq!(parse_period_date("2023"), None);
    }

    #[tokio::test]
    async fn history_posts_one_form_per_window() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok(NO_RESULTS_PAGE)),
            Ok(HttpResponse::ok(HISTORY)),
        ]));
        let adapter = adapter(Arc::clone(&client));
        let request = HistoryRequest::new(
            Symbol::parse("BCP").expect("symbol"),
            Country::parse("portugal").expect("country"),
            DateRange::new(date!(2000 - 01 - 01), date!(2024 - 01 - 31)).expect("range"),
        );

        let series = adapter.history(request).await.expect("history");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date!(2024 - 01 - 02)));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.method == HttpMethod::Post));
        assert_eq!(requests[0].url, "https://investing.test/instruments/HistoricalDataAjax");
        assert_eq!(requests[0].form_value("curr_id").as_deref(), Some("32244"));
        assert_eq!(requests[0].form_value("st_date").as_deref(), Some("01/01/2000"));
        assert_eq!(requests[1].form_value("end_date").as_deref(), Some("31/01/2024"));
        assert_eq!(
            requests[0].headers.get("x-requested-with").map(String::as_str),
            Some("XMLHttpRequest")
        );
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found_without_a_request() {
        let client = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let adapter = adapter(Arc::clone(&client));
        let request = InstrumentRequest::new(
            Symbol::parse("NOPE").expect("symbol"),
            Country::parse("portugal").expect("country"),
        );

        let error = adapter.profile(request).await.expect_err("unknown symbol");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("NOPE is not listed in portugal"));
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn symbol_is_looked_up_in_the_requested_country_only() {
        let client = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let adapter = adapter(Arc::clone(&client));
        let request = InstrumentRequest::new(
            Symbol::parse("BCP").expect("symbol"),
            Country::parse("spain").expect("country"),
        );

        let error = adapter.dividends(request).await.expect_err("unlisted country");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("country 'spain' is not listed"));
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Err(HttpError::new("connection reset"))]));
        let error = adapter(client).profile(bcp()).await.expect_err("transport failure");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn dividends_follow_more_history_pages() {
        let first = r#"
            <table id="dividendsHistoryData32244"><tbody>
              <tr event_timestamp="1700438400">
                <td data-value="1700438400">Nov 20, 2023</td>
                <td>0.0190</td>
                <td><span title="Annual"></span></td>
                <td data-value="1701043200">Nov 27, 2023</td>
                <td>7.12%</td>
              </tr>
            </tbody></table>
            <div id="showMoreDividendsHistory32244"><a>Show more</a></div>"#;
        let more = serde_json::json!({
            "historyRows": "<tr event_timestamp=\"1652659200\"><td data-value=\"1652659200\">May 16, 2022</td><td>0.0090</td><td><span title=\"Annual\"></span></td><td>--</td><td>-</td></tr>",
            "hasMoreHistory": false
        })
        .to_string();

        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok(first)),
            Ok(HttpResponse::ok(more)),
        ]));
        let history = adapter(Arc::clone(&client)).dividends(bcp()).await.expect("dividends");

        assert_eq!(history.records.len(), 2);
        assert_eq!(history.records[0].payment_date, Some(date!(2023 - 11 - 27)));
        assert_eq!(history.records[0].yield_pct, Some(7.12));
        assert_eq!(history.records[0].kind.as_deref(), Some("Annual"));
        assert_eq!(history.records[1].payment_date, None);
        assert_eq!(history.records[1].yield_pct, None);

        let requests = client.recorded_requests();
        assert_eq!(requests[1].url, "https://investing.test/equities/MoreDividendsHistory");
        assert_eq!(requests[1].form_value("last_timestamp").as_deref(), Some("1700438400"));
    }

    #[tokio::test]
    async fn overview_maps_link_tags_to_symbols() {
        let html = r#"
            <table id="cross_rate_markets_stocks_1"><tbody>
              <tr>
                <td class="flag"></td>
                <td><a href="/equities/banco-comercial-portugues" title="Banco Comercial Portugues">BCP</a></td>
                <td>0.2671</td><td>0.2702</td><td>0.2611</td>
                <td>+0.0041</td><td>+1.56%</td><td>45.12M</td><td>17:35:00</td>
              </tr>
              <tr>
                <td class="flag"></td>
                <td><a href="/equities/unlisted-co">Unlisted</a></td>
                <td>1.00</td><td>1.00</td><td>1.00</td>
                <td>0.00</td><td>0.00%</td><td>-</td><td>17:35:00</td>
              </tr>
            </tbody></table>"#;

        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok(html))]));
        let portugal = Country::parse("portugal").expect("country");
        let rows = adapter(Arc::clone(&client)).overview(&portugal).await.expect("overview");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Banco Comercial Portugues");
        assert_eq!(rows[0].symbol.as_ref().map(Symbol::as_str), Some("BCP"));
        assert_eq!(rows[0].change_pct, "+1.56%");
        assert_eq!(rows[1].symbol, None);
        assert_eq!(client.recorded_requests()[0].url, "https://investing.test/equities/portugal");
    }
}
