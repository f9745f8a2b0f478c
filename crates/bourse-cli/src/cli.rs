//! CLI argument definitions for bourse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `countries` | List countries with listed stocks |
//! | `stocks` | List the stocks of a country |
//! | `history` | Daily OHLC history for one or more stocks |
//! | `chart` | Chart traces (line or candlestick) for one or more stocks |
//! | `profile` | Company profiles with their latest results |
//! | `summary` | Latest annual income-statement summary |
//! | `dividends` | Dividend history, newest payment first |
//! | `top` | Top 10 stocks of a country |
//!
//! # Global Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--format` | | `json` | Output format (json, table) |
//! | `--pretty` | | `false` | Pretty-print JSON output |
//! | `--offline` | | `false` | Use the built-in offline data set |
//! | `--stocks-csv` | `BOURSE_STOCKS_CSV` | | Stock directory CSV |
//! | `--base-url` | `BOURSE_BASE_URL` | `https://www.investing.com` | Upstream site |
//! | `--log-level` | `BOURSE_LOG` | `warn` | Log filter written to stderr |
//!
//! # Examples
//!
//! ```bash
//! bourse --offline stocks portugal
//! bourse history portugal BCP GALP --span 10Y --pretty
//! bourse chart spain TEF --from 2023-01-01 --to 2023-12-31 --kind candlestick
//! bourse top "united states" --sort gain --format table
//! ```

use std::path::PathBuf;

use bourse_core::{DateRange, HistorySpan, InvestingAdapter, ValidationError};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// World stock market monitor.
#[derive(Debug, Parser)]
#[command(
    name = "bourse",
    author,
    version,
    about = "World stock market monitor",
    long_about = "Browse the stocks of a country, their price history, company profiles, \
dividends and the country's top movers. Output is a JSON envelope by default.\n\
\n\
Use 'bourse <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve the built-in offline data set instead of scraping upstream.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Stock directory CSV used by the live source.
    #[arg(long, global = true, env = "BOURSE_STOCKS_CSV")]
    pub stocks_csv: Option<PathBuf>,

    /// Base URL of the upstream site.
    #[arg(long, global = true, env = "BOURSE_BASE_URL", default_value = InvestingAdapter::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter (`warn`, `debug`, `bourse_core=trace`, ...).
    #[arg(long, global = true, env = "BOURSE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable rendering for terminals.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List countries with listed stocks.
    Countries,
    /// List the stocks of a country as "Name, SYMBOL" options.
    Stocks(StocksArgs),
    /// Fetch daily OHLC history.
    History(HistoryArgs),
    /// Build chart traces from daily history.
    Chart(ChartArgs),
    /// Company profiles followed by their latest annual results.
    Profile(ProfileArgs),
    /// Latest annual income-statement summary.
    Summary(SummaryArgs),
    /// Dividend history sorted by payment date, newest first.
    Dividends(DividendsArgs),
    /// Top 10 stocks of a country.
    Top(TopArgs),
}

#[derive(Debug, Args)]
pub struct StocksArgs {
    /// Country name, case-insensitive.
    pub country: String,
}

/// Look-back window shared by `history` and `chart`.
#[derive(Debug, Clone, Args)]
pub struct SpanArgs {
    /// Trailing span such as 10Y or 6M (default 100Y).
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub span: Option<String>,

    /// First date (YYYY-MM-DD) of an explicit range.
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last date (YYYY-MM-DD) of an explicit range, inclusive.
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

impl SpanArgs {
    pub fn resolve(&self) -> Result<HistorySpan, ValidationError> {
        if let Some(range) = DateRange::from_bounds(self.from.as_deref(), self.to.as_deref())? {
            return Ok(HistorySpan::Range(range));
        }

        match &self.span {
            Some(span) => span.parse(),
            None => Ok(HistorySpan::DEFAULT),
        }
    }
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub country: String,

    /// One or more ticker symbols.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub span: SpanArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Closing prices of every stock joined on the first stock's dates.
    Line,
    /// One OHLC candlestick trace per stock.
    Candlestick,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    pub country: String,

    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub span: SpanArgs,

    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub kind: ChartKind,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    pub country: String,

    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    pub country: String,
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct DividendsArgs {
    pub country: String,
    pub symbol: String,

    /// Keep dividends paid on or after this date (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Keep dividends paid on or before this date (YYYY-MM-DD).
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    pub country: String,

    /// Ranking metric: turnover, gain or loss (or the full label, e.g.
    /// "Higher price increase").
    #[arg(long, default_value = "turnover")]
    pub sort: String,
}
