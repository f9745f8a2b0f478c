use serde::Serialize;

use bourse_core::{Country, EnvelopeError, HistorySeries, HistorySpan, Symbol};

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{parse_symbols, CommandResult, Context};

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    country: Country,
    span: String,
    series: Vec<HistorySeries>,
}

pub async fn run(args: &HistoryArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let symbols = parse_symbols(&args.symbols)?;
    let span = args.span.resolve()?;

    let (series, errors) = fetch_all(context, &country, &symbols, &span).await;

    let data = serde_json::to_value(HistoryResponseData {
        country,
        span: span.to_string(),
        series,
    })?;
    Ok(CommandResult::ok(data).with_errors(errors))
}

/// Fetches every symbol in order; failures become envelope errors and do
/// not stop the remaining symbols.
pub(super) async fn fetch_all(
    context: &Context,
    country: &Country,
    symbols: &[Symbol],
    span: &HistorySpan,
) -> (Vec<HistorySeries>, Vec<EnvelopeError>) {
    let mut series = Vec::with_capacity(symbols.len());
    let mut errors = Vec::new();

    for symbol in symbols {
        match context.fetcher.get_history(symbol, country, span).await {
            Ok(found) => series.push(found),
            Err(error) => errors.push(context.unavailable(&error)),
        }
    }

    (series, errors)
}
