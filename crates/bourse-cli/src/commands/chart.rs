use serde::Serialize;

use bourse_core::{CandlestickTrace, CloseTable, Country, LineTrace};

use crate::cli::{ChartArgs, ChartKind};
use crate::error::CliError;

use super::history::fetch_all;
use super::{parse_symbols, CommandResult, Context};

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ChartResponseData {
    Line {
        table: CloseTable,
        traces: Vec<LineTrace>,
    },
    Candlestick {
        traces: Vec<CandlestickTrace>,
    },
}

pub async fn run(args: &ChartArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let symbols = parse_symbols(&args.symbols)?;
    let span = args.span.resolve()?;

    let (series, errors) = fetch_all(context, &country, &symbols, &span).await;

    let chart = match args.kind {
        ChartKind::Line => {
            let table = CloseTable::left_join(&series);
            let traces = table.traces();
            ChartResponseData::Line { table, traces }
        }
        ChartKind::Candlestick => ChartResponseData::Candlestick {
            traces: series.iter().map(CandlestickTrace::from_series).collect(),
        },
    };

    let result = CommandResult::ok(serde_json::to_value(chart)?).with_errors(errors);
    if series.is_empty() {
        return Ok(result.with_warning("no history to chart"));
    }
    Ok(result)
}
