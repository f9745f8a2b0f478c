use serde::Serialize;

use bourse_core::StockOption;

use crate::cli::StocksArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct StocksResponseData<'a> {
    country: &'a str,
    stocks: Vec<StockOption>,
}

pub async fn run(args: &StocksArgs, context: &Context) -> Result<CommandResult, CliError> {
    let stocks = context.catalog.list_stocks(&args.country).await;
    let placeholder = stocks.iter().all(StockOption::is_placeholder);

    let data = serde_json::to_value(StocksResponseData {
        country: args.country.trim(),
        stocks,
    })?;

    let result = CommandResult::ok(data);
    if placeholder {
        return Ok(result.with_warning(format!("no stocks available for '{}'", args.country.trim())));
    }
    Ok(result)
}
