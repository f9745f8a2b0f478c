use serde::Serialize;

use bourse_core::{Country, DateRange, DividendHistory, Symbol};

use crate::cli::DividendsArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct DividendsResponseData {
    dividends: Option<DividendHistory>,
}

pub async fn run(args: &DividendsArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let symbol = Symbol::parse(&args.symbol)?;
    let paid_within = DateRange::from_bounds(args.from.as_deref(), args.to.as_deref())?;

    let history = match context.fetcher.get_dividends(&symbol, &country).await {
        Ok(history) => history,
        Err(error) => {
            let data = serde_json::to_value(DividendsResponseData { dividends: None })?;
            return Ok(CommandResult::ok(data).with_errors(vec![context.unavailable(&error)]));
        }
    };

    let mut warnings = Vec::new();
    let history = match paid_within {
        Some(range) => {
            let filtered = history.paid_within(range);
            if filtered.is_empty() {
                warnings.push(format!("no dividends of {symbol} paid within {range}"));
            }
            filtered
        }
        None => history,
    };

    let data = serde_json::to_value(DividendsResponseData {
        dividends: Some(history.sorted_by_payment_date()),
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
