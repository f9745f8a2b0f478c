use serde::Serialize;

use bourse_core::{Country, FinancialSummary, Symbol};

use crate::cli::SummaryArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct SummaryResponseData {
    summary: Option<FinancialSummary>,
}

pub async fn run(args: &SummaryArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let symbol = Symbol::parse(&args.symbol)?;

    match context.fetcher.get_financial_summary(&symbol, &country).await {
        Ok(summary) => {
            let data = serde_json::to_value(SummaryResponseData {
                summary: Some(summary),
            })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => {
            let data = serde_json::to_value(SummaryResponseData { summary: None })?;
            Ok(CommandResult::ok(data).with_errors(vec![context.unavailable(&error)]))
        }
    }
}
