use serde::Serialize;

use bourse_core::{Country, SortMetric, TopRanking};

use crate::cli::TopArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct TopResponseData {
    ranking: Option<TopRanking>,
}

pub async fn run(args: &TopArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let metric = args.sort.parse::<SortMetric>()?;

    match context.fetcher.get_top_ranking(&country, metric).await {
        Ok(ranking) => {
            let data = serde_json::to_value(TopResponseData {
                ranking: Some(ranking),
            })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => {
            let data = serde_json::to_value(TopResponseData { ranking: None })?;
            Ok(CommandResult::ok(data).with_errors(vec![context.unavailable(&error)]))
        }
    }
}
