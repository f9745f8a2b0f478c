use serde::Serialize;

use bourse_core::Country;

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct CountriesResponseData<'a> {
    countries: &'a [Country],
}

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    match context.catalog.list_countries().await {
        Ok(countries) => {
            let data = serde_json::to_value(CountriesResponseData { countries })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => {
            let data = serde_json::to_value(CountriesResponseData { countries: &[] })?;
            Ok(CommandResult::ok(data).with_errors(vec![context.unavailable(&error)]))
        }
    }
}
