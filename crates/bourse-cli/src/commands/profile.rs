use serde::Serialize;

use bourse_core::{render_markdown, Country, ProfileSection};
use tracing::debug;

use crate::cli::ProfileArgs;
use crate::error::CliError;

use super::{parse_symbols, CommandResult, Context};

#[derive(Debug, Serialize)]
struct ProfileResponseData {
    sections: Vec<ProfileSection>,
    markdown: String,
}

pub async fn run(args: &ProfileArgs, context: &Context) -> Result<CommandResult, CliError> {
    let country = Country::parse(&args.country)?;
    let symbols = parse_symbols(&args.symbols)?;

    let mut sections = Vec::with_capacity(symbols.len());
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for symbol in symbols {
        let profile = match context.fetcher.get_profile(&symbol, &country).await {
            Ok(profile) => profile,
            Err(error) => {
                errors.push(context.unavailable(&error));
                continue;
            }
        };

        // A missing summary only drops the results line.
        let summary = match context.fetcher.get_financial_summary(&symbol, &country).await {
            Ok(summary) => Some(summary),
            Err(error) => {
                debug!(%error, "profile without summary");
                warnings.push(error.to_string());
                None
            }
        };

        sections.push(ProfileSection {
            symbol,
            description: profile.description,
            summary,
        });
    }

    let markdown = render_markdown(&sections);
    let data = serde_json::to_value(ProfileResponseData { sections, markdown })?;
    Ok(CommandResult::ok(data)
        .with_warnings(warnings)
        .with_errors(errors))
}
