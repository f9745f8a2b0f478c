mod chart;
mod countries;
mod dividends;
mod history;
mod profile;
mod stocks;
mod summary;
mod top;

use std::sync::Arc;

use bourse_core::{
    Catalog, DataSource, DataUnavailable, Envelope, EnvelopeError, MarketDataFetcher,
    ProviderId, Symbol, ValidationError,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::CliError;
use crate::metadata::Metadata;

/// Catalog and fetcher sharing one data source.
pub struct Context {
    pub catalog: Catalog,
    pub fetcher: MarketDataFetcher,
    source: ProviderId,
}

impl Context {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source: source.id(),
            catalog: Catalog::new(Arc::clone(&source)),
            fetcher: MarketDataFetcher::new(source),
        }
    }

    pub fn source_id(&self) -> ProviderId {
        self.source
    }

    /// Envelope error for a failed fetch, tagged with the source.
    pub fn unavailable(&self, error: &DataUnavailable) -> EnvelopeError {
        EnvelopeError::from(error).with_source(self.source)
    }
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let source = Config::from_cli(cli).data_source()?;
    run_with_source(cli, source).await
}

pub async fn run_with_source(
    cli: &Cli,
    source: Arc<dyn DataSource>,
) -> Result<Envelope<Value>, CliError> {
    let context = Context::new(source);
    let metadata = Metadata::start(context.source_id());

    let command_result = match &cli.command {
        Command::Countries => countries::run(&context).await?,
        Command::Stocks(args) => stocks::run(args, &context).await?,
        Command::History(args) => history::run(args, &context).await?,
        Command::Chart(args) => chart::run(args, &context).await?,
        Command::Profile(args) => profile::run(args, &context).await?,
        Command::Summary(args) => summary::run(args, &context).await?,
        Command::Dividends(args) => dividends::run(args, &context).await?,
        Command::Top(args) => top::run(args, &context).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let meta = metadata.into_envelope_meta(warnings)?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>, ValidationError> {
    raw.iter().map(|symbol| Symbol::parse(symbol)).collect()
}
