//! Runtime configuration resolved from flags, environment and `.env`.

use std::path::PathBuf;
use std::sync::Arc;

use bourse_core::{DataSource, InvestingAdapter, OfflineAdapter, StockDirectory};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::CliError;

/// Which data source to build and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub offline: bool,
    pub stocks_csv: Option<PathBuf>,
    pub base_url: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            offline: cli.offline,
            stocks_csv: cli.stocks_csv.clone(),
            base_url: cli.base_url.clone(),
        }
    }

    /// Builds the data source shared by the catalog and the fetcher.
    ///
    /// # Errors
    ///
    /// [`CliError::Config`] when the live source has no stock directory, and
    /// [`CliError::Directory`] when the directory file cannot be read.
    pub fn data_source(&self) -> Result<Arc<dyn DataSource>, CliError> {
        if self.offline {
            debug!("using offline data source");
            return Ok(Arc::new(OfflineAdapter::new()));
        }

        let path = self.stocks_csv.as_ref().ok_or_else(|| {
            CliError::Config(String::from(
                "no stock directory: pass --stocks-csv, set BOURSE_STOCKS_CSV, or use --offline",
            ))
        })?;

        let directory = StockDirectory::from_path(path)?;
        info!(
            path = %path.display(),
            countries = directory.countries().len(),
            base_url = %self.base_url,
            "loaded stock directory"
        );

        Ok(Arc::new(
            InvestingAdapter::new(directory).with_base_url(self.base_url.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bourse_core::ProviderId;

    use super::*;

    fn config(offline: bool, stocks_csv: Option<PathBuf>) -> Config {
        Config {
            offline,
            stocks_csv,
            base_url: String::from(InvestingAdapter::DEFAULT_BASE_URL),
        }
    }

    #[test]
    fn offline_flag_selects_offline_source() {
        let source = config(true, None).data_source().expect("offline source");
        assert_eq!(source.id(), ProviderId::Offline);
    }

    #[test]
    fn live_source_requires_a_directory() {
        let error = config(false, None).data_source().err().expect("missing directory");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn live_source_loads_directory_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "country,name,full_name,isin,currency,symbol,id,tag").expect("write");
        writeln!(file, "spain,Telefonica,Telefonica SA,ES0178430E18,EUR,TEF,26,telefonica")
            .expect("write");

        let source = config(false, Some(file.path().to_path_buf()))
            .data_source()
            .expect("live source");
        assert_eq!(source.id(), ProviderId::Investing);
    }

    #[test]
    fn unreadable_directory_is_an_io_failure() {
        let error = config(false, Some(PathBuf::from("/nonexistent/stocks.csv")))
            .data_source()
            .err()
            .expect("missing file");
        assert_eq!(error.exit_code(), 10);
    }
}
