//! Settings file loading.
//!
//! The settings file is a JSON object holding the table configuration keys
//! (`serverSide`, `pageSizes`, `pageSize`, ...) plus an optional `logLevel`.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use tableview_lib::TableConfig;

use crate::error::CliError;
use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,

    #[serde(flatten)]
    pub table: TableConfig,
}

impl Settings {
    /// Loads settings from `explicit`, or from the default location if that
    /// file exists. A missing default file yields the defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::read(path).await,
            None => match paths::settings_file() {
                Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => {
                    Self::read(&path).await
                }
                _ => Ok(Self::default()),
            },
        }
    }

    async fn read(path: &Path) -> Result<Self, CliError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log level: `-v` flags win over the settings file; the default is `warn`.
    pub fn log_level(&self, verbose: u8) -> Result<LevelFilter, CliError> {
        match (verbose, &self.log_level) {
            (0, Some(level)) => {
                LevelFilter::from_str(level).map_err(|_| CliError::LogLevel(level.clone()))
            }
            (0, None) => Ok(LevelFilter::Warn),
            (1, _) => Ok(LevelFilter::Info),
            (2, _) => Ok(LevelFilter::Debug),
            _ => Ok(LevelFilter::Trace),
        }
    }
}
