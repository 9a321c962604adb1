use std::path::PathBuf;

use kb_accounts_api::ClientError;
use thiserror::Error;

/// Exit code for API failures that carry no upstream status.
pub const API_FAILURE: i32 = 400;
/// Exit code for any failure that is not an API error.
pub const GENERIC_FAILURE: i32 = 500;
/// Exit code for a run that wrote nothing without failing.
pub const NOTHING_WRITTEN: i32 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("API Error: {0}")]
    Api(#[source] ClientError),
    #[error("failed to set up the API client: {0}")]
    ClientSetup(#[source] ClientError),
    #[error("Unknown scope: {0}")]
    InvalidScope(String),
    #[error("Unknown balance type: {0}")]
    UnknownBalanceType(String),
    #[error("Account not found, ID: {0}")]
    AccountNotFound(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to read environment file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        if err.is_setup() {
            Error::ClientSetup(err)
        } else {
            Error::Api(err)
        }
    }
}

impl Error {
    /// API errors exit with the upstream HTTP status, everything else with
    /// [`GENERIC_FAILURE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(err) => err.status().map(i32::from).unwrap_or(API_FAILURE),
            _ => GENERIC_FAILURE,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
