use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::scope::DEFAULT_SCOPE;

pub const DEFAULT_ENV_FILE: &str = ".env";

/// Everything a run needs, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cert_file: PathBuf,
    pub cert_pass: String,
    pub account_number: String,
    pub kb_accountsapi_sandbox: bool,
    pub kb_access_token: String,
    pub account_id: String,
    pub debug: bool,
    pub app_debug: bool,
    pub result_file: Option<String>,
    pub report_scope: String,
    pub kb_api_key: Option<String>,
    pub kb_accountsapi_url: Option<String>,
}

impl Settings {
    /// Reads `env_file` and overlays the process environment on top of it.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut vars = read_env_file(env_file)?;
        vars.extend(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );

        Self::from_vars(vars)
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        Ok(Config::builder()
            .set_default("debug", false)?
            .set_default("app_debug", false)?
            .set_default("report_scope", DEFAULT_SCOPE)?
            .add_source(Environment::default().ignore_empty(true).source(Some(vars)))
            .build()?
            .try_deserialize()?)
    }
}

/// Key/value pairs of a dotenv file. A missing file yields nothing.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let env_error = |source| Error::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HashMap::new())
        }
        Err(e) => return Err(env_error(e)),
    };

    iter.map(|item| item.map_err(env_error)).collect()
}
