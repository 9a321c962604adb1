//! Client for the Komerční banka Accounts API.
//!
//! Only the read endpoints needed for reporting are covered: the account
//! list, account balances and paginated account transactions.

pub mod datetime;
pub mod model;

use std::path::Path;

use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, AUTHORIZATION};
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub use model::*;

pub const PRODUCTION_URL: &str = "https://api-gateway.kb.cz/adaa/v2";
pub const SANDBOX_URL: &str = "https://api-gateway.kb.cz/sandbox/adaa/v2";

/// Name reported as the data source of everything fetched through
/// [`KbClient`].
pub const SOURCE: &str = "kb_accounts_api::KbClient";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to read client certificate {path}: {source}")]
    Certificate {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("tls setup failed: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),
    #[error("upstream responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The HTTP status of the upstream response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error happened while configuring the client rather than
    /// while talking to the API.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            ClientError::BaseUrl(_) | ClientError::Certificate { .. } | ClientError::Tls(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
        }
    }
}

/// A PKCS#12 client identity presented during the TLS handshake.
pub struct Identity(native_tls::Identity);

impl Identity {
    pub fn from_pkcs12_file<P: AsRef<Path>>(path: P, password: &str) -> Result<Self> {
        let der = std::fs::read(path.as_ref()).map_err(|source| ClientError::Certificate {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        Ok(Identity(native_tls::Identity::from_pkcs12(&der, password)?))
    }
}

pub struct Builder {
    env: Environment,
    base_url: Option<String>,
    identity: Option<Identity>,
    api_key: Option<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            env: Environment::Sandbox,
            base_url: None,
            identity: None,
            api_key: None,
        }
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Overrides the base url implied by the environment.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<KbClient> {
        let base_url = Url::parse(
            self.base_url
                .as_deref()
                .unwrap_or_else(|| self.env.base_url()),
        )?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidArgument(format!(
                "{} cannot be used as a base url",
                base_url
            )));
        }

        let mut tls = native_tls::TlsConnector::builder();
        if let Some(Identity(identity)) = self.identity {
            tls.identity(identity);
        }

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        let https = HttpsConnector::from((http, tokio_native_tls::TlsConnector::from(tls.build()?)));

        Ok(KbClient {
            http: Client::builder().build(https),
            base_url,
            api_key: self.api_key,
        })
    }
}

pub struct KbClient {
    http: Client<HttpsConnector<HttpConnector>>,
    base_url: Url,
    api_key: Option<String>,
}

impl KbClient {
    pub async fn accounts(&self, token: &str) -> Result<Vec<Account>> {
        let url = self.endpoint(&["accounts"], None)?;
        self.get(token, url).await
    }

    pub async fn balances(&self, token: &str, account_id: &str) -> Result<Vec<Balance>> {
        let url = self.endpoint(&["accounts", account_id, "balances"], None)?;
        self.get(token, url).await
    }

    pub async fn transactions(
        &self,
        token: &str,
        selection: &TransactionSelection,
    ) -> Result<TransactionPage> {
        let url = self.endpoint(
            &["accounts", &selection.account_id, "transactions"],
            Some(&selection.query()?),
        )?;
        self.get(token, url).await
    }

    pub fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidArgument("base url cannot have a path".into()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);

        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, token: &str, url: Url) -> Result<T> {
        let correlation_id = ulid::Ulid::new().to_string();
        debug!(%url, %correlation_id, "GET");

        let mut req = Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .header("x-correlation-id", correlation_id);
        if let Some(key) = &self.api_key {
            req = req.header("apiKey", key.as_str());
        }

        let res = self.http.request(req.body(Body::empty())?).await?;
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
