//! etcd v2 keys API client

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Certificate, Identity, StatusCode, Url};
use thiserror::Error;

use super::wire::{ERROR_KEY_NOT_FOUND, ErrorResponse, KeysResponse};
use super::{FetchError, KeyStore, Node};

/// Connect timeout used for every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// TCP keepalive interval. Kept short so idle connections are noticed quickly.
const KEEPALIVE: Duration = Duration::from_secs(1);
const MAX_IDLE_PER_HOST: usize = 500;

/// Connection settings for an etcd server.
#[derive(Debug, Clone, Default)]
pub struct EtcdConfig {
    /// Server URL, e.g. `https://127.0.0.1:2379`
    pub server: String,
    /// CA certificate (PEM) used to verify the server
    pub ca_cert: Option<PathBuf>,
    /// Client certificate (PEM)
    pub cert: Option<PathBuf>,
    /// Client certificate key (PKCS#8 PEM)
    pub key: Option<PathBuf>,
    /// Total timeout per request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl EtcdConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }
}

/// Errors raised while building a client, before any request is made.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid server url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("--cert and --key must be given together")]
    IncompleteIdentity,

    #[error("invalid TLS material: {0}")]
    Tls(#[source] reqwest::Error),
}

/// Blocking client for the etcd v2 keys API.
///
/// Each `fetch` issues one `GET /v2/keys/<key>`; directories come back with
/// their direct children listed, which is all the traversal needs.
#[derive(Debug, Clone)]
pub struct EtcdClient {
    http: Client,
    base: Url,
}

impl EtcdClient {
    pub fn new(config: &EtcdConfig) -> Result<Self, SetupError> {
        let base = Url::parse(config.server.trim_end_matches('/')).map_err(|e| {
            SetupError::InvalidUrl {
                url: config.server.clone(),
                message: e.to_string(),
            }
        })?;
        if base.cannot_be_a_base() {
            return Err(SetupError::InvalidUrl {
                url: config.server.clone(),
                message: "not a base url".to_string(),
            });
        }

        let mut builder = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .tcp_keepalive(KEEPALIVE)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .timeout(config.timeout);

        if let Some(ref ca) = config.ca_cert {
            let pem = read_file(ca)?;
            let cert = Certificate::from_pem(&pem).map_err(SetupError::Tls)?;
            builder = builder.add_root_certificate(cert);
        }

        match (&config.cert, &config.key) {
            (Some(cert), Some(key)) => {
                let cert_pem = read_file(cert)?;
                let key_pem = read_file(key)?;
                let identity =
                    Identity::from_pkcs8_pem(&cert_pem, &key_pem).map_err(SetupError::Tls)?;
                builder = builder.identity(identity);
            }
            (None, None) => {}
            _ => return Err(SetupError::IncompleteIdentity),
        }

        let http = builder.build().map_err(SetupError::Tls)?;
        tracing::debug!(server = %base, "created etcd client");
        Ok(Self { http, base })
    }

    /// Build the keys API URL for `key`.
    fn key_url(&self, key: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v2", "keys"]);
            segments.extend(key.trim_start_matches('/').split('/'));
        }
        url
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, SetupError> {
    fs::read(path).map_err(|source| SetupError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl KeyStore for EtcdClient {
    fn fetch(&self, key: &str) -> Result<Node, FetchError> {
        let url = self.key_url(key);
        tracing::trace!(%url, "GET");

        let transport = |source| FetchError::Transport {
            key: key.to_string(),
            source,
        };
        let response = self.http.get(url).send().map_err(transport)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;

        if !status.is_success() {
            return Err(classify_failure(key, status, &body));
        }

        let reply: KeysResponse = serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let mut node = reply.node.to_node();
        // etcd omits the key on the root node
        if reply.node.key.is_none() {
            node.key = key.to_string();
        }
        Ok(node)
    }
}

/// Map a non-success reply onto a `FetchError`.
fn classify_failure(key: &str, status: StatusCode, body: &str) -> FetchError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let not_found = status == StatusCode::NOT_FOUND
        || parsed
            .as_ref()
            .is_some_and(|e| e.error_code == ERROR_KEY_NOT_FOUND);
    if not_found {
        return FetchError::KeyNotFound {
            key: key.to_string(),
        };
    }

    let message = match parsed {
        Some(e) => match e.cause {
            Some(cause) if !cause.is_empty() => format!("{} ({})", e.message, cause),
            _ => e.message,
        },
        None => body.trim().to_string(),
    };
    FetchError::Status {
        key: key.to_string(),
        status: status.as_u16(),
        message,
    }
}
