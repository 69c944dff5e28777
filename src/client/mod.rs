//! Entrust Certificate Services (ECS) REST client

mod api;
mod error;
mod http;
mod types;

use std::time::Duration;

use reqwest::{Client, Identity};

use crate::error::{EcsError, Result};
use crate::types::EcsCredentials;

#[cfg(not(any(feature = "native-tls", feature = "rustls")))]
compile_error!("either the `native-tls` or the `rustls` feature must be enabled");

pub(crate) const ECS_API_BASE: &str = "https://api.entrust.net/enterprise/v2";

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// ECS REST API client.
///
/// Every request is sent with HTTP basic auth over a mutually-authenticated
/// TLS connection; the client certificate identity is loaded once at
/// construction from the PEM paths in [`EcsCredentials`].
pub struct EcsClient {
    pub(crate) client: Client,
    pub(crate) api_user: String,
    pub(crate) api_key: String,
}

impl std::fmt::Debug for EcsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // api_key is a credential; keep it out of debug output
        f.debug_struct("EcsClient")
            .field("api_user", &self.api_user)
            .finish_non_exhaustive()
    }
}

impl EcsClient {
    /// Build a client from credentials.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SessionConfiguration`] when a credential field is
    /// empty, a PEM file cannot be read, or the client identity is invalid.
    pub fn new(credentials: &EcsCredentials) -> Result<Self> {
        credentials
            .validate()
            .map_err(|e| EcsError::SessionConfiguration {
                detail: e.to_string(),
            })?;

        let cert_pem = read_pem(&credentials.client_cert_path, "client certificate")?;
        let key_pem = read_pem(&credentials.client_cert_key_path, "client certificate key")?;
        let identity = load_identity(&cert_pem, &key_pem)?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .identity(identity)
            .build()
            .map_err(|e| EcsError::SessionConfiguration {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_user: credentials.api_user.clone(),
            api_key: credentials.api_key.clone(),
        })
    }
}

fn read_pem(path: &str, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| EcsError::SessionConfiguration {
        detail: format!("Failed to read {what} '{path}': {e}"),
    })
}

#[cfg(feature = "native-tls")]
fn load_identity(cert_pem: &[u8], key_pem: &[u8]) -> Result<Identity> {
    Identity::from_pkcs8_pem(cert_pem, key_pem).map_err(|e| EcsError::SessionConfiguration {
        detail: format!("Invalid client certificate identity: {e}"),
    })
}

#[cfg(all(feature = "rustls", not(feature = "native-tls")))]
fn load_identity(cert_pem: &[u8], key_pem: &[u8]) -> Result<Identity> {
    // rustls 需要证书与私钥在同一个 PEM bundle 中
    let mut bundle = Vec::with_capacity(cert_pem.len() + key_pem.len() + 1);
    bundle.extend_from_slice(cert_pem);
    bundle.push(b'\n');
    bundle.extend_from_slice(key_pem);
    Identity::from_pem(&bundle).map_err(|e| EcsError::SessionConfiguration {
        detail: format!("Invalid client certificate identity: {e}"),
    })
}
