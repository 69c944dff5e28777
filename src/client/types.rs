//! ECS wire DTOs
//!
//! Shapes follow the ECS Enterprise v2 API; only the fields this crate reads
//! are modeled, everything else is ignored on deserialization.

use serde::Deserialize;

use crate::types::{DnsChallenge, DomainStatus, FileChallenge};

/// `GET /clients/{clientId}/domains/{domain}` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomainResponse {
    pub client_id: u32,
    pub verification_status: DomainStatus,
    /// Uppercase wire form (`"DNS"`, `"WEB_SERVER"`, …); absent for domains
    /// that never had a validation requested.
    #[serde(default)]
    pub verification_method: Option<String>,
    #[serde(default)]
    pub ov_eligible: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::datetime::deserialize")]
    pub ov_expiry: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub ev_eligible: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::datetime::deserialize")]
    pub ev_expiry: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub dns_method: Option<DnsMethodWire>,
    #[serde(default)]
    pub web_server_method: Option<WebServerMethodWire>,
    /// The addresses the validation emails were sent to.
    #[serde(default)]
    pub email_method: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DnsMethodWire {
    pub record_domain: String,
    pub record_type: String,
    pub record_value: String,
}

impl From<DnsMethodWire> for DnsChallenge {
    fn from(wire: DnsMethodWire) -> Self {
        Self {
            record_domain: wire.record_domain,
            record_type: wire.record_type,
            record_value: wire.record_value,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebServerMethodWire {
    pub file_location: String,
    pub file_contents: String,
}

impl From<WebServerMethodWire> for FileChallenge {
    fn from(wire: WebServerMethodWire) -> Self {
        Self {
            file_location: wire.file_location,
            file_contents: wire.file_contents,
        }
    }
}

/// `GET /application/version` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VersionResponse {
    #[serde(default)]
    pub version: String,
}

/// ECS error envelope, e.g.
/// `{"errors":[{"status":404,"code":"APIERR-1001","message":"..."}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// First error's code/message, if the body parsed as an envelope.
    pub fn first(&self) -> Option<(Option<String>, String)> {
        self.errors
            .first()
            .map(|e| (e.code.clone(), e.message.clone().unwrap_or_default()))
    }
}
