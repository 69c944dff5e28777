use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ Verification Method ============

/// How control of a domain is proven to ECS.
///
/// Serialized in the user-facing lowercase form (`"dns"`, `"email"`,
/// `"manual"`, `"web_server"`). The ECS wire form is uppercase; use
/// [`as_api_str()`](Self::as_api_str) when building request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Publish a TXT record at a location chosen by ECS.
    Dns,
    /// Respond to a verification email sent to the domain contact.
    Email,
    /// Manual review by Entrust staff. Not recommended.
    Manual,
    /// Serve a file with ECS-chosen contents from the web server.
    WebServer,
}

impl VerificationMethod {
    /// The uppercase wire form expected by the ECS API (`"WEB_SERVER"` etc.).
    pub fn as_api_str(self) -> &'static str {
        match self {
            Self::Dns => "DNS",
            Self::Email => "EMAIL",
            Self::Manual => "MANUAL",
            Self::WebServer => "WEB_SERVER",
        }
    }

    /// Parse the wire form, case-insensitively.
    pub(crate) fn from_api_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DNS" => Some(Self::Dns),
            "EMAIL" => Some(Self::Email),
            "MANUAL" => Some(Self::Manual),
            "WEB_SERVER" => Some(Self::WebServer),
            _ => None,
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dns => write!(f, "dns"),
            Self::Email => write!(f, "email"),
            Self::Manual => write!(f, "manual"),
            Self::WebServer => write!(f, "web_server"),
        }
    }
}

// ============ Domain Status ============

/// Validation status of a domain as reported by ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    /// Domain is validated and usable for certificate requests.
    Approved,
    /// Validation was declined.
    Declined,
    /// Validation was cancelled.
    Cancelled,
    /// First validation is in progress.
    InitialVerification,
    /// Re-validation is in progress.
    ReVerification,
    /// Validation has expired.
    Expired,
    /// Validation is approaching expiry.
    Expiring,
}

impl DomainStatus {
    /// Whether a validation request is currently being processed.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::InitialVerification | Self::ReVerification)
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
            Self::Cancelled => "CANCELLED",
            Self::InitialVerification => "INITIAL_VERIFICATION",
            Self::ReVerification => "RE_VERIFICATION",
            Self::Expired => "EXPIRED",
            Self::Expiring => "EXPIRING",
        };
        write!(f, "{s}")
    }
}

// ============ Verification Artifacts ============

/// DNS challenge generated by ECS for `dns` verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsChallenge {
    /// Where the record must be published (e.g. `_pki-validation.example.com`).
    pub record_domain: String,
    /// Resource record type, normally `TXT`.
    pub record_type: String,
    /// The random value ECS expects to find in the record.
    pub record_value: String,
}

/// File challenge generated by ECS for `web_server` verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChallenge {
    /// URL ECS will fetch (e.g. `http://example.com/.well-known/pki-validation/abcd.txt`).
    pub file_location: String,
    /// Exact contents ECS expects at that URL.
    pub file_contents: String,
}

// ============ Domain Details ============

/// A domain's validation state as fetched from ECS.
///
/// At most one of `dns_method` / `web_server_method` / `email_method` is
/// populated, matching `verification_method`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetails {
    /// Client the domain is registered under.
    pub client_id: u32,
    /// Current validation status.
    pub status: DomainStatus,
    /// Verification method currently configured, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<VerificationMethod>,
    /// Whether the domain is eligible for OV certificate submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ov_eligible: Option<bool>,
    /// When OV eligibility expires.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub ov_expiry: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether the domain is eligible for EV certificate submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_eligible: Option<bool>,
    /// When EV eligibility expires.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub ev_expiry: Option<chrono::DateTime<chrono::Utc>>,
    /// DNS challenge, populated when the method is `dns`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_method: Option<DnsChallenge>,
    /// File challenge, populated when the method is `web_server`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_server_method: Option<FileChallenge>,
    /// Addresses the validation emails were sent to, when the method is `email`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_method: Option<Vec<String>>,
}

// ============ Request Body Types ============

/// Source of the address for email verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailSource {
    /// Use the explicitly supplied address.
    Specified,
    /// Let ECS pick the first address from the domain's WHOIS data.
    IncludeWhois,
}

/// Email verification parameters within a [`DomainRequestBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMethod {
    /// Where the validation address comes from.
    pub email_source: EmailSource,
    /// The address, required when `email_source` is [`EmailSource::Specified`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body for ECS add-domain and reverify-domain calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRequestBody {
    /// Requested verification method in wire form (uppercase).
    pub verification_method: String,
    /// Email parameters, only for the `email` method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_method: Option<EmailMethod>,
    /// Domain name, only present when adding a new domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
}

impl DomainRequestBody {
    /// Start a body for the given method; artifacts are added by the requester.
    pub fn new(method: VerificationMethod) -> Self {
        Self {
            verification_method: method.as_api_str().to_string(),
            email_method: None,
            domain_name: None,
        }
    }
}

// ============ Validation Request / Outcome ============

/// Default client ID used when none is specified.
pub const DEFAULT_CLIENT_ID: u32 = 1;

/// Input parameters for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Client the domain should be associated with.
    pub client_id: u32,
    /// Domain to validate or re-validate.
    pub domain_name: String,
    /// Verification method to request.
    pub verification_method: VerificationMethod,
    /// Address for email verification. Only valid with
    /// [`VerificationMethod::Email`]; when absent, ECS falls back to WHOIS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_email: Option<String>,
}

impl ValidationRequest {
    /// Build a request for the primary client ([`DEFAULT_CLIENT_ID`]).
    pub fn new(domain_name: impl Into<String>, method: VerificationMethod) -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID,
            domain_name: domain_name.into(),
            verification_method: method,
            verification_email: None,
        }
    }
}

/// Flat projection of the final domain state after a validation run.
///
/// Optional fields are omitted from serialized output when they don't apply:
/// day counts are absent without the corresponding expiry date, and only the
/// artifact fields matching `verification_method` are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether a new validation request was issued during this run.
    pub changed: bool,
    /// Client the domain belongs to.
    pub client_id: u32,
    /// Final validation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_status: Option<DomainStatus>,
    /// Verification method of the final state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<VerificationMethod>,
    /// OV eligibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ov_eligible: Option<bool>,
    /// Days until OV eligibility expires. Absent without an OV expiry date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ov_days_remaining: Option<i64>,
    /// EV eligibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_eligible: Option<bool>,
    /// Days until EV eligibility expires. Absent without an EV expiry date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_days_remaining: Option<i64>,
    /// DNS record location (`dns` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_location: Option<String>,
    /// DNS record value (`dns` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_contents: Option<String>,
    /// DNS resource record type (`dns` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_resource_type: Option<String>,
    /// Verification file URL (`web_server` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_location: Option<String>,
    /// Verification file contents (`web_server` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_contents: Option<String>,
    /// Addresses the validation emails were sent to (`email` method only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
}

// ============ Credentials ============

/// Validation error for ECS credentials.
///
/// Returned before any client is constructed, when credential fields are
/// missing or empty.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    #[error("Missing required field: {label}")]
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    #[error("Field must not be empty: {label}")]
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
}

/// Credentials for the ECS API.
///
/// ECS authenticates every call with HTTP basic auth (API user + key) over a
/// mutually-authenticated TLS connection, so a client certificate and its
/// private key (PEM files) are required as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcsCredentials {
    /// ECS API username.
    pub api_user: String,
    /// ECS API key.
    pub api_key: String,
    /// Path to the client certificate PEM file.
    pub client_cert_path: String,
    /// Path to the client certificate private key PEM file.
    pub client_cert_key_path: String,
}

impl EcsCredentials {
    const FIELDS: [(&'static str, &'static str); 4] = [
        ("apiUser", "API User"),
        ("apiKey", "API Key"),
        ("clientCertPath", "Client Certificate Path"),
        ("clientCertKeyPath", "Client Certificate Key Path"),
    ];

    /// Construct credentials from a flat `HashMap`, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty.
    pub fn from_map(
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            api_user: Self::get_required_field(map, "apiUser", "API User")?,
            api_key: Self::get_required_field(map, "apiKey", "API Key")?,
            client_cert_path: Self::get_required_field(
                map,
                "clientCertPath",
                "Client Certificate Path",
            )?,
            client_cert_key_path: Self::get_required_field(
                map,
                "clientCertKeyPath",
                "Client Certificate Key Path",
            )?,
        })
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> std::collections::HashMap<String, String> {
        [
            ("apiUser".to_string(), self.api_user.clone()),
            ("apiKey".to_string(), self.api_key.clone()),
            ("clientCertPath".to_string(), self.client_cert_path.clone()),
            (
                "clientCertKeyPath".to_string(),
                self.client_cert_key_path.clone(),
            ),
        ]
        .into()
    }

    /// Check that no field is empty. Constructed-by-hand credentials go
    /// through this before a client is built.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        let values = [
            &self.api_user,
            &self.api_key,
            &self.client_cert_path,
            &self.client_cert_key_path,
        ];
        for ((field, label), value) in Self::FIELDS.iter().zip(values) {
            if value.trim().is_empty() {
                return Err(CredentialValidationError::EmptyField {
                    field: (*field).to_string(),
                    label: (*label).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Obtain required fields from `HashMap` and verify that it is not empty
    fn get_required_field(
        map: &std::collections::HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ============ VerificationMethod ============

    #[test]
    fn method_serializes_lowercase() {
        let json = serde_json::to_string(&VerificationMethod::WebServer).unwrap();
        assert_eq!(json, "\"web_server\"");
    }

    #[test]
    fn method_deserializes_lowercase() {
        let m: VerificationMethod = serde_json::from_str("\"dns\"").unwrap();
        assert_eq!(m, VerificationMethod::Dns);
    }

    #[test]
    fn method_api_str_uppercase() {
        assert_eq!(VerificationMethod::Dns.as_api_str(), "DNS");
        assert_eq!(VerificationMethod::WebServer.as_api_str(), "WEB_SERVER");
        assert_eq!(VerificationMethod::Email.as_api_str(), "EMAIL");
        assert_eq!(VerificationMethod::Manual.as_api_str(), "MANUAL");
    }

    #[test]
    fn method_from_api_str_case_insensitive() {
        assert_eq!(
            VerificationMethod::from_api_str("WEB_SERVER"),
            Some(VerificationMethod::WebServer)
        );
        assert_eq!(
            VerificationMethod::from_api_str("dns"),
            Some(VerificationMethod::Dns)
        );
        assert_eq!(VerificationMethod::from_api_str("CARRIER_PIGEON"), None);
    }

    #[test]
    fn method_display_matches_input_form() {
        assert_eq!(VerificationMethod::WebServer.to_string(), "web_server");
        assert_eq!(VerificationMethod::Dns.to_string(), "dns");
    }

    // ============ DomainStatus ============

    #[test]
    fn status_deserializes_wire_form() {
        let s: DomainStatus = serde_json::from_str("\"INITIAL_VERIFICATION\"").unwrap();
        assert_eq!(s, DomainStatus::InitialVerification);
    }

    #[test]
    fn status_serializes_wire_form() {
        let json = serde_json::to_string(&DomainStatus::ReVerification).unwrap();
        assert_eq!(json, "\"RE_VERIFICATION\"");
    }

    #[test]
    fn status_in_progress() {
        assert!(DomainStatus::InitialVerification.is_in_progress());
        assert!(DomainStatus::ReVerification.is_in_progress());
        assert!(!DomainStatus::Approved.is_in_progress());
        assert!(!DomainStatus::Expiring.is_in_progress());
    }

    // ============ DomainRequestBody ============

    #[test]
    fn request_body_skips_absent_fields() {
        let body = DomainRequestBody::new(VerificationMethod::Dns);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, "{\"verificationMethod\":\"DNS\"}");
    }

    #[test]
    fn request_body_email_specified() {
        let mut body = DomainRequestBody::new(VerificationMethod::Email);
        body.email_method = Some(EmailMethod {
            email_source: EmailSource::Specified,
            email: Some("admin@example.com".to_string()),
        });
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"emailSource\":\"SPECIFIED\""));
        assert!(json.contains("\"email\":\"admin@example.com\""));
    }

    #[test]
    fn request_body_email_whois() {
        let mut body = DomainRequestBody::new(VerificationMethod::Email);
        body.email_method = Some(EmailMethod {
            email_source: EmailSource::IncludeWhois,
            email: None,
        });
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"emailSource\":\"INCLUDE_WHOIS\""));
        assert!(!json.contains("\"email\":"));
    }

    #[test]
    fn request_body_with_domain_name() {
        let mut body = DomainRequestBody::new(VerificationMethod::WebServer);
        body.domain_name = Some("example.com".to_string());
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"domainName\":\"example.com\""));
        assert!(json.contains("\"verificationMethod\":\"WEB_SERVER\""));
    }

    // ============ ValidationOutcome serialization ============

    #[test]
    fn outcome_omits_none_fields() {
        let outcome = ValidationOutcome {
            changed: false,
            client_id: 1,
            domain_status: Some(DomainStatus::Approved),
            ..Default::default()
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"domain_status\":\"APPROVED\""));
        assert!(!json.contains("dns_location"));
        assert!(!json.contains("file_location"));
        assert!(!json.contains("emails"));
        assert!(!json.contains("ov_days_remaining"));
    }

    // ============ EcsCredentials ============

    fn full_map() -> HashMap<String, String> {
        [
            ("apiUser".to_string(), "user".to_string()),
            ("apiKey".to_string(), "key".to_string()),
            ("clientCertPath".to_string(), "/etc/ecs/client.crt".to_string()),
            (
                "clientCertKeyPath".to_string(),
                "/etc/ecs/client.key".to_string(),
            ),
        ]
        .into()
    }

    #[test]
    fn credentials_roundtrip() {
        let creds = EcsCredentials::from_map(&full_map()).unwrap();
        assert_eq!(creds.api_user, "user");
        let back = creds.to_map();
        assert_eq!(back, full_map());
    }

    #[test]
    fn credentials_missing_field() {
        let mut map = full_map();
        map.remove("apiKey");
        let res = EcsCredentials::from_map(&map);
        assert!(
            matches!(&res, Err(CredentialValidationError::MissingField { field, .. }) if field == "apiKey"),
            "unexpected result: {res:?}"
        );
    }

    #[test]
    fn credentials_empty_field() {
        let mut map = full_map();
        map.insert("clientCertPath".to_string(), "   ".to_string());
        let res = EcsCredentials::from_map(&map);
        assert!(
            matches!(&res, Err(CredentialValidationError::EmptyField { field, .. }) if field == "clientCertPath"),
            "unexpected result: {res:?}"
        );
    }

    #[test]
    fn credentials_validate_rejects_empty() {
        let creds = EcsCredentials {
            api_user: "user".to_string(),
            api_key: String::new(),
            client_cert_path: "/a".to_string(),
            client_cert_key_path: "/b".to_string(),
        };
        let res = creds.validate();
        assert!(
            matches!(&res, Err(CredentialValidationError::EmptyField { field, .. }) if field == "apiKey"),
            "unexpected result: {res:?}"
        );
    }

    #[test]
    fn credentials_validate_accepts_complete() {
        let creds = EcsCredentials::from_map(&full_map()).unwrap();
        assert!(creds.validate().is_ok());
    }

    // ============ DomainDetails serde ============

    #[test]
    fn domain_details_wire_roundtrip() {
        let json = r#"{
            "clientId": 2,
            "status": "APPROVED",
            "verificationMethod": "dns",
            "ovEligible": true,
            "ovExpiry": "2026-12-01T00:00:00Z",
            "dnsMethod": {
                "recordDomain": "_pki-validation.example.com",
                "recordType": "TXT",
                "recordValue": "AB23CD41432522FF2526920393982FAB"
            }
        }"#;
        let details: DomainDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.client_id, 2);
        assert_eq!(details.status, DomainStatus::Approved);
        assert_eq!(details.verification_method, Some(VerificationMethod::Dns));
        assert!(details.ov_expiry.is_some());
        assert!(details.ev_expiry.is_none());
        let challenge = details.dns_method.as_ref().unwrap();
        assert_eq!(challenge.record_type, "TXT");

        let back = serde_json::to_string(&details).unwrap();
        assert!(back.contains("\"recordValue\":\"AB23CD41432522FF2526920393982FAB\""));
        assert!(!back.contains("webServerMethod"));
    }
}
