use serde::{Deserialize, Serialize};

/// Unified error type for all ECS API operations.
///
/// Variants are serializable for structured error reporting. Most carry the
/// original ECS error message (when the API provided one) alongside the
/// classified context.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum EcsError {
    /// The client could not be configured (unreadable certificate files,
    /// invalid client identity, empty credential fields).
    ///
    /// Raised before any request is sent.
    SessionConfiguration {
        /// What went wrong during setup.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, HTTP 5xx from a gateway, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API user/key pair or client certificate was rejected.
    InvalidCredentials {
        /// Original error message from the ECS API, if available.
        raw_message: Option<String>,
    },

    /// The requested domain is not registered under the client.
    DomainNotFound {
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the ECS API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g., a verification email supplied
    /// for a non-email verification method).
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the ECS API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the ECS API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the ECS API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Api {
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl EcsError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::DomainNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for EcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionConfiguration { detail } => {
                write!(f, "Failed to initialize ECS client: {detail}")
            }
            Self::NetworkError { detail } => {
                write!(f, "Network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "Request timeout: {detail}")
            }
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::DomainNotFound {
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "Domain '{domain}' not found")
                }
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::RateLimited {
                retry_after,
                raw_message: _,
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::ParseError { detail } => {
                write!(f, "Parse error: {detail}")
            }
            Self::SerializationError { detail } => {
                write!(f, "Serialization error: {detail}")
            }
            Self::Api {
                raw_code,
                raw_message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "ECS API error {code}: {raw_message}")
                } else {
                    write!(f, "ECS API error: {raw_message}")
                }
            }
        }
    }
}

impl std::error::Error for EcsError {}

/// Convenience type alias for `Result<T, EcsError>`.
pub type Result<T> = std::result::Result<T, EcsError>;
