//! # ECS Domain Validation
//!
//! Async client for domain validation through the Entrust Certificate
//! Services (ECS) Enterprise v2 REST API.
//!
//! The crate covers the full validation workflow: check the domain's current
//! state, register it or request re-verification when needed, wait for ECS to
//! generate the verification challenge, and return a flat summary of the
//! result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ecs_domain_validation::{
//!     DomainValidationRequester, EcsCredentials, ValidationRequest, VerificationMethod,
//!     create_client,
//! };
//!
//! # async fn run() -> ecs_domain_validation::Result<()> {
//! let credentials = EcsCredentials {
//!     api_user: "user".to_string(),
//!     api_key: "key".to_string(),
//!     client_cert_path: "/etc/ecs/client.crt".to_string(),
//!     client_cert_key_path: "/etc/ecs/client.key".to_string(),
//! };
//!
//! let api = create_client(&credentials)?;
//! let requester = DomainValidationRequester::new(api);
//!
//! let request = ValidationRequest::new("example.com", VerificationMethod::Dns);
//! let outcome = requester.run(&request).await?;
//!
//! if let Some(value) = &outcome.dns_contents {
//!     println!("publish TXT record: {value}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## TLS backend
//!
//! ECS requires a client certificate on every connection. The `native-tls`
//! feature (default) loads it via the platform TLS stack; enable `rustls`
//! instead for a pure-Rust build.

mod client;
mod error;
mod factory;
mod requester;
mod traits;
mod types;
mod utils;

pub use client::EcsClient;
pub use error::{EcsError, Result};
pub use factory::create_client;
pub use requester::{DomainValidationRequester, PollSchedule};
pub use traits::DomainApi;
pub use types::{
    CredentialValidationError, DEFAULT_CLIENT_ID, DnsChallenge, DomainDetails, DomainRequestBody,
    DomainStatus, EcsCredentials, EmailMethod, EmailSource, FileChallenge, ValidationOutcome,
    ValidationRequest, VerificationMethod,
};
