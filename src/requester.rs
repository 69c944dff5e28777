//! Domain validation orchestration
//!
//! Sequential flow over a [`DomainApi`]: evaluate the current validation
//! state, issue an add/reverify request when needed, poll briefly for the
//! generated verification artifacts, and project the final state into a
//! flat [`ValidationOutcome`].

use std::time::Duration;

use crate::error::{EcsError, Result};
use crate::traits::DomainApi;
use crate::types::{
    DomainDetails, DomainRequestBody, DomainStatus, EmailMethod, EmailSource, ValidationOutcome,
    ValidationRequest, VerificationMethod,
};
use crate::utils::datetime::days_remaining;

/// Timing of the artifact poll loop.
///
/// ECS generates the DNS/file challenge values asynchronously, typically
/// within ~5 seconds but occasionally up to a minute. The defaults match
/// that behavior; tests shrink the delays to zero.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    /// Wait after issuing the request before the first fetch.
    pub initial_delay: Duration,
    /// Wait between poll attempts.
    pub settle_delay: Duration,
    /// Maximum number of re-fetches while waiting for artifacts.
    pub max_polls: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            settle_delay: Duration::from_secs(10),
            max_polls: 4,
        }
    }
}

/// Orchestrates one domain validation run against the ECS API.
pub struct DomainValidationRequester<A: DomainApi> {
    api: A,
    schedule: PollSchedule,
}

impl<A: DomainApi> DomainValidationRequester<A> {
    /// Build a requester with the default [`PollSchedule`].
    pub fn new(api: A) -> Self {
        Self::with_schedule(api, PollSchedule::default())
    }

    /// Build a requester with a custom [`PollSchedule`].
    pub fn with_schedule(api: A, schedule: PollSchedule) -> Self {
        Self { api, schedule }
    }

    /// Verify credentials with a no-op API call, returning the ECS
    /// application version.
    pub async fn preflight(&self) -> Result<String> {
        let version = self.api.get_app_version().await?;
        log::debug!("ECS application version: {version}");
        Ok(version)
    }

    /// Run the full check/request/poll/project sequence.
    ///
    /// # Errors
    ///
    /// Fails on invalid input (a `verification_email` paired with a
    /// non-email method) and on any API error while issuing the request or
    /// polling. API errors during the initial status check are swallowed and
    /// treated as "validation needed".
    pub async fn run(&self, request: &ValidationRequest) -> Result<ValidationOutcome> {
        validate_request(request)?;

        // 查询失败（含域名不存在）一律视为需要发起验证
        let current = match self
            .api
            .get_domain(request.client_id, &request.domain_name)
            .await
        {
            Ok(details) => Some(details),
            Err(e) => {
                log::debug!(
                    "Treating '{}' as unvalidated: {e}",
                    request.domain_name
                );
                None
            }
        };

        if let Some(details) = &current
            && is_satisfied(details, request.verification_method)
        {
            log::info!(
                "Domain '{}' already {} with method {}, nothing to do",
                request.domain_name,
                details.status,
                request.verification_method
            );
            return Ok(project(details, false));
        }

        self.issue_request(request, current.as_ref()).await?;

        let details = self.poll_artifacts(request, current.as_ref()).await?;
        Ok(project(&details, true))
    }

    /// Issue the add-domain or reverify call, depending on whether the
    /// domain is already known to ECS.
    async fn issue_request(
        &self,
        request: &ValidationRequest,
        current: Option<&DomainDetails>,
    ) -> Result<()> {
        let body = build_request_body(request, current.is_none());
        if current.is_none() {
            log::info!(
                "Adding domain '{}' with verification method {}",
                request.domain_name,
                request.verification_method
            );
            self.api.add_domain(request.client_id, &body).await
        } else {
            log::info!(
                "Requesting re-verification of '{}' with method {}",
                request.domain_name,
                request.verification_method
            );
            self.api
                .reverify_domain(request.client_id, &request.domain_name, &body)
                .await
        }
    }

    /// Fetch the domain until the generated artifact value differs from the
    /// pre-request one, or the poll budget runs out (not an error — the last
    /// fetched state wins).
    async fn poll_artifacts(
        &self,
        request: &ValidationRequest,
        before: Option<&DomainDetails>,
    ) -> Result<DomainDetails> {
        tokio::time::sleep(self.schedule.initial_delay).await;
        let mut details = self
            .api
            .get_domain(request.client_id, &request.domain_name)
            .await?;

        // 只有 dns / web_server 需要等待随机值生成
        if !matches!(
            request.verification_method,
            VerificationMethod::Dns | VerificationMethod::WebServer
        ) {
            return Ok(details);
        }

        let prior = before.and_then(|d| artifact_value(d, request.verification_method));
        for attempt in 0..self.schedule.max_polls {
            if artifact_changed(&details, request.verification_method, prior) {
                log::debug!(
                    "Verification artifact ready after {attempt} poll(s) for '{}'",
                    request.domain_name
                );
                break;
            }
            log::debug!(
                "Artifact not ready (attempt {}/{}), waiting {:?}",
                attempt + 1,
                self.schedule.max_polls,
                self.schedule.settle_delay
            );
            tokio::time::sleep(self.schedule.settle_delay).await;
            details = self
                .api
                .get_domain(request.client_id, &request.domain_name)
                .await?;
        }

        Ok(details)
    }
}

/// Reject inputs that would be invalid before any API call is made.
fn validate_request(request: &ValidationRequest) -> Result<()> {
    if request.verification_email.is_some()
        && request.verification_method != VerificationMethod::Email
    {
        return Err(EcsError::InvalidParameter {
            param: "verification_email".to_string(),
            detail: format!(
                "not allowed when verification_method=\"{}\"",
                request.verification_method
            ),
        });
    }
    Ok(())
}

/// Whether the current state already satisfies the request.
///
/// Satisfied iff the status is APPROVED or verification is in progress with
/// the same method as requested. EXPIRING counts as unsatisfied so that a
/// re-validation is kicked off before expiry.
fn is_satisfied(details: &DomainDetails, requested: VerificationMethod) -> bool {
    match details.status {
        DomainStatus::Approved => true,
        s if s.is_in_progress() => details.verification_method == Some(requested),
        _ => false,
    }
}

/// Build the add/reverify body for the requested method.
fn build_request_body(request: &ValidationRequest, new_domain: bool) -> DomainRequestBody {
    let mut body = DomainRequestBody::new(request.verification_method);

    if request.verification_method == VerificationMethod::Email {
        body.email_method = Some(match &request.verification_email {
            Some(email) => EmailMethod {
                email_source: EmailSource::Specified,
                email: Some(email.clone()),
            },
            None => EmailMethod {
                email_source: EmailSource::IncludeWhois,
                email: None,
            },
        });
    }

    // 只有新域名才带 domainName
    if new_domain {
        body.domain_name = Some(request.domain_name.clone());
    }

    body
}

/// The generated random value for the given method, if present.
fn artifact_value(details: &DomainDetails, method: VerificationMethod) -> Option<&str> {
    match method {
        VerificationMethod::Dns => details.dns_method.as_ref().map(|m| m.record_value.as_str()),
        VerificationMethod::WebServer => details
            .web_server_method
            .as_ref()
            .map(|m| m.file_contents.as_str()),
        _ => None,
    }
}

/// Whether a fresh artifact value is present and differs from the
/// pre-request one.
fn artifact_changed(
    details: &DomainDetails,
    method: VerificationMethod,
    prior: Option<&str>,
) -> bool {
    match artifact_value(details, method) {
        Some(value) => prior != Some(value),
        None => false,
    }
}

/// Flatten the final state into a [`ValidationOutcome`].
///
/// Day counts are present only when the corresponding expiry date is; the
/// artifact fields are populated only for the final verification method.
fn project(details: &DomainDetails, changed: bool) -> ValidationOutcome {
    let mut outcome = ValidationOutcome {
        changed,
        client_id: details.client_id,
        domain_status: Some(details.status),
        verification_method: details.verification_method,
        ov_eligible: details.ov_eligible,
        ov_days_remaining: details.ov_expiry.as_ref().map(days_remaining),
        ev_eligible: details.ev_eligible,
        ev_days_remaining: details.ev_expiry.as_ref().map(days_remaining),
        ..Default::default()
    };

    match details.verification_method {
        Some(VerificationMethod::Dns) => {
            if let Some(dns) = &details.dns_method {
                outcome.dns_location = Some(dns.record_domain.clone());
                outcome.dns_contents = Some(dns.record_value.clone());
                outcome.dns_resource_type = Some(dns.record_type.clone());
            }
        }
        Some(VerificationMethod::WebServer) => {
            if let Some(file) = &details.web_server_method {
                outcome.file_location = Some(file.file_location.clone());
                outcome.file_contents = Some(file.file_contents.clone());
            }
        }
        Some(VerificationMethod::Email) => {
            outcome.emails = details.email_method.clone();
        }
        _ => {}
    }

    outcome
}
