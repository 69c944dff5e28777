//! `DomainApi` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{DomainApi, ErrorContext};
use crate::types::{DomainDetails, DomainRequestBody, VerificationMethod};

use super::EcsClient;
use super::types::{DomainResponse, VersionResponse};

impl EcsClient {
    /// 将 ECS 响应转换为 `DomainDetails`
    pub(crate) fn response_to_details(resp: DomainResponse) -> DomainDetails {
        let verification_method = resp.verification_method.as_deref().and_then(|s| {
            let parsed = VerificationMethod::from_api_str(s);
            if parsed.is_none() {
                log::warn!("Unrecognized verification method '{s}', ignoring");
            }
            parsed
        });

        DomainDetails {
            client_id: resp.client_id,
            status: resp.verification_status,
            verification_method,
            ov_eligible: resp.ov_eligible,
            ov_expiry: resp.ov_expiry,
            ev_eligible: resp.ev_eligible,
            ev_expiry: resp.ev_expiry,
            dns_method: resp.dns_method.map(Into::into),
            web_server_method: resp.web_server_method.map(Into::into),
            email_method: resp.email_method,
        }
    }
}

#[async_trait]
impl DomainApi for EcsClient {
    async fn get_app_version(&self) -> Result<String> {
        let resp: VersionResponse = self
            .get("/application/version", ErrorContext::default())
            .await?;
        Ok(resp.version)
    }

    async fn get_domain(&self, client_id: u32, domain: &str) -> Result<DomainDetails> {
        let path = format!(
            "/clients/{client_id}/domains/{}",
            urlencoding::encode(domain)
        );
        let resp: DomainResponse = self.get(&path, ErrorContext::for_domain(domain)).await?;
        Ok(Self::response_to_details(resp))
    }

    async fn add_domain(&self, client_id: u32, body: &DomainRequestBody) -> Result<()> {
        let path = format!("/clients/{client_id}/domains");
        let context = body
            .domain_name
            .as_deref()
            .map_or_else(ErrorContext::default, ErrorContext::for_domain);
        self.post(&path, body, context).await
    }

    async fn reverify_domain(
        &self,
        client_id: u32,
        domain: &str,
        body: &DomainRequestBody,
    ) -> Result<()> {
        let path = format!(
            "/clients/{client_id}/domains/{}/reverify",
            urlencoding::encode(domain)
        );
        self.put(&path, body, ErrorContext::for_domain(domain)).await
    }
}
