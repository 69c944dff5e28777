use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DomainDetails, DomainRequestBody};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（ECS 的 `APIERR-…` 代码）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 域名（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
        }
    }
}

/// The ECS domain validation API surface.
///
/// [`EcsClient`](crate::EcsClient) is the production implementation;
/// validation flows depend on this trait so they can run against a mock.
#[async_trait]
pub trait DomainApi: Send + Sync + std::fmt::Debug {
    /// Fetch the ECS application version.
    ///
    /// A cheap no-op call, used as a credential preflight.
    async fn get_app_version(&self) -> Result<String>;

    /// Fetch a domain's validation state.
    async fn get_domain(&self, client_id: u32, domain: &str) -> Result<DomainDetails>;

    /// Register a new domain and request its validation.
    async fn add_domain(&self, client_id: u32, body: &DomainRequestBody) -> Result<()>;

    /// Request re-validation of a known domain.
    async fn reverify_domain(
        &self,
        client_id: u32,
        domain: &str,
        body: &DomainRequestBody,
    ) -> Result<()>;
}

#[async_trait]
impl<T: DomainApi + ?Sized> DomainApi for Arc<T> {
    async fn get_app_version(&self) -> Result<String> {
        (**self).get_app_version().await
    }

    async fn get_domain(&self, client_id: u32, domain: &str) -> Result<DomainDetails> {
        (**self).get_domain(client_id, domain).await
    }

    async fn add_domain(&self, client_id: u32, body: &DomainRequestBody) -> Result<()> {
        (**self).add_domain(client_id, body).await
    }

    async fn reverify_domain(
        &self,
        client_id: u32,
        domain: &str,
        body: &DomainRequestBody,
    ) -> Result<()> {
        (**self).reverify_domain(client_id, domain, body).await
    }
}
