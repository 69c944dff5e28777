//! ECS error mapping

use crate::error::EcsError;
use crate::traits::{ErrorContext, RawApiError};

/// Map an HTTP status plus the ECS error envelope contents to [`EcsError`].
///
/// ECS error codes (`APIERR-…`) vary by endpoint; the HTTP status is the
/// stable signal, so classification is keyed on it.
pub(crate) fn map_api_error(status: u16, raw: RawApiError, context: ErrorContext) -> EcsError {
    match status {
        // 认证失败（用户名/密钥错误、客户端证书被拒）
        401 | 403 => EcsError::InvalidCredentials {
            raw_message: Some(raw.message),
        },

        // 域名不存在
        404 => EcsError::DomainNotFound {
            domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
            raw_message: Some(raw.message),
        },

        // 请求参数错误
        400 | 422 => EcsError::InvalidParameter {
            param: "request".to_string(),
            detail: raw.message,
        },

        // 其它错误兜底
        _ => EcsError::Api {
            raw_code: raw.code,
            raw_message: raw.message,
        },
    }
}
