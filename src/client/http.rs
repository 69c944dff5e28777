//! ECS HTTP 请求方法
//!
//! 统一处理：发送请求、日志、状态码分类、错误信封解析。

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{EcsError, Result};
use crate::traits::{ErrorContext, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::error::map_api_error;
use super::types::ErrorEnvelope;
use super::{ECS_API_BASE, EcsClient};

impl EcsClient {
    /// 执行 GET 请求并解析 JSON 响应
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{ECS_API_BASE}{path}");
        let builder = self.client.get(&url);
        let body = self.execute(builder, "GET", path, context).await?;
        parse_json(&body)
    }

    /// 执行 POST 请求（ECS 的写操作响应体不被使用）
    pub(crate) async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<()> {
        let url = format!("{ECS_API_BASE}{path}");
        log_request_body(body);
        let builder = self.client.post(&url).json(body);
        self.execute(builder, "POST", path, context).await?;
        Ok(())
    }

    /// 执行 PUT 请求
    pub(crate) async fn put<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<()> {
        let url = format!("{ECS_API_BASE}{path}");
        log_request_body(body);
        let builder = self.client.put(&url).json(body);
        self.execute(builder, "PUT", path, context).await?;
        Ok(())
    }

    /// 发送请求，返回成功响应的 body 文本
    async fn execute(
        &self,
        builder: RequestBuilder,
        method: &str,
        path: &str,
        context: ErrorContext,
    ) -> Result<String> {
        log::debug!("{method} {path}");

        let response = builder
            .basic_auth(&self.api_user, Some(&self.api_key))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EcsError::Timeout {
                        detail: e.to_string(),
                    }
                } else {
                    EcsError::NetworkError {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        log::debug!("Response Status: {status}");

        // Retry-After 需在消费响应体之前读取
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(EcsError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Server error (HTTP {status})");
            return Err(EcsError::NetworkError {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let response_text = response.text().await.map_err(|e| EcsError::NetworkError {
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!("Response Body: {}", truncate_for_log(&response_text));

        if !(200..300).contains(&status) {
            let raw = extract_raw_error(status, &response_text);
            let err = map_api_error(status, raw, context);
            if err.is_expected() {
                log::warn!("ECS API error: {err}");
            } else {
                log::error!("ECS API error: {err}");
            }
            return Err(err);
        }

        Ok(response_text)
    }
}

/// 从 ECS 错误信封中提取错误码和消息；信封解析失败时退回原始文本
fn extract_raw_error(status: u16, response_text: &str) -> RawApiError {
    let envelope: ErrorEnvelope = serde_json::from_str(response_text).unwrap_or_default();
    match envelope.first() {
        Some((Some(code), message)) => RawApiError::with_code(code, message),
        Some((None, message)) => RawApiError::new(message),
        None => RawApiError::new(format!("HTTP {status}: {}", truncate_for_log(response_text))),
    }
}

/// 解析 JSON 响应
fn parse_json<T: DeserializeOwned>(response_text: &str) -> Result<T> {
    serde_json::from_str(response_text).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!("Raw response: {}", truncate_for_log(response_text));
        EcsError::ParseError {
            detail: e.to_string(),
        }
    })
}

/// Debug 日志输出请求体
fn log_request_body<B: Serialize>(body: &B) {
    if log::log_enabled!(log::Level::Debug) {
        let body_json = serde_json::to_string_pretty(body)
            .unwrap_or_else(|_| "<unserializable body>".to_string());
        log::debug!("Request Body: {body_json}");
    }
}
