// src/client/api_client.rs

use reqwest::{Client, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::client::error::{ApiError, Result};
use crate::client::http::{HttpMethod, HttpRequest, HttpStatus};
use crate::config::sdk_config::SdkConfig;
use crate::decision::request::DecisionRequest;
use crate::decision::response::{ApiResponseBody, DecisionResponse};

pub const DECISION_PATH: &str = "/v1/decision";

/// 一次请求的结果：状态码 + 解析后的信封 + 原始响应体
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: ApiResponseBody<T>,
    pub raw_body: Option<String>,
}

/// 决策服务客户端
///
/// 每次调用只发一次请求，不重试、不排队、不缓存；超时后按网络错误返回。
#[derive(Debug, Clone)]
pub struct AdMoaiClient {
    client: Client,
    base_url: String,
    api_version: Option<String>,
    default_language: Option<String>,
    debug_responses: bool,
}

impl AdMoaiClient {
    pub fn new(config: &SdkConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ApiError::NetworkError)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            default_language: config.default_language.clone(),
            debug_responses: config.debug_responses,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 把决策请求编码成 HTTP 请求描述，不发送
    pub fn create_decision_request(&self, request: &DecisionRequest) -> Result<HttpRequest> {
        request.check_encodable().map_err(ApiError::EncodingError)?;
        let body = serde_json::to_vec(request).map_err(|e| ApiError::EncodingError(e.to_string()))?;

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(language) = &self.default_language {
            headers.insert("Accept-Language".to_string(), language.clone());
        }
        if let Some(version) = &self.api_version {
            headers.insert("X-Decision-Version".to_string(), version.clone());
        }

        Ok(HttpRequest {
            path: DECISION_PATH.to_string(),
            method: HttpMethod::Post,
            headers,
            body: Some(body),
        })
    }

    pub async fn request_decision(
        &self,
        request: &DecisionRequest,
    ) -> Result<ApiResponse<DecisionResponse>> {
        let http_request = self.create_decision_request(request)?;
        info!(
            placements = request.placements().len(),
            "Sending decision request"
        );
        self.send(http_request).await
    }

    /// 发送请求并按状态码映射结果
    pub async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<ApiResponse<T>> {
        let raw_url = format!("{}{}", self.base_url, request.path);
        let url = match Url::parse(&raw_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                error!(url = %raw_url, "Invalid URL");
                return Err(ApiError::InvalidUrl(raw_url));
            }
        };

        let mut builder = self.client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Network error");
            ApiError::NetworkError(e)
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, "Network error while reading body");
            ApiError::NetworkError(e)
        })?;
        debug!(status, elapsed_ms = start.elapsed().as_millis() as u64, "Decision response received");

        if self.debug_responses {
            map_debug_status(status, &bytes)
        } else {
            map_status(status, &bytes)
        }
    }

    /// 发送追踪请求，不等待结果，失败只记日志
    ///
    /// 必须在 tokio 运行时中调用，否则直接丢弃。
    pub fn fire_tracking(&self, url: &str) {
        let parsed = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
            _ => {
                error!(url, "Invalid tracking URL");
                return;
            }
        };
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(url, "No async runtime available, tracking dropped");
                return;
            }
        };
        let client = self.client.clone();
        handle.spawn(async move {
            match client.get(parsed.clone()).send().await {
                Ok(resp) => debug!(url = %parsed, status = resp.status().as_u16(), "Tracking fired"),
                Err(e) => debug!(url = %parsed, error = %e, "Tracking request failed"),
            }
        });
    }
}

fn decode_envelope<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<ApiResponse<T>> {
    // 空响应体同样按解码失败处理
    let value = serde_json::from_slice::<Value>(bytes).map_err(|e| {
        error!(status, error = %e, "Decoding error");
        ApiError::DecodingError(e)
    })?;
    if !value.is_object() {
        error!(status, "Response body is not an envelope object");
        return Err(ApiError::InvalidResponse);
    }
    let body = serde_json::from_value::<ApiResponseBody<T>>(value).map_err(|e| {
        error!(status, error = %e, "Decoding error");
        ApiError::DecodingError(e)
    })?;
    if body.has_warnings() {
        warn!(warnings = body.warnings().len(), "Decision response carries warnings");
    }
    Ok(ApiResponse {
        status,
        body,
        raw_body: String::from_utf8(bytes.to_vec()).ok(),
    })
}

/// 生产模式的状态码映射
fn map_status<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<ApiResponse<T>> {
    match status {
        200 => decode_envelope(status, bytes),
        422 => {
            let errors = serde_json::from_slice::<ApiResponseBody<IgnoredAny>>(bytes)
                .map(|body| body.errors.unwrap_or_default())
                .unwrap_or_else(|e| {
                    error!(error = %e, "Validation error decoding failed");
                    Vec::new()
                });
            let error = ApiError::ValidationError(errors);
            error!("{}", error);
            Err(error)
        }
        400 | 404 | 405 | 410 | 429 => {
            let http_status = HttpStatus::try_from(status).map_err(|_| ApiError::UnexpectedStatusCode(status))?;
            error!(status, "Client error: {}", http_status.description());
            Err(ApiError::ClientError(http_status))
        }
        500..=599 => {
            error!(status, "Server error");
            Err(ApiError::ServerError(status))
        }
        _ => {
            error!(status, "Unexpected status code");
            Err(ApiError::UnexpectedStatusCode(status))
        }
    }
}

/// 调试模式：2xx~4xx 的响应体都按信封返回
fn map_debug_status<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<ApiResponse<T>> {
    match status {
        200..=499 => decode_envelope(status, bytes),
        500..=599 => {
            error!(status, "Server error");
            Err(ApiError::ServerError(status))
        }
        _ => {
            error!(status, "Unexpected status code");
            Err(ApiError::UnexpectedStatusCode(status))
        }
    }
}
