//! HTTP 传输层 - 基础设施层
//!
//! 持有唯一的 `reqwest::Client`（带 Cookie 会话），只暴露"发请求"的能力

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::api::endpoints::CSRF_TOKEN;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, AuthError, ConfigError};
use crate::infrastructure::csrf::{CsrfStore, CsrfToken, CSRF_FORM_PARAM};
use crate::models::ErrorResponse;

/// 请求体
///
/// 以可重建的形式保存，CSRF 令牌过期重试时需要重新构造请求
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(JsonValue),
    Multipart(Vec<PartSpec>),
    /// application/x-www-form-urlencoded
    Form(Vec<(String, String)>),
}

/// multipart 的一个部分
#[derive(Debug, Clone)]
pub enum PartSpec {
    Json {
        name: String,
        value: JsonValue,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl Payload {
    fn apply(&self, request: RequestBuilder, csrf: Option<&CsrfToken>) -> AppResult<RequestBuilder> {
        Ok(match self {
            Payload::Empty => request,
            Payload::Json(value) => request.json(value),
            Payload::Form(fields) => {
                let mut fields = fields.clone();
                if let Some(token) = csrf {
                    fields.push((CSRF_FORM_PARAM.to_string(), token.token.clone()));
                }
                request.form(&fields)
            }
            Payload::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        PartSpec::Json { name, value } => {
                            let body = serde_json::to_string(value)?;
                            let part = reqwest::multipart::Part::text(body)
                                .mime_str("application/json")
                                .map_err(|e| AppError::api_request_failed(name.as_str(), e))?;
                            form.part(name.clone(), part)
                        }
                        PartSpec::File {
                            name,
                            file_name,
                            mime,
                            bytes,
                        } => {
                            let part = reqwest::multipart::Part::bytes(bytes.clone())
                                .file_name(file_name.clone())
                                .mime_str(mime)
                                .map_err(|e| AppError::api_request_failed(name.as_str(), e))?;
                            form.part(name.clone(), part)
                        }
                    };
                }
                request.multipart(form)
            }
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Json(_) => "json",
            Payload::Multipart(_) => "multipart",
            Payload::Form(_) => "form",
        }
    }
}

/// HTTP 传输层
///
/// 职责：
/// - 持有唯一的 Client 和会话 Cookie
/// - 为 POST / PUT / DELETE 附加 CSRF 令牌，403 时刷新令牌重试一次
/// - 把非 2xx 响应转换为 `AppError`
/// - 不认识菜谱，不处理页面流程
#[derive(Debug)]
pub struct ApiTransport {
    client: reqwest::Client,
    base_url: Url,
    csrf: CsrfStore,
}

impl ApiTransport {
    /// 创建新的传输层
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|_| {
            AppError::Config(ConfigError::InvalidBaseUrl {
                value: config.base_url.clone(),
            })
        })?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(config.base_url.as_str(), e))?;

        Ok(Self {
            client,
            base_url,
            csrf: CsrfStore::new(config.csrf_enabled),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf(&self) -> &CsrfStore {
        &self.csrf
    }

    /// 拼接完整地址，查询参数允许重复键
    pub fn url(&self, path: &str, query: &[(String, String)]) -> AppResult<Url> {
        let prefix = self.base_url.as_str().trim_end_matches('/');
        let raw = format!("{}{}", prefix, path);
        let mut url = Url::parse(&raw).map_err(|_| ApiError::InvalidUrl { url: raw.clone() })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// 获取 CSRF 令牌（优先使用缓存）
    ///
    /// 未启用 CSRF 时返回 `None`
    pub async fn csrf_token(&self) -> AppResult<Option<CsrfToken>> {
        if !self.csrf.enabled() {
            return Ok(None);
        }
        if let Some(token) = self.csrf.cached().await {
            return Ok(Some(token));
        }

        let url = self.url(CSRF_TOKEN, &[])?;
        debug!("获取 CSRF 令牌: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::CsrfUnavailable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::CsrfUnavailable {
                reason: format!("status={}", response.status().as_u16()),
            }
            .into());
        }

        let token: CsrfToken = response.json().await.map_err(|e| AuthError::CsrfUnavailable {
            reason: e.to_string(),
        })?;
        debug!("CSRF 令牌已缓存 (header: {})", token.header_name);
        self.csrf.store(token.clone()).await;

        Ok(Some(token))
    }

    /// 作废并重新获取 CSRF 令牌（登录后会话变化时调用）
    pub async fn refresh_csrf(&self) -> AppResult<Option<CsrfToken>> {
        self.csrf.invalidate().await;
        self.csrf_token().await
    }

    /// 发送请求，成功（2xx）时返回响应
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        payload: &Payload,
    ) -> AppResult<Response> {
        let mutating = !matches!(method, Method::GET | Method::HEAD);
        let mut retried = false;

        loop {
            let url = self.url(path, query)?;
            let token = if mutating {
                self.csrf_token().await?
            } else {
                None
            };

            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(token) = &token {
                request = request.header(token.header_name.as_str(), token.token.as_str());
            }
            let request = payload.apply(request, token.as_ref())?;

            debug!("{} {} (body: {})", method, url, payload.kind());

            let response = request
                .send()
                .await
                .map_err(|e| AppError::api_request_failed(path, e))?;
            let status = response.status();

            if status == StatusCode::FORBIDDEN && token.is_some() && !retried {
                warn!("{} {} 返回 403，刷新 CSRF 令牌后重试", method, path);
                self.csrf.invalidate().await;
                retried = true;
                continue;
            }

            if status.is_success() || status.is_redirection() {
                return Ok(response);
            }

            return Err(error_from_response(path, response).await);
        }
    }

    /// GET 并解析 JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> AppResult<T> {
        let response = self.execute(Method::GET, path, query, &Payload::Empty).await?;
        decode_json(path, response).await
    }

    /// 发送请求并解析 JSON 响应
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> AppResult<T> {
        let response = self.execute(method, path, &[], payload).await?;
        decode_json(path, response).await
    }

    /// 发送请求，响应为纯文本提示
    pub async fn send_text(&self, method: Method, path: &str, payload: &Payload) -> AppResult<String> {
        let response = self.execute(method, path, &[], payload).await?;
        response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))
    }
}

async fn decode_json<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| AppError::api_request_failed(path, e))?;
    let value = serde_json::from_str(&body)?;
    Ok(value)
}

/// 非 2xx 响应 → `AppError`
///
/// 响应体是 `ErrorResponse` 时优先使用其中的 message / errors
async fn error_from_response(path: &str, response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: Option<ErrorResponse> = serde_json::from_str(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.message.clone())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()));

    warn!(
        "{} 返回错误: status={}, message={:?}",
        path,
        status.as_u16(),
        message
    );

    match status {
        StatusCode::NOT_FOUND => AppError::Api(ApiError::NotFound {
            endpoint: path.to_string(),
            message: message.unwrap_or_else(|| "リソースが見つかりません".to_string()),
        }),
        StatusCode::BAD_REQUEST if parsed.as_ref().is_some_and(ErrorResponse::has_field_errors) => {
            let errors = parsed.and_then(|r| r.errors).unwrap_or_default();
            AppError::validation(message, errors)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(AuthError::Forbidden {
            endpoint: path.to_string(),
            status: status.as_u16(),
        }),
        _ => AppError::Api(ApiError::BadResponse {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        }),
    }
}
