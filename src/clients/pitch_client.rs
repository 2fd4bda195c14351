/// PITCH API 客户端
///
/// 只负责"带会话 cookie 发一次 GET 并解析 JSON"，不做投影和计数
use crate::config::Config;
use crate::error::ApiError;
use crate::models::SessionToken;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, COOKIE};
use serde_json::Value;
use tracing::debug;

/// JSON 获取能力
///
/// 上层服务只依赖这个 trait，测试中可以替换为内存实现
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, ApiError>;
}

/// PITCH API 客户端
pub struct PitchClient {
    http: reqwest::Client,
    cookie: HeaderValue,
}

impl PitchClient {
    /// 创建新的 PITCH 客户端
    ///
    /// 会话 cookie 作为唯一的 Cookie 头随每个请求发送
    pub fn new(config: &Config, token: &SessionToken) -> Result<Self, ApiError> {
        let cookie = HeaderValue::from_str(&format!("{}={}", config.cookie_name, token.as_str()))
            .map_err(|_| ApiError::InvalidToken)?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::request_failed(config.api_base_url.clone(), e))?;

        Ok(Self { http, cookie })
    }
}

#[async_trait]
impl JsonFetcher for PitchClient {
    async fn fetch_json(&self, url: &str) -> Result<Value, ApiError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(COOKIE, self.cookie.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(url, e))?;

        serde_json::from_str(&body).map_err(|source| ApiError::JsonParseFailed {
            endpoint: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_format() {
        let client =
            PitchClient::new(&Config::default(), &SessionToken::new("0123ABCD")).unwrap();
        assert_eq!(
            client.cookie.to_str().unwrap(),
            ".DotNetCasClientAuth=0123ABCD"
        );
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let result = PitchClient::new(&Config::default(), &SessionToken::new("bad\nvalue"));
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }
}
