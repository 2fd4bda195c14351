/// CAS 单点登录客户端
///
/// 完成 CAS 登录握手，并从 cookie jar 中取出 PITCH 的会话 cookie
use crate::config::Config;
use crate::error::AuthError;
use crate::models::{Credentials, SessionToken};
use crate::utils::truncate_text;
use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// CAS 登录客户端
pub struct CasClient {
    login_url: String,
    portfolio_url: String,
    api_base_url: String,
    cookie_name: String,
    success_marker: String,
    portal_marker: String,
}

impl CasClient {
    /// 创建新的 CAS 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            login_url: config.cas_login_url.clone(),
            portfolio_url: config.portfolio_url.clone(),
            api_base_url: config.api_base_url.clone(),
            cookie_name: config.cookie_name.clone(),
            success_marker: config.login_success_marker.clone(),
            portal_marker: config.portal_marker.clone(),
        }
    }

    /// 登录并返回会话 token
    ///
    /// # 参数
    /// - `credentials`: 账号密码
    ///
    /// # 返回
    /// 返回 PITCH 会话 cookie 的值；每种失败都有对应的 `AuthError`
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(|source| AuthError::Network {
                stage: "client",
                source,
            })?;

        // 1. 获取登录页
        let login_page = get_text(&http, &self.login_url, "login page").await?;

        // 2. 提取 execution 字段
        let execution = extract_execution(&login_page).ok_or_else(|| {
            warn!("登录页中未找到 execution 字段");
            debug!("登录页内容: {}", truncate_text(&login_page, 200));
            AuthError::ExecutionFieldMissing
        })?;

        // 3. 提交表单
        let form = [
            ("username", credentials.login.as_str()),
            ("password", credentials.password.as_str()),
            ("execution", execution.as_str()),
            ("_eventId", "submit"),
            ("geolocation", ""),
        ];
        let login_result = http
            .post(&self.login_url)
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| network_error("login submit", source))?
            .text()
            .await
            .map_err(|source| network_error("login submit", source))?;

        // 4. 检查成功标记
        if !login_result.contains(&self.success_marker) {
            warn!("CAS 登录失败，请检查账号密码或站点是否改版");
            return Err(AuthError::LoginRejected);
        }
        info!("✓ CAS 登录成功");

        // 5. 加载门户页面确认授权
        let portal = get_text(&http, &self.portfolio_url, "portfolio").await?;
        if !portal.contains(&self.portal_marker) {
            warn!("门户页面加载失败");
            return Err(AuthError::PortalUnauthorized);
        }
        info!("✓ 门户页面加载成功");

        // 6. 取出会话 cookie
        let cookies = Url::parse(&self.api_base_url)
            .ok()
            .and_then(|url| jar.cookies(&url))
            .and_then(|header| header.to_str().ok().map(str::to_string));

        match cookies.and_then(|header| extract_cookie(&header, &self.cookie_name)) {
            Some(value) => Ok(SessionToken::new(value)),
            None => {
                warn!("未找到会话 cookie: {}", self.cookie_name);
                Err(AuthError::CookieMissing {
                    name: self.cookie_name.clone(),
                })
            }
        }
    }
}

async fn get_text(
    http: &reqwest::Client,
    url: &str,
    stage: &'static str,
) -> Result<String, AuthError> {
    debug!("GET {}", url);
    http.get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| network_error(stage, source))?
        .text()
        .await
        .map_err(|source| network_error(stage, source))
}

fn network_error(stage: &'static str, source: reqwest::Error) -> AuthError {
    error!("CAS 请求失败 ({}): {}", stage, source);
    AuthError::Network { stage, source }
}

/// 从登录页 HTML 中提取 execution 隐藏字段
pub fn extract_execution(html: &str) -> Option<String> {
    let re = Regex::new(r#"name="execution" value="([^"]+)""#).ok()?;
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// 从 `Cookie` 头（`a=1; b=2`）中取出指定名称的值
pub fn extract_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
