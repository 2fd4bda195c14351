use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    // --- CAS 登录配置 ---
    /// CAS 登录页（GET 取 execution，POST 提交表单）
    pub cas_login_url: String,
    /// 登录后用于确认授权的门户页面
    pub portfolio_url: String,
    /// CAS 登录成功时响应中出现的文字
    pub login_success_marker: String,
    /// 门户页面中出现的文字
    pub portal_marker: String,
    /// 会话 cookie 名称
    pub cookie_name: String,
    // --- PITCH API 配置 ---
    pub api_base_url: String,
    pub program_code: String,
    pub version_code: String,
    pub culture: String,
    // --- 运行配置 ---
    /// 同时进行的 API 请求数量上限（所有层级共享）
    pub max_concurrent_requests: usize,
    /// 进度记录中的 total 值
    pub progress_total: u32,
    /// 输出 JSON 文件所在目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 周期性打印进度的间隔（秒），0 表示关闭
    pub progress_log_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cas_login_url: "https://cas.icam.fr/cas/login".to_string(),
            portfolio_url: "https://pitch-icam.rima1.fr/EN-GB/MyCursus/Home".to_string(),
            login_success_marker: "Connexion réussie".to_string(),
            portal_marker: "PITCH".to_string(),
            cookie_name: ".DotNetCasClientAuth".to_string(),
            api_base_url: "https://pitch-icam.rima1.fr".to_string(),
            program_code: "BI".to_string(),
            version_code: "2022".to_string(),
            culture: "EN-GB".to_string(),
            max_concurrent_requests: 5,
            progress_total: 97,
            output_dir: "data".to_string(),
            verbose_logging: false,
            progress_log_interval_secs: 0,
        }
    }
}

impl Config {
    /// 默认配置叠加环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// 加载配置：默认值 ← TOML 文件（可选）← 环境变量
    ///
    /// 不做校验，调用方叠加命令行参数之后再调用 `validate`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.apply_env()
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::TomlParseFailed { source, .. } => ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: String::new(),
            source,
        })
    }

    /// 用 `ACADEM_*` 环境变量覆盖已有配置
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            cas_login_url: env_string("ACADEM_CAS_LOGIN_URL").unwrap_or(self.cas_login_url),
            portfolio_url: env_string("ACADEM_PORTFOLIO_URL").unwrap_or(self.portfolio_url),
            login_success_marker: env_string("ACADEM_LOGIN_SUCCESS_MARKER")
                .unwrap_or(self.login_success_marker),
            portal_marker: env_string("ACADEM_PORTAL_MARKER").unwrap_or(self.portal_marker),
            cookie_name: env_string("ACADEM_COOKIE_NAME").unwrap_or(self.cookie_name),
            api_base_url: env_string("ACADEM_API_BASE_URL").unwrap_or(self.api_base_url),
            program_code: env_string("ACADEM_PROGRAM_CODE").unwrap_or(self.program_code),
            version_code: env_string("ACADEM_VERSION_CODE").unwrap_or(self.version_code),
            culture: env_string("ACADEM_CULTURE").unwrap_or(self.culture),
            max_concurrent_requests: env_parse("ACADEM_MAX_CONCURRENT_REQUESTS", "usize")?
                .unwrap_or(self.max_concurrent_requests),
            progress_total: env_parse("ACADEM_PROGRESS_TOTAL", "u32")?
                .unwrap_or(self.progress_total),
            output_dir: env_string("ACADEM_OUTPUT_DIR").unwrap_or(self.output_dir),
            verbose_logging: env_parse("ACADEM_VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            progress_log_interval_secs: env_parse("ACADEM_PROGRESS_LOG_INTERVAL_SECS", "u64")?
                .unwrap_or(self.progress_log_interval_secs),
        })
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_requests".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }

        for (field, value) in [
            ("cas_login_url", &self.cas_login_url),
            ("portfolio_url", &self.portfolio_url),
            ("api_base_url", &self.api_base_url),
            ("cookie_name", &self.cookie_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "不能为空".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        None => Ok(None),
    }
}
