use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// CAS 登录相关错误
    #[error("登录错误: {0}")]
    Auth(#[from] AuthError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// CAS 登录错误
///
/// 网络失败与"账号密码错误"、"cookie 缺失"是不同的失败模式，调用方可以据此区分。
#[derive(Debug, Error)]
pub enum AuthError {
    /// 网络请求失败（不可达、非 2xx）
    #[error("CAS 请求失败 ({stage}): {source}")]
    Network {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// 登录页中没有 execution 隐藏字段
    #[error("登录页中未找到 execution 字段")]
    ExecutionFieldMissing,
    /// 登录响应中没有成功标记
    #[error("CAS 登录失败，请检查账号密码或站点是否改版")]
    LoginRejected,
    /// 门户页面未出现预期标记
    #[error("门户页面加载失败，会话未获授权")]
    PortalUnauthorized,
    /// cookie jar 中没有会话 cookie
    #[error("未找到会话 cookie: {name}")]
    CookieMissing { name: String },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): {status}")]
    BadStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    /// 响应体不是 JSON
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// JSON 既不是数组也不是对象
    #[error("API返回了意外的 JSON 结构 ({endpoint}): {found}")]
    UnexpectedShape { endpoint: String, found: String },
    /// 会话 cookie 无法放入请求头
    #[error("会话 cookie 含有非法字符")]
    InvalidToken,
    /// 字段投影失败
    #[error("字段解码失败 ({endpoint}): {source}")]
    DecodeFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化 / 反序列化失败
    #[error("JSON 序列化失败 ({path}): {source}")]
    SerializeFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建意外结构错误，`found` 只记录 JSON 类型名
    pub fn unexpected_shape(endpoint: impl Into<String>, value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        ApiError::UnexpectedShape {
            endpoint: endpoint.into(),
            found: found.to_string(),
        }
    }
}

impl FileError {
    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
