//! 结果写入服务 - 业务能力层
//!
//! 只负责"把结果文档写成 JSON 文件"，不关心抓取流程

use crate::error::{AppResult, FileError};
use crate::models::ResultDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// 结果写入服务
///
/// 输出文件为 `<output_dir>/<clean_username>.json`，UTF-8、4 空格缩进、
/// 非 ASCII 字符原样保留。直接覆盖旧文件，不做临时文件替换。
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// 创建新的写入服务
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 用户对应的输出路径
    pub fn path_for(&self, clean_username: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", clean_username))
    }

    /// 写入结果文档
    ///
    /// # 参数
    /// - `clean_username`: 清理后的用户名
    /// - `document`: 结果文档
    ///
    /// # 返回
    /// 返回写入的文件路径，任何 IO 错误都是整次运行的失败
    pub async fn write(&self, clean_username: &str, document: &ResultDocument) -> AppResult<PathBuf> {
        let path = self.path_for(clean_username);
        let bytes = to_pretty_json(document)
            .map_err(|source| FileError::SerializeFailed {
                path: path.display().to_string(),
                source,
            })?;

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FileError::write_failed(self.output_dir.display().to_string(), e))?;

        debug!("写入 {} 字节到 {}", bytes.len(), path.display());
        fs::write(&path, bytes)
            .await
            .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

        info!("✓ JSON 文件已保存: {}", path.display());
        Ok(path)
    }

    /// 读取已写入的结果文档
    pub async fn read(path: &Path) -> AppResult<ResultDocument> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| FileError::read_failed(path.display().to_string(), e))?;

        let document = serde_json::from_str(&content).map_err(|source| FileError::SerializeFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(document)
    }
}

/// 4 空格缩进的 JSON
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// 由登录名生成可用作文件名的用户标识
///
/// 去掉 `@` 及之后的部分，只保留 ASCII 字母数字和 `.`、`-`、`_`，其余字符替换为 `_`
pub fn sanitize_username(raw: &str) -> String {
    let local = raw.split('@').next().unwrap_or(raw).trim();
    let cleaned: String = local
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // 避免生成 "." / ".." 这类路径
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "user".to_string()
    } else {
        cleaned
    }
}
