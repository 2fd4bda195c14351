//! 学业进度数据结构
//!
//! 每个结构只保留列出的字段，服务端返回的其它字段在反序列化时被丢弃。
//! 叶子字段保存为 `Value`，服务端给什么类型就写回什么类型（`50` 不会变成 `50.0`）。
//! 序列化后的字段名与 PITCH API 一致，输出文件因此可以直接被原有的展示端读取。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 技能块（顶层课程领域）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBlock {
    #[serde(rename = "Code", default)]
    pub code: Value,
    #[serde(rename = "PctMinAcq", default)]
    pub pct_min_acq: Value,
    #[serde(rename = "Progress", default)]
    pub progress: Value,
}

impl SkillBlock {
    /// 用于请求子层级的代码
    pub fn code_text(&self) -> Option<String> {
        code_text(&self.code)
    }
}

/// 一级学习目标分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level1Category {
    #[serde(rename = "LGCode", default)]
    pub lg_code: Value,
    #[serde(rename = "LGTitle", default)]
    pub lg_title: Value,
    #[serde(rename = "MinPrgPct", default)]
    pub min_prg_pct: Value,
    #[serde(rename = "Progress", default)]
    pub progress: Value,
    /// 二级分类，抓取失败时为空
    #[serde(default, deserialize_with = "null_as_empty")]
    pub niv2: Vec<Level2Category>,
}

impl Level1Category {
    pub fn lg_code_text(&self) -> Option<String> {
        code_text(&self.lg_code)
    }
}

/// 二级学习目标分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level2Category {
    #[serde(rename = "Code", default)]
    pub code: Value,
    #[serde(rename = "Title", default)]
    pub title: Value,
    #[serde(rename = "MinPrgPct", default)]
    pub min_prg_pct: Value,
    #[serde(rename = "Progress", default)]
    pub progress: Value,
    /// 课程详情，抓取失败时为空
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cat_details: Vec<Trait>,
}

impl Level2Category {
    pub fn code_text(&self) -> Option<String> {
        code_text(&self.code)
    }
}

/// 课程详情中的一组课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    #[serde(rename = "TraitCode", default)]
    pub trait_code: Value,
    #[serde(rename = "TraitTitle", default)]
    pub trait_title: Value,
    #[serde(rename = "CourseList", default, deserialize_with = "null_as_empty")]
    pub course_list: Vec<Course>,
}

/// 课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "CourseCode", default)]
    pub course_code: Value,
    #[serde(rename = "Title", default)]
    pub title: Value,
    #[serde(rename = "CourseStatus", default)]
    pub course_status: Value,
    #[serde(rename = "BlockNoteEntry", default)]
    pub block_note_entry: Value,
    #[serde(rename = "ProgramTitle", default)]
    pub program_title: Value,
    #[serde(rename = "GroupCode", default)]
    pub group_code: Value,
}

/// 输出文档中的一个技能块条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainCategoryReport {
    pub main_cat: String,
    #[serde(rename = "PctMinAcq", default)]
    pub pct_min_acq: Value,
    #[serde(rename = "Progress", default)]
    pub progress: Value,
    #[serde(default)]
    pub categories: Vec<Level1Category>,
}

impl MainCategoryReport {
    /// 由技能块和它的一级分类组装条目
    pub fn new(block: &SkillBlock, main_cat: String, categories: Vec<Level1Category>) -> Self {
        Self {
            main_cat,
            pct_min_acq: block.pct_min_acq.clone(),
            progress: block.progress.clone(),
            categories,
        }
    }
}

/// 完整的输出文档
pub type ResultDocument = Vec<MainCategoryReport>;

/// 代码字段转成请求参数：字符串原样使用，数字取其文本，其它类型视为没有代码
pub fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
