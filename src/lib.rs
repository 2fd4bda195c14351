//! # Academ Scraper
//!
//! 登录学校 CAS 单点登录，从 PITCH API 抓取学生的学业进度，
//! 整理为每个用户一份的嵌套 JSON 文档
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有进程内共享资源
//! - `ProgressStore` - 用户进度记录，唯一的跨任务可变状态
//!
//! ### ② 客户端层（Clients / Api）
//! - `clients/` - `CasClient` 登录、`PitchClient` 发送带 cookie 的 GET
//! - `api/` - 四种查询的 URL 构造
//!
//! ### ③ 业务能力层（Services）
//! - `PitchService` - 并发上限、结构校验、请求计数、字段投影
//! - `ReportWriter` - 写 JSON 文件能力
//!
//! ### ④ 流程层（Workflow）
//! - `CategoryCtx` - 任务上下文（层级 + 父级代码 + 下标）
//! - `CategoryFlow` - 一个一级分类的完整子树（二级分类 → 课程详情）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/harvest_processor` - 应用生命周期，顺序遍历技能块
//! - `orchestrator/block_processor` - 单个技能块，并发处理一级分类
//!
//! ## 模块结构

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CasClient, JsonFetcher, PitchClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ProgressRecord, ProgressStore};
pub use models::{Credentials, MainCategoryReport, ResultDocument, SessionToken};
pub use orchestrator::{App, Harvester};
pub use services::{sanitize_username, PitchService, ReportWriter};
pub use workflow::{CategoryCtx, CategoryFlow};
