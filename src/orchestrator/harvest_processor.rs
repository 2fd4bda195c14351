//! 抓取处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的抓取。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：CAS 登录、创建 PITCH 客户端和数据服务
//! 2. **进度初始化**：在任何任务读写之前创建用户的进度记录
//! 3. **顺序遍历**：技能块逐个处理，委托 `block_processor` 处理单个技能块
//! 4. **结果写入**：组装结果文档并写入 JSON 文件
//! 5. **全局统计**：输出请求数和已处理分类数

use crate::clients::{CasClient, PitchClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ProgressStore;
use crate::models::{Credentials, ResultDocument};
use crate::orchestrator::block_processor;
use crate::services::{PitchService, ReportWriter};
use crate::utils::logging::{log_block_start, log_startup, print_final_stats};
use crate::workflow::CategoryFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    service: PitchService,
}

impl App {
    /// 初始化应用：登录并创建数据服务
    ///
    /// 登录失败直接返回错误，不会带着空 token 继续抓取
    pub async fn initialize(
        config: Config,
        credentials: &Credentials,
        clean_username: &str,
        progress: ProgressStore,
    ) -> AppResult<Self> {
        log_startup(clean_username, &config);

        let token = CasClient::new(&config)
            .login(credentials)
            .await
            .map_err(|e| {
                error!("[{}] ❌ 登录失败: {}", clean_username, e);
                e
            })?;

        let client = PitchClient::new(&config, &token)?;
        let service = PitchService::new(Arc::new(client), &config, progress, clean_username);

        Ok(Self::with_service(config, service))
    }

    /// 使用已有的数据服务创建应用（跳过登录）
    pub fn with_service(config: Config, service: PitchService) -> Self {
        Self { config, service }
    }

    /// 运行一次完整抓取并写入文件
    ///
    /// # 返回
    /// 返回输出文件路径；写文件失败是整次运行的失败
    pub async fn run(&self) -> AppResult<PathBuf> {
        let user = self.service.user();
        self.service
            .progress()
            .init(user, self.config.progress_total);

        let reporter = spawn_progress_reporter(
            self.service.progress().clone(),
            user.to_string(),
            self.config.progress_log_interval_secs,
        );

        let document = Harvester::new(self.service.clone()).harvest().await;

        if let Some(reporter) = reporter {
            reporter.abort();
        }

        let path = ReportWriter::new(&self.config.output_dir)
            .write(user, &document)
            .await?;

        print_final_stats(
            self.service.progress().snapshot(user).as_ref(),
            document.len(),
            &path,
        );

        Ok(path)
    }
}

/// 按技能块顺序遍历并组装结果文档
pub struct Harvester {
    service: PitchService,
    flow: CategoryFlow,
}

impl Harvester {
    pub fn new(service: PitchService) -> Self {
        let flow = CategoryFlow::new(service.clone());
        Self { service, flow }
    }

    /// 抓取完整的结果文档
    ///
    /// 技能块严格顺序处理，文档顺序与技能块顺序一致
    pub async fn harvest(&self) -> ResultDocument {
        let blocks = self.service.skill_blocks().await;
        if blocks.is_empty() {
            warn!("[{}] ⚠️ 没有技能块，结果文档为空", self.service.user());
            return Vec::new();
        }

        info!("[{}] ✓ 找到 {} 个技能块", self.service.user(), blocks.len());

        let mut document = Vec::with_capacity(blocks.len());
        for (idx, block) in blocks.iter().enumerate() {
            log_block_start(
                idx + 1,
                blocks.len(),
                block.code_text().as_deref().unwrap_or_default(),
            );
            let report = block_processor::process_block(&self.service, &self.flow, block).await;
            document.push(report);
        }
        document
    }
}

/// 周期性打印进度，间隔为 0 时不启动
fn spawn_progress_reporter(
    progress: ProgressStore,
    user: String,
    interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // 第一次 tick 立即返回
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Some(record) = progress.snapshot(&user) {
                info!(
                    "[{}] ⏳ 进度 {}/{} | 请求 {} | 当前 {}",
                    user,
                    record.current,
                    record.total,
                    record.requests,
                    record.skill.as_deref().unwrap_or("-")
                );
            }
        }
    }))
}
