/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::infrastructure::ProgressRecord;
use std::path::Path;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `user`: 清理后的用户名
/// - `config`: 当前配置
pub fn log_startup(user: &str, config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 学业进度抓取");
    info!("👤 用户: {}", user);
    info!(
        "📚 课程体系: {} / {} ({})",
        config.program_code, config.version_code, config.culture
    );
    info!("📊 最大并发请求数: {}", config.max_concurrent_requests);
    info!("{}", "=".repeat(60));
}

/// 记录技能块开始处理
///
/// # 参数
/// - `index`: 当前技能块编号（从1开始）
/// - `total`: 技能块总数
/// - `main_cat`: 技能块代码
pub fn log_block_start(index: usize, total: usize, main_cat: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始处理技能块 {}/{}: {}", index, total, main_cat);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `record`: 最终的进度记录
/// - `blocks`: 技能块数量
/// - `output_path`: 输出文件路径
pub fn print_final_stats(record: Option<&ProgressRecord>, blocks: usize, output_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 技能块: {}", blocks);
    if let Some(record) = record {
        info!("✅ 已处理分类: {}/{}", record.current, record.total);
        info!("🌐 API 请求总数: {}", record.requests);
    }
    info!("{}", "=".repeat(60));
    info!("\nJSON 文件已保存至: {}", output_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
