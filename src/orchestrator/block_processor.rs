//! 单个技能块处理器 - 编排层
//!
//! ## 职责
//!
//! - 请求技能块下的一级分类
//! - 为每个一级分类 spawn 一个任务，交给 `CategoryFlow` 处理整棵子树
//! - 每棵子树完成后更新进度（current +1，skill = 一级分类代码）
//! - 按原列表顺序组装结果，与完成顺序无关
//!
//! 任务 panic 只影响它自己的分类（降级为空的 `niv2`），兄弟分类不受影响

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{error, info, warn};

use crate::models::{Level1Category, MainCategoryReport, SkillBlock};
use crate::services::PitchService;
use crate::workflow::{CategoryCtx, CategoryFlow};

/// 处理单个技能块
///
/// # 参数
/// - `service`: PITCH 数据服务
/// - `flow`: 一级分类处理流程
/// - `block`: 技能块
///
/// # 返回
/// 返回该技能块在结果文档中的条目
pub async fn process_block(
    service: &PitchService,
    flow: &CategoryFlow,
    block: &SkillBlock,
) -> MainCategoryReport {
    let main_cat = block.code_text().unwrap_or_default();
    let user = service.user();

    let Some(level1) = service.level1_categories(&main_cat).await else {
        warn!("[{}] ⚠️ 技能块 {} 没有一级分类", user, main_cat);
        return MainCategoryReport::new(block, main_cat, Vec::new());
    };

    info!("[{}] 技能块 {}: {} 个一级分类", user, main_cat, level1.len());

    // 任务失败时用原始分类兜底
    let mut slots: Vec<Level1Category> = level1.clone();

    let mut pending: FuturesUnordered<_> = level1
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            let ctx = CategoryCtx::level1(main_cat.clone(), index, category.lg_code_text());
            let flow = flow.clone();
            let task_ctx = ctx.clone();
            let handle = tokio::spawn(async move { flow.run(&task_ctx, category).await });
            async move { (ctx, handle.await) }
        })
        .collect();

    while let Some((ctx, joined)) = pending.next().await {
        match joined {
            Ok(category) => {
                if let Some(slot) = slots.get_mut(ctx.index) {
                    *slot = category;
                }
            }
            Err(e) => {
                error!("[{}] {} 任务执行失败: {}", user, ctx, e);
                if let Some(slot) = slots.get_mut(ctx.index) {
                    slot.niv2 = Vec::new();
                }
            }
        }

        service.progress().advance(user, ctx.lg_code.as_deref());
        info!(
            "[{}] ✓ {}",
            user,
            ctx.lg_code.as_deref().unwrap_or("(无代码)")
        );
    }

    MainCategoryReport::new(block, main_cat, slots)
}
