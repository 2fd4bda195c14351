//! 一级分类处理流程 - 流程层
//!
//! 核心职责：完成"一个一级分类"的整棵子树
//!
//! 流程顺序：
//! 1. 请求二级分类
//! 2. 并发请求每个二级分类的课程详情
//! 3. 按下标把详情挂回对应的二级分类

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::models::Level1Category;
use crate::services::PitchService;
use crate::workflow::category_ctx::CategoryCtx;

/// 一级分类处理流程
///
/// - 不持有进度状态，进度由编排层在子树完成后更新
/// - 任何子请求失败都降级为空列表
#[derive(Clone)]
pub struct CategoryFlow {
    service: PitchService,
}

impl CategoryFlow {
    pub fn new(service: PitchService) -> Self {
        Self { service }
    }

    /// 填充一级分类的 `niv2` 及其课程详情
    pub async fn run(&self, ctx: &CategoryCtx, mut category: Level1Category) -> Level1Category {
        let Some(lg_code) = ctx.lg_code.as_deref() else {
            warn!("{} ⚠️ 一级分类没有代码，跳过", ctx);
            category.niv2 = Vec::new();
            return category;
        };

        let Some(mut niv2) = self
            .service
            .level2_categories(&ctx.main_cat, lg_code)
            .await
        else {
            debug!("{} 没有二级分类", ctx);
            category.niv2 = Vec::new();
            return category;
        };

        let mut pending: FuturesUnordered<_> = niv2
            .iter()
            .enumerate()
            .filter_map(|(index, sub)| {
                let lo_code = sub.code_text()?;
                let child = ctx.child(index, Some(lo_code.clone()));
                let service = &self.service;
                Some(async move {
                    let details = service.category_details(lg_code, &lo_code).await;
                    (child, details)
                })
            })
            .collect();

        while let Some((child, details)) = pending.next().await {
            let count = details.as_ref().map_or(0, Vec::len);
            if let Some(sub) = niv2.get_mut(child.index) {
                sub.cat_details = details.unwrap_or_default();
            }
            debug!("{} 课程详情: {} 组", child, count);
        }

        category.niv2 = niv2;
        category
    }
}
