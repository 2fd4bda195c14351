//! 进度存储 - 基础设施层
//!
//! 进程内共享的 "用户 → 进度记录" 映射，所有读写都经过同一把锁。
//! 外部的进度展示方只通过 `snapshot` 读取，抓取结束后由它调用 `remove`。

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 单个用户的进度记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    /// 预计要处理的分类总数
    pub total: u32,
    /// 已完成的一级分类数量
    pub current: u32,
    /// 成功的 API 请求数量
    pub requests: u32,
    /// 最近完成的一级分类代码
    pub skill: Option<String>,
}

/// 进度存储
///
/// Clone 只复制 Arc，所有副本共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    records: Arc<Mutex<HashMap<String, ProgressRecord>>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为用户创建（或重置）进度记录，必须在任何任务读写之前调用
    pub fn init(&self, user: &str, total: u32) {
        self.lock().insert(
            user.to_string(),
            ProgressRecord {
                total,
                ..Default::default()
            },
        );
    }

    /// 读取用户当前进度的副本
    pub fn snapshot(&self, user: &str) -> Option<ProgressRecord> {
        self.lock().get(user).cloned()
    }

    /// 成功请求计数 +1，未初始化的用户会被忽略
    pub fn record_request(&self, user: &str) {
        if let Some(record) = self.lock().get_mut(user) {
            record.requests += 1;
        }
    }

    /// 一个一级分类处理完成：current +1 并更新 skill
    ///
    /// 没有代码的分类只计数，保留上一次的 skill
    pub fn advance(&self, user: &str, skill: Option<&str>) {
        if let Some(record) = self.lock().get_mut(user) {
            record.current += 1;
            if let Some(skill) = skill {
                record.skill = Some(skill.to_string());
            }
        }
    }

    /// 删除用户的进度记录
    pub fn remove(&self, user: &str) -> Option<ProgressRecord> {
        self.lock().remove(user)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProgressRecord>> {
        // 记录都是简单计数，持锁线程 panic 后数据依然可用
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
