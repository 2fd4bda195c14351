//! PITCH 数据服务 - 业务能力层
//!
//! 职责：
//! - 用共享的信号量限制所有层级的并发请求数
//! - 在客户端边界校验 JSON 结构（数组 / 对象）
//! - 成功请求后在进度存储中计数
//! - 把响应投影为固定字段的结构
//!
//! 任何失败都只记录日志并返回 `None`，由调用方降级为空列表

use crate::api::Endpoints;
use crate::clients::JsonFetcher;
use crate::config::Config;
use crate::error::ApiError;
use crate::infrastructure::ProgressStore;
use crate::models::{Level1Category, Level2Category, Payload, SkillBlock, Trait};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// PITCH 数据服务
///
/// Clone 只复制 Arc，可以直接移动进 spawn 的任务
#[derive(Clone)]
pub struct PitchService {
    fetcher: Arc<dyn JsonFetcher>,
    endpoints: Arc<Endpoints>,
    limiter: Arc<Semaphore>,
    progress: ProgressStore,
    user: Arc<str>,
}

impl PitchService {
    /// 创建新的数据服务
    ///
    /// # 参数
    /// - `fetcher`: JSON 获取实现
    /// - `config`: 配置（端点参数和并发上限）
    /// - `progress`: 共享的进度存储
    /// - `user`: 进度记录对应的用户
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        config: &Config,
        progress: ProgressStore,
        user: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            endpoints: Arc::new(Endpoints::new(config)),
            limiter: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
            progress,
            user: Arc::from(user.into()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// 发起一次请求并校验结构
    ///
    /// 许可只在单个请求期间持有，嵌套的并发任务不会互相等待
    pub async fn fetch(&self, url: &str) -> Option<Payload> {
        let result = {
            let _permit = match self.limiter.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("[{}] 请求许可获取失败: {}", self.user, e);
                    return None;
                }
            };
            self.fetcher.fetch_json(url).await
        };

        match result.and_then(|value| Payload::decode(url, value)) {
            Ok(payload) => {
                self.progress.record_request(&self.user);
                debug!("[{}] ✓ {} ({} 条)", self.user, url, payload.len());
                Some(payload)
            }
            Err(e) => {
                warn!("[{}] ⚠️ {}", self.user, e);
                None
            }
        }
    }

    /// 获取技能块
    ///
    /// 数组条目以 `Code` 为键，对象条目以对象键为键；重复代码保留首次出现的位置、最后一次的值
    pub async fn skill_blocks(&self) -> Vec<SkillBlock> {
        let url = self.endpoints.skill_blocks();
        let payload = match self.fetch(&url).await {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                warn!("[{}] ⚠️ 没有收到技能块数据", self.user);
                return Vec::new();
            }
        };

        let mut blocks: Vec<SkillBlock> = Vec::new();
        for (key, item) in payload.into_keyed_items() {
            let Some(block) = decode_skill_block(key, item) else {
                continue;
            };
            match blocks
                .iter_mut()
                .find(|b| b.code_text() == block.code_text())
            {
                Some(existing) => *existing = block,
                None => blocks.push(block),
            }
        }
        blocks
    }

    /// 获取技能块下的一级分类
    pub async fn level1_categories(&self, block_code: &str) -> Option<Vec<Level1Category>> {
        let url = self.endpoints.level1_categories(block_code);
        self.fetch_projected(&url).await
    }

    /// 获取一级分类下的二级分类
    pub async fn level2_categories(
        &self,
        block_code: &str,
        lg_code: &str,
    ) -> Option<Vec<Level2Category>> {
        let url = self.endpoints.level2_categories(block_code, lg_code);
        self.fetch_projected(&url).await
    }

    /// 获取二级分类的课程详情，只接受数组响应
    pub async fn category_details(&self, lg_code: &str, lo_code: &str) -> Option<Vec<Trait>> {
        let url = self.endpoints.category_details(lg_code, lo_code);
        match self.fetch(&url).await? {
            payload @ Payload::List(_) if !payload.is_empty() => {
                self.project(&url, payload)
            }
            Payload::List(_) => None,
            Payload::Object(_) => {
                warn!("[{}] ⚠️ 课程详情不是数组: {}", self.user, url);
                None
            }
        }
    }

    async fn fetch_projected<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<Vec<T>> {
        match self.fetch(url).await {
            Some(payload) if !payload.is_empty() => self.project(url, payload),
            _ => {
                debug!("[{}] 没有收到数据: {}", self.user, url);
                None
            }
        }
    }

    /// 逐条投影，坏条目只丢弃自己
    fn project<T: serde::de::DeserializeOwned>(&self, url: &str, payload: Payload) -> Option<Vec<T>> {
        let (items, dropped) = payload.project(url);
        for e in &dropped {
            warn!("[{}] ⚠️ 丢弃条目: {}", self.user, e);
        }
        (!items.is_empty()).then_some(items)
    }
}

fn decode_skill_block(key: Option<String>, item: Value) -> Option<SkillBlock> {
    if !item.is_object() {
        warn!("⚠️ 技能块条目不是对象: {}", ApiError::unexpected_shape("SkillBlock", &item));
        return None;
    }
    let mut block: SkillBlock = match serde_json::from_value(item) {
        Ok(block) => block,
        Err(e) => {
            warn!("⚠️ 技能块条目解码失败: {}", e);
            return None;
        }
    };
    if block.code.is_null() {
        if let Some(key) = key {
            block.code = Value::String(key);
        }
    }
    block.code_text()?;
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    struct MapFetcher {
        responses: HashMap<String, Value>,
    }

    #[async_trait]
    impl JsonFetcher for MapFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value, ApiError> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::UnexpectedShape {
                    endpoint: url.to_string(),
                    found: "404".to_string(),
                })
        }
    }

    fn service(responses: Vec<(String, Value)>) -> PitchService {
        let progress = ProgressStore::new();
        progress.init("jdoe", 97);
        PitchService::new(
            Arc::new(MapFetcher {
                responses: responses.into_iter().collect(),
            }),
            &Config::default(),
            progress,
            "jdoe",
        )
    }

    fn endpoints() -> Endpoints {
        Endpoints::new(&Config::default())
    }

    fn requests(service: &PitchService) -> u32 {
        service.progress().snapshot("jdoe").unwrap().requests
    }

    #[tokio::test]
    async fn test_skill_blocks_from_object_payload() {
        let service = service(vec![(
            endpoints().skill_blocks(),
            json!({
                "BI1": {"PctMinAcq": 50, "Progress": 12.5},
                "BI2": {"PctMinAcq": 60, "Progress": 0}
            }),
        )]);

        let blocks = service.skill_blocks().await;
        let codes: Vec<_> = blocks.iter().filter_map(|b| b.code_text()).collect();
        assert_eq!(codes, ["BI1", "BI2"]);
        assert_eq!(blocks[0].progress, json!(12.5));
        assert_eq!(requests(&service), 1);
    }

    #[tokio::test]
    async fn test_skill_blocks_from_list_payload_dedupes_codes() {
        let service = service(vec![(
            endpoints().skill_blocks(),
            json!([
                {"Code": "BI1", "PctMinAcq": 10, "Progress": 1},
                {"Code": null, "PctMinAcq": 20},
                {"Code": "BI2", "PctMinAcq": 30},
                {"Code": "BI1", "PctMinAcq": 40, "Progress": 4}
            ]),
        )]);

        let blocks = service.skill_blocks().await;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].code_text().as_deref(), Some("BI1"));
        assert_eq!(blocks[0].pct_min_acq, json!(40));
        assert_eq!(blocks[1].code_text().as_deref(), Some("BI2"));
    }

    #[tokio::test]
    async fn test_failed_request_is_not_counted() {
        let service = service(Vec::new());

        assert!(service.skill_blocks().await.is_empty());
        assert!(service.level1_categories("BI1").await.is_none());
        assert_eq!(requests(&service), 0);
    }

    #[tokio::test]
    async fn test_scalar_payload_is_rejected_and_not_counted() {
        let url = endpoints().level1_categories("BI1");
        let service = service(vec![(url.clone(), json!("<html>login</html>"))]);

        assert!(service.fetch(&url).await.is_none());
        assert_eq!(requests(&service), 0);
    }

    #[tokio::test]
    async fn test_empty_list_is_counted_but_yields_none() {
        let service = service(vec![(endpoints().level1_categories("BI1"), json!([]))]);

        assert!(service.level1_categories("BI1").await.is_none());
        assert_eq!(requests(&service), 1);
    }

    #[tokio::test]
    async fn test_level2_projection() {
        let service = service(vec![(
            endpoints().level2_categories("BI1", "LG1"),
            json!([
                {"Code": "LO1", "Title": "Analyse", "MinPrgPct": 50, "Progress": 75, "Extra": 1},
                {"Code": "LO2", "Title": "Synthèse", "MinPrgPct": 50, "Progress": 0}
            ]),
        )]);

        let categories = service.level2_categories("BI1", "LG1").await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].title, json!("Synthèse"));
        assert!(categories.iter().all(|c| c.cat_details.is_empty()));
    }

    #[tokio::test]
    async fn test_details_require_list_payload() {
        let list_url = endpoints().category_details("LG1", "LO1");
        let object_url = endpoints().category_details("LG1", "LO2");
        let service = service(vec![
            (
                list_url,
                json!([{
                    "TraitCode": "T1",
                    "TraitTitle": "Savoir",
                    "CourseList": [{"CourseCode": "C1", "Title": "Maths", "CourseStatus": "OK"}]
                }]),
            ),
            (object_url, json!({"Message": "error"})),
        ]);

        let traits = service.category_details("LG1", "LO1").await.unwrap();
        assert_eq!(traits[0].course_list[0].course_code, json!("C1"));

        assert!(service.category_details("LG1", "LO2").await.is_none());
        // 对象响应的结构合法，请求仍然计数
        assert_eq!(requests(&service), 2);
    }

    #[tokio::test]
    async fn test_bad_item_does_not_drop_siblings() {
        let service = service(vec![(
            endpoints().level1_categories("BI1"),
            json!([
                {"LGCode": "LG1", "LGTitle": "Sciences", "MinPrgPct": 50, "Progress": 12},
                "not an object",
                {"LGCode": "LG2", "LGTitle": "Langues", "MinPrgPct": "50", "Progress": null}
            ]),
        )]);

        let categories = service.level1_categories("BI1").await.unwrap();
        let codes: Vec<_> = categories.iter().filter_map(|c| c.lg_code_text()).collect();
        assert_eq!(codes, ["LG1", "LG2"]);
        assert_eq!(categories[0].min_prg_pct, json!(50));
        assert_eq!(categories[1].min_prg_pct, json!("50"));
    }

    #[tokio::test]
    async fn test_fetcher_errors_surface_from_fake() {
        let fetcher = MapFetcher {
            responses: HashMap::from([("a".to_string(), json!([]))]),
        };
        assert_ok!(fetcher.fetch_json("a").await);
        assert_err!(fetcher.fetch_json("b").await);
    }
}
