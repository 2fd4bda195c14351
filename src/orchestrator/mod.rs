//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次完整抓取的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `harvest_processor` - 抓取处理器
//! - 管理应用生命周期（登录、运行、写文件）
//! - 顺序遍历技能块
//! - 输出全局统计信息
//!
//! ### `block_processor` - 单个技能块处理器
//! - 并发处理技能块下的所有一级分类
//! - 每个一级分类完成后更新进度
//!
//! ## 层次关系
//!
//! ```text
//! harvest_processor (处理 Vec<SkillBlock>)
//!     ↓
//! block_processor (处理 Vec<Level1Category>)
//!     ↓
//! workflow::CategoryFlow (处理单个一级分类的子树)
//!     ↓
//! services (能力层：PitchService / ReportWriter)
//!     ↓
//! clients + infrastructure (HTTP 客户端、进度存储)
//! ```

pub mod block_processor;
pub mod harvest_processor;

// 重新导出主要类型
pub use block_processor::process_block;
pub use harvest_processor::{App, Harvester};
