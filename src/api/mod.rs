//! API 模块
//!
//! 负责 PITCH 接口的地址构造

pub mod endpoints;

pub use endpoints::Endpoints;
