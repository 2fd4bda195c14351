//! API 响应的结构校验
//!
//! PITCH 的接口有时返回数组，有时返回以代码为键的对象。
//! 在客户端边界只校验一次结构，后续代码按变体处理，不再猜测类型。

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// 已校验结构的 JSON 响应
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl Payload {
    /// 校验 JSON 结构，标量和 null 返回 `ApiError::UnexpectedShape`
    pub fn decode(endpoint: &str, value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => Ok(Payload::List(items)),
            Value::Object(map) => Ok(Payload::Object(map)),
            other => Err(ApiError::unexpected_shape(endpoint, &other)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Payload::List(items) => items.is_empty(),
            Payload::Object(map) => map.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::List(items) => items.len(),
            Payload::Object(map) => map.len(),
        }
    }

    /// 按服务端顺序取出所有条目（对象取其值）
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Payload::List(items) => items,
            Payload::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        }
    }

    /// 按服务端顺序取出 (键, 条目)，数组条目没有键
    pub fn into_keyed_items(self) -> Vec<(Option<String>, Value)> {
        match self {
            Payload::List(items) => items.into_iter().map(|v| (None, v)).collect(),
            Payload::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        }
    }

    /// 把每个条目单独投影为指定结构
    ///
    /// 不是对象的条目（或投影失败的条目）只丢弃它自己，其余条目保持原顺序。
    /// 返回投影成功的条目和被丢弃条目的错误。
    pub fn project<T: DeserializeOwned>(self, endpoint: &str) -> (Vec<T>, Vec<ApiError>) {
        let mut projected = Vec::new();
        let mut dropped = Vec::new();
        for item in self.into_items() {
            if !item.is_object() {
                dropped.push(ApiError::unexpected_shape(endpoint, &item));
                continue;
            }
            match serde_json::from_value(item) {
                Ok(value) => projected.push(value),
                Err(source) => dropped.push(ApiError::DecodeFailed {
                    endpoint: endpoint.to_string(),
                    source,
                }),
            }
        }
        (projected, dropped)
    }
}
