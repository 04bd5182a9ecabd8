//! # json 模块说明
//!
//! ## 角色定位（Why）
//! - 让 JSON 文档可以直接作为链路载荷参与字段抽取：对象按键值映射抽取，
//!   数组按索引容器抽取，其余 JSON 形态视为不可抽取的标量；
//! - 该集成位于 `json` Feature 之后，核心契约不强制依赖 `serde_json`。
//!
//! ## 契约说明（What）
//! - 数值优先映射为 [`FieldValue::Int`]，超出 `i64` 表达范围时退化为
//!   [`FieldValue::Float`]；
//! - 嵌套对象与数组映射为 [`FieldValue::Composite`]，由上层决定如何对待。

use std::{string::String, vec::Vec};

use serde_json::{Map, Value};

use crate::extract::{FieldAccess, FieldValue, IndexedAccess, KeyedAccess, PayloadShape};

/// 将单个 JSON 值折算为封闭字段值集合。
pub fn field_value_of(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(*flag),
        Value::Number(number) => number
            .as_i64()
            .map(FieldValue::Int)
            .or_else(|| number.as_f64().map(FieldValue::Float))
            .unwrap_or(FieldValue::Composite),
        Value::String(text) => FieldValue::Str(text.clone()),
        Value::Array(_) | Value::Object(_) => FieldValue::Composite,
    }
}

impl KeyedAccess for Map<String, Value> {
    fn entry(&self, key: &str) -> Option<FieldValue> {
        self.get(key).map(field_value_of)
    }
}

impl IndexedAccess for Vec<Value> {
    fn has_index(&self, index: &str) -> bool {
        index
            .parse::<usize>()
            .map(|position| position < self.len())
            .unwrap_or(false)
    }

    fn at_index(&self, index: &str) -> Option<FieldValue> {
        index
            .parse::<usize>()
            .ok()
            .and_then(|position| self.get(position))
            .map(field_value_of)
    }
}

impl FieldAccess for Value {
    fn shape(&self) -> PayloadShape<'_> {
        match self {
            Value::Object(map) => PayloadShape::Keyed(map),
            Value::Array(items) => PayloadShape::Indexed(items),
            _ => PayloadShape::Opaque,
        }
    }
}
