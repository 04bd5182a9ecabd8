//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义条件分派管道族的输入校验错误：判别值形态非法、枚举分发键非法、
//!   多路分支规格残缺等均在此归档；
//! - 与核心错误域对齐：所有变体经 `From` 转换为
//!   [`PipelineError`]，转换时从本模块码表挑选稳定错误码。
//!
//! ## 设计要求（What）
//! - 启用 `std` 特性时派生 [`thiserror::Error`] 以兼容生态；`no_std` 轨道提供
//!   等价的手写 `Display`；
//! - 这些错误全部是装配者或载荷生产方的编程错误，在违约点同步抛出，
//!   不参与重试或内部恢复。

#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(feature = "std")]
use thiserror::Error;

#[cfg(feature = "std")]
use std::{format, string::String};

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use manifold_core::PipelineError;

/// 分派域的稳定错误码，命名遵循 `<域>.<语义>` 约定。
pub mod codes {
    /// 开关判别值不是字符串或整数。
    pub const SWITCH_INVALID_VALUE: &str = "dispatch.switch.invalid_value";
    /// 枚举开关的判别值不是期望枚举类型的成员。
    pub const ENUM_INVALID_VALUE: &str = "dispatch.enum_switch.invalid_value";
    /// 枚举开关的分发键配置非法（非枚举成员，或混用多个枚举类型）。
    pub const ENUM_INVALID_CASE: &str = "dispatch.enum_switch.invalid_case";
    /// 多路分支规格残缺：条目缺谓词或缺子链清单。
    pub const MULTIBRANCH_MALFORMED: &str = "dispatch.multibranch.malformed_spec";
}

/// 条件分派管道族的校验错误。
///
/// # 教案式说明
/// - **意图 (Why)**：细粒度枚举让测试与上层能精确区分"配置写错了"与
///   "载荷形态不对"两类违约来源；
/// - **契约 (What)**：所有变体满足 `Send + Sync + 'static`；通过
///   [`From<DispatchError>`](From) 转换为 [`PipelineError`] 后即可在
///   `handle` 中以 `?` 直接传播；
/// - **风险 (Trade-offs)**：字段名以 `String` 保存，牺牲一次堆分配换取
///   错误消息的完整上下文。
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchError {
    /// 开关的判别字段持有既非字符串也非整数的值。
    #[cfg_attr(
        feature = "std",
        error("field `{field}` must hold a string or integer for switch dispatch, got {actual}")
    )]
    SwitchValueType { field: String, actual: &'static str },

    /// 枚举开关的判别字段持有非枚举值。
    #[cfg_attr(
        feature = "std",
        error("field `{field}` must hold a value-backed enum case, got {actual}")
    )]
    NotAnEnum { field: String, actual: &'static str },

    /// 枚举开关的判别值属于另一个枚举类型。
    #[cfg_attr(
        feature = "std",
        error("field `{field}` must hold a `{expected}` case, got a `{actual}` case")
    )]
    EnumTypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// 枚举开关的分发键不是枚举成员。
    #[cfg_attr(
        feature = "std",
        error("enum switch case keys must be value-backed enum cases, got {actual}")
    )]
    CaseKeyType { actual: &'static str },

    /// 枚举开关的分发键混用了多个枚举类型。
    #[cfg_attr(
        feature = "std",
        error("enum switch case keys must share one enum type, expected `{expected}`, got `{actual}`")
    )]
    CaseKeyMixed {
        expected: &'static str,
        actual: &'static str,
    },

    /// 多路分支条目缺谓词或缺子链清单。
    #[cfg_attr(
        feature = "std",
        error("multibranch arm #{index} must configure both a condition and a pipe list")
    )]
    ArmIncomplete { index: usize },
}

impl From<DispatchError> for PipelineError {
    /// 将分派错误折算为统一错误载体，错误码稳定、消息携带上下文。
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::SwitchValueType { field, actual } => PipelineError::new(
                codes::SWITCH_INVALID_VALUE,
                format!(
                    "field `{field}` must hold a string or integer for switch dispatch, got {actual}"
                ),
            ),
            DispatchError::NotAnEnum { field, actual } => PipelineError::new(
                codes::ENUM_INVALID_VALUE,
                format!("field `{field}` must hold a value-backed enum case, got {actual}"),
            ),
            DispatchError::EnumTypeMismatch {
                field,
                expected,
                actual,
            } => PipelineError::new(
                codes::ENUM_INVALID_VALUE,
                format!("field `{field}` must hold a `{expected}` case, got a `{actual}` case"),
            ),
            DispatchError::CaseKeyType { actual } => PipelineError::new(
                codes::ENUM_INVALID_CASE,
                format!("enum switch case keys must be value-backed enum cases, got {actual}"),
            ),
            DispatchError::CaseKeyMixed { expected, actual } => PipelineError::new(
                codes::ENUM_INVALID_CASE,
                format!(
                    "enum switch case keys must share one enum type, expected `{expected}`, got `{actual}`"
                ),
            ),
            DispatchError::ArmIncomplete { index } => PipelineError::new(
                codes::MULTIBRANCH_MALFORMED,
                format!("multibranch arm #{index} must configure both a condition and a pipe list"),
            ),
        }
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::SwitchValueType { field, actual } => write!(
                f,
                "field `{field}` must hold a string or integer for switch dispatch, got {actual}"
            ),
            DispatchError::NotAnEnum { field, actual } => write!(
                f,
                "field `{field}` must hold a value-backed enum case, got {actual}"
            ),
            DispatchError::EnumTypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field `{field}` must hold a `{expected}` case, got a `{actual}` case"
            ),
            DispatchError::CaseKeyType { actual } => write!(
                f,
                "enum switch case keys must be value-backed enum cases, got {actual}"
            ),
            DispatchError::CaseKeyMixed { expected, actual } => write!(
                f,
                "enum switch case keys must share one enum type, expected `{expected}`, got `{actual}`"
            ),
            DispatchError::ArmIncomplete { index } => write!(
                f,
                "multibranch arm #{index} must configure both a condition and a pipe list"
            ),
        }
    }
}
